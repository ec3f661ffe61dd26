//! farmdesk - Farm Management Console
//!
//! A terminal console for the day-to-day records of a farm: vehicles,
//! equipment, staff, fields and crops. Records are kept in memory for the
//! length of the session.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farmdesk::application::{log_snapshot, seed_demo, Console, ConsoleMode, KeyPolicy, RootStore, StoreConfig};
use farmdesk::presentation::{render_ui, InputHandler};

#[derive(Parser)]
#[command(name = "farmdesk")]
#[command(about = "Terminal console for farm vehicles, equipment, staff, fields and crops")]
struct Cli {
    /// Write logs to this file (the terminal is taken by the console)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// How record keys are checked on add
    #[arg(long, value_enum, default_value_t = KeyPolicyArg::Permissive)]
    key_policy: KeyPolicyArg,

    /// Start with a few example records
    #[arg(long)]
    demo: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KeyPolicyArg {
    /// Duplicate keys are accepted
    Permissive,
    /// Adding a key that already exists is refused
    Unique,
}

impl From<KeyPolicyArg> for KeyPolicy {
    fn from(arg: KeyPolicyArg) -> Self {
        match arg {
            KeyPolicyArg::Permissive => KeyPolicy::Permissive,
            KeyPolicyArg::Unique => KeyPolicy::Unique,
        }
    }
}

/// Initialize tracing into `log_file`. Without a file nothing is logged.
fn init_tracing(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "farmdesk=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

/// Entry point for the farmdesk console.
///
/// Creates the session store, sets up the terminal, and runs the event
/// loop until the user quits. The store is disposed on the way out.
///
/// # Errors
///
/// Returns an error if the log file cannot be created, if demo records are
/// refused, or if terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let mut store = RootStore::create(StoreConfig {
        key_policy: cli.key_policy.into(),
    });
    store.subscribe(log_snapshot(store.snapshot_handle()));
    if cli.demo {
        seed_demo(&mut store)?;
    }
    let mut console = Console::new(store);
    tracing::info!("console started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut console);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    console.into_store().dispose();
    tracing::info!("console closed");

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main event loop: draw, read a key, hand it to the input handler.
/// 'q' quits from the table view.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, console: &mut Console) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, console))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if console.mode == ConsoleMode::Normal => return Ok(()),
                    _ => InputHandler::handle_key_event(console, key.code, key.modifiers),
                }
            }
        }
    }
}
