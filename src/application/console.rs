//! Console state for the terminal management screens.
//!
//! The console owns the [`RootStore`] for the session, keeps the snapshot it
//! last rendered, and turns form input into intents. It never edits a
//! collection itself.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use crate::domain::{EntityKind, ExportError, FieldInput, FormError, Intent, StoreError};

use super::aggregator::{RootStore, Subscription};
use super::snapshot::Snapshot;
use super::store::Change;

/// Represents the current mode of the console.
///
/// The mode decides how key presses are interpreted and which overlays
/// are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    /// Browsing the page table
    Normal,
    /// Typing into the page form
    Form,
    /// The "see more" modal for the selected record is open
    Detail,
    /// Help screen is displayed
    Help,
    /// CSV export dialog is open
    ExportCsv,
}

/// Input buffer for the page form, one value per attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub values: Vec<String>,
    /// Index of the focused attribute
    pub focus: usize,
    /// Key of the record being edited; `None` when adding
    pub editing: Option<String>,
}

impl FormState {
    pub fn empty(kind: EntityKind) -> Self {
        Self {
            values: vec![String::new(); kind.fields().len()],
            focus: 0,
            editing: None,
        }
    }
}

/// Main console state.
///
/// # Examples
///
/// ```
/// use farmdesk::application::{Console, RootStore, StoreConfig};
/// use farmdesk::domain::EntityKind;
///
/// let console = Console::new(RootStore::create(StoreConfig::default()));
/// assert_eq!(console.page, EntityKind::Vehicle);
/// assert_eq!(console.selected_row, 0);
/// ```
#[derive(Debug)]
pub struct Console {
    store: RootStore,
    subscription: Subscription,
    dirty: Rc<Cell<bool>>,
    /// Snapshot the screen is drawn from
    pub snapshot: Arc<Snapshot>,
    /// Page currently shown
    pub page: EntityKind,
    pub mode: ConsoleMode,
    pub form: FormState,
    /// Selected table row (zero-based)
    pub selected_row: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Cursor position within the filename buffer
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
}

impl Console {
    /// Wraps a store, subscribing so the console knows when to re-read the
    /// snapshot.
    pub fn new(mut store: RootStore) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = store.subscribe(move || flag.set(true));
        let snapshot = store.get_snapshot();
        let page = EntityKind::Vehicle;

        Self {
            store,
            subscription,
            dirty,
            snapshot,
            page,
            mode: ConsoleMode::Normal,
            form: FormState::empty(page),
            selected_row: 0,
            status_message: None,
            filename_input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
        }
    }

    /// Gives the store back, dropping the console's own subscription.
    pub fn into_store(mut self) -> RootStore {
        self.store.unsubscribe(self.subscription);
        self.store
    }

    pub fn store(&self) -> &RootStore {
        &self.store
    }

    /// Re-reads the snapshot if a dispatch happened since the last read.
    pub fn sync(&mut self) {
        if self.dirty.replace(false) {
            self.snapshot = self.store.get_snapshot();
            self.clamp_selection();
        }
    }

    /// Dispatches an intent and refreshes the snapshot.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Change, StoreError> {
        let result = self.store.dispatch(intent);
        self.sync();
        result
    }

    // ============================================================
    // Pages and selection
    // ============================================================

    pub fn set_page(&mut self, page: EntityKind) {
        self.page = page;
        self.mode = ConsoleMode::Normal;
        self.form = FormState::empty(page);
        self.selected_row = 0;
        self.status_message = None;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.next());
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.previous());
    }

    pub fn row_count(&self) -> usize {
        self.snapshot.len(self.page)
    }

    pub fn select_next(&mut self) {
        if self.selected_row + 1 < self.row_count() {
            self.selected_row += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let rows = self.row_count();
        if self.selected_row >= rows {
            self.selected_row = rows.saturating_sub(1);
        }
    }

    fn selected_key(&self) -> Option<String> {
        self.snapshot.key_at(self.page, self.selected_row)
    }

    // ============================================================
    // Form
    // ============================================================

    /// Focuses an empty form for a new record.
    pub fn start_form(&mut self) {
        self.form = FormState::empty(self.page);
        self.mode = ConsoleMode::Form;
        self.status_message = None;
    }

    /// Loads the selected record into the form. Submitting will update the
    /// record under its current key.
    ///
    /// An update lands on the first record with that key, so a row whose key
    /// is shared with another row is refused.
    pub fn edit_selected(&mut self) {
        let Some(values) = self.snapshot.row(self.page, self.selected_row) else {
            self.status_message = Some("Nothing selected".to_string());
            return;
        };
        let key = values.first().cloned().unwrap_or_default();
        let shared = (0..self.row_count())
            .filter(|&i| self.snapshot.key_at(self.page, i).as_deref() == Some(key.as_str()))
            .count();
        if shared > 1 {
            self.status_message = Some(format!("Key {key} is not unique"));
            return;
        }
        self.form = FormState {
            editing: Some(key),
            values,
            focus: 0,
        };
        self.mode = ConsoleMode::Form;
        self.status_message = None;
    }

    pub fn cancel_form(&mut self) {
        self.form = FormState::empty(self.page);
        self.mode = ConsoleMode::Normal;
    }

    pub fn focus_next_field(&mut self) {
        self.form.focus = (self.form.focus + 1) % self.form.values.len();
    }

    pub fn focus_previous_field(&mut self) {
        let len = self.form.values.len();
        self.form.focus = (self.form.focus + len - 1) % len;
    }

    fn focused_input(&self) -> FieldInput {
        self.page.fields()[self.form.focus].input
    }

    /// Options offered by the attribute at `index`, or `None` for free text.
    ///
    /// Staff-assignment attributes list the current staff by name and fall
    /// back to the built-in names while there are no staff records.
    pub fn options_for(&self, index: usize) -> Option<Vec<String>> {
        match self.page.fields().get(index)?.input {
            FieldInput::Text => None,
            FieldInput::Select(options) => Some(options.iter().map(|o| o.to_string()).collect()),
            FieldInput::Staff(fallback) => {
                let names = self.snapshot.staff_names();
                if names.is_empty() {
                    Some(fallback.iter().map(|o| o.to_string()).collect())
                } else {
                    Some(names)
                }
            }
        }
    }

    /// Types a character into a text attribute. Select attributes ignore it.
    pub fn insert_char(&mut self, c: char) {
        if self.focused_input() == FieldInput::Text {
            self.form.values[self.form.focus].push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if self.focused_input() == FieldInput::Text {
            self.form.values[self.form.focus].pop();
        } else {
            self.form.values[self.form.focus].clear();
        }
    }

    /// Steps a select attribute through its options. An empty value steps
    /// to the first option going forward and the last going backward.
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(options) = self.options_for(self.form.focus) else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = &self.form.values[self.form.focus];
        let next = match options.iter().position(|o| o == current) {
            Some(i) if forward => (i + 1) % options.len(),
            Some(i) => (i + options.len() - 1) % options.len(),
            None if forward => 0,
            None => options.len() - 1,
        };
        self.form.values[self.form.focus] = options[next].clone();
    }

    /// Checks that every attribute is filled in.
    pub fn validate_form(&self) -> Result<(), FormError> {
        for (spec, value) in self.page.fields().iter().zip(&self.form.values) {
            if value.trim().is_empty() {
                return Err(FormError::EmptyField(spec.label));
            }
        }
        Ok(())
    }

    /// Validates the form and dispatches Add, or Update when editing.
    ///
    /// On a validation failure the form stays open and nothing is
    /// dispatched.
    pub fn submit_form(&mut self) {
        if let Err(err) = self.validate_form() {
            let FormError::EmptyField(label) = &err;
            if let Some(index) = self.page.fields().iter().position(|f| f.label == *label) {
                self.form.focus = index;
            }
            self.status_message = Some(err.to_string());
            return;
        }

        let page = self.page;
        let key = self.form.values[0].clone();
        let editing = self.form.editing.clone();
        let intent = Intent::from_values(page, &self.form.values, editing.clone());

        let message = match self.dispatch(intent) {
            Ok(Change::Applied) if editing.is_some() => format!("Updated {page} {key}"),
            Ok(Change::Applied) => format!("Added {page} {key}"),
            Ok(Change::NoMatch) => {
                format!("No {page} with key {}", editing.as_deref().unwrap_or(&key))
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
                return;
            }
        };
        self.status_message = Some(message);
        self.form = FormState::empty(page);
        self.mode = ConsoleMode::Normal;
    }

    // ============================================================
    // Row actions
    // ============================================================

    pub fn delete_selected(&mut self) {
        let Some(key) = self.selected_key() else {
            self.status_message = Some("Nothing selected".to_string());
            return;
        };
        let page = self.page;
        let message = match self.dispatch(Intent::delete(page, key.clone())) {
            Ok(Change::Applied) => format!("Deleted {page} {key}"),
            Ok(Change::NoMatch) => format!("No {page} with key {key}"),
            Err(err) => err.to_string(),
        };
        self.status_message = Some(message);
    }

    /// Opens the detail modal for the selected record.
    pub fn show_detail(&mut self) {
        if self.selected_key().is_some() {
            self.mode = ConsoleMode::Detail;
        } else {
            self.status_message = Some("Nothing selected".to_string());
        }
    }

    pub fn close_detail(&mut self) {
        self.mode = ConsoleMode::Normal;
    }

    /// Label/value pairs for the detail modal.
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let Some(values) = self.snapshot.row(self.page, self.selected_row) else {
            return Vec::new();
        };
        self.page
            .fields()
            .iter()
            .map(|spec| spec.label)
            .zip(values)
            .collect()
    }

    // ============================================================
    // CSV export
    // ============================================================

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        self.mode = ConsoleMode::ExportCsv;
        self.filename_input = format!("{}.csv", self.page);
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Returns the filename input if not empty, otherwise the page default.
    pub fn get_csv_export_filename(&self) -> String {
        if self.filename_input.is_empty() {
            format!("{}.csv", self.page)
        } else {
            self.filename_input.clone()
        }
    }

    pub fn cancel_filename_input(&mut self) {
        self.mode = ConsoleMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn set_csv_export_result(&mut self, result: Result<String, ExportError>) {
        self.status_message = Some(match result {
            Ok(filename) => format!("Exported to {}", filename),
            Err(error) => format!("Export failed: {}", error),
        });
        self.cancel_filename_input();
    }
}
