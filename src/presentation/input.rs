use crate::application::{Console, ConsoleMode};
use crate::domain::EntityKind;
use crate::infrastructure::CsvExporter;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(console: &mut Console, key: KeyCode, modifiers: KeyModifiers) {
        match console.mode {
            ConsoleMode::Normal => Self::handle_normal_mode(console, key, modifiers),
            ConsoleMode::Form => Self::handle_form_mode(console, key),
            ConsoleMode::Detail => Self::handle_detail_mode(console, key),
            ConsoleMode::Help => Self::handle_help_mode(console, key),
            ConsoleMode::ExportCsv => Self::handle_filename_input_mode(console, key),
        }
    }

    fn handle_normal_mode(console: &mut Console, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                console.start_csv_export();
            }
            return;
        }

        match key {
            KeyCode::Tab => console.next_page(),
            KeyCode::BackTab => console.previous_page(),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                console.set_page(EntityKind::ALL[index]);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                console.status_message = None;
                console.select_previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                console.status_message = None;
                console.select_next();
            }
            KeyCode::Char('a') => console.start_form(),
            KeyCode::Char('e') => console.edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => console.delete_selected(),
            KeyCode::Enter | KeyCode::Char('v') => console.show_detail(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                console.mode = ConsoleMode::Help;
                console.help_scroll = 0;
            }
            KeyCode::Esc => console.status_message = None,
            // 'q' is handled by the main loop
            _ => {}
        }
    }

    fn handle_form_mode(console: &mut Console, key: KeyCode) {
        match key {
            KeyCode::Enter => console.submit_form(),
            KeyCode::Esc => console.cancel_form(),
            KeyCode::Tab | KeyCode::Down => console.focus_next_field(),
            KeyCode::BackTab | KeyCode::Up => console.focus_previous_field(),
            KeyCode::Right => console.cycle_option(true),
            KeyCode::Left => console.cycle_option(false),
            KeyCode::Backspace => console.delete_char(),
            KeyCode::Char(c) => console.insert_char(c),
            _ => {}
        }
    }

    fn handle_detail_mode(console: &mut Console, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('v')) {
            console.close_detail();
        }
    }

    fn handle_help_mode(console: &mut Console, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                console.mode = ConsoleMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if console.help_scroll > 0 {
                    console.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                console.help_scroll += 1;
            }
            KeyCode::PageUp => {
                console.help_scroll = console.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                console.help_scroll += 5;
            }
            KeyCode::Home => {
                console.help_scroll = 0;
            }
            _ => {}
        }
    }

    /// Edits the export filename. `cursor_position` is a byte offset that
    /// always sits on a char boundary.
    fn handle_filename_input_mode(console: &mut Console, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = console.get_csv_export_filename();
                let result = CsvExporter::export_page(&console.snapshot, console.page, &filename);
                console.set_csv_export_result(result);
            }
            KeyCode::Esc => {
                console.cancel_filename_input();
            }
            KeyCode::Backspace => {
                let previous = console.filename_input[..console.cursor_position].chars().next_back();
                if let Some(c) = previous {
                    console.cursor_position -= c.len_utf8();
                    console.filename_input.remove(console.cursor_position);
                }
            }
            KeyCode::Delete => {
                if console.cursor_position < console.filename_input.len() {
                    console.filename_input.remove(console.cursor_position);
                }
            }
            KeyCode::Left => {
                if let Some(c) = console.filename_input[..console.cursor_position].chars().next_back() {
                    console.cursor_position -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = console.filename_input[console.cursor_position..].chars().next() {
                    console.cursor_position += c.len_utf8();
                }
            }
            KeyCode::Home => {
                console.cursor_position = 0;
            }
            KeyCode::End => {
                console.cursor_position = console.filename_input.len();
            }
            KeyCode::Char(c) => {
                console.filename_input.insert(console.cursor_position, c);
                console.cursor_position += c.len_utf8();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{RootStore, StoreConfig};
    use tempfile::tempdir;

    fn console() -> Console {
        Console::new(RootStore::create(StoreConfig::default()))
    }

    fn press(console: &mut Console, key: KeyCode) {
        InputHandler::handle_key_event(console, key, KeyModifiers::NONE);
    }

    fn type_text(console: &mut Console, text: &str) {
        for c in text.chars() {
            press(console, KeyCode::Char(c));
        }
    }

    fn add_field_through_keys(console: &mut Console, code: &str) {
        press(console, KeyCode::Char('a'));
        for value in [code, "North", "Kandy", "2.5"] {
            type_text(console, value);
            press(console, KeyCode::Tab);
        }
        press(console, KeyCode::Enter);
    }

    #[test]
    fn test_page_keys() {
        let mut console = console();

        press(&mut console, KeyCode::Tab);
        assert_eq!(console.page, EntityKind::Equipment);

        press(&mut console, KeyCode::BackTab);
        assert_eq!(console.page, EntityKind::Vehicle);

        press(&mut console, KeyCode::Char('5'));
        assert_eq!(console.page, EntityKind::Crop);
    }

    #[test]
    fn test_add_record_through_form_keys() {
        let mut console = console();
        press(&mut console, KeyCode::Char('4'));

        add_field_through_keys(&mut console, "F1");

        assert_eq!(console.mode, ConsoleMode::Normal);
        assert_eq!(console.snapshot.field.len(), 1);
        assert_eq!(console.snapshot.field.get(0).unwrap().location, "Kandy");
    }

    #[test]
    fn test_form_keys_on_select_field() {
        let mut console = console();
        press(&mut console, KeyCode::Char('a'));
        assert_eq!(console.mode, ConsoleMode::Form);

        for _ in 0..4 {
            press(&mut console, KeyCode::Down);
        }
        press(&mut console, KeyCode::Right);
        assert_eq!(console.form.values[4], "Available");

        // 'q' is text while the form has focus
        press(&mut console, KeyCode::Up);
        press(&mut console, KeyCode::Up);
        press(&mut console, KeyCode::Char('q'));
        assert_eq!(console.form.values[2], "q");

        press(&mut console, KeyCode::Esc);
        assert_eq!(console.mode, ConsoleMode::Normal);
        assert!(console.form.values.iter().all(String::is_empty));
    }

    #[test]
    fn test_delete_and_detail_keys() {
        let mut console = console();
        press(&mut console, KeyCode::Char('4'));
        add_field_through_keys(&mut console, "F1");
        add_field_through_keys(&mut console, "F2");

        press(&mut console, KeyCode::Down);
        press(&mut console, KeyCode::Enter);
        assert_eq!(console.mode, ConsoleMode::Detail);
        assert_eq!(console.detail_rows()[0].1, "F2");

        press(&mut console, KeyCode::Esc);
        press(&mut console, KeyCode::Char('d'));
        assert_eq!(console.snapshot.field.len(), 1);
        assert_eq!(console.snapshot.field.get(0).unwrap().field_code, "F1");
    }

    #[test]
    fn test_help_keys() {
        let mut console = console();
        press(&mut console, KeyCode::F(1));
        assert_eq!(console.mode, ConsoleMode::Help);
        press(&mut console, KeyCode::PageDown);
        assert_eq!(console.help_scroll, 5);
        press(&mut console, KeyCode::Char('q'));
        assert_eq!(console.mode, ConsoleMode::Normal);
    }

    #[test]
    fn test_csv_export_key_binding() {
        let mut console = console();

        InputHandler::handle_key_event(&mut console, KeyCode::Char('e'), KeyModifiers::CONTROL);

        assert_eq!(console.mode, ConsoleMode::ExportCsv);
        assert_eq!(console.filename_input, "vehicle.csv");
    }

    #[test]
    fn test_export_filename_input_and_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fields.csv");
        let mut console = console();
        press(&mut console, KeyCode::Char('4'));
        add_field_through_keys(&mut console, "F1");

        console.start_csv_export();
        press(&mut console, KeyCode::Char('x'));
        assert_eq!(console.filename_input, "field.csvx");
        press(&mut console, KeyCode::Backspace);
        assert_eq!(console.filename_input, "field.csv");

        console.filename_input = path.to_str().unwrap().to_string();
        console.cursor_position = console.filename_input.len();
        press(&mut console, KeyCode::Enter);

        assert_eq!(console.mode, ConsoleMode::Normal);
        assert!(console.filename_input.is_empty());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("F1,North,Kandy,2.5"));
    }

    #[test]
    fn test_filename_editing_with_multibyte_chars() {
        let mut console = console();
        console.start_csv_export();
        press(&mut console, KeyCode::Backspace);
        press(&mut console, KeyCode::Backspace);
        press(&mut console, KeyCode::Backspace);
        press(&mut console, KeyCode::Backspace);

        press(&mut console, KeyCode::Char('é'));
        press(&mut console, KeyCode::Char('x'));
        assert_eq!(console.filename_input, "vehicleéx");

        press(&mut console, KeyCode::Left);
        press(&mut console, KeyCode::Left);
        press(&mut console, KeyCode::Char('ක'));
        assert_eq!(console.filename_input, "vehicleකéx");

        press(&mut console, KeyCode::Right);
        press(&mut console, KeyCode::Backspace);
        assert_eq!(console.filename_input, "vehicleකx");

        press(&mut console, KeyCode::Delete);
        assert_eq!(console.filename_input, "vehicleක");
        press(&mut console, KeyCode::Right);
        press(&mut console, KeyCode::Backspace);
        assert_eq!(console.filename_input, "vehicle");
        assert_eq!(console.cursor_position, console.filename_input.len());
    }
}
