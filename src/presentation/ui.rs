use crate::application::{Console, ConsoleMode};
use crate::domain::{EntityKind, FieldInput};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
    Frame,
};

pub fn render_ui(f: &mut Frame, console: &Console) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, console, chunks[0]);
    render_tabs(f, console, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    render_form(f, console, body[0]);
    render_table(f, console, body[1]);

    render_status_bar(f, console, chunks[3]);

    match console.mode {
        ConsoleMode::Detail => render_detail_popup(f, console),
        ConsoleMode::Help => render_help_popup(f, console.help_scroll),
        _ => {}
    }
}

fn render_header(f: &mut Frame, console: &Console, area: Rect) {
    let header = Paragraph::new(format!(
        "farmdesk - {} | {} record(s)",
        console.page.title(),
        console.row_count()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, console: &Console, area: Rect) {
    let titles: Vec<Line> = EntityKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| Line::from(format!("{} {}", i + 1, kind.title().trim_end_matches(" Management"))))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Pages"))
        .select(console.page.index())
        .highlight_style(Style::default().bg(Color::LightBlue).fg(Color::Black));
    f.render_widget(tabs, area);
}

fn render_form(f: &mut Frame, console: &Console, area: Rect) {
    let editing = matches!(console.mode, ConsoleMode::Form);
    let fields = console.page.fields();

    let lines: Vec<Line> = fields
        .iter()
        .zip(&console.form.values)
        .enumerate()
        .map(|(i, (spec, value))| {
            let focused = editing && i == console.form.focus;
            let shown = match spec.input {
                FieldInput::Text if focused => format!("{value}_"),
                FieldInput::Text => value.clone(),
                FieldInput::Select(_) | FieldInput::Staff(_) => {
                    let value = if value.is_empty() { "select" } else { value.as_str() };
                    format!("< {value} >")
                }
            };
            let value_style = if focused {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<18}", spec.label), Style::default().fg(Color::Yellow)),
                Span::styled(shown, value_style),
            ])
        })
        .collect();

    let title = match &console.form.editing {
        Some(key) => format!("Edit {} {}", console.page, key),
        None => format!("Add {}", console.page),
    };
    let border_style = if editing {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style),
    );
    f.render_widget(form, area);
}

fn render_table(f: &mut Frame, console: &Console, area: Rect) {
    let fields = console.page.fields();
    let columns = console.page.columns();
    let visible_rows = (area.height as usize).saturating_sub(3).max(1);
    let scroll = console.selected_row.saturating_sub(visible_rows - 1);

    let header = Row::new(
        columns
            .iter()
            .map(|&c| Cell::from(fields[c].label).style(Style::default().fg(Color::Yellow))),
    )
    .height(1);

    let rows: Vec<Row> = console
        .snapshot
        .rows(console.page)
        .into_iter()
        .enumerate()
        .skip(scroll)
        .take(visible_rows)
        .map(|(i, values)| {
            let style = if i == console.selected_row {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(columns.iter().map(|&c| Cell::from(values[c].clone()))).style(style)
        })
        .collect();

    let widths = vec![Constraint::Ratio(1, columns.len() as u32); columns.len()];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(console.page.title()))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, console: &Console, area: Rect) {
    let input_text = match console.mode {
        ConsoleMode::Normal => {
            if let Some(ref status) = console.status_message {
                status.clone()
            } else {
                "Tab: next page | a: add | e: edit | d: delete | Enter: see more | Ctrl+E: export CSV | F1/?: help | q: quit".to_string()
            }
        }
        ConsoleMode::Form => match console.status_message {
            Some(ref status) => status.clone(),
            None => "Tab/↑↓: field | ←→: choose option | Enter: submit | Esc: cancel".to_string(),
        },
        ConsoleMode::Detail => "Esc/Enter: close".to_string(),
        ConsoleMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        ConsoleMode::ExportCsv => format!(
            "Export CSV as: {} (Enter to export, Esc to cancel)",
            console.filename_input
        ),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match console.mode {
            ConsoleMode::Normal => Style::default(),
            ConsoleMode::Form => Style::default().fg(Color::Green),
            ConsoleMode::Detail => Style::default().fg(Color::Cyan),
            ConsoleMode::Help => Style::default().fg(Color::Cyan),
            ConsoleMode::ExportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn popup_area(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_percent) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(height_percent) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_detail_popup(f: &mut Frame, console: &Console) {
    let popup_area = popup_area(f.area(), 60, 60);
    f.render_widget(Clear, popup_area);

    let lines: Vec<Line> = console
        .detail_rows()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(value),
            ])
        })
        .collect();

    let title = match console.page {
        EntityKind::Vehicle => "Vehicle Details",
        EntityKind::Equipment => "Equipment Details",
        EntityKind::Staff => "Staff Details",
        EntityKind::Field => "Field Details",
        EntityKind::Crop => "Crop Details",
    };

    let detail = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(detail, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("farmdesk Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"FARMDESK MANAGEMENT CONSOLE

=== PAGES ===
1 Vehicle       Vehicle code, plate, category, fuel, status, staff
2 Equipment     Equipment id, name, type, status, staff
3 Staff         Staff id, names, designation, contact details, role
4 Field         Field code, name, location, extent
5 Crop          Crop code, names, category, season, field
Tab / Shift+Tab Next / previous page

=== TABLE ===
↑↓ or j/k       Select a record
Enter or v      See more (details of the selected record)
a               Add a record (opens the form)
e               Edit the selected record
d or Delete     Delete the selected record
Ctrl+E          Export this page to a CSV file

=== FORM ===
Tab / ↓         Next field
Shift+Tab / ↑   Previous field
← →             Choose an option (fields shown as < ... >)
Backspace       Delete a character / clear an option
Enter           Submit (every field is required)
Esc             Cancel

Staff fields offer the names of the staff on the Staff page,
or a built-in list while that page is empty.

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window

Note: records live only for this session. Nothing is saved on exit."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_area_on_wide_terminal() {
        let area = Rect::new(0, 0, 2000, 1500);
        let popup = popup_area(area, 60, 60);
        assert_eq!(popup, Rect::new(400, 300, 1200, 900));
    }

    #[test]
    fn test_popup_area_is_centered() {
        let popup = popup_area(Rect::new(10, 5, 100, 40), 50, 50);
        assert_eq!(popup, Rect::new(35, 15, 50, 20));
    }
}
