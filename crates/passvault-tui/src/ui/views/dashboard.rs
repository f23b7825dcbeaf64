use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use passvault_core::models::PasswordEntry;
use passvault_core::utils::{format_timestamp, truncate_string};

use crate::app::{App, AppState, EntryField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Width of the name column in list rows
const NAME_COLUMN_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_list(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);

    match app.state {
        AppState::Editing => render_editor(frame, app),
        AppState::ConfirmingDelete => render_delete_confirm(frame, app),
        AppState::Importing => render_import_prompt(frame, app),
        _ => {}
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let passwords = app.filtered_passwords();

    let items: Vec<ListItem> = passwords
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut spans = vec![Span::raw(format!(
                "{:<width$}",
                truncate_string(&entry.key, NAME_COLUMN_WIDTH),
                width = NAME_COLUMN_WIDTH
            ))];
            if let Some(preview) = entry.notes_preview() {
                spans.push(Span::styled(format!(" {}", preview), styles::muted_style()));
            }

            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let title = if app.search_query.is_empty() {
        format!(" Passwords ({}) ", app.passwords.len())
    } else {
        format!(
            " Passwords ({}/{}) ",
            passwords.len(),
            app.passwords.len()
        )
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    // Search line
    let searching = app.state == AppState::Searching;
    let search_line = if searching || !app.search_query.is_empty() {
        let cursor = if searching { "▌" } else { "" };
        Line::from(vec![
            Span::styled("/", styles::search_style()),
            Span::styled(format!("{}{}", app.search_query, cursor), styles::search_style()),
        ])
    } else {
        Line::from(Span::styled("Press / to search", styles::muted_style()))
    };
    frame.render_widget(Paragraph::new(search_line), rows[0]);

    if items.is_empty() {
        let message = if app.loading {
            "Loading..."
        } else if app.importing {
            "Importing..."
        } else if app.passwords.is_empty() {
            "No passwords saved yet. Press n to add one."
        } else {
            "No passwords match your search."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, styles::muted_style())),
            rows[1],
        );
        return;
    }

    let list = List::new(items);
    let mut state = ListState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(list, rows[1], &mut state);
}

fn detail_lines<'a>(entry: &'a PasswordEntry, reveal: bool) -> Vec<Line<'a>> {
    let value = if reveal {
        entry.value.clone()
    } else {
        "•".repeat(entry.value.chars().count().min(16))
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Password:  ", styles::highlight_style()),
            Span::raw(value),
        ]),
        Line::from(Span::styled(
            if reveal { "           [r] hide" } else { "           [r] show" },
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    if let Some(ref uri) = entry.login_uri {
        lines.push(Line::from(vec![
            Span::styled("Login URL: ", styles::highlight_style()),
            Span::raw(uri.as_str()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Created:   ", styles::highlight_style()),
        Span::raw(format_timestamp(&entry.created_at)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Updated:   ", styles::highlight_style()),
        Span::raw(format_timestamp(&entry.updated_at)),
    ]));

    if let Some(ref notes) = entry.notes {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Notes", styles::highlight_style())));
        for note_line in notes.lines() {
            lines.push(Line::from(note_line));
        }
    }

    lines
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.selected_entry() {
        Some(entry) => (
            format!(" {} ", entry.key),
            detail_lines(entry, app.reveal_value),
        ),
        None => (
            " Details ".to_string(),
            vec![Line::from(Span::styled(
                "Select an entry to see its details",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_editor(frame: &mut Frame, app: &App) {
    let form = &app.entry_form;
    let height = if form.error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, area);

    let field_width = (area.width as usize).saturating_sub(18);
    let mut lines = vec![Line::from("")];

    for field in [
        EntryField::Key,
        EntryField::Value,
        EntryField::LoginUri,
        EntryField::Notes,
    ] {
        let focused = form.focus == field;
        let locked = field == EntryField::Key && form.is_edit();
        let text = form.field(field);
        let len = text.chars().count();
        let visible: String = text.chars().skip(len.saturating_sub(field_width)).collect();
        let style = if focused {
            styles::selected_style()
        } else if locked {
            styles::muted_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused { "▌" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!("  {:<11}", field.title()), styles::muted_style()),
            Span::styled("[", styles::muted_style()),
            Span::styled(
                format!("{:<width$}{}", visible, cursor, width = field_width),
                style,
            ),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [Enter]", styles::help_key_style()),
        Span::styled(" save  ", styles::muted_style()),
        Span::styled("[Ctrl+G]", styles::help_key_style()),
        Span::styled(" generate  ", styles::muted_style()),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::styled(" cancel", styles::muted_style()),
    ]));

    let title = if form.is_edit() {
        format!(" Edit '{}' ", form.key)
    } else {
        " New password ".to_string()
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_confirm(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let name = app
        .selected_entry()
        .map(|e| truncate_string(&e.key, 24))
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   Delete '{}'?", name),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style())
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_import_prompt(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(60, 8, frame.area());
    frame.render_widget(Clear, area);

    let field_width = (area.width as usize).saturating_sub(8);
    let len = app.import_path.chars().count();
    let visible: String = app
        .import_path
        .chars()
        .skip(len.saturating_sub(field_width))
        .collect();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Path to a CSV file (columns: name, password, url, notes)",
            styles::muted_style(),
        )),
        Line::from(vec![
            Span::styled("  [", styles::muted_style()),
            Span::styled(
                format!("{:<width$}▌", visible, width = field_width),
                styles::selected_style(),
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Enter]", styles::help_key_style()),
            Span::styled(" import  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Import from CSV ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
