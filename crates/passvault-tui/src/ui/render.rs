use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use passvault_core::session::Route;
use passvault_core::utils::format_remaining;

use crate::app::{App, AppState};

use super::styles;
use super::views::{auth, dashboard, generator};

/// Widest a toast gets before wrapping
const TOAST_WIDTH: u16 = 48;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    render_toasts(frame, app, chunks[1]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  passvault";
    let view = match app.current_route() {
        Route::Login => "Sign in",
        Route::Register => "Create an account",
        Route::Dashboard => "Vault",
        Route::Generator => "Password generator",
    };
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(format!("  {}", view), styles::muted_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.len() + view.len() + 2 + help_hint.len() + 2),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_route() {
        Route::Login => auth::render_login(frame, app, area),
        Route::Register => auth::render_register(frame, app, area),
        Route::Dashboard => dashboard::render(frame, app, area),
        Route::Generator => generator::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_route() {
        Route::Login => "[F2] register | [F3] generator | [Esc] quit",
        Route::Register => "[Esc] back to login",
        Route::Dashboard => "[n]ew | [i]mport | [/] search | [L] logout | [q]uit",
        Route::Generator => "[Enter] generate | [Esc] back",
    };

    let (left_text, left_style) = match app.time_until_timeout() {
        Some(remaining) => (
            format!(" Auto-lock in {} ", format_remaining(remaining)),
            styles::countdown_style(remaining.num_seconds()),
        ),
        None => (" Locked ".to_string(), styles::muted_style()),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Stack toasts in the top-right corner of `area`, newest at the bottom.
fn render_toasts(frame: &mut Frame, app: &App, area: Rect) {
    if app.toasts.is_empty() {
        return;
    }
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);
    let mut y = area.y;

    for toast in app.toasts.iter() {
        let inner_width = width.saturating_sub(2).max(1) as usize;
        let lines = (toast.message.chars().count() / inner_width) as u16 + 1;
        let height = lines + 2;
        if y + height > area.y + area.height {
            break;
        }

        let rect = Rect::new(x, y, width, height);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::toast_style(toast.kind));
        let paragraph = Paragraph::new(Span::styled(
            toast.message.as_str(),
            styles::toast_style(toast.kind),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(paragraph, rect);

        y += height;
    }
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  passvault", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Vault", styles::highlight_style())),
        key("↑/↓ j/k", "Navigate list"),
        key("/", "Search by name"),
        key("n", "New entry"),
        key("e, Enter", "Edit selected entry"),
        key("d, Del", "Delete selected entry"),
        key("r", "Show / hide password"),
        key("u", "Reload from server"),
        key("i", "Import from CSV"),
        key("g", "Password generator"),
        Line::from(""),
        Line::from(Span::styled(" Editing", styles::highlight_style())),
        key("Tab", "Next field"),
        key("Ctrl+G", "Fill password from generator"),
        key("Enter", "Save"),
        Line::from(""),
        Line::from(Span::styled(" Session", styles::highlight_style())),
        key("L, Ctrl+L", "Log out"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed_fits_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let rect = centered_rect_fixed(46, 10, outer);
        assert_eq!(rect, Rect::new(27, 15, 46, 10));

        let small = Rect::new(0, 0, 20, 5);
        let clipped = centered_rect_fixed(46, 10, small);
        assert_eq!((clipped.width, clipped.height), (20, 5));
    }
}
