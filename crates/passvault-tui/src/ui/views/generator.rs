use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use passvault_core::generator::{MAX_LENGTH, MIN_LENGTH};

use crate::app::App;
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

fn checkbox(enabled: bool) -> &'static str {
    if enabled {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rect = centered_rect_fixed(52, 14, area);
    frame.render_widget(Clear, rect);

    let options = &app.generator;
    let option = |key: &'static str, label: &'static str, enabled: bool| {
        Line::from(vec![
            Span::styled(format!("  [{}] ", key), styles::help_key_style()),
            Span::raw(format!("{} {}", checkbox(enabled), label)),
        ])
    };

    let generated = match app.generated {
        Some(ref password) => Span::styled(password.as_str(), styles::success_style()),
        None => Span::styled("Press Enter to generate", styles::muted_style()),
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  [-/+] ", styles::help_key_style()),
            Span::raw(format!(
                "Length: {:>2}  ({}-{})",
                options.length, MIN_LENGTH, MAX_LENGTH
            )),
        ]),
        option("u", "Uppercase (A-Z)", options.uppercase),
        option("d", "Numbers (0-9)", options.digits),
        option("s", "Symbols (!@#$...)", options.symbols),
        Line::from(Span::styled(
            "        Lowercase (a-z) is always included",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![Span::raw("  "), generated]),
    ];

    let block = Block::default()
        .title(" Password Generator ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
