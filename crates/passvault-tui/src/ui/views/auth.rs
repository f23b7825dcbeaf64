//! Login and register forms.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AuthFocus, AuthForm};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Width of the visible part of each input
const FIELD_WIDTH: usize = 20;

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    render_form(
        frame,
        area,
        &app.login_form,
        " Sign in ",
        "Login",
        "No account yet? Press F2 to register.",
    );
}

pub fn render_register(frame: &mut Frame, app: &App, area: Rect) {
    render_form(
        frame,
        area,
        &app.register_form,
        " Create an Account ",
        "Create Account",
        "Press Esc to go back to sign in.",
    );
}

/// Show the tail of a field so the cursor end stays visible.
fn visible_tail(s: &str) -> String {
    let len = s.chars().count();
    s.chars().skip(len.saturating_sub(FIELD_WIDTH)).collect()
}

fn field_line<'a>(label: &'a str, display: String, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("   "),
        Span::styled(label, styles::muted_style()),
        Span::styled(" [", styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", display, cursor, width = FIELD_WIDTH),
            style,
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_form(
    frame: &mut Frame,
    area: Rect,
    form: &AuthForm,
    title: &str,
    button: &str,
    hint: &str,
) {
    let height = if form.error.is_some() { 12 } else { 10 };
    let rect = centered_rect_fixed(48, height, area);

    frame.render_widget(Clear, rect);

    let mut lines = vec![Line::from("")];

    lines.push(field_line(
        "Username:",
        visible_tail(&form.username),
        form.focus == AuthFocus::Username,
    ));

    let masked = "*".repeat(form.password.chars().count().min(FIELD_WIDTH));
    lines.push(field_line(
        "Password:",
        masked,
        form.focus == AuthFocus::Password,
    ));

    lines.push(Line::from(""));
    let button_focused = form.focus == AuthFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = if button_focused {
        format!(" ▶ {} ◀ ", button)
    } else {
        format!("   {}   ", button)
    };
    let pad = 46usize.saturating_sub(label.chars().count() + 2) / 2;
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::raw("["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(format!(" {}", hint), styles::muted_style())));

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_tail_keeps_end_of_long_input() {
        assert_eq!(visible_tail("alice"), "alice");
        let long = "a".repeat(25) + "XYZ";
        let tail = visible_tail(&long);
        assert_eq!(tail.chars().count(), FIELD_WIDTH);
        assert!(tail.ends_with("XYZ"));
    }
}
