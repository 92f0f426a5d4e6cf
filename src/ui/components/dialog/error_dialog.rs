//! Error dialog component

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

/// Split "Submission failed: detail" into a dialog title and body
fn title_and_body(error_message: &str) -> (&str, &str) {
    match error_message.split_once(": ") {
        Some((title, body)) if !title.contains('\n') && title.len() <= 40 => (title, body),
        _ => ("Error", error_message),
    }
}

/// Render an error dialog overlay centered on the screen
pub fn render_error_dialog(frame: &mut Frame, error_message: &str) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = Line::from(vec![
        Span::raw("Press "),
        Span::styled("Enter", key),
        Span::raw(" or "),
        Span::styled("Esc", key),
        Span::raw(" to dismiss"),
    ]);

    let (title, body) = title_and_body(error_message);
    render_dialog(
        frame,
        DialogConfig {
            title,
            accent: Color::Red,
            message: body,
            hint: Some(hint),
            max_width: 60,
        },
    );
}
