//! Field rendering utilities for forms

use crate::state::FormField;
use crate::wizard::FieldKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows a rendered field occupies
pub const FIELD_HEIGHT: u16 = 3;

/// Draw a form field, with its validation error in the bottom border
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    required: bool,
    error: Option<&str>,
    is_active: bool,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let border_style = match (error.is_some(), is_active) {
        (true, _) => Style::default().fg(Color::Red),
        (false, true) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default().fg(Color::DarkGray),
    };

    let display_value = field.display_value();
    let display_str = if display_value.is_empty() && !is_active {
        placeholder(field.kind).to_string()
    } else {
        display_value
    };

    let cursor = if is_active && !field.is_choice() && !field.is_flag() {
        "▌"
    } else {
        ""
    };

    let mut value_spans = vec![
        Span::styled(display_str, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ];
    if field.is_flag() {
        value_spans.push(Span::raw(" "));
        value_spans.push(Span::styled(field.label, style));
    }

    let label = if required {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    };
    let title_style = if is_active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut block = Block::default()
        .title(Span::styled(label, title_style))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(message) = error {
        block = block.title_bottom(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(value_spans)).block(block), area);
}

fn placeholder(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Date => "YYYY-MM-DD",
        _ => "",
    }
}
