//! Confirmation screen shown after a successful submission

use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let reference_id = app.state.wizard.reference_id().unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓ Application Submitted Successfully!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Reference ID: "),
            Span::styled(
                reference_id.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from("Your NPI application has been submitted for processing."),
        Line::from("Please retain your reference ID for tracking purposes."),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Cyan)),
            Span::raw(" copy reference ID   "),
            Span::styled("n", Style::default().fg(Color::Cyan)),
            Span::raw(" submit another application"),
        ]),
    ];

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(content, area);
}
