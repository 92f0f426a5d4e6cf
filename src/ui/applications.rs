//! Submitted applications list and detail rendering

use crate::app::App;
use crate::api::{ApplicationDetail, ApplicationSummary};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Draw the list or, when one is open, the application detail
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.application_detail.is_some() {
        draw_detail(frame, area, app);
    } else {
        draw_list(frame, area, app);
    }
}

fn status_color(status: Option<&str>) -> Color {
    match status {
        Some("approved") => Color::Green,
        Some("rejected") => Color::Red,
        _ => Color::Yellow,
    }
}

fn list_line(application: &ApplicationSummary, is_selected: bool) -> Line<'_> {
    let style = if is_selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let prefix = if is_selected { "▸" } else { " " };
    let status = application.status.as_deref();

    let mut spans = vec![
        Span::styled(prefix, style),
        Span::styled(
            format!("#{:<6}", application.application_id),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", status.unwrap_or("pending")),
            Style::default().fg(status_color(status)),
        ),
        Span::raw(" "),
        Span::styled(
            application.name.as_deref().unwrap_or("(unnamed)"),
            style,
        ),
        Span::styled(
            format!(
                "  {} · {}  {}",
                application.entity_type,
                application.submission_reason,
                application.submission_date.as_deref().unwrap_or_default()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(npi) = application.existing_npi.as_deref().filter(|n| !n.is_empty()) {
        spans.push(Span::styled(
            format!("  NPI {npi}"),
            Style::default().fg(Color::Blue),
        ));
    }
    if let Some(email) = application.contact_email.as_deref() {
        spans.push(Span::styled(
            format!("  {email}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Applications ({}) ", app.state.applications_total);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.state.applications.is_empty() {
        let content = Paragraph::new("No applications found.\nPress 'r' to refresh.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .applications
        .iter()
        .enumerate()
        .map(|(idx, a)| ListItem::new(list_line(a, idx == app.state.selected_index)))
        .collect();

    let list = List::new(items).block(block);
    let mut list_state = ListState::default().with_selected(Some(app.state.selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn detail_body(detail: &ApplicationDetail) -> String {
    serde_json::to_string_pretty(&detail.data).unwrap_or_else(|_| detail.data.to_string())
}

/// Number of lines the detail view renders
pub fn detail_line_count(detail: &ApplicationDetail) -> usize {
    detail_body(detail).lines().count()
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(detail) = app.state.application_detail.as_ref() else {
        return;
    };

    let lines: Vec<Line> = detail_body(detail)
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();

    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" Application #{} ", detail.application_id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .scroll((u16::try_from(app.state.detail_scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(content, area);
}
