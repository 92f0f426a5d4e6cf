//! Layout components (header, stepper, status bar)

use crate::app::App;
use crate::state::View;
use crate::state::StageForm;
use crate::wizard::{Phase, StageId, WizardState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const FORM_TITLE: &str = "CMS-10114: NPI Application/Update Form";

/// Split the screen into header, main content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header + stepper
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the form title and the stage stepper
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let title = Line::from(Span::styled(
        FORM_TITLE,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));

    let lines = match app.state.current_view {
        View::Wizard => vec![title, stepper_line(&app.state.wizard)],
        View::Applications => vec![
            title,
            Line::from(Span::styled(
                "Submitted applications",
                Style::default().fg(Color::White),
            )),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One label per stage plus Review; accepted stages are green, the current one highlighted
fn stepper_line(wizard: &WizardState) -> Line<'static> {
    let current = wizard.stage_index();
    let steps = StageId::ALL
        .iter()
        .map(|s| (s.title(), wizard.record().contains(*s)))
        .chain(std::iter::once(("Review", current > StageId::COUNT)));

    let mut spans = Vec::new();
    for (idx, (label, done)) in steps.enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if idx == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if done {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {}. {} ", idx + 1, label), style));
    }
    Line::from(spans)
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    // Build status bar content
    let mut spans = vec![];

    // Connection status
    let conn_status = if app.state.api_connected {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(conn_status);

    // View-specific hints
    spans.push(Span::styled(
        get_view_hints(app),
        Style::default().fg(Color::Gray),
    ));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    // Quit hint on the right (double Ctrl+C to quit)
    let quit_hint = " ^C^C:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));

    frame.render_widget(status, status_area);

    // Render quit hint on the right
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> &'static str {
    if app.is_busy() {
        return "Submitting...";
    }
    match app.state.current_view {
        View::Applications if app.state.application_detail.is_some() => "j/k:scroll  Esc:back",
        View::Applications => "j/k:nav  Enter:view  r:refresh  Esc:back",
        View::Wizard => match app.state.wizard.phase() {
            Phase::Stage(stage) => {
                let active = app.state.form.as_ref().and_then(StageForm::active_field);
                match (stage, active) {
                    (_, Some(field)) if field.is_flag() => {
                        "Tab:next  Space:toggle  Enter:continue  Esc:back  ^L:list"
                    }
                    (StageId::BusinessAddress, Some(field)) if field.is_choice() => {
                        "Tab:next  ←/→:choose  Enter:continue  Esc:back  ^P:copy mailing"
                    }
                    (StageId::BusinessAddress, _) => {
                        "Tab:next  Enter:continue  Esc:back  ^P:copy mailing  ^L:list"
                    }
                    (_, Some(field)) if field.is_choice() => {
                        "Tab:next  ←/→:choose  Enter:continue  Esc:back  ^L:list"
                    }
                    _ => "Tab:next  Enter:continue  Esc:back  ^L:list",
                }
            }
            Phase::Review => "^S/Enter:submit  j/k:scroll  Esc:edit  ^L:list",
            Phase::Confirmed => "y:copy reference  n:new application  ^L:list",
        },
    }
}
