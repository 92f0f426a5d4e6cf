//! Stage form rendering

use super::field_renderer::{draw_field, FIELD_HEIGHT};
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};

/// Draw the fields of the stage on screen, scrolled so the active one is visible
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.state.form.as_ref() else {
        return;
    };

    let stage = form.stage;
    let block = Block::default()
        .title(Span::styled(
            format!(" {}. {} ", stage.index() + 1, stage.title()),
            Style::default().fg(Color::Cyan),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let required = stage.definition().required_fields(app.state.wizard.record());
    let shown = form.visible_fields();
    let rows = (inner.height / FIELD_HEIGHT).max(1) as usize;
    let first = first_visible(&shown, form.active_field_index, rows);

    for (row, &index) in shown.iter().skip(first).take(rows).enumerate() {
        let field = &form.fields[index];
        let field_area = Rect {
            x: inner.x,
            y: inner.y + row as u16 * FIELD_HEIGHT,
            width: inner.width,
            height: FIELD_HEIGHT.min(inner.height),
        };
        draw_field(
            frame,
            field_area,
            field,
            required.contains(field.name),
            form.error_for(field.name),
            index == form.active_field_index,
        );
    }
}

/// Position in `shown` of the first field to draw so the active field stays on screen
fn first_visible(shown: &[usize], active: usize, rows: usize) -> usize {
    let position = shown.iter().position(|&index| index == active).unwrap_or(0);
    let max_first = shown.len().saturating_sub(rows);
    position.saturating_sub(rows.saturating_sub(1)).min(max_first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StageForm;
    use crate::wizard::{FormRecord, StageId};

    #[test]
    fn test_first_visible_follows_active_field() {
        let form = StageForm::new(StageId::BusinessAddress, &FormRecord::new());
        let shown = form.visible_fields();
        let last = shown.len() - 1;
        assert_eq!(first_visible(&shown, 0, 5), 0);
        assert_eq!(first_visible(&shown, 4, 5), 0);
        assert_eq!(first_visible(&shown, 5, 5), 1);
        assert_eq!(first_visible(&shown, shown[last], 5), shown.len() - 5);
    }

    #[test]
    fn test_first_visible_skips_hidden_fields() {
        let shown = [0, 1, 8, 9, 10];
        assert_eq!(first_visible(&shown, 10, 2), 3);
        assert_eq!(first_visible(&shown, 8, 10), 0);
    }
}
