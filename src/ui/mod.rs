//! UI module for rendering the TUI

mod applications;
mod components;
mod confirmation;
mod forms;
mod layout;
mod review;

use crate::app::App;
use crate::state::View;
use crate::wizard::Phase;
use components::{render_busy_dialog, render_error_dialog};
use ratatui::Frame;

pub use applications::detail_line_count;
pub use review::summary_line_count;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (header_area, main_area) = layout::create_layout(area);
    layout::draw_header(frame, header_area, app);

    // Draw main content based on current view
    match app.state.current_view {
        View::Wizard => match app.state.wizard.phase() {
            Phase::Stage(_) => forms::draw_stage_form(frame, main_area, app),
            Phase::Review => review::draw(frame, main_area, app),
            Phase::Confirmed => confirmation::draw(frame, main_area, app),
        },
        View::Applications => applications::draw(frame, main_area, app),
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Overlays
    if app.is_busy() {
        render_busy_dialog(frame);
    } else if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error);
    }
}
