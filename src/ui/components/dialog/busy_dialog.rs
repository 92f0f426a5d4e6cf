//! Busy indicator shown while a submission is on its way

use super::base::{render_dialog, DialogConfig};
use ratatui::{style::Color, Frame};

/// Render the submitting overlay centered on the screen
pub fn render_busy_dialog(frame: &mut Frame) {
    render_dialog(
        frame,
        DialogConfig {
            title: "Submitting...",
            accent: Color::Cyan,
            message: "Sending your application. Please wait.",
            hint: None,
            max_width: 50,
        },
    );
}
