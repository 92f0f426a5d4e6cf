//! Dialog components for TUI

mod base;
mod busy_dialog;
mod error_dialog;

pub use busy_dialog::render_busy_dialog;
pub use error_dialog::render_error_dialog;
