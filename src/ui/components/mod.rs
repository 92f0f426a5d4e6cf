//! Reusable UI components

mod dialog;

pub use dialog::{render_busy_dialog, render_error_dialog};
