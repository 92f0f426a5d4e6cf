//! Form rendering

mod field_renderer;
mod stage_form;

pub use stage_form::draw as draw_stage_form;
