//! Form domain layer
//!
//! Editable buffers for the stage on screen. The wizard only ever sees the
//! `StageData` these produce.

mod field;
mod stage_form;

pub use field::{FieldInput, FormField};
pub use stage_form::StageForm;
