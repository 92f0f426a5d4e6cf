//! Wizard core: stage catalogue, validation, aggregation and the step controller

pub mod controller;
mod entity;
mod record;
mod stage;
mod validator;

pub use controller::{Phase, SubmissionStatus, WizardError, WizardState};
pub use entity::EntityType;
pub use record::{format_date, parse_date, FieldValue, FormRecord, StageData};
pub use stage::{
    mailing_practice_pairs, submission_reason, FieldDescriptor, FieldKind, FieldScope, StageId,
    WireRule,
};
pub use validator::ValidationResult;

#[cfg(test)]
pub use record::merge;
#[cfg(test)]
pub use validator::validate;
