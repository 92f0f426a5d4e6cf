//! Editable state for the stage currently on screen

use super::field::FormField;
use crate::wizard::{
    mailing_practice_pairs, FieldScope, FormRecord, StageData, StageId, ValidationResult,
};

/// Input buffers for one stage plus the errors from the last advance attempt.
///
/// Every field of the stage keeps a buffer. Fields hidden for the current
/// entity type or submission reason are skipped by navigation and drawing
/// but their values are still handed to the wizard.
#[derive(Debug, Clone)]
pub struct StageForm {
    pub stage: StageId,
    pub fields: Vec<FormField>,
    pub active_field_index: usize,
    pub errors: ValidationResult,
    /// Answers accepted before this stage
    record: FormRecord,
}

impl StageForm {
    /// Build the form for a stage, prefilled with the answers it already accepted
    pub fn new(stage: StageId, record: &FormRecord) -> Self {
        let definition = stage.definition();
        let data = record
            .stage(stage)
            .filter(|data| !data.is_empty())
            .cloned()
            .unwrap_or_else(|| definition.initial_data());
        let fields = definition
            .fields
            .iter()
            .map(|descriptor| {
                let value = data
                    .get(descriptor.name)
                    .cloned()
                    .unwrap_or_else(|| descriptor.initial_value());
                FormField::from_descriptor(descriptor, &value)
            })
            .collect();
        Self {
            stage: definition.id,
            fields,
            active_field_index: 0,
            errors: ValidationResult::default(),
            record: record.clone(),
        }
    }

    /// Indices of the fields in play, in stage order
    pub fn visible_fields(&self) -> Vec<usize> {
        let scope = FieldScope::resolve(&self.to_stage_data(), &self.record);
        self.stage
            .definition()
            .fields
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| descriptor.is_shown(scope))
            .map(|(index, _)| index)
            .collect()
    }

    /// Collect the buffers into a sub-record for the wizard
    pub fn to_stage_data(&self) -> StageData {
        self.fields.iter().map(|f| (f.name, f.to_value())).collect()
    }

    pub fn next_field(&mut self) {
        let visible = self.visible_fields();
        let next = visible
            .iter()
            .find(|&&index| index > self.active_field_index)
            .or_else(|| visible.first());
        if let Some(&index) = next {
            self.active_field_index = index;
        }
    }

    pub fn prev_field(&mut self) {
        let visible = self.visible_fields();
        let prev = visible
            .iter()
            .rev()
            .find(|&&index| index < self.active_field_index)
            .or_else(|| visible.last());
        if let Some(&index) = prev {
            self.active_field_index = index;
        }
    }

    pub fn active_field(&self) -> Option<&FormField> {
        self.fields.get(self.active_field_index)
    }

    pub fn active_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.active_field_index)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Store rejected-advance errors and focus the first offending field
    pub fn set_errors(&mut self, errors: ValidationResult) {
        if let Some(index) = errors
            .errors()
            .filter_map(|(name, _)| self.fields.iter().position(|f| f.name == name))
            .min()
        {
            self.active_field_index = index;
        }
        self.errors = errors;
    }

    pub fn error_for(&self, name: &str) -> Option<&str> {
        self.errors.error(name)
    }

    /// Copy the mailing address into the practice address block.
    ///
    /// Returns false when this form has no address blocks.
    pub fn copy_mailing_to_practice(&mut self) -> bool {
        if self.stage != StageId::BusinessAddress {
            return false;
        }
        for (mailing, practice) in mailing_practice_pairs() {
            let text = self
                .fields
                .iter()
                .find(|f| f.name == mailing)
                .map(FormField::as_text)
                .unwrap_or_default();
            if let Some(target) = self.field_mut(practice) {
                target.set_text(&text);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{merge, validate, FieldValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_form_uses_initial_values() {
        let form = StageForm::new(StageId::BusinessAddress, &FormRecord::new());
        let data = form.to_stage_data();
        assert_eq!(data.text("mailing_country"), Some("USA"));
        assert_eq!(data.get("enumeration_date"), Some(&FieldValue::Date(None)));
        assert_eq!(form.active_field_index, 0);
    }

    #[test]
    fn test_saved_data_is_loaded_back() {
        let saved = StageData::new()
            .with("submission_reason", FieldValue::text("Update Existing"))
            .with("entity_type", FieldValue::text("Organization"))
            .with("npi", FieldValue::text("1234567890"));
        let record = merge(&FormRecord::new(), StageId::BasicInformation, saved.clone());
        let form = StageForm::new(StageId::BasicInformation, &record);
        assert_eq!(form.to_stage_data(), saved);
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = StageForm::new(StageId::ContactPerson, &FormRecord::new());
        form.prev_field();
        assert_eq!(form.active_field_index, form.fields.len() - 1);
        form.next_field();
        assert_eq!(form.active_field_index, 0);
    }

    #[test]
    fn test_existing_npi_follows_submission_reason() {
        let mut form = StageForm::new(StageId::BasicInformation, &FormRecord::new());
        assert_eq!(form.visible_fields(), vec![0, 1]);
        form.next_field();
        form.next_field();
        assert_eq!(form.active_field().unwrap().name, "submission_reason");

        form.field_mut("submission_reason").unwrap().set_text("Deactivate");
        assert_eq!(form.visible_fields(), vec![0, 1, 2]);
        form.prev_field();
        assert_eq!(form.active_field().unwrap().name, "npi");
    }

    #[test]
    fn test_only_active_entity_fields_are_visible() {
        let record = merge(
            &FormRecord::new(),
            StageId::BasicInformation,
            StageData::new().with("entity_type", FieldValue::text("Individual")),
        );
        let mut form = StageForm::new(StageId::IdentifyingInformation, &record);
        form.field_mut("ein").unwrap().set_text("n/a");

        let visible: Vec<&str> = form
            .visible_fields()
            .into_iter()
            .map(|index| form.fields[index].name)
            .collect();
        assert!(visible.contains(&"ssn"));
        assert!(visible.contains(&"state_license_number"));
        assert!(!visible.contains(&"ein"));
        assert!(!visible.contains(&"organization_name"));
        assert!(!visible.contains(&"other_organization_name"));

        for _ in 0..form.fields.len() {
            form.next_field();
            assert_ne!(form.active_field().unwrap().name, "ein");
        }
        assert_eq!(form.to_stage_data().text("ein"), Some("n/a"));
    }

    #[test]
    fn test_set_errors_focuses_first_error() {
        let mut form = StageForm::new(StageId::ContactPerson, &FormRecord::new());
        let definition = StageId::ContactPerson.definition();
        let errors = validate(definition, &form.to_stage_data(), &FormRecord::new());
        assert!(!errors.is_passable());
        form.set_errors(errors);
        let focused = form.active_field().unwrap().name;
        assert!(form.error_for(focused).is_some());
        assert!(form.fields[..form.active_field_index]
            .iter()
            .all(|f| form.error_for(f.name).is_none()));
    }

    #[test]
    fn test_copy_mailing_to_practice() {
        let mut form = StageForm::new(StageId::BusinessAddress, &FormRecord::new());
        form.field_mut("mailing_address_line1").unwrap().set_text("1 Main St");
        form.field_mut("mailing_city").unwrap().set_text("Springfield");
        form.field_mut("mailing_state").unwrap().set_text("IL");
        form.field_mut("mailing_zip").unwrap().set_text("62701");

        assert!(form.copy_mailing_to_practice());
        let data = form.to_stage_data();
        assert_eq!(data.text("practice_address_line1"), Some("1 Main St"));
        assert_eq!(data.text("practice_city"), Some("Springfield"));
        assert_eq!(data.text("practice_state"), Some("IL"));
        assert_eq!(data.text("practice_zip"), Some("62701"));
        assert_eq!(data.text("practice_country"), Some("USA"));
    }

    #[test]
    fn test_copy_is_refused_outside_address_stage() {
        let mut form = StageForm::new(StageId::ContactPerson, &FormRecord::new());
        assert!(!form.copy_mailing_to_practice());
    }
}
