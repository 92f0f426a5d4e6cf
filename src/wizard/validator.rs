//! Per-stage validation
//!
//! Requiredness is resolved fresh on each call from the stage definition and
//! the answers recorded so far, then every field in play is checked for
//! presence and format. A field reports at most one error. Values are checked
//! exactly as given; trimming happens when a stage is normalized.

use super::record::{parse_date, FieldValue, FormRecord, StageData};
use super::stage::{FieldDescriptor, FieldFormat, FieldKind, FieldScope, StageDefinition};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static NPI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$").expect("NPI pattern is valid"));
static ZIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("ZIP pattern is valid"));
static SSN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{2}-\d{4}$").expect("SSN pattern is valid"));
static EIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{7}$").expect("EIN pattern is valid"));
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is valid")
});

pub const INVALID_DATE_MESSAGE: &str = "Invalid date (use YYYY-MM-DD)";
pub const INVALID_CHOICE_MESSAGE: &str = "Please select a valid option";

/// Field name to error message; fields without an entry passed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    /// True when no field failed
    pub fn is_passable(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }
}

/// Validate one stage's answers.
///
/// Fields present in `data` but not declared by the stage are ignored. Fields
/// missing from `data` are treated as blank. Fields hidden for the current
/// entity type or submission reason are skipped.
pub fn validate(
    definition: &StageDefinition,
    data: &StageData,
    record_so_far: &FormRecord,
) -> ValidationResult {
    let required = definition.required_fields(record_so_far);
    let scope = FieldScope::resolve(data, record_so_far);
    let mut result = ValidationResult::default();

    for field in definition.fields.iter().filter(|f| f.is_shown(scope)) {
        let missing = field.missing_value();
        let value = data.get(field.name).unwrap_or(&missing);
        if let Some(message) = check_field(field, value, required.contains(field.name)) {
            result.insert(field.name, message);
        }
    }

    result
}

fn check_field(field: &FieldDescriptor, value: &FieldValue, required: bool) -> Option<String> {
    if value.is_empty() {
        return required.then(|| field.required_message.to_string());
    }

    match field.kind {
        FieldKind::Consent => None,
        FieldKind::Date => match value {
            FieldValue::Date(_) => None,
            other => parse_date(&other.to_input())
                .is_none()
                .then(|| INVALID_DATE_MESSAGE.to_string()),
        },
        FieldKind::Choice(options) => {
            let text = value.to_input();
            (!options.contains(&text.as_str())).then(|| INVALID_CHOICE_MESSAGE.to_string())
        }
        FieldKind::Text => check_format(field.format, &value.to_input())
            .err()
            .map(str::to_string),
    }
}

/// Check a non-empty text value against a fixed format
pub fn check_format(format: FieldFormat, value: &str) -> Result<(), &'static str> {
    let (pattern, message): (&Regex, &'static str) = match format {
        FieldFormat::Free => return Ok(()),
        FieldFormat::Npi => (&NPI_PATTERN, "NPI must be exactly 10 digits"),
        FieldFormat::Zip => (&ZIP_PATTERN, "Invalid ZIP code"),
        FieldFormat::Ssn => (&SSN_PATTERN, "SSN format: XXX-XX-XXXX"),
        FieldFormat::Ein => (&EIN_PATTERN, "EIN format: XX-XXXXXXX"),
        FieldFormat::Email => (&EMAIL_PATTERN, "Invalid email address"),
    };
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::record::merge;
    use crate::wizard::stage::StageId;

    fn text(value: &str) -> FieldValue {
        FieldValue::text(value)
    }

    fn record_for(entity: &str) -> FormRecord {
        merge(
            &FormRecord::new(),
            StageId::BasicInformation,
            StageData::new()
                .with("submission_reason", text("Initial Application"))
                .with("entity_type", text(entity)),
        )
    }

    fn valid_address() -> StageData {
        StageData::new()
            .with("mailing_address_line1", text("1 Main St"))
            .with("mailing_city", text("New York"))
            .with("mailing_state", text("NY"))
            .with("mailing_zip", text("10001-0001"))
            .with("mailing_phone", text("212-555-0100"))
            .with("practice_address_line1", text("2 Main St"))
            .with("practice_city", text("New York"))
            .with("practice_state", text("NY"))
            .with("practice_zip", text("10001"))
            .with("practice_phone", text("212-555-0101"))
    }

    mod formats {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_npi() {
            assert!(check_format(FieldFormat::Npi, "1234567890").is_ok());
            assert!(check_format(FieldFormat::Npi, "123456789").is_err());
            assert!(check_format(FieldFormat::Npi, "12345678901").is_err());
            assert!(check_format(FieldFormat::Npi, "12345abcde").is_err());
        }

        #[test]
        fn test_zip() {
            assert!(check_format(FieldFormat::Zip, "10001").is_ok());
            assert!(check_format(FieldFormat::Zip, "10001-0001").is_ok());
            assert_eq!(check_format(FieldFormat::Zip, "1000"), Err("Invalid ZIP code"));
            assert!(check_format(FieldFormat::Zip, "10001-01").is_err());
            assert!(check_format(FieldFormat::Zip, "100010001").is_err());
        }

        #[test]
        fn test_ssn() {
            assert!(check_format(FieldFormat::Ssn, "123-45-6789").is_ok());
            assert_eq!(
                check_format(FieldFormat::Ssn, "123456789"),
                Err("SSN format: XXX-XX-XXXX")
            );
        }

        #[test]
        fn test_ein() {
            assert!(check_format(FieldFormat::Ein, "12-3456789").is_ok());
            assert_eq!(
                check_format(FieldFormat::Ein, "123-456789"),
                Err("EIN format: XX-XXXXXXX")
            );
        }

        #[test]
        fn test_email() {
            assert!(check_format(FieldFormat::Email, "jane.doe@example.org").is_ok());
            assert!(check_format(FieldFormat::Email, "jane@mail.example.org").is_ok());
            assert!(check_format(FieldFormat::Email, "jane@example").is_err());
            assert!(check_format(FieldFormat::Email, "jane doe@example.org").is_err());
            assert!(check_format(FieldFormat::Email, "@example.org").is_err());
        }

        #[test]
        fn test_free_accepts_anything() {
            assert!(check_format(FieldFormat::Free, "anything at all").is_ok());
        }
    }

    mod basic_information {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_data_passes() {
            let data = StageData::new()
                .with("submission_reason", text("Initial Application"))
                .with("entity_type", text("Individual"));
            let result = validate(
                StageId::BasicInformation.definition(),
                &data,
                &FormRecord::new(),
            );
            assert!(result.is_passable(), "{result:?}");
        }

        #[test]
        fn test_missing_required_fields() {
            let result = validate(
                StageId::BasicInformation.definition(),
                &StageData::new(),
                &FormRecord::new(),
            );
            assert_eq!(result.len(), 2);
            assert_eq!(
                result.error("submission_reason"),
                Some("Submission reason is required")
            );
            assert_eq!(result.error("entity_type"), Some("Entity type is required"));
        }

        #[test]
        fn test_bad_npi_and_unknown_choice() {
            let data = StageData::new()
                .with("submission_reason", text("Update Existing"))
                .with("entity_type", text("Partnership"))
                .with("npi", text("12345"));
            let result = validate(
                StageId::BasicInformation.definition(),
                &data,
                &FormRecord::new(),
            );
            assert_eq!(result.len(), 2);
            assert_eq!(result.error("npi"), Some("NPI must be exactly 10 digits"));
            assert_eq!(result.error("entity_type"), Some(INVALID_CHOICE_MESSAGE));
        }

        #[test]
        fn test_npi_ignored_for_initial_application() {
            let data = StageData::new()
                .with("submission_reason", text("Initial Application"))
                .with("entity_type", text("Individual"))
                .with("npi", text("12345"));
            let result = validate(
                StageId::BasicInformation.definition(),
                &data,
                &FormRecord::new(),
            );
            assert!(result.is_passable(), "{result:?}");
        }

        #[test]
        fn test_padded_npi_is_checked_as_given() {
            let definition = StageId::BasicInformation.definition();
            let data = StageData::new()
                .with("submission_reason", text("Reactivate"))
                .with("entity_type", text(" Individual "))
                .with("npi", text(" 1234567890 "));

            let result = validate(definition, &data, &FormRecord::new());
            assert_eq!(result.error("npi"), Some("NPI must be exactly 10 digits"));
            assert_eq!(result.error("entity_type"), Some(INVALID_CHOICE_MESSAGE));

            let normalized = definition.normalize(&data);
            assert_eq!(normalized.text("npi"), Some("1234567890"));
            assert_eq!(normalized.text("entity_type"), Some("Individual"));
            assert!(validate(definition, &normalized, &FormRecord::new()).is_passable());
        }

        #[test]
        fn test_unknown_fields_are_ignored() {
            let data = StageData::new()
                .with("submission_reason", text("Update Existing"))
                .with("entity_type", text("Organization"))
                .with("npi", text("1234567890"))
                .with("not_a_field", text("???"));
            let result = validate(
                StageId::BasicInformation.definition(),
                &data,
                &FormRecord::new(),
            );
            assert!(result.is_passable());
        }
    }

    mod identifying_information {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_individual_requires_name_and_birth_date() {
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &StageData::new(),
                &record_for("Individual"),
            );
            assert_eq!(
                result.errors().map(|(f, _)| f).collect::<Vec<_>>(),
                vec!["date_of_birth", "first_name", "last_name"]
            );
            assert!(result.error("organization_name").is_none());
            assert!(result.error("ein").is_none());
        }

        #[test]
        fn test_organization_requires_name_and_ein() {
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &StageData::new(),
                &record_for("Organization"),
            );
            assert_eq!(
                result.errors().map(|(f, _)| f).collect::<Vec<_>>(),
                vec!["ein", "organization_name"]
            );
            assert_eq!(result.error("ein"), Some("EIN is required"));
            assert!(result.error("date_of_birth").is_none());
            assert!(result.error("first_name").is_none());
        }

        #[test]
        fn test_individual_scenario_passes() {
            let data = StageData::new()
                .with("first_name", text("Jane"))
                .with("last_name", text("Doe"))
                .with("date_of_birth", FieldValue::date_from_input("1980-01-01"));
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &data,
                &record_for("Individual"),
            );
            assert!(result.is_passable(), "{result:?}");
        }

        #[test]
        fn test_birth_date_given_as_text_is_accepted() {
            let data = StageData::new()
                .with("first_name", text("Jane"))
                .with("last_name", text("Doe"))
                .with("date_of_birth", text("1980-01-01"));
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &data,
                &record_for("Individual"),
            );
            assert!(result.is_passable(), "{result:?}");
        }

        #[test]
        fn test_unparseable_birth_date() {
            let data = StageData::new()
                .with("first_name", text("Jane"))
                .with("last_name", text("Doe"))
                .with("date_of_birth", FieldValue::date_from_input("yesterday"));
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &data,
                &record_for("Individual"),
            );
            assert_eq!(result.len(), 1);
            assert_eq!(result.error("date_of_birth"), Some(INVALID_DATE_MESSAGE));
        }

        #[test]
        fn test_malformed_ein_reports_format_once() {
            let data = StageData::new()
                .with("organization_name", text("General Hospital"))
                .with("ein", text("123456789"));
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &data,
                &record_for("Organization"),
            );
            assert_eq!(result.len(), 1);
            assert_eq!(result.error("ein"), Some("EIN format: XX-XXXXXXX"));
        }

        #[test]
        fn test_populated_individual_fields_kept_for_organization() {
            let data = StageData::new()
                .with("organization_name", text("General Hospital"))
                .with("ein", text("12-3456789"))
                .with("first_name", text("Jane"))
                .with("date_of_birth", FieldValue::date_from_input("1980-01-01"));
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &data,
                &record_for("Organization"),
            );
            assert!(result.is_passable(), "{result:?}");
        }

        #[test]
        fn test_individual_ignores_malformed_ein() {
            let data = StageData::new()
                .with("first_name", text("Jane"))
                .with("last_name", text("Doe"))
                .with("date_of_birth", FieldValue::date_from_input("1980-01-01"))
                .with("ein", text("n/a"))
                .with("organization_type", text("Spaceport"));
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &data,
                &record_for("Individual"),
            );
            assert!(result.is_passable(), "{result:?}");
        }

        #[test]
        fn test_organization_ignores_malformed_ssn() {
            let data = StageData::new()
                .with("organization_name", text("General Hospital"))
                .with("ein", text("12-3456789"))
                .with("ssn", text("123456789"))
                .with("date_of_birth", text("yesterday"));
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &data,
                &record_for("Organization"),
            );
            assert!(result.is_passable(), "{result:?}");
        }

        #[test]
        fn test_shared_fields_checked_for_both_entities() {
            let data = StageData::new()
                .with("organization_name", text("General Hospital"))
                .with("ein", text("12-3456789"))
                .with("issuing_state", text("Atlantis"));
            let result = validate(
                StageId::IdentifyingInformation.definition(),
                &data,
                &record_for("Organization"),
            );
            assert_eq!(result.error("issuing_state"), Some(INVALID_CHOICE_MESSAGE));
        }

        #[test]
        fn test_rule_follows_latest_entity_type() {
            let definition = StageId::IdentifyingInformation.definition();
            let data = StageData::new()
                .with("organization_name", text("General Hospital"))
                .with("ein", text("12-3456789"));

            assert!(validate(definition, &data, &record_for("Organization")).is_passable());
            assert!(!validate(definition, &data, &record_for("Individual")).is_passable());
        }
    }

    mod business_address {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_zip_plus_four_passes() {
            let result = validate(
                StageId::BusinessAddress.definition(),
                &valid_address(),
                &record_for("Individual"),
            );
            assert!(result.is_passable(), "{result:?}");
        }

        #[test]
        fn test_short_zip_fails() {
            let data = valid_address().with("mailing_zip", text("1000"));
            let result = validate(
                StageId::BusinessAddress.definition(),
                &data,
                &record_for("Individual"),
            );
            assert_eq!(result.len(), 1);
            assert_eq!(result.error("mailing_zip"), Some("Invalid ZIP code"));
        }

        #[test]
        fn test_padded_zip_is_checked_as_given() {
            let definition = StageId::BusinessAddress.definition();
            let data = valid_address().with("mailing_zip", text("10001 "));
            let record = record_for("Individual");

            let result = validate(definition, &data, &record);
            assert_eq!(result.error("mailing_zip"), Some("Invalid ZIP code"));

            let normalized = definition.normalize(&data);
            assert_eq!(normalized.text("mailing_zip"), Some("10001"));
            assert!(validate(definition, &normalized, &record).is_passable());
        }

        #[test]
        fn test_one_error_per_violated_rule() {
            let data = valid_address()
                .with("mailing_city", text(""))
                .with("practice_zip", text("abcde"))
                .with("practice_state", text("ZZ"));
            let result = validate(
                StageId::BusinessAddress.definition(),
                &data,
                &record_for("Individual"),
            );
            assert_eq!(result.len(), 3);
            assert_eq!(result.error("mailing_city"), Some("City is required"));
            assert_eq!(result.error("practice_zip"), Some("Invalid ZIP code"));
            assert_eq!(result.error("practice_state"), Some(INVALID_CHOICE_MESSAGE));
        }

        #[test]
        fn test_missing_zip_reports_required_not_format() {
            let data = valid_address().with("practice_zip", text(""));
            let result = validate(
                StageId::BusinessAddress.definition(),
                &data,
                &record_for("Individual"),
            );
            assert_eq!(result.error("practice_zip"), Some("ZIP code is required"));
        }
    }

    mod contact_and_certification {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_contact_email_format() {
            let data = StageData::new()
                .with("contact_first_name", text("Jane"))
                .with("contact_last_name", text("Doe"))
                .with("contact_phone", text("555-0100"))
                .with("contact_email", text("not-an-email"));
            let result = validate(
                StageId::ContactPerson.definition(),
                &data,
                &FormRecord::new(),
            );
            assert_eq!(result.len(), 1);
            assert_eq!(result.error("contact_email"), Some("Invalid email address"));
        }

        #[test]
        fn test_certification_requires_agreement() {
            let definition = StageId::Certification.definition();
            let data = definition
                .initial_data()
                .with("authorized_official_first_name", text("Jane"))
                .with("authorized_official_last_name", text("Doe"))
                .with("authorized_official_title", text("Director"))
                .with("authorized_official_phone", text("555-0100"))
                .with("authorized_official_email", text("jane@example.org"))
                .with("signature", text("Jane Doe"));

            let result = validate(definition, &data, &FormRecord::new());
            assert_eq!(result.len(), 1);
            assert_eq!(
                result.error("agreement"),
                Some("You must agree to the certification statement")
            );

            let agreed = data.with("agreement", FieldValue::Flag(true));
            assert!(validate(definition, &agreed, &FormRecord::new()).is_passable());
        }

        #[test]
        fn test_certification_date_required() {
            let definition = StageId::Certification.definition();
            let data = StageData::new().with("certification_date", FieldValue::Date(None));
            let result = validate(definition, &data, &FormRecord::new());
            assert_eq!(
                result.error("certification_date"),
                Some("Certification date is required")
            );
        }
    }
}
