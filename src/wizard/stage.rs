//! Stage definitions for the CMS-10114 application
//!
//! Each stage owns an ordered list of field descriptors. Stage 2 also carries a
//! conditional rule that derives its required fields from the entity type
//! picked in stage 1.

use super::entity::{EntityType, SubmissionReason};
use super::record::{FieldValue, FormRecord, StageData};
use chrono::Local;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Stages in wizard order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageId {
    BasicInformation,
    IdentifyingInformation,
    BusinessAddress,
    ContactPerson,
    Certification,
}

impl StageId {
    pub const ALL: [StageId; 5] = [
        StageId::BasicInformation,
        StageId::IdentifyingInformation,
        StageId::BusinessAddress,
        StageId::ContactPerson,
        StageId::Certification,
    ];

    /// Number of data-entry stages (the review screen sits at this index)
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Key of this stage's object in the request body
    pub fn key(&self) -> &'static str {
        match self {
            Self::BasicInformation => "basic_information",
            Self::IdentifyingInformation => "identifying_information",
            Self::BusinessAddress => "business_address",
            Self::ContactPerson => "contact_person",
            Self::Certification => "certification",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInformation => "Basic Information",
            Self::IdentifyingInformation => "Identifying Information",
            Self::BusinessAddress => "Business Address",
            Self::ContactPerson => "Contact Person",
            Self::Certification => "Certification",
        }
    }

    pub fn definition(&self) -> &'static StageDefinition {
        &stages()[self.index()]
    }
}

/// How a field is edited and stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    /// One of a fixed set of values; blank means "not selected"
    Choice(&'static [&'static str]),
    /// Checkbox that must be ticked; never sent to the API
    Consent,
}

/// Static requiredness of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    Optional,
    /// Required only when the stage's conditional rule names it
    Conditional,
}

/// Fixed format a non-empty value has to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Free,
    /// 10-digit National Provider Identifier
    Npi,
    /// 5-digit or ZIP+4 postal code
    Zip,
    /// NNN-NN-NNNN
    Ssn,
    /// NN-NNNNNNN
    Ein,
    Email,
}

/// How a value is written into the request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireRule {
    /// Sent as a string, empty strings included
    Text,
    /// Empty values become `null`
    NullIfEmpty,
    /// Kept out of the request
    Omit,
}

/// Value a field starts with on a fresh stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Blank,
    Text(&'static str),
    Today,
}

/// When a field is shown on screen and checked by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Always,
    /// Only for one entity type
    Entity(EntityType),
    /// Only when the submission reason concerns an NPI that already exists
    ExistingNpi,
}

/// Answers that decide which fields of a stage are in play
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldScope {
    pub entity: Option<EntityType>,
    pub reason: Option<SubmissionReason>,
}

impl FieldScope {
    /// Resolve from a stage's pending answers, falling back to the record so far
    pub fn resolve(data: &StageData, record: &FormRecord) -> Self {
        let basic = record.stage(StageId::BasicInformation);
        let answer = |name: &str| data.text(name).or_else(|| basic.and_then(|b| b.text(name)));
        Self {
            entity: answer("entity_type").and_then(EntityType::parse),
            reason: answer("submission_reason").and_then(SubmissionReason::parse),
        }
    }
}

/// Describes one input of a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
    pub format: FieldFormat,
    pub wire: WireRule,
    pub default: FieldDefault,
    pub visibility: Visibility,
    /// Message shown when a required value is missing
    pub required_message: &'static str,
}

impl FieldDescriptor {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        let wire = match kind {
            FieldKind::Consent => WireRule::Omit,
            FieldKind::Date => WireRule::NullIfEmpty,
            _ => WireRule::Text,
        };
        Self {
            name,
            label,
            kind,
            requirement: Requirement::Optional,
            format: FieldFormat::Free,
            wire,
            default: FieldDefault::Blank,
            visibility: Visibility::Always,
            required_message: "",
        }
    }

    fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    fn choice(name: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self::new(name, label, FieldKind::Choice(options))
    }

    fn consent(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Consent)
    }

    fn required(mut self, message: &'static str) -> Self {
        self.requirement = Requirement::Always;
        self.required_message = message;
        self
    }

    fn conditional(mut self, message: &'static str) -> Self {
        self.requirement = Requirement::Conditional;
        self.required_message = message;
        self
    }

    fn format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    fn null_if_empty(mut self) -> Self {
        self.wire = WireRule::NullIfEmpty;
        self
    }

    fn default_to(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    fn only_for(mut self, entity: EntityType) -> Self {
        self.visibility = Visibility::Entity(entity);
        self
    }

    fn when_existing_npi(mut self) -> Self {
        self.visibility = Visibility::ExistingNpi;
        self
    }

    /// Whether the field is in play for the given answers.
    ///
    /// Hidden fields keep their values; they are just not shown or checked.
    /// An unknown entity type shows both entity blocks.
    pub fn is_shown(&self, scope: FieldScope) -> bool {
        match self.visibility {
            Visibility::Always => true,
            Visibility::Entity(entity) => !matches!(scope.entity, Some(active) if active != entity),
            Visibility::ExistingNpi => scope
                .reason
                .is_some_and(|reason| reason.refers_to_existing_npi()),
        }
    }

    /// Value the field holds before the user touches it
    pub fn initial_value(&self) -> FieldValue {
        match (self.kind, self.default) {
            (FieldKind::Consent, _) => FieldValue::Flag(false),
            (FieldKind::Date, FieldDefault::Today) => {
                FieldValue::Date(Some(Local::now().date_naive()))
            }
            (FieldKind::Date, _) => FieldValue::Date(None),
            (_, FieldDefault::Text(text)) => FieldValue::text(text),
            _ => FieldValue::text(""),
        }
    }

    /// Value used when a submitted stage omits the field
    pub fn missing_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Date => FieldValue::Date(None),
            FieldKind::Consent => FieldValue::Flag(false),
            _ => FieldValue::text(""),
        }
    }
}

/// Derives the conditionally required field names from earlier answers
pub type ConditionalRule = fn(&FormRecord) -> BTreeSet<&'static str>;

/// One screen of the wizard
#[derive(Debug, Clone)]
pub struct StageDefinition {
    pub id: StageId,
    pub fields: Vec<FieldDescriptor>,
    pub rule: Option<ConditionalRule>,
}

impl StageDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields that must be filled in, given the answers so far.
    ///
    /// Evaluated on every call so a changed entity type is always honoured.
    pub fn required_fields(&self, record: &FormRecord) -> BTreeSet<&'static str> {
        let conditional = self.rule.map(|rule| rule(record)).unwrap_or_default();
        self.fields
            .iter()
            .filter(|f| match f.requirement {
                Requirement::Always => true,
                Requirement::Optional => false,
                Requirement::Conditional => conditional.contains(f.name),
            })
            .map(|f| f.name)
            .collect()
    }

    /// Keep only declared fields and fill in the missing ones.
    ///
    /// Text answers are trimmed so the record holds exactly what is checked
    /// and sent. Date fields given as text are parsed; text that is not a date
    /// is kept for the validator to reject.
    pub fn normalize(&self, data: &StageData) -> StageData {
        self.fields
            .iter()
            .map(|f| {
                let value = match (f.kind, data.get(f.name)) {
                    (_, None) => f.missing_value(),
                    (FieldKind::Date, Some(FieldValue::Text(raw))) => FieldValue::date_from_input(raw),
                    (FieldKind::Text | FieldKind::Choice(_), Some(FieldValue::Text(raw))) => {
                        FieldValue::text(raw.trim())
                    }
                    (_, Some(value)) => value.clone(),
                };
                (f.name, value)
            })
            .collect()
    }

    /// Fresh sub-record holding every field's initial value
    pub fn initial_data(&self) -> StageData {
        self.fields.iter().map(|f| (f.name, f.initial_value())).collect()
    }
}

pub const SUBMISSION_REASONS: &[&str] = &[
    "Initial Application",
    "Update Existing",
    "Deactivate",
    "Reactivate",
];

pub const ENTITY_TYPES: &[&str] = &["Individual", "Organization"];

const NAME_PREFIXES: &[&str] = &["Dr.", "Mr.", "Ms.", "Mrs."];
const NAME_SUFFIXES: &[&str] = &["Jr.", "Sr.", "II", "III", "IV"];
const GENDERS: &[&str] = &["Male", "Female", "Other"];
const ORGANIZATION_TYPES: &[&str] = &[
    "Hospital",
    "Clinic",
    "Group Practice",
    "Nursing Facility",
    "Laboratory",
    "Home Health Agency",
    "Other",
];

pub const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

/// Stage 2 requirements depend on the entity type from stage 1
fn identifying_information_rule(record: &FormRecord) -> BTreeSet<&'static str> {
    match EntityType::from_record(record) {
        Some(EntityType::Individual) => ["first_name", "last_name", "date_of_birth"].into(),
        Some(EntityType::Organization) => ["organization_name", "ein"].into(),
        None => BTreeSet::new(),
    }
}

/// Field names of one address block
struct AddressBlock {
    line1: &'static str,
    line2: &'static str,
    city: &'static str,
    state: &'static str,
    zip: &'static str,
    country: &'static str,
    phone: &'static str,
    fax: &'static str,
    line1_label: &'static str,
    line1_message: &'static str,
}

const MAILING_ADDRESS: AddressBlock = AddressBlock {
    line1: "mailing_address_line1",
    line2: "mailing_address_line2",
    city: "mailing_city",
    state: "mailing_state",
    zip: "mailing_zip",
    country: "mailing_country",
    phone: "mailing_phone",
    fax: "mailing_fax",
    line1_label: "Mailing Address Line 1",
    line1_message: "Mailing address is required",
};

const PRACTICE_ADDRESS: AddressBlock = AddressBlock {
    line1: "practice_address_line1",
    line2: "practice_address_line2",
    city: "practice_city",
    state: "practice_state",
    zip: "practice_zip",
    country: "practice_country",
    phone: "practice_phone",
    fax: "practice_fax",
    line1_label: "Practice Address Line 1",
    line1_message: "Practice address is required",
};

/// Mailing address fields paired with their practice address counterparts
pub fn mailing_practice_pairs() -> [(&'static str, &'static str); 8] {
    let (m, p) = (&MAILING_ADDRESS, &PRACTICE_ADDRESS);
    [
        (m.line1, p.line1),
        (m.line2, p.line2),
        (m.city, p.city),
        (m.state, p.state),
        (m.zip, p.zip),
        (m.country, p.country),
        (m.phone, p.phone),
        (m.fax, p.fax),
    ]
}

fn address_fields(block: &AddressBlock) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text(block.line1, block.line1_label).required(block.line1_message),
        FieldDescriptor::text(block.line2, "Address Line 2"),
        FieldDescriptor::text(block.city, "City").required("City is required"),
        FieldDescriptor::choice(block.state, "State", US_STATES).required("State is required"),
        FieldDescriptor::text(block.zip, "ZIP Code")
            .required("ZIP code is required")
            .format(FieldFormat::Zip),
        FieldDescriptor::text(block.country, "Country").default_to(FieldDefault::Text("USA")),
        FieldDescriptor::text(block.phone, "Phone Number").required("Phone number is required"),
        FieldDescriptor::text(block.fax, "Fax Number"),
    ]
}

const INDIVIDUAL: EntityType = EntityType::Individual;
const ORGANIZATION: EntityType = EntityType::Organization;

static STAGES: Lazy<Vec<StageDefinition>> = Lazy::new(|| {
    vec![
        StageDefinition {
            id: StageId::BasicInformation,
            fields: vec![
                FieldDescriptor::choice("submission_reason", "Reason for Submission", SUBMISSION_REASONS)
                    .required("Submission reason is required"),
                FieldDescriptor::choice("entity_type", "Entity Type", ENTITY_TYPES)
                    .required("Entity type is required"),
                FieldDescriptor::text("npi", "Existing NPI")
                    .format(FieldFormat::Npi)
                    .null_if_empty()
                    .when_existing_npi(),
            ],
            rule: None,
        },
        StageDefinition {
            id: StageId::IdentifyingInformation,
            fields: vec![
                FieldDescriptor::choice("name_prefix", "Prefix", NAME_PREFIXES).only_for(INDIVIDUAL),
                FieldDescriptor::text("first_name", "First Name")
                    .conditional("First name is required")
                    .only_for(INDIVIDUAL),
                FieldDescriptor::text("middle_name", "Middle Name").only_for(INDIVIDUAL),
                FieldDescriptor::text("last_name", "Last Name")
                    .conditional("Last name is required")
                    .only_for(INDIVIDUAL),
                FieldDescriptor::choice("name_suffix", "Suffix", NAME_SUFFIXES).only_for(INDIVIDUAL),
                FieldDescriptor::text("credential", "Credentials").only_for(INDIVIDUAL),
                FieldDescriptor::date("date_of_birth", "Date of Birth")
                    .conditional("Date of birth is required")
                    .only_for(INDIVIDUAL),
                FieldDescriptor::choice("gender", "Gender", GENDERS).only_for(INDIVIDUAL),
                FieldDescriptor::text("ssn", "Social Security Number")
                    .format(FieldFormat::Ssn)
                    .null_if_empty()
                    .only_for(INDIVIDUAL),
                FieldDescriptor::text("organization_name", "Organization Name")
                    .conditional("Organization name is required")
                    .only_for(ORGANIZATION),
                FieldDescriptor::choice("organization_type", "Organization Type", ORGANIZATION_TYPES)
                    .only_for(ORGANIZATION),
                FieldDescriptor::text("ein", "Employer Identification Number (EIN)")
                    .conditional("EIN is required")
                    .format(FieldFormat::Ein)
                    .null_if_empty()
                    .only_for(ORGANIZATION),
                FieldDescriptor::text("state_license_number", "State License Number"),
                FieldDescriptor::choice("issuing_state", "Issuing State", US_STATES),
                FieldDescriptor::text("other_name", "Other Name (Former Name, Alias)")
                    .only_for(INDIVIDUAL),
                FieldDescriptor::text(
                    "other_organization_name",
                    "Other Organization Name (Former Name, DBA)",
                )
                .only_for(ORGANIZATION),
            ],
            rule: Some(identifying_information_rule),
        },
        StageDefinition {
            id: StageId::BusinessAddress,
            fields: address_fields(&MAILING_ADDRESS)
                .into_iter()
                .chain(address_fields(&PRACTICE_ADDRESS))
                .chain([FieldDescriptor::date("enumeration_date", "Enumeration Date")])
                .collect(),
            rule: None,
        },
        StageDefinition {
            id: StageId::ContactPerson,
            fields: vec![
                FieldDescriptor::text("contact_first_name", "First Name")
                    .required("First name is required"),
                FieldDescriptor::text("contact_middle_name", "Middle Name"),
                FieldDescriptor::text("contact_last_name", "Last Name")
                    .required("Last name is required"),
                FieldDescriptor::text("contact_phone", "Phone Number")
                    .required("Phone number is required"),
                FieldDescriptor::text("contact_phone_ext", "Extension"),
                FieldDescriptor::text("contact_email", "Email Address")
                    .required("Email is required")
                    .format(FieldFormat::Email),
            ],
            rule: None,
        },
        StageDefinition {
            id: StageId::Certification,
            fields: vec![
                FieldDescriptor::text("authorized_official_first_name", "First Name")
                    .required("First name is required"),
                FieldDescriptor::text("authorized_official_middle_name", "Middle Name"),
                FieldDescriptor::text("authorized_official_last_name", "Last Name")
                    .required("Last name is required"),
                FieldDescriptor::text("authorized_official_title", "Title/Position")
                    .required("Title/Position is required"),
                FieldDescriptor::text("authorized_official_phone", "Phone Number")
                    .required("Phone number is required"),
                FieldDescriptor::text("authorized_official_email", "Email Address")
                    .required("Email is required")
                    .format(FieldFormat::Email),
                FieldDescriptor::consent(
                    "agreement",
                    "I certify that the information provided is true, accurate, and complete",
                )
                .required("You must agree to the certification statement"),
                FieldDescriptor::text("signature", "Type Your Full Name")
                    .required("Electronic signature is required"),
                FieldDescriptor::date("certification_date", "Date")
                    .required("Certification date is required")
                    .default_to(FieldDefault::Today),
            ],
            rule: None,
        },
    ]
});

/// All stage definitions in wizard order
pub fn stages() -> &'static [StageDefinition] {
    &STAGES
}

/// Reason chosen in stage 1, if any
pub fn submission_reason(record: &FormRecord) -> Option<SubmissionReason> {
    record
        .stage(StageId::BasicInformation)
        .and_then(|data| data.text("submission_reason"))
        .and_then(SubmissionReason::parse)
}
