//! Tagged answers from the Basic Information stage that drive the rest of the wizard

use super::record::FormRecord;
use super::stage::StageId;

/// Kind of provider applying for an NPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Individual,
    Organization,
}

impl EntityType {
    pub const ALL: [EntityType; 2] = [EntityType::Individual, EntityType::Organization];

    /// Wire/storage value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Organization => "Organization",
        }
    }

    /// Longer label shown next to the choice
    pub fn description(&self) -> &'static str {
        match self {
            Self::Individual => "Individual (Physician, Dentist, etc.)",
            Self::Organization => "Organization (Hospital, Clinic, Group Practice, etc.)",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == value)
    }

    /// Entity type chosen so far, if the Basic Information stage has been merged
    pub fn from_record(record: &FormRecord) -> Option<Self> {
        record
            .stage(StageId::BasicInformation)
            .and_then(|data| data.text("entity_type"))
            .and_then(Self::parse)
    }
}

/// Reason for the submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionReason {
    InitialApplication,
    UpdateExisting,
    Deactivate,
    Reactivate,
}

impl SubmissionReason {
    pub const ALL: [SubmissionReason; 4] = [
        SubmissionReason::InitialApplication,
        SubmissionReason::UpdateExisting,
        SubmissionReason::Deactivate,
        SubmissionReason::Reactivate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialApplication => "Initial Application",
            Self::UpdateExisting => "Update Existing",
            Self::Deactivate => "Deactivate",
            Self::Reactivate => "Reactivate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::InitialApplication => "Initial Application (New NPI)",
            Self::UpdateExisting => "Update Existing NPI Information",
            Self::Deactivate => "Deactivate NPI",
            Self::Reactivate => "Reactivate Deactivated NPI",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }

    /// Whether an existing NPI is relevant for this reason
    pub fn refers_to_existing_npi(&self) -> bool {
        !matches!(self, Self::InitialApplication)
    }
}
