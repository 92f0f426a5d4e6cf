//! Step controller: the wizard's state machine
//!
//! ```text
//! Stage0 -> Stage1 -> ... -> Stage4 -> Review -> Submitting -> Confirmed
//!    ^---------- retreat ----------'      ^           |
//!                                         '- failure -'
//! ```

use super::record::{merge, FormRecord, StageData};
use super::stage::StageId;
use super::validator::{validate, ValidationResult};
use crate::api::{ApiClientTrait, GatewayError, SubmissionReceipt};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Index of the review screen
pub const REVIEW_INDEX: usize = StageId::COUNT;
/// Index of the confirmation screen, only reachable after a successful submission
pub const CONFIRMED_INDEX: usize = StageId::COUNT + 1;

/// Where the wizard currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stage(StageId),
    Review,
    Confirmed,
}

/// Progress of the single submission call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        reference_id: String,
    },
    Failed {
        message: String,
    },
}

/// Requests the wizard refuses in its current phase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("stage has {} invalid field(s)", .0.len())]
    Invalid(ValidationResult),
    #[error("not on a data-entry stage")]
    NotOnStage,
    #[error("submission is only possible from the review stage")]
    NotAtReview,
    #[error("a submission is already in progress")]
    SubmissionInProgress,
    #[error("the application has already been submitted")]
    AlreadySubmitted,
}

/// State of one wizard session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    stage_index: usize,
    record: FormRecord,
    status: SubmissionStatus,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn phase(&self) -> Phase {
        match StageId::from_index(self.stage_index) {
            Some(stage) => Phase::Stage(stage),
            None if self.stage_index == REVIEW_INDEX => Phase::Review,
            None => Phase::Confirmed,
        }
    }

    /// Data-entry stage being edited, if any
    pub fn current_stage(&self) -> Option<StageId> {
        StageId::from_index(self.stage_index)
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, SubmissionStatus::Submitting)
    }

    pub fn reference_id(&self) -> Option<&str> {
        match &self.status {
            SubmissionStatus::Succeeded { reference_id } => Some(reference_id),
            _ => None,
        }
    }

    /// Message of the last failed submission, while still on the review stage
    pub fn failure_message(&self) -> Option<&str> {
        match &self.status {
            SubmissionStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Validate the active stage's answers and move on if they pass.
    ///
    /// On failure nothing changes and the per-field errors are returned.
    pub fn advance(&mut self, data: &StageData) -> Result<(), WizardError> {
        let stage = self.current_stage().ok_or(WizardError::NotOnStage)?;
        let definition = stage.definition();
        let data = definition.normalize(data);

        let result = validate(definition, &data, &self.record);
        if !result.is_passable() {
            debug!(stage = stage.key(), errors = result.len(), "stage rejected");
            return Err(WizardError::Invalid(result));
        }

        debug!(stage = stage.key(), fields = data.len(), "stage accepted");
        self.record = merge(&self.record, stage, data);
        self.stage_index += 1;
        Ok(())
    }

    /// Step back one stage without re-validating anything.
    ///
    /// Returns false when there is nowhere to go: the first stage, an
    /// in-flight submission, or the confirmation screen.
    pub fn retreat(&mut self) -> bool {
        if self.stage_index == 0 || self.is_submitting() || self.stage_index > REVIEW_INDEX {
            return false;
        }
        if self.stage_index == REVIEW_INDEX {
            self.status = SubmissionStatus::Idle;
        }
        self.stage_index -= 1;
        true
    }

    /// Enter the submitting state and hand out the record snapshot to send
    pub fn begin_submission(&mut self) -> Result<FormRecord, WizardError> {
        match self.status {
            SubmissionStatus::Submitting => return Err(WizardError::SubmissionInProgress),
            SubmissionStatus::Succeeded { .. } => return Err(WizardError::AlreadySubmitted),
            _ => {}
        }
        if self.stage_index != REVIEW_INDEX {
            return Err(WizardError::NotAtReview);
        }
        self.status = SubmissionStatus::Submitting;
        info!(stages = self.record.len(), "submitting application");
        Ok(self.record.clone())
    }

    /// Apply the gateway's answer to a submission started with [`Self::begin_submission`]
    pub fn finish_submission(&mut self, outcome: Result<SubmissionReceipt, GatewayError>) {
        if !self.is_submitting() {
            warn!("submission result arrived while no submission was in flight");
            return;
        }
        match outcome {
            Ok(receipt) => {
                info!(
                    reference_id = %receipt.application_id,
                    status = receipt.status.as_deref().unwrap_or_default(),
                    submitted = receipt.submission_date.as_deref().unwrap_or_default(),
                    message = receipt.message.as_deref().unwrap_or_default(),
                    "application accepted"
                );
                self.status = SubmissionStatus::Succeeded {
                    reference_id: receipt.application_id,
                };
                self.stage_index = CONFIRMED_INDEX;
            }
            Err(error) => {
                warn!(%error, "application submission failed");
                self.status = SubmissionStatus::Failed {
                    message: error.to_string(),
                };
            }
        }
    }

    /// Send the aggregated record through the gateway and record the outcome
    pub async fn submit<A>(&mut self, api: &A) -> Result<&SubmissionStatus, WizardError>
    where
        A: ApiClientTrait + ?Sized,
    {
        let snapshot = self.begin_submission()?;
        let outcome = api.submit_application(&snapshot).await;
        self.finish_submission(outcome);
        Ok(&self.status)
    }

    /// Start over with an empty record
    pub fn reset(&mut self) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInProgress);
        }
        *self = Self::default();
        Ok(())
    }
}
