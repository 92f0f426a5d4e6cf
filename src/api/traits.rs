//! Trait abstraction for the API client to enable mocking in tests

use super::error::GatewayError;
use super::wire::{ApplicationDetail, ApplicationList, SubmissionReceipt};
use crate::wizard::FormRecord;
use async_trait::async_trait;

/// Operations the wizard needs from the application API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    /// Check whether the API answers its health endpoint
    async fn check_health(&self) -> bool;

    /// Submit a complete application, returning the reference identifier
    async fn submit_application(
        &self,
        record: &FormRecord,
    ) -> Result<SubmissionReceipt, GatewayError>;

    /// List previously submitted applications, newest first
    async fn list_applications(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ApplicationList, GatewayError>;

    /// Fetch one submitted application
    async fn get_application(&self, application_id: &str)
        -> Result<ApplicationDetail, GatewayError>;
}
