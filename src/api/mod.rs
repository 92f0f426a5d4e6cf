//! Client side of the NPI application REST API

mod client;
mod error;
mod traits;
mod wire;

pub use client::ApiClient;
pub use error::GatewayError;
pub use traits::ApiClientTrait;
pub use wire::{
    application_payload, ApplicationDetail, ApplicationList, ApplicationSummary,
    SubmissionReceipt,
};

#[cfg(test)]
pub use traits::MockApiClientTrait;
