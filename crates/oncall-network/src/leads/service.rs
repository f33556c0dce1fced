use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::domain::{LeadKind, RecordId};
use super::record_store::{RecordStore, RecordStoreError};
use super::validation::{validate_venue, validate_worker, ValidationError};

/// Service composing payload validation with the record store.
pub struct LeadIntakeService<S> {
    store: Arc<S>,
}

/// Outcome of a lead that reached the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub kind: LeadKind,
    pub record_id: RecordId,
}

impl<S> LeadIntakeService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate a venue inquiry and create its record.
    pub async fn submit_venue(
        &self,
        payload: &Value,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let inquiry = validate_venue(payload).inspect_err(|err| rejected(LeadKind::Venue, err))?;
        let record_id = self
            .store
            .create_venue(&inquiry)
            .await
            .inspect_err(|err| failed(LeadKind::Venue, err))?;
        Ok(accepted(LeadKind::Venue, record_id))
    }

    /// Validate a worker registration and create its record.
    pub async fn submit_worker(
        &self,
        payload: &Value,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let application =
            validate_worker(payload).inspect_err(|err| rejected(LeadKind::Worker, err))?;
        let record_id = self
            .store
            .create_worker(&application)
            .await
            .inspect_err(|err| failed(LeadKind::Worker, err))?;
        Ok(accepted(LeadKind::Worker, record_id))
    }

    pub async fn submit(
        &self,
        kind: LeadKind,
        payload: &Value,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        match kind {
            LeadKind::Venue => self.submit_venue(payload).await,
            LeadKind::Worker => self.submit_worker(payload).await,
        }
    }
}

fn accepted(kind: LeadKind, record_id: RecordId) -> SubmissionReceipt {
    info!(%kind, %record_id, "lead recorded");
    SubmissionReceipt { kind, record_id }
}

fn rejected(kind: LeadKind, err: &ValidationError) {
    info!(%kind, field = err.field(), "lead failed validation");
}

fn failed(kind: LeadKind, err: &RecordStoreError) {
    warn!(%kind, error = %err, "lead could not be recorded");
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    RecordStore(#[from] RecordStoreError),
}
