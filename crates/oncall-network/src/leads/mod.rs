//! Lead capture for venue inquiries and worker registrations.
//!
//! Validation is pure and lives apart from the record store client, so the
//! service can be driven with an in-memory store in tests.

pub mod domain;
pub mod record_store;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    is_offered_venue_type, LeadKind, RecordId, VenueInquiry, WorkerApplication, VENUE_TYPES,
};
pub use record_store::{
    venue_fields, worker_fields, AirtableClient, RecordStore, RecordStoreError,
};
pub use router::{
    lead_router, SubmissionResponse, MAX_SUBMISSION_BYTES, VENUE_CONTACT_PATH,
    WORKER_REGISTRATION_PATH,
};
pub use service::{LeadIntakeService, SubmissionError, SubmissionReceipt};
pub use validation::{
    is_email_address, is_mobile_number, validate_venue, validate_worker, ValidationError,
};
