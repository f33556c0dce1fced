use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::leads::domain::{RecordId, VenueInquiry, WorkerApplication};
use crate::leads::record_store::{RecordStore, RecordStoreError};
use crate::leads::{lead_router, LeadIntakeService};

pub(super) fn venue_payload() -> Value {
    json!({
        "businessName": "The Harbour Bar",
        "contactPerson": "Sam Lee",
        "email": "sam@harbourbar.com.au",
        "phone": "0412 345 678",
        "venueType": "Bar/Pub",
    })
}

pub(super) fn full_venue_payload() -> Value {
    json!({
        "businessName": "Bondi Kitchen",
        "contactPerson": "Priya Nair",
        "email": "priya@bondikitchen.com.au",
        "phone": "0498765432",
        "venueType": "Restaurant",
        "location": "Bondi Beach",
        "immediateNeed": "yes",
        "message": "Two chefs for Saturday service",
    })
}

pub(super) fn worker_payload() -> Value {
    json!({
        "fullName": "Alex Chen",
        "email": "alex.chen@example.com",
        "phone": "0423 111 222",
        "workExperience": 3,
        "availability": "Weekends and evenings",
    })
}

pub(super) fn with_field(mut payload: Value, key: &str, value: Value) -> Value {
    payload
        .as_object_mut()
        .expect("payload is an object")
        .insert(key.to_string(), value);
    payload
}

pub(super) fn without_field(mut payload: Value, key: &str) -> Value {
    payload
        .as_object_mut()
        .expect("payload is an object")
        .remove(key);
    payload
}

/// Store assigning sequential ids and keeping every record it was handed.
#[derive(Default)]
pub(super) struct MemoryStore {
    sequence: AtomicU64,
    pub(super) venues: Mutex<Vec<VenueInquiry>>,
    pub(super) workers: Mutex<Vec<WorkerApplication>>,
}

impl MemoryStore {
    fn next_id(&self) -> RecordId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        RecordId(format!("rec{id:014}"))
    }

    pub(super) fn venues(&self) -> Vec<VenueInquiry> {
        self.venues.lock().expect("venue mutex poisoned").clone()
    }

    pub(super) fn workers(&self) -> Vec<WorkerApplication> {
        self.workers.lock().expect("worker mutex poisoned").clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_venue(&self, inquiry: &VenueInquiry) -> Result<RecordId, RecordStoreError> {
        self.venues
            .lock()
            .expect("venue mutex poisoned")
            .push(inquiry.clone());
        Ok(self.next_id())
    }

    async fn create_worker(
        &self,
        application: &WorkerApplication,
    ) -> Result<RecordId, RecordStoreError> {
        self.workers
            .lock()
            .expect("worker mutex poisoned")
            .push(application.clone());
        Ok(self.next_id())
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Failure {
    MissingCredentials,
    Rejected,
    NoRecordId,
}

/// Store that fails every call the same way and counts how often it was reached.
pub(super) struct FailingStore {
    failure: Failure,
    pub(super) calls: AtomicU64,
}

impl FailingStore {
    pub(super) fn new(failure: Failure) -> Self {
        Self {
            failure,
            calls: AtomicU64::new(0),
        }
    }

    fn fail(&self) -> RecordStoreError {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.failure {
            Failure::MissingCredentials => RecordStoreError::MissingCredentials,
            Failure::Rejected => RecordStoreError::Api {
                status: 422,
                message: "Unknown field name: \"Venue Type\"".to_string(),
            },
            Failure::NoRecordId => RecordStoreError::UnexpectedResponse,
        }
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn create_venue(&self, _inquiry: &VenueInquiry) -> Result<RecordId, RecordStoreError> {
        Err(self.fail())
    }

    async fn create_worker(
        &self,
        _application: &WorkerApplication,
    ) -> Result<RecordId, RecordStoreError> {
        Err(self.fail())
    }
}

pub(super) fn build_service() -> (LeadIntakeService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (LeadIntakeService::new(store.clone()), store)
}

pub(super) fn failing_service(
    failure: Failure,
) -> (LeadIntakeService<FailingStore>, Arc<FailingStore>) {
    let store = Arc::new(FailingStore::new(failure));
    (LeadIntakeService::new(store.clone()), store)
}

pub(super) fn router_with_service<S>(service: LeadIntakeService<S>) -> axum::Router
where
    S: RecordStore + 'static,
{
    lead_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
