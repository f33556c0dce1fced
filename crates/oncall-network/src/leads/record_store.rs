use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use url::Url;

use super::domain::{RecordId, VenueInquiry, WorkerApplication};
use crate::config::RecordStoreConfig;

/// Outbound boundary to the tabular record store so intake can be exercised without a network.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_venue(&self, inquiry: &VenueInquiry) -> Result<RecordId, RecordStoreError>;
    async fn create_worker(
        &self,
        application: &WorkerApplication,
    ) -> Result<RecordId, RecordStoreError>;
}

/// Failures creating a record upstream. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error(
        "Missing Airtable configuration: AIRTABLE_API_KEY and AIRTABLE_BASE_ID must be set"
    )]
    MissingCredentials,
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Unexpected Airtable response: no record ID returned")]
    UnexpectedResponse,
    #[error("record store endpoint cannot be built from '{0}'")]
    InvalidEndpoint(String),
    #[error("record store request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("record store client unavailable: {0}")]
    Client(#[source] reqwest::Error),
}

impl RecordStoreError {
    /// Whether the message is fit to show a site visitor. Failures carrying
    /// internal detail are replaced by a generic message.
    pub fn is_public(&self) -> bool {
        !matches!(
            self,
            RecordStoreError::InvalidEndpoint(_)
                | RecordStoreError::Transport(_)
                | RecordStoreError::Client(_)
        )
    }
}

/// Column names for the venue table.
pub fn venue_fields(inquiry: &VenueInquiry) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("Business Name".into(), json!(inquiry.business_name));
    fields.insert("Contact Person".into(), json!(inquiry.contact_person));
    fields.insert("Email".into(), json!(inquiry.email));
    fields.insert("Phone".into(), json!(inquiry.phone));
    fields.insert("Venue Type".into(), json!(inquiry.venue_type));
    fields.insert("Location".into(), json!(inquiry.location));
    fields.insert("Immediate Need".into(), json!(inquiry.immediate_need));
    fields.insert("Message".into(), json!(inquiry.message));
    fields
}

/// Column names for the worker table.
pub fn worker_fields(application: &WorkerApplication) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("Full Name".into(), json!(application.full_name));
    fields.insert("Email".into(), json!(application.email));
    fields.insert("Phone".into(), json!(application.phone));
    fields.insert(
        "Work Experience (years)".into(),
        json!(application.work_experience),
    );
    fields.insert("Availability".into(), json!(application.availability));
    fields
}

#[derive(Debug, Deserialize)]
struct CreateRecordsResponse {
    #[serde(default)]
    records: Vec<CreatedRecord>,
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    #[serde(default)]
    id: Option<String>,
}

/// REST client for an Airtable base.
#[derive(Debug, Clone)]
pub struct AirtableClient {
    http: reqwest::Client,
    config: RecordStoreConfig,
}

impl AirtableClient {
    pub fn new(config: RecordStoreConfig) -> Result<Self, RecordStoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RecordStoreError::Client)?;
        Ok(Self { http, config })
    }

    fn table_url(&self, base_id: &str, table: &str) -> Result<Url, RecordStoreError> {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| RecordStoreError::InvalidEndpoint(self.config.api_url.to_string()))?
            .pop_if_empty()
            .extend(["v0", base_id, table]);
        Ok(url)
    }

    async fn create_record(
        &self,
        table: &str,
        fields: Map<String, Value>,
    ) -> Result<RecordId, RecordStoreError> {
        let (Some(api_key), Some(base_id)) = (&self.config.api_key, &self.config.base_id) else {
            return Err(RecordStoreError::MissingCredentials);
        };

        let url = self.table_url(base_id, table)?;
        debug!(table, "creating record store entry");

        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&json!({ "records": [{ "fields": fields }] }))
            .send()
            .await
            .map_err(RecordStoreError::Transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(RecordStoreError::Transport)?;

        if !status.is_success() {
            let err = api_error(status, &body);
            warn!(table, status = status.as_u16(), error = %err, "record store rejected entry");
            return Err(err);
        }

        let created: CreateRecordsResponse =
            serde_json::from_str(&body).map_err(|_| RecordStoreError::UnexpectedResponse)?;

        created
            .records
            .into_iter()
            .next()
            .and_then(|record| record.id)
            .filter(|id| !id.is_empty())
            .map(RecordId)
            .ok_or(RecordStoreError::UnexpectedResponse)
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn create_venue(&self, inquiry: &VenueInquiry) -> Result<RecordId, RecordStoreError> {
        self.create_record(&self.config.venue_table, venue_fields(inquiry))
            .await
    }

    async fn create_worker(
        &self,
        application: &WorkerApplication,
    ) -> Result<RecordId, RecordStoreError> {
        self.create_record(&self.config.worker_table, worker_fields(application))
            .await
    }
}

/// Prefer the remote `error.message`; otherwise describe the status and
/// append the raw body when it was not JSON.
fn api_error(status: StatusCode, body: &str) -> RecordStoreError {
    let mut message = format!(
        "Airtable API error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_string();

    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => {
            if let Some(remote) = parsed
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
            {
                message = remote.to_string();
            }
        }
        Err(_) if !body.is_empty() => {
            message.push_str(" - ");
            message.push_str(body);
        }
        Err(_) => {}
    }

    RecordStoreError::Api {
        status: status.as_u16(),
        message,
    }
}
