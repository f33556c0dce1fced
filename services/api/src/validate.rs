use clap::{Args, ValueEnum};
use oncall_network::error::AppError;
use oncall_network::leads::{
    is_offered_venue_type, validate_venue, validate_worker, venue_fields, worker_fields, LeadKind,
    VENUE_TYPES,
};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Form the payload was captured from
    #[arg(value_enum)]
    pub(crate) kind: LeadKindArg,
    /// JSON file holding the payload exactly as the form posts it
    pub(crate) path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LeadKindArg {
    Venue,
    Worker,
}

impl From<LeadKindArg> for LeadKind {
    fn from(value: LeadKindArg) -> Self {
        match value {
            LeadKindArg::Venue => LeadKind::Venue,
            LeadKindArg::Worker => LeadKind::Worker,
        }
    }
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs { kind, path } = args;
    let kind = LeadKind::from(kind);

    let raw = std::fs::read_to_string(&path)?;
    let payload: Value = serde_json::from_str(&raw)?;
    let report = validation_report(kind, &payload)?;

    println!("{} payload from {} is valid", kind, path.display());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Validate a payload and describe the record that would be sent upstream.
pub(crate) fn validation_report(kind: LeadKind, payload: &Value) -> Result<Value, AppError> {
    let mut notes = Vec::new();
    let fields = match kind {
        LeadKind::Venue => {
            let inquiry = validate_venue(payload)?;
            if !is_offered_venue_type(&inquiry.venue_type) {
                notes.push(format!(
                    "venue type '{}' is not one of the form options ({})",
                    inquiry.venue_type,
                    VENUE_TYPES.join(", ")
                ));
            }
            venue_fields(&inquiry)
        }
        LeadKind::Worker => worker_fields(&validate_worker(payload)?),
    };

    Ok(json!({
        "kind": kind,
        "fields": fields,
        "notes": notes,
    }))
}
