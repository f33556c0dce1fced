//! Shape validation for raw form payloads.
//!
//! Fields are checked in form order and the first failure wins, so the
//! visitor always sees a single actionable message. Nothing here touches the
//! network; the functions are pure over `serde_json::Value`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::domain::{VenueInquiry, WorkerApplication};

/// Ten digit mobile number starting with 04, optionally grouped 4-3-3.
static MOBILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^04[0-9]{2}\s?[0-9]{3}\s?[0-9]{3}$").expect("mobile pattern compiles")
});

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub const PHONE_FORMAT_MESSAGE: &str = "Phone must be Australian mobile format (04XX XXX XXX)";
pub const EMAIL_FORMAT_MESSAGE: &str = "Please enter a valid email address";
pub const MINIMUM_EXPERIENCE_YEARS: f64 = 1.0;

/// First validation failure found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Wire name of the offending field, or `"body"` for payload-level problems.
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

struct TextField {
    name: &'static str,
    aliases: &'static [&'static str],
    label: &'static str,
}

impl TextField {
    const fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            label,
        }
    }

    const fn with_aliases(
        name: &'static str,
        aliases: &'static [&'static str],
        label: &'static str,
    ) -> Self {
        Self {
            name,
            aliases,
            label,
        }
    }

    fn lookup<'a>(&self, payload: &'a Map<String, Value>) -> Option<&'a Value> {
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .filter_map(|key| payload.get(key))
            .find(|value| !value.is_null())
    }

    fn required(&self, payload: &Map<String, Value>) -> Result<String, ValidationError> {
        match self.lookup(payload) {
            Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.clone()),
            Some(Value::String(_)) | None => Err(ValidationError::new(
                self.name,
                format!("{} is required", self.label),
            )),
            Some(_) => Err(self.not_text()),
        }
    }

    fn optional(
        &self,
        payload: &Map<String, Value>,
        default: &str,
    ) -> Result<String, ValidationError> {
        match self.lookup(payload) {
            None => Ok(default.to_string()),
            Some(Value::String(text)) => Ok(text.clone()),
            Some(_) => Err(self.not_text()),
        }
    }

    fn not_text(&self) -> ValidationError {
        ValidationError::new(self.name, format!("{} must be text", self.label))
    }
}

const BUSINESS_NAME: TextField =
    TextField::with_aliases("businessName", &["venueName"], "Business name");
const CONTACT_PERSON: TextField =
    TextField::with_aliases("contactPerson", &["contactName"], "Contact person");
const EMAIL: TextField = TextField::new("email", "Email");
const PHONE: TextField = TextField::new("phone", "Phone");
const VENUE_TYPE: TextField = TextField::new("venueType", "Venue type");
const LOCATION: TextField = TextField::new("location", "Location");
const IMMEDIATE_NEED: TextField = TextField::new("immediateNeed", "Immediate need");
const MESSAGE: TextField = TextField::new("message", "Message");
const FULL_NAME: TextField = TextField::new("fullName", "Full name");
const AVAILABILITY: TextField = TextField::new("availability", "Availability");

/// Validate a venue inquiry payload.
///
/// `venueName` and `contactName` from the older form are read when the
/// canonical keys are absent; the result is always the canonical shape.
pub fn validate_venue(payload: &Value) -> Result<VenueInquiry, ValidationError> {
    let fields = as_object(payload)?;

    Ok(VenueInquiry {
        business_name: BUSINESS_NAME.required(fields)?,
        contact_person: CONTACT_PERSON.required(fields)?,
        email: email(fields)?,
        phone: phone(fields)?,
        venue_type: VENUE_TYPE.required(fields)?,
        location: LOCATION.optional(fields, "")?,
        immediate_need: IMMEDIATE_NEED.optional(fields, "no")?,
        message: MESSAGE.optional(fields, "")?,
    })
}

/// Validate a worker registration payload.
pub fn validate_worker(payload: &Value) -> Result<WorkerApplication, ValidationError> {
    let fields = as_object(payload)?;

    Ok(WorkerApplication {
        full_name: FULL_NAME.required(fields)?,
        email: email(fields)?,
        phone: phone(fields)?,
        work_experience: work_experience(fields)?,
        availability: AVAILABILITY.required(fields)?,
    })
}

pub fn is_mobile_number(candidate: &str) -> bool {
    MOBILE_PATTERN.is_match(candidate)
}

pub fn is_email_address(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload
        .as_object()
        .ok_or_else(|| ValidationError::new("body", "Request body must be a JSON object"))
}

fn email(fields: &Map<String, Value>) -> Result<String, ValidationError> {
    let email = EMAIL.required(fields)?;
    if is_email_address(&email) {
        Ok(email)
    } else {
        Err(ValidationError::new(EMAIL.name, EMAIL_FORMAT_MESSAGE))
    }
}

fn phone(fields: &Map<String, Value>) -> Result<String, ValidationError> {
    let phone = PHONE.required(fields)?;
    if is_mobile_number(&phone) {
        Ok(phone)
    } else {
        Err(ValidationError::new(PHONE.name, PHONE_FORMAT_MESSAGE))
    }
}

fn work_experience(fields: &Map<String, Value>) -> Result<f64, ValidationError> {
    const FIELD: &str = "workExperience";

    let years = match fields.get(FIELD) {
        None | Some(Value::Null) => {
            return Err(ValidationError::new(FIELD, "Experience is required"))
        }
        Some(Value::Number(number)) => number.as_f64(),
        Some(_) => None,
    }
    .ok_or_else(|| ValidationError::new(FIELD, "Experience must be a number"))?;

    if years < MINIMUM_EXPERIENCE_YEARS {
        return Err(ValidationError::new(
            FIELD,
            "Minimum 1 year experience required",
        ));
    }

    Ok(years)
}
