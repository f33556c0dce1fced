use std::fmt;

use serde::Serialize;

/// Identifier assigned by the record store when a lead is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two kinds of lead the site captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadKind {
    Venue,
    Worker,
}

impl LeadKind {
    pub const fn label(self) -> &'static str {
        match self {
            LeadKind::Venue => "venue",
            LeadKind::Worker => "worker",
        }
    }

    /// Message shown to the visitor after a successful submission.
    pub const fn success_message(self) -> &'static str {
        match self {
            LeadKind::Venue => "Request received successfully",
            LeadKind::Worker => "Registration successful",
        }
    }

    /// Message shown when the failure detail must not reach the visitor.
    pub const fn generic_failure_message(self) -> &'static str {
        match self {
            LeadKind::Venue => "Failed to submit request",
            LeadKind::Worker => "Failed to register worker",
        }
    }
}

impl fmt::Display for LeadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Venue categories offered by the inquiry form. Submissions are not
/// restricted to this list; see [`is_offered_venue_type`].
pub const VENUE_TYPES: [&str; 7] = [
    "Restaurant",
    "Bar/Pub",
    "Café",
    "Hotel",
    "Catering",
    "Events/Functions",
    "Other",
];

pub fn is_offered_venue_type(venue_type: &str) -> bool {
    VENUE_TYPES.contains(&venue_type)
}

/// A validated request for staff from a hospitality venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueInquiry {
    pub business_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub venue_type: String,
    pub location: String,
    pub immediate_need: String,
    pub message: String,
}

/// A validated registration from a worker joining the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Years of hospitality experience, at least one.
    pub work_experience: f64,
    pub availability: String,
}
