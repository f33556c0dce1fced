//! Lead intake for the On Call Network staffing site: venue inquiries and
//! worker registrations are validated and forwarded to an Airtable base.

pub mod config;
pub mod error;
pub mod leads;
pub mod telemetry;
