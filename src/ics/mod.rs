//! ICS calendar generation.
//!
//! Serializes the upcoming subset of a pass's events into an iCalendar
//! v2.0 file.

mod generate;

pub use generate::{basic_utc_format, write_calendar};
