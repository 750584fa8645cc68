//! Event records and the content-item accessor contract.
//!
//! `EventRecord` is the canonical in-memory form of one calendar event.
//! Records are built either from a host content item (via `ContentItem`)
//! or synthesized from a recurring-event definition; downstream code never
//! distinguishes the two.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::{EventCalError, EventCalResult};
use crate::time::{parse_duration, parse_timestamp};

/// Metadata fields recognized on content items.
pub const START_FIELD: &str = "event-start";
pub const END_FIELD: &str = "event-end";
pub const DURATION_FIELD: &str = "event-duration";
pub const LOCATION_FIELD: &str = "event-location";

/// Accessor contract for a content item discovered by the host build.
///
/// The host implements this once for its own content type. Items without
/// an `event-start` metadata field are not events and are skipped without
/// error.
pub trait ContentItem {
    fn title(&self) -> &str;

    /// Site-relative URL of the rendered item.
    fn url(&self) -> &str;

    /// Publish timestamp of the item (the `date` metadata).
    fn published(&self) -> DateTime<Local>;

    /// Locale tag, when the site is localized.
    fn lang(&self) -> Option<&str>;

    /// Raw string metadata of the item.
    fn metadata(&self) -> &BTreeMap<String, String>;
}

/// One calendar event with a resolved `(start, end)` interval.
///
/// All datetimes are timezone-aware. `end >= start` is not enforced here:
/// ordering and export stay well-defined on inverted intervals, they just
/// look odd in a calendar client.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub title: String,
    /// Raw summary value; may contain markup until export strips it.
    pub summary: String,
    pub location: Option<String>,
    pub lang: Option<String>,
    /// Publish timestamp, used as DTSTAMP in the exported calendar.
    pub published: DateTime<Local>,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    /// Site-relative URL; the calendar UID is the site root plus this.
    pub url: String,
    /// Draft records are constructed but never join the shared collection.
    pub draft: bool,
    /// Remaining raw metadata, kept so export can resolve a configured
    /// summary field other than `summary`.
    pub metadata: BTreeMap<String, String>,
}

impl EventRecord {
    /// Build a record from a content item's metadata.
    ///
    /// Returns `Ok(None)` when the item carries no `event-start` field.
    /// An explicit `event-end` wins over `event-duration`; having neither
    /// is an error.
    pub fn from_item(item: &dyn ContentItem) -> EventCalResult<Option<Self>> {
        let metadata = item.metadata();

        let Some(raw_start) = metadata.get(START_FIELD) else {
            return Ok(None);
        };

        let title = item.title().to_string();
        let start = parse_timestamp(raw_start, START_FIELD, &title)?;

        let end = if let Some(raw_end) = metadata.get(END_FIELD) {
            parse_timestamp(raw_end, END_FIELD, &title)?
        } else if let Some(raw_duration) = metadata.get(DURATION_FIELD) {
            start + parse_duration(raw_duration, &title)?
        } else {
            return Err(EventCalError::MissingEndSpec { event: title });
        };

        let draft = metadata.get("status").is_some_and(|s| s == "draft");

        Ok(Some(EventRecord {
            title,
            summary: metadata.get("summary").cloned().unwrap_or_default(),
            location: metadata.get(LOCATION_FIELD).cloned(),
            lang: item.lang().map(str::to_string),
            published: item.published(),
            start,
            end,
            url: item.url().to_string(),
            draft,
            metadata: metadata.clone(),
        }))
    }

    /// Ordering key for sort views; ties preserve encounter order.
    pub fn sort_key(&self) -> (DateTime<Local>, DateTime<Local>) {
        (self.start, self.end)
    }
}
