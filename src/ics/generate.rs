//! ICS file generation.

use chrono::{DateTime, Local, Utc};
use icalendar::{Calendar, Component, EventLike};
use tracing::debug;

use crate::collection::EventCollection;
use crate::config::{EventsConfig, SiteSettings};
use crate::error::EventCalResult;
use crate::event::EventRecord;
use crate::html::strip_markup;

/// Product identifier emitted in the calendar header.
const PRODID: &str = "-//My calendar product//mxm.dk//";

/// Render a timezone-aware instant in the basic UTC form
/// `YYYYMMDDTHHMMSSZ`.
pub fn basic_utc_format(dt: DateTime<Local>) -> String {
    dt.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}

/// Write the calendar file for the current pass.
///
/// Only events starting at or after `now` are exported. This is an
/// instant-level cutoff, unlike the date-level filter on the
/// upcoming-events rendering list: an event that started an hour ago but
/// is still running shows up in templates, not in the calendar. With
/// locale buckets present, only the default language's bucket is
/// exported. An empty `ics_fname` disables export entirely.
pub fn write_calendar(
    collection: &EventCollection,
    config: &EventsConfig,
    settings: &SiteSettings,
    now: DateTime<Local>,
) -> EventCalResult<()> {
    if config.ics_fname.is_empty() {
        debug!("no ics_fname configured, skipping calendar export");
        return Ok(());
    }

    let records = if collection.has_locale_buckets() {
        collection.locale_bucket(&settings.default_lang)
    } else {
        collection.events()
    };

    let path = settings.output_path.join(&config.ics_fname);
    debug!(path = %path.display(), events = records.len(), "generating calendar");

    let mut cal = Calendar::new();
    for record in records.iter().filter(|r| r.start >= now) {
        cal.push(build_event(record, config, settings));
    }
    let cal = cal.done();

    let output = pin_calendar_header(&cal.to_string());

    // Write-then-rename keeps a half-written calendar from ever being
    // visible at the destination path
    let tmp_path = path.with_extension("ics.tmp");
    std::fs::write(&tmp_path, output.as_bytes())?;
    std::fs::rename(&tmp_path, &path)?;

    Ok(())
}

/// Build one VEVENT component.
fn build_event(
    record: &EventRecord,
    config: &EventsConfig,
    settings: &SiteSettings,
) -> icalendar::Event {
    let raw_summary = record
        .metadata
        .get(config.summary_field())
        .unwrap_or(&record.summary);

    let mut event = icalendar::Event::new();
    event.summary(&strip_markup(raw_summary));
    event.add_property("DTSTART", basic_utc_format(record.start));
    event.add_property("DTEND", basic_utc_format(record.end));
    event.add_property("DTSTAMP", basic_utc_format(record.published));
    event.add_property("PRIORITY", "5");
    event.uid(&format!("{}{}", settings.site_url, record.url));

    if let Some(ref location) = record.location {
        event.location(location);
    }

    event.done()
}

/// Normalize the icalendar crate's header output: pin PRODID to the fixed
/// product id and drop the default CALSCALE line.
fn pin_calendar_header(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
