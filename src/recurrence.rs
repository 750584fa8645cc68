//! Recurring-event expansion.
//!
//! Each configured recurring event contributes exactly one record per
//! generation pass: the next occurrence strictly after the expansion
//! instant. Natural-language rule parsing lives outside this crate,
//! behind [`RuleTextParser`].

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, Utc};
use rrule::RRuleSet;

use crate::collection::EventCollection;
use crate::config::{EventsConfig, RecurringEventSpec};
use crate::error::{EventCalError, EventCalResult};
use crate::event::{EventRecord, LOCATION_FIELD};
use crate::time::parse_duration;

/// Converts a recurrence description into RFC RRULE content,
/// e.g. "every Monday" into `FREQ=WEEKLY;BYDAY=MO`.
///
/// Hosts adapt their natural-language parser of choice behind this trait;
/// [`RfcRuleText`] covers configurations that write RFC content directly.
pub trait RuleTextParser {
    fn to_rrule(&self, text: &str) -> EventCalResult<String>;
}

/// Passthrough parser for rules that are already RFC RRULE content,
/// with or without the `RRULE:` prefix.
pub struct RfcRuleText;

impl RuleTextParser for RfcRuleText {
    fn to_rrule(&self, text: &str) -> EventCalResult<String> {
        let content = text.trim().trim_start_matches("RRULE:").trim();
        if content.is_empty() {
            return Err(EventCalError::Rule("empty recurrence rule".to_string()));
        }
        Ok(content.to_string())
    }
}

/// Compute the next occurrence of `rrule` strictly after `after`.
pub fn next_occurrence(rrule: &str, after: DateTime<Local>) -> EventCalResult<DateTime<Local>> {
    let after_utc = after.with_timezone(&Utc);

    // The rrule parser wants a full DTSTART + RRULE block; anchoring
    // DTSTART at `after` matches expanding the rule "from now".
    let block = format!(
        "DTSTART:{}\nRRULE:{}",
        after_utc.format("%Y%m%dT%H%M%SZ"),
        rrule
    );

    let rrule_set: RRuleSet = block.parse().map_err(|e| {
        EventCalError::Rule(format!("failed to parse recurrence rule '{rrule}': {e}"))
    })?;

    let tz: rrule::Tz = Utc.into();
    // after() is an exclusive bound, which is exactly the contract here
    let result = rrule_set.after(after_utc.with_timezone(&tz)).all(1);

    result
        .dates
        .first()
        .map(|dt| dt.with_timezone(&Local))
        .ok_or_else(|| {
            EventCalError::Rule(format!(
                "recurrence rule '{rrule}' has no upcoming occurrence"
            ))
        })
}

/// Expand every configured recurring event into one upcoming record.
///
/// Failures are fatal: a recurring event that cannot be expanded aborts
/// the pass rather than silently dropping off the calendar. No recurring
/// configuration means nothing to do.
pub fn insert_recurring_events(
    collection: &mut EventCollection,
    config: &EventsConfig,
    parser: &dyn RuleTextParser,
    now: DateTime<Local>,
) -> EventCalResult<()> {
    for spec in &config.recurring_events {
        let rrule = parser.to_rrule(&spec.recurring_rule)?;
        let start = next_occurrence(&rrule, now)?;
        let duration = parse_duration(&spec.duration, &spec.title)?;
        collection.push(synthesize(spec, start, duration));
    }
    Ok(())
}

/// Build the record for one upcoming occurrence of a recurring event.
fn synthesize(spec: &RecurringEventSpec, start: DateTime<Local>, duration: Duration) -> EventRecord {
    let mut metadata = BTreeMap::new();
    metadata.insert("title".to_string(), spec.title.clone());
    metadata.insert("summary".to_string(), spec.summary.clone());
    metadata.insert(LOCATION_FIELD.to_string(), spec.location.clone());

    EventRecord {
        title: spec.title.clone(),
        summary: spec.summary.clone(),
        location: (!spec.location.is_empty()).then(|| spec.location.clone()),
        lang: None,
        published: start,
        start,
        end: start + duration,
        url: format!("pages/{}", spec.page_url),
        draft: false,
        metadata,
    }
}
