//! Per-pass event registry with locale partitioning and sort views.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::event::EventRecord;

/// All events gathered during one generation pass.
///
/// Owned by the pass driver and rebuilt from scratch every pass. Hosts
/// that generate once per locale reuse the same process, so [`reset`]
/// must run at every pass boundary before any record is added.
///
/// [`reset`]: EventCollection::reset
#[derive(Debug, Default)]
pub struct EventCollection {
    events: Vec<EventRecord>,
    localized: BTreeMap<String, Vec<EventRecord>>,
}

/// Sorted event sequences exposed to templates: flat, or keyed by locale
/// when localization is active.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EventLists {
    Flat(Vec<EventRecord>),
    Localized(BTreeMap<String, Vec<EventRecord>>),
}

/// Template variables produced at the end of a pass.
#[derive(Debug, Serialize)]
pub struct TemplateContext {
    /// All events, newest first.
    pub events_list: EventLists,
    /// Events ending today or later, oldest first.
    pub upcoming_events_list: EventLists,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the flat sequence and the locale partition. Idempotent.
    pub fn reset(&mut self) {
        self.events.clear();
        self.localized.clear();
    }

    /// Append a record in encounter order. Draft records are dropped here
    /// so they never reach rendering lists or the exported calendar.
    pub fn push(&mut self, record: EventRecord) {
        if record.draft {
            return;
        }
        self.events.push(record);
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether `partition_by_locale` produced any buckets this pass.
    pub fn has_locale_buckets(&self) -> bool {
        !self.localized.is_empty()
    }

    /// Records of one locale bucket; empty for an unknown locale.
    pub fn locale_bucket(&self, lang: &str) -> &[EventRecord] {
        self.localized.get(lang).map_or(&[], Vec::as_slice)
    }

    /// Group records by their locale tag.
    ///
    /// Records without a tag stay in the flat sequence only; they are
    /// reported at debug level rather than failing the pass.
    pub fn partition_by_locale(&mut self) {
        for record in &self.events {
            match &record.lang {
                Some(lang) => self
                    .localized
                    .entry(lang.clone())
                    .or_default()
                    .push(record.clone()),
                None => debug!(event = %record.title, "event carries no lang attribute"),
            }
        }
    }

    /// Pure sorted view of the flat sequence.
    ///
    /// The sort key is `(start, end)` and the sort is stable, so equal
    /// keys keep their encounter order in both directions. With
    /// `future_only`, records whose end DATE is before the reference date
    /// are dropped; an event that ended earlier on the reference day
    /// itself stays in.
    pub fn sorted_view(
        &self,
        reverse: bool,
        future_only: bool,
        reference: DateTime<Local>,
    ) -> Vec<EventRecord> {
        Self::sorted(&self.events, reverse, future_only, reference)
    }

    fn sorted(
        records: &[EventRecord],
        reverse: bool,
        future_only: bool,
        reference: DateTime<Local>,
    ) -> Vec<EventRecord> {
        let mut view: Vec<EventRecord> = records
            .iter()
            .filter(|r| !future_only || r.end.date_naive() >= reference.date_naive())
            .cloned()
            .collect();

        if reverse {
            view.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
        } else {
            view.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        }
        view
    }

    /// Build the template context for this pass.
    ///
    /// Flat when no locale buckets exist; otherwise one sorted pair of
    /// lists per locale.
    pub fn template_context(&self, reference: DateTime<Local>) -> TemplateContext {
        if self.localized.is_empty() {
            TemplateContext {
                events_list: EventLists::Flat(self.sorted_view(true, false, reference)),
                upcoming_events_list: EventLists::Flat(self.sorted_view(false, true, reference)),
            }
        } else {
            let events_list = self
                .localized
                .iter()
                .map(|(lang, records)| {
                    (lang.clone(), Self::sorted(records, true, false, reference))
                })
                .collect();
            let upcoming_events_list = self
                .localized
                .iter()
                .map(|(lang, records)| {
                    (lang.clone(), Self::sorted(records, false, true, reference))
                })
                .collect();

            TemplateContext {
                events_list: EventLists::Localized(events_list),
                upcoming_events_list: EventLists::Localized(upcoming_events_list),
            }
        }
    }
}
