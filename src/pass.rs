//! Generation-pass lifecycle.
//!
//! The host invokes these in order: [`on_pass_start`] once, [`on_item`]
//! per content item, then [`on_pass_end`] once. All writers run before
//! any reader, and the collection is reset at every pass boundary, so
//! multi-pass hosts (one pass per locale) never leak records between
//! passes.

use chrono::Local;

use crate::collection::{EventCollection, TemplateContext};
use crate::config::{EventsConfig, SiteSettings};
use crate::error::EventCalResult;
use crate::event::{ContentItem, EventRecord};
use crate::ics::write_calendar;
use crate::recurrence::{RuleTextParser, insert_recurring_events};

/// Reset the collection and inject recurring events for this pass.
pub fn on_pass_start(
    collection: &mut EventCollection,
    config: &EventsConfig,
    rule_parser: &dyn RuleTextParser,
) -> EventCalResult<()> {
    collection.reset();
    insert_recurring_events(collection, config, rule_parser, Local::now())
}

/// Examine one content item; non-draft events join the collection.
///
/// The constructed record is returned even for drafts so the host can
/// attach start/end data to the rendered item. Items without an
/// `event-start` field yield `None` and are skipped silently.
pub fn on_item(
    collection: &mut EventCollection,
    item: &dyn ContentItem,
) -> EventCalResult<Option<EventRecord>> {
    let Some(record) = EventRecord::from_item(item)? else {
        return Ok(None);
    };
    collection.push(record.clone());
    Ok(Some(record))
}

/// Finish the pass: partition locales when localization is active, export
/// the calendar, and build the template context.
pub fn on_pass_end(
    collection: &mut EventCollection,
    config: &EventsConfig,
    settings: &SiteSettings,
) -> EventCalResult<TemplateContext> {
    let now = Local::now();

    if settings.localization {
        collection.partition_by_locale();
    }
    write_calendar(collection, config, settings, now)?;

    Ok(collection.template_context(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::EventLists;
    use crate::config::RecurringEventSpec;
    use crate::recurrence::RfcRuleText;
    use chrono::{DateTime, Duration};
    use std::collections::BTreeMap;

    struct TestItem {
        title: String,
        url: String,
        published: DateTime<Local>,
        lang: Option<String>,
        metadata: BTreeMap<String, String>,
    }

    impl TestItem {
        fn new(title: &str, fields: &[(&str, &str)]) -> Self {
            TestItem {
                title: title.to_string(),
                url: format!("posts/{}.html", title.to_lowercase()),
                published: Local::now(),
                lang: None,
                metadata: fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl ContentItem for TestItem {
        fn title(&self) -> &str {
            &self.title
        }
        fn url(&self) -> &str {
            &self.url
        }
        fn published(&self) -> DateTime<Local> {
            self.published
        }
        fn lang(&self) -> Option<&str> {
            self.lang.as_deref()
        }
        fn metadata(&self) -> &BTreeMap<String, String> {
            &self.metadata
        }
    }

    fn make_settings(output_path: std::path::PathBuf) -> SiteSettings {
        SiteSettings {
            output_path,
            site_url: "https://example.org/".to_string(),
            default_lang: "en".to_string(),
            localization: false,
        }
    }

    #[test]
    fn test_full_pass_with_duration_derived_event() {
        let dir = tempfile::tempdir().unwrap();
        let config = EventsConfig {
            ics_fname: "calendar.ics".to_string(),
            ..Default::default()
        };
        let settings = make_settings(dir.path().to_path_buf());

        let mut collection = EventCollection::new();
        on_pass_start(&mut collection, &config, &RfcRuleText).unwrap();

        let item = TestItem::new(
            "Meetup",
            &[
                ("event-start", "2030-01-01 10:00"),
                ("event-duration", "1h 30m"),
                ("summary", "Monthly meetup"),
            ],
        );
        let record = on_item(&mut collection, &item).unwrap().unwrap();
        assert_eq!(
            record.end.format("%Y-%m-%d %H:%M").to_string(),
            "2030-01-01 11:30"
        );

        let context = on_pass_end(&mut collection, &config, &settings).unwrap();
        match context.upcoming_events_list {
            EventLists::Flat(list) => assert_eq!(list.len(), 1),
            EventLists::Localized(_) => panic!("expected flat list"),
        }

        // Start is in the future, so the event reaches the calendar too
        let output = std::fs::read_to_string(dir.path().join("calendar.ics")).unwrap();
        assert!(output.contains("SUMMARY:Monthly meetup"));
        assert!(output.contains("DTSTART:203001"));
    }

    #[test]
    fn test_draft_event_is_invisible_downstream() {
        let dir = tempfile::tempdir().unwrap();
        let config = EventsConfig {
            ics_fname: "calendar.ics".to_string(),
            ..Default::default()
        };
        let settings = make_settings(dir.path().to_path_buf());

        let mut collection = EventCollection::new();
        on_pass_start(&mut collection, &config, &RfcRuleText).unwrap();

        let item = TestItem::new(
            "Secret",
            &[
                ("event-start", "2030-01-01 10:00"),
                ("event-end", "2030-01-01 12:00"),
                ("status", "draft"),
                ("summary", "Not yet public"),
            ],
        );
        // The record itself is still handed back for template use
        let record = on_item(&mut collection, &item).unwrap().unwrap();
        assert!(record.draft);
        assert!(collection.is_empty());

        let context = on_pass_end(&mut collection, &config, &settings).unwrap();
        match context.events_list {
            EventLists::Flat(list) => assert!(list.is_empty()),
            EventLists::Localized(_) => panic!("expected flat list"),
        }

        let output = std::fs::read_to_string(dir.path().join("calendar.ics")).unwrap();
        assert!(!output.contains("Not yet public"));
    }

    #[test]
    fn test_undated_items_are_skipped_silently() {
        let mut collection = EventCollection::new();
        let item = TestItem::new("Post", &[("summary", "plain blog post")]);
        assert!(on_item(&mut collection, &item).unwrap().is_none());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_two_passes_do_not_accumulate_recurring_events() {
        let config = EventsConfig {
            recurring_events: vec![RecurringEventSpec {
                recurring_rule: "FREQ=DAILY".to_string(),
                title: "Standup".to_string(),
                summary: "Daily standup".to_string(),
                location: String::new(),
                page_url: "standup.html".to_string(),
                duration: "15m".to_string(),
            }],
            ..Default::default()
        };

        let mut collection = EventCollection::new();

        on_pass_start(&mut collection, &config, &RfcRuleText).unwrap();
        assert_eq!(collection.len(), 1);

        // Second pass in the same process: reset keeps the count at one
        on_pass_start(&mut collection, &config, &RfcRuleText).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.events()[0].end - collection.events()[0].start,
            Duration::minutes(15));
    }

    #[test]
    fn test_localized_pass_partitions_and_exports_default_lang() {
        let dir = tempfile::tempdir().unwrap();
        let config = EventsConfig {
            ics_fname: "calendar.ics".to_string(),
            ..Default::default()
        };
        let mut settings = make_settings(dir.path().to_path_buf());
        settings.localization = true;

        let mut collection = EventCollection::new();
        on_pass_start(&mut collection, &config, &RfcRuleText).unwrap();

        let mut en = TestItem::new(
            "Tour",
            &[
                ("event-start", "2030-01-01 10:00"),
                ("event-end", "2030-01-01 12:00"),
                ("summary", "Space tour"),
            ],
        );
        en.lang = Some("en".to_string());
        let mut de = TestItem::new(
            "Tour-de",
            &[
                ("event-start", "2030-01-01 10:00"),
                ("event-end", "2030-01-01 12:00"),
                ("summary", "Raumtour"),
            ],
        );
        de.lang = Some("de".to_string());

        on_item(&mut collection, &en).unwrap();
        on_item(&mut collection, &de).unwrap();

        let context = on_pass_end(&mut collection, &config, &settings).unwrap();
        match context.events_list {
            EventLists::Localized(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map["en"].len(), 1);
                assert_eq!(map["de"].len(), 1);
            }
            EventLists::Flat(_) => panic!("expected localized lists"),
        }

        let output = std::fs::read_to_string(dir.path().join("calendar.ics")).unwrap();
        assert!(output.contains("SUMMARY:Space tour"));
        assert!(!output.contains("SUMMARY:Raumtour"));
    }
}
