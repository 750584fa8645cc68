//! Event extraction and calendar generation for static-site builds.
//!
//! A host site generator feeds content items through a pass lifecycle
//! (`on_pass_start` / `on_item` / `on_pass_end`); this crate resolves
//! each item's event metadata into a timezone-aware `(start, end)`
//! interval, expands configured recurring events into their next
//! occurrence, and produces:
//!
//! - sorted event lists for template rendering ([`TemplateContext`]), and
//! - an iCalendar v2.0 file covering upcoming events.

pub mod collection;
pub mod config;
pub mod error;
pub mod event;
pub mod html;
pub mod ics;
pub mod pass;
pub mod recurrence;
pub mod time;

pub use collection::{EventCollection, EventLists, TemplateContext};
pub use config::{EventsConfig, RecurringEventSpec, SiteSettings};
pub use error::{EventCalError, EventCalResult};
pub use event::{ContentItem, EventRecord};
pub use pass::{on_item, on_pass_end, on_pass_start};
pub use recurrence::{RfcRuleText, RuleTextParser};
