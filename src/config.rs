//! Host-facing configuration.
//!
//! `EventsConfig` is the plugin's own settings table; `SiteSettings`
//! carries the values the host build already has (output path, site root,
//! default language, localization flag).

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{EventCalError, EventCalResult};

/// Default metadata field feeding the exported SUMMARY property.
const DEFAULT_SUMMARY_FIELD: &str = "summary";

/// Plugin configuration, read from the host's settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsConfig {
    /// Calendar output filename, relative to the output path.
    /// Empty disables calendar export.
    #[serde(default)]
    pub ics_fname: String,

    /// Metadata field whose value becomes each exported event's SUMMARY.
    #[serde(default)]
    pub metadata_field_for_summary: String,

    /// Recurring events to synthesize at every pass start.
    #[serde(default)]
    pub recurring_events: Vec<RecurringEventSpec>,
}

impl EventsConfig {
    /// Parse from a TOML settings fragment.
    pub fn from_toml(raw: &str) -> EventCalResult<Self> {
        toml::from_str(raw).map_err(|e| EventCalError::Config(e.to_string()))
    }

    /// Effective summary field, falling back to `summary` when unset.
    pub fn summary_field(&self) -> &str {
        if self.metadata_field_for_summary.is_empty() {
            DEFAULT_SUMMARY_FIELD
        } else {
            &self.metadata_field_for_summary
        }
    }
}

/// One recurring-event definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurringEventSpec {
    /// Recurrence description, converted to an RFC rule by a
    /// [`RuleTextParser`](crate::recurrence::RuleTextParser).
    pub recurring_rule: String,
    pub title: String,
    pub summary: String,
    pub location: String,
    /// Page path under `pages/` that the synthesized event links to.
    pub page_url: String,
    #[serde(rename = "event-duration")]
    pub duration: String,
}

/// Values the host build provides for a generation pass.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Directory the site is rendered into.
    pub output_path: PathBuf,
    /// Absolute site root, prefixed to event URLs to form calendar UIDs.
    pub site_url: String,
    /// Locale whose bucket feeds the calendar when localization is active.
    pub default_lang: String,
    /// Whether a localization plugin splits rendering per locale.
    pub localization: bool,
}
