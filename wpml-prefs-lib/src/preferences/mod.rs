mod resolver;

pub use resolver::FieldResolver;

use crate::config::WpmlConfig;
use crate::error::{ProcessingState, ProcessorError};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Placeholder in a field pattern that stands for one or more digits.
pub const WILDCARD: char = '%';

/// Prefix of ACF-internal field names, which never get a preference.
pub const INTERNAL_FIELD_PREFIX: char = '_';

/// How WPML treats a custom field when translating a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preference {
    Ignore,
    Copy,
    Translate,
    CopyOnce,
}

impl Preference {
    /// The numeric value ACF stores under `wpml_cf_preferences`.
    pub fn code(self) -> u8 {
        match self {
            Preference::Ignore => 0,
            Preference::Copy => 1,
            Preference::Translate => 2,
            Preference::CopyOnce => 3,
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Preference::Ignore => "ignore",
            Preference::Copy => "copy",
            Preference::Translate => "translate",
            Preference::CopyOnce => "copy-once",
        }
    }
}

impl FromStr for Preference {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Preference::Ignore),
            "copy" => Ok(Preference::Copy),
            "translate" => Ok(Preference::Translate),
            "copy-once" => Ok(Preference::CopyOnce),
            _ => Err(ProcessorError::InvalidConfig(format!(
                "Unknown custom-field action: {} [Expected: ignore, copy, translate, copy-once]",
                s
            ))),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

impl Serialize for Preference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.action())
    }
}

/// One line of the operator listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub pattern: String,
    pub code: u8,
    pub action: Preference,
}

impl fmt::Display for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.pattern, self.code, self.action)
    }
}

/// Field pattern to preference mapping.
///
/// Re-inserting a pattern replaces its preference but keeps the position it
/// was first seen at, so iteration order is first-seen order. Wildcard
/// lookups depend on that order.
#[derive(Debug, Default, Clone)]
pub struct PreferenceTable {
    entries: Vec<(String, Preference)>,
    index: HashMap<String, usize>,
}

impl PreferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from the `<custom-field>` entries of a WPML config.
    /// Entries with an unknown or missing action, or an empty name, are
    /// skipped and reported as warnings.
    pub fn from_config(config: &WpmlConfig) -> (Self, ProcessingState) {
        let mut table = Self::new();
        let mut state = ProcessingState::new();

        for field in config.fields() {
            let pattern = field.name.trim();
            if pattern.is_empty() {
                state.add_warning(
                    "Skipping custom-field with empty name",
                    Some("preference_table".to_string()),
                );
                continue;
            }

            let action = field.action.as_deref().unwrap_or_default();
            match action.parse::<Preference>() {
                Ok(preference) => table.insert(pattern, preference),
                Err(e) => {
                    tracing::debug!("Skipping custom-field '{}': {}", pattern, e);
                    state.add_warning(
                        format!("Skipping custom-field '{}': unknown action '{}'", pattern, action),
                        Some("preference_table".to_string()),
                    );
                }
            }
        }

        tracing::debug!("Built preference table with {} entries", table.len());
        (table, state)
    }

    pub fn insert(&mut self, pattern: impl Into<String>, preference: Preference) {
        let pattern = pattern.into();
        match self.index.get(&pattern) {
            Some(&position) => {
                tracing::debug!(
                    "Overriding preference for '{}': {} -> {}",
                    pattern,
                    self.entries[position].1,
                    preference
                );
                self.entries[position].1 = preference;
            }
            None => {
                self.index.insert(pattern.clone(), self.entries.len());
                self.entries.push((pattern, preference));
            }
        }
    }

    pub fn get(&self, pattern: &str) -> Option<Preference> {
        self.index.get(pattern).map(|&position| self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Preference)> {
        self.entries
            .iter()
            .map(|(pattern, preference)| (pattern.as_str(), *preference))
    }

    /// Entries whose pattern contains the wildcard, in table order.
    pub fn wildcards(&self) -> impl Iterator<Item = (&str, Preference)> {
        self.iter().filter(|(pattern, _)| pattern.contains(WILDCARD))
    }

    /// Listing sorted by pattern.
    pub fn sorted(&self) -> Vec<MappingEntry> {
        let mut listing: Vec<MappingEntry> = self
            .iter()
            .map(|(pattern, preference)| MappingEntry {
                pattern: pattern.to_string(),
                code: preference.code(),
                action: preference,
            })
            .collect();
        listing.sort_by(|a, b| a.pattern.cmp(&b.pattern));
        listing
    }

    pub fn to_json(&self) -> Result<String, ProcessorError> {
        Ok(serde_json::to_string_pretty(&self.sorted())?)
    }
}
