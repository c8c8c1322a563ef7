use super::{Preference, PreferenceTable, INTERNAL_FIELD_PREFIX, WILDCARD};
use crate::error::ProcessorError;
use regex::Regex;

/// Resolves ACF field names against a [`PreferenceTable`].
///
/// Exact names win over wildcard patterns. Among wildcard patterns the first
/// one in table order that matches the whole name wins, so overlapping
/// patterns resolve by position rather than specificity.
#[derive(Debug)]
pub struct FieldResolver<'a> {
    table: &'a PreferenceTable,
    wildcards: Vec<(Regex, Preference)>,
}

impl<'a> FieldResolver<'a> {
    pub fn new(table: &'a PreferenceTable) -> Result<Self, ProcessorError> {
        let wildcards = table
            .wildcards()
            .map(|(pattern, preference)| Ok((wildcard_regex(pattern)?, preference)))
            .collect::<Result<Vec<_>, ProcessorError>>()?;
        tracing::debug!(
            "Compiled {} wildcard pattern(s) out of {} entries",
            wildcards.len(),
            table.len()
        );
        Ok(Self { table, wildcards })
    }

    pub fn resolve(&self, field_name: &str) -> Option<Preference> {
        if is_internal_field(field_name) {
            return None;
        }

        if let Some(preference) = self.table.get(field_name) {
            return Some(preference);
        }

        self.wildcards
            .iter()
            .find(|(regex, _)| regex.is_match(field_name))
            .map(|(_, preference)| *preference)
    }
}

pub(crate) fn is_internal_field(field_name: &str) -> bool {
    field_name.starts_with(INTERNAL_FIELD_PREFIX)
}

/// Turn `rows_%_title` into `^rows_[0-9]+_title$`. Everything outside the
/// wildcard is matched literally.
fn wildcard_regex(pattern: &str) -> Result<Regex, ProcessorError> {
    let body = pattern
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[0-9]+");
    Ok(Regex::new(&format!("^{}$", body))?)
}
