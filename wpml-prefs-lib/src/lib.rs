//! WPML Preferences Library
//!
//! Adds `wpml_cf_preferences` entries to ACF field group definitions based on
//! the custom-field actions declared in a `wpml-config.xml`, and removes the
//! duplicate entries repeated runs can leave behind.

mod config;
mod dedup;
mod error;
mod injector;
mod preferences;
mod processor;

pub use config::{CustomField, WpmlConfig, DEFAULT_CONFIG_PATH};
pub use dedup::{remove_duplicates, Deduplication, RemovedLine};
pub use error::{ProcessingMessage, ProcessingState, ProcessorError};
pub use injector::{annotation_line, inject, Indent, InjectOptions, InjectedField, Injection};
pub use preferences::{FieldResolver, MappingEntry, Preference, PreferenceTable};
pub use processor::{DedupReport, InjectionReport, Processor, ProcessorBuilder, DEFAULT_TARGET_PATH};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;
    use tracing::info;

    static INIT: Once = Once::new();

    /// Initialize logging exactly once for all tests
    fn init_logging() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::DEBUG)
                .init();
        });
    }

    #[test]
    fn test_fixture_round_trip() {
        init_logging();

        info!("Testing preference injection against the fixture field groups");
        let config = WpmlConfig::from_file("../test-data/wpml-config.xml").unwrap();
        let (table, state) = PreferenceTable::from_config(&config);
        assert!(!state.has_warnings());

        let content = std::fs::read_to_string("../test-data/acf-field_groups.php").unwrap();
        let resolver = FieldResolver::new(&table).unwrap();
        let injection = inject(&content, &resolver, &InjectOptions::default()).unwrap();
        info!("Injected {} preferences", injection.modified_count());

        let names: Vec<&str> = injection.injected.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "job_short_description",
                "job_base_salary",
                "job_closed",
                "job_attributes",
                "job_attributes_0_job_attribute_value",
            ]
        );
        assert!(!names.contains(&"_job_internal_ref"));
        assert!(!names.contains(&"job_legacy_code"));

        info!("Checking that deduplication is a no-op after a single pass");
        let dedup = remove_duplicates(&injection.content);
        assert_eq!(dedup.removed_count(), 0);
        assert_eq!(dedup.content, injection.content);

        info!("Checking that a second pass adds nothing");
        let again = inject(&injection.content, &resolver, &InjectOptions::default()).unwrap();
        assert_eq!(again.modified_count(), 0);
    }
}
