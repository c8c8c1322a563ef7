use crate::error::ProcessorError;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "wpml-config.xml";

/// A `<custom-field>` entry. The text value is a field name, or a pattern
/// where `%` stands for one or more digits.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    #[serde(rename = "@action", default)]
    pub action: Option<String>,
    #[serde(rename = "$text", default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomFields {
    #[serde(rename = "custom-field", default)]
    pub fields: Vec<CustomField>,
}

/// The subset of `wpml-config.xml` this tool reads. Every element other than
/// `<custom-fields>` under the root is skipped.
#[derive(Debug, Default, Deserialize)]
pub struct WpmlConfig {
    #[serde(rename = "custom-fields", default)]
    pub custom_fields: Vec<CustomFields>,
}

impl WpmlConfig {
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Result<Self, ProcessorError> {
        let path = path.into();
        tracing::info!("Loading WPML config from {:?}", path);
        let xml = std::fs::read_to_string(&path)?;
        let config = Self::parse(&xml)?;
        tracing::info!("Successfully loaded WPML config: {}", path.display());
        Ok(config)
    }

    pub fn parse(xml: &str) -> Result<Self, ProcessorError> {
        let config: WpmlConfig = quick_xml::de::from_str(xml)?;
        tracing::debug!(
            "Parsed {} custom-fields block(s) with {} field(s)",
            config.custom_fields.len(),
            config.fields().count()
        );
        Ok(config)
    }

    /// All `<custom-field>` entries in document order.
    pub fn fields(&self) -> impl Iterator<Item = &CustomField> {
        self.custom_fields.iter().flat_map(|block| block.fields.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading() {
        let config = WpmlConfig::from_file("../test-data/wpml-config.xml").unwrap();
        let names: Vec<&str> = config.fields().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"job_base_salary"));
        assert!(names.contains(&"job_attributes_%_job_attribute_value"));
    }

    #[test]
    fn test_skips_unrelated_sections() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<wpml-config>
    <custom-types>
        <custom-type translate="1">job</custom-type>
    </custom-types>
    <custom-fields>
        <custom-field action="copy">price</custom-field>
        <custom-field action="translate">gallery_%</custom-field>
    </custom-fields>
    <taxonomies>
        <taxonomy translate="1">job_category</taxonomy>
    </taxonomies>
</wpml-config>"#;
        let config = WpmlConfig::parse(xml).unwrap();
        let fields: Vec<&CustomField> = config.fields().collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "price");
        assert_eq!(fields[0].action.as_deref(), Some("copy"));
        assert_eq!(fields[1].name, "gallery_%");
        assert_eq!(fields[1].action.as_deref(), Some("translate"));
    }

    #[test]
    fn test_multiple_custom_field_blocks() {
        let xml = r#"<wpml-config>
    <custom-fields>
        <custom-field action="copy">first</custom-field>
    </custom-fields>
    <custom-fields>
        <custom-field action="ignore">second</custom-field>
    </custom-fields>
</wpml-config>"#;
        let config = WpmlConfig::parse(xml).unwrap();
        let names: Vec<&str> = config.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_missing_action_attribute() {
        let xml = r#"<wpml-config><custom-fields><custom-field>orphan</custom-field></custom-fields></wpml-config>"#;
        let config = WpmlConfig::parse(xml).unwrap();
        let field = config.fields().next().unwrap();
        assert_eq!(field.name, "orphan");
        assert!(field.action.is_none());
    }

    #[test]
    fn test_malformed_xml_fails() {
        let xml = r#"<wpml-config><custom-fields><custom-field action="copy">price</custom-fields>"#;
        assert!(matches!(
            WpmlConfig::parse(xml),
            Err(ProcessorError::Xml(_))
        ));
    }
}
