use crate::error::ProcessorError;
use crate::preferences::{FieldResolver, Preference};
use regex::{Captures, Regex};

/// Key ACF uses for the WPML translation preference of a field.
pub const ANNOTATION_KEY: &str = "'wpml_cf_preferences'";

/// A field definition line, `'name' => 'field_name',`, together with an
/// annotation line directly after it when one is already there.
const FIELD_DEFINITION_PATTERN: &str =
    r"'name'\s*=>\s*'([^']+)',(?:\s*'wpml_cf_preferences'\s*=>\s*\d+,)?";

pub const DEFAULT_INDENT: &str = "\t\t\t";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    /// Always indent the annotation with this string.
    Fixed(String),
    /// Reuse the leading whitespace of the `'name'` line.
    MatchName,
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Fixed(DEFAULT_INDENT.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InjectOptions {
    pub indent: Indent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedField {
    pub name: String,
    pub preference: Preference,
}

#[derive(Debug, Clone)]
pub struct Injection {
    pub content: String,
    pub injected: Vec<InjectedField>,
}

impl Injection {
    pub fn modified_count(&self) -> usize {
        self.injected.len()
    }
}

pub fn annotation_line(preference: Preference) -> String {
    format!("{} => {},", ANNOTATION_KEY, preference.code())
}

/// Add a `wpml_cf_preferences` line after every field definition that
/// resolves to a preference and has no annotation in its matched span.
///
/// The already-annotated check only sees the matched span. An annotation
/// elsewhere in the field's array is not noticed and a second one is added.
pub fn inject(
    content: &str,
    resolver: &FieldResolver<'_>,
    options: &InjectOptions,
) -> Result<Injection, ProcessorError> {
    let field_definition = Regex::new(FIELD_DEFINITION_PATTERN)?;
    let mut injected = Vec::new();

    let output = field_definition.replace_all(content, |caps: &Captures| {
        let span = &caps[0];
        let name = &caps[1];

        let Some(preference) = resolver.resolve(name) else {
            tracing::trace!("No preference for field '{}'", name);
            return span.to_string();
        };

        if span.contains(ANNOTATION_KEY) {
            tracing::debug!("Field '{}' already annotated", name);
            return span.to_string();
        }

        let indent = match &options.indent {
            Indent::Fixed(indent) => indent.as_str(),
            Indent::MatchName => line_indent(content, caps.get(0).map_or(0, |m| m.start())),
        };

        tracing::debug!("Adding {} ({}) to field '{}'", preference.code(), preference, name);
        injected.push(InjectedField {
            name: name.to_string(),
            preference,
        });
        format!("{}\n{}{}", span, indent, annotation_line(preference))
    });

    Ok(Injection {
        content: output.into_owned(),
        injected,
    })
}

/// Leading whitespace of the line containing byte offset `at`.
fn line_indent(content: &str, at: usize) -> &str {
    let line_start = content[..at].rfind('\n').map_or(0, |i| i + 1);
    let line = &content[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}
