//! Tool description text.
//!
//! Two transformations applied to tool descriptions before they reach a
//! model:
//!
//! - [`escape_curly_braces`] protects literal braces from the prompt
//!   template engine, which treats `{name}` as a placeholder and `{{` as an
//!   escaped brace.
//! - [`fallback_tool_description`] appends a prose rendering of the
//!   parameter schema for models that can't take structured tool schemas.

use super::schema::SchemaNode;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static BRACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{+|\}+").expect("brace pattern is valid"));

/// Escape literal curly braces for template interpolation.
///
/// Works on runs of identical braces:
///
/// | Run | Result |
/// |-----|--------|
/// | `{` | `{{` |
/// | `{{` | unchanged (already escaped) |
/// | `{{{` | `{{{{` |
/// | longer | unchanged |
///
/// The same applies to `}`. Applying it to text that only contains doubled
/// braces is a no-op.
pub fn escape_curly_braces(text: &str) -> String {
    BRACE_RUN
        .replace_all(text, |caps: &Captures| {
            let run = &caps[0];
            match run.len() {
                1 | 3 => format!("{run}{}", &run[..1]),
                _ => run.to_string(),
            }
        })
        .into_owned()
}

/// Prose listing of an object schema's properties, in schema order.
///
/// Each line reads `name: (description: .., type: .., required: ..)`.
/// Returns an empty string for non-object schemas.
pub fn describe_parameters(schema: &SchemaNode) -> String {
    let Some(object) = schema.as_object() else {
        return String::new();
    };

    object
        .properties
        .iter()
        .map(|property| {
            format!(
                "{}: (description: {}, type: {}, required: {})",
                property.name,
                property.description.as_deref().unwrap_or(""),
                property.schema.simplified_type(),
                object.is_required(&property.name),
            )
        })
        .collect::<Vec<_>>()
        .join(",\n ")
}

/// Tool description for string-input tools.
///
/// When the schema has properties the description is followed by a block
/// telling the model to send a stringified JSON object and listing the
/// expected properties.
pub fn fallback_tool_description(description: &str, schema: &SchemaNode) -> String {
    let count = schema.as_object().map(|o| o.properties.len()).unwrap_or(0);
    if count == 0 {
        return description.to_string();
    }

    format!(
        "{description}\n\
         Tool expects valid stringified JSON object with {count} properties.\n\
         Property names with description, type and required status:\n\
         {}\n\
         ALL parameters marked as required must be provided",
        describe_parameters(schema)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::schema::{ObjectSchema, Property};

    #[test]
    fn test_single_braces_are_doubled() {
        assert_eq!(escape_curly_braces("use {name}"), "use {{name}}");
        assert_eq!(escape_curly_braces("{"), "{{");
        assert_eq!(escape_curly_braces("a } b"), "a }} b");
    }

    #[test]
    fn test_doubled_braces_are_left_alone() {
        let escaped = "value is {{placeholder}}";
        assert_eq!(escape_curly_braces(escaped), escaped);
    }

    #[test]
    fn test_escaping_twice_does_not_redouble_pairs() {
        let once = escape_curly_braces("json {\"a\": 1} and {{kept}}");
        assert_eq!(once, "json {{\"a\": 1}} and {{kept}}");
        assert_eq!(escape_curly_braces(&once), once);
    }

    #[test]
    fn test_triple_braces_become_quadruple() {
        assert_eq!(escape_curly_braces("{{{x}}}"), "{{{{x}}}}");
        assert_eq!(escape_curly_braces("{{{{x}}}}"), "{{{{x}}}}");
    }

    #[test]
    fn test_text_without_braces_unchanged() {
        assert_eq!(escape_curly_braces("plain text"), "plain text");
        assert_eq!(escape_curly_braces(""), "");
    }

    fn weather_schema() -> SchemaNode {
        SchemaNode::Object(
            ObjectSchema::new()
                .property(
                    Property::new("city", SchemaNode::String).with_description("City name"),
                    true,
                )
                .property(
                    Property::new("days", SchemaNode::Nullable(Box::new(SchemaNode::Number))),
                    false,
                ),
        )
    }

    #[test]
    fn test_describe_parameters() {
        assert_eq!(
            describe_parameters(&weather_schema()),
            "city: (description: City name, type: string, required: true),\n \
             days: (description: , type: number, required: false)"
        );
        assert_eq!(describe_parameters(&SchemaNode::String), "");
    }

    #[test]
    fn test_fallback_tool_description() {
        let text = fallback_tool_description("Get the weather", &weather_schema());
        assert!(text.starts_with("Get the weather\nTool expects valid stringified JSON object with 2 properties."));
        assert!(text.contains("city: (description: City name"));
        assert!(text.ends_with("ALL parameters marked as required must be provided"));

        let empty = SchemaNode::Object(ObjectSchema::new());
        assert_eq!(fallback_tool_description("No params", &empty), "No params");
    }
}
