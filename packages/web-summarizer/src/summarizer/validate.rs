//! Validation of untrusted generator output.
//!
//! The reply is treated as external input: it is parsed into a JSON object,
//! every required field is checked, and the result is normalized into a
//! [`StructuredSummary`] or rejected with a [`SchemaViolation`].

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::SchemaViolation;
use crate::extractor::collapse_whitespace;
use crate::types::request::SummaryOptions;
use crate::types::summary::{Category, StructuredSummary};

/// Parse and normalize a generator reply.
///
/// `source_text` is the text that was summarized; citations not found in it
/// are dropped.
pub fn parse_summary(
    raw: &str,
    source_text: &str,
    options: &SummaryOptions,
) -> Result<StructuredSummary, SchemaViolation> {
    let object = parse_object(raw)?;

    let summary = required_str(&object, "summary")?.trim().to_string();
    if summary.is_empty() {
        return Err(SchemaViolation::EmptySummary);
    }

    let mut key_points = key_points(&object)?;
    let requested = options.num_key_points as usize;
    if key_points.len() > requested {
        debug!(returned = key_points.len(), requested, "Trimming excess key points");
        key_points.truncate(requested);
    } else if key_points.len() < requested {
        warn!(
            returned = key_points.len(),
            requested,
            "Generator returned fewer key points than requested"
        );
    }

    let raw_category = required_str(&object, "category")?;
    let category = Category::coerce(raw_category);
    if category.as_str() != raw_category.trim() {
        debug!(raw = %raw_category, coerced = %category, "Coerced category");
    }

    let citations = if options.include_citations {
        Some(verbatim_citations(object.get("citations"), source_text))
    } else {
        None
    };

    let sentences = count_sentences(&summary);
    if sentences > options.max_summary_sentences as usize {
        warn!(
            sentences,
            limit = options.max_summary_sentences,
            "Summary exceeds requested sentence count"
        );
    }

    Ok(StructuredSummary {
        summary,
        key_points,
        citations,
        category,
    })
}

/// Locate the JSON object in a reply that may carry code fences or chatter.
pub fn json_span(raw: &str) -> &str {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    if unfenced.starts_with('{') && unfenced.ends_with('}') {
        return unfenced;
    }

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, SchemaViolation> {
    match serde_json::from_str::<Value>(json_span(raw)) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(SchemaViolation::InvalidJson(format!(
            "expected an object, got {}",
            type_name(&other)
        ))),
        Err(e) => Err(SchemaViolation::InvalidJson(e.to_string())),
    }
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, SchemaViolation> {
    match object.get(field) {
        None | Some(Value::Null) => Err(SchemaViolation::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(SchemaViolation::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn key_points(object: &Map<String, Value>) -> Result<Vec<String>, SchemaViolation> {
    let items = match object.get("key_points") {
        None | Some(Value::Null) => return Err(SchemaViolation::MissingField("key_points")),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(SchemaViolation::WrongType {
                field: "key_points",
                expected: "an array of strings",
            })
        }
    };

    let mut points = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(point) = item else {
            return Err(SchemaViolation::WrongType {
                field: "key_points",
                expected: "an array of strings",
            });
        };
        let point = point.trim();
        if !point.is_empty() {
            points.push(point.to_string());
        }
    }

    if points.is_empty() {
        return Err(SchemaViolation::NoKeyPoints);
    }
    Ok(points)
}

/// Keep only citations that appear in the source, ignoring case and spacing.
fn verbatim_citations(value: Option<&Value>, source_text: &str) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let haystack = collapse_whitespace(source_text).to_lowercase();
    let mut kept = Vec::new();
    for item in items {
        let Some(quote) = item.as_str() else {
            continue;
        };
        let quote = quote
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\u{201c}' || c == '\u{201d}');
        let needle = collapse_whitespace(quote).to_lowercase();
        if needle.is_empty() {
            continue;
        }
        if haystack.contains(&needle) {
            kept.push(quote.trim().to_string());
        } else {
            warn!(citation = %quote, "Dropping citation not found in source text");
        }
    }
    kept
}

fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
