//! Structured output recovery.
//!
//! Models asked for JSON frequently wrap it in prose or code fences. [`extract_json`]
//! picks the outermost delimiter span, parses it, and falls back to the raw text when
//! that fails. A miss is a normal return value, never an error.
//!
//! # Known limitation
//!
//! Spans are found by *first* opening and *last* closing delimiter, with no awareness
//! of string literals. A stray unmatched `{` or `[` inside prose or a quoted string
//! before the real payload moves the span start and the parse misses; the caller then
//! gets the raw text back. This is accepted rather than replaced by a full scanner.

use serde_json::Value;
use tracing::debug;
use wellspring_types::InferenceResult;

/// Wrapper keys unwrapped by default when they are an object's only field.
pub const DEFAULT_WRAPPER_KEYS: &[&str] = &["data", "result", "response"];

/// Outcome of JSON recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredOutput {
    /// Parsed payload plus the text it came from
    Json { value: Value, raw: String },
    /// No parseable payload; the original text, untouched
    Text(String),
}

impl StructuredOutput {
    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Json { value, .. } => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json { .. })
    }

    /// Fold into the result union: JSON on success, plain text on a miss.
    pub fn into_result(self) -> InferenceResult {
        match self {
            Self::Json { value, raw } => InferenceResult::Json { value, raw },
            Self::Text(text) => InferenceResult::text(text),
        }
    }
}

/// Recover JSON from `text` using [`DEFAULT_WRAPPER_KEYS`].
pub fn extract_json(text: &str) -> StructuredOutput {
    extract_json_with(text, DEFAULT_WRAPPER_KEYS)
}

/// Recover JSON from `text`, unwrapping a single-field object keyed by one of
/// `wrapper_keys`.
pub fn extract_json_with(text: &str, wrapper_keys: &[&str]) -> StructuredOutput {
    let Some((start, end)) = candidate_span(text) else {
        debug!(len = text.len(), "No JSON delimiters found, keeping raw text");
        return StructuredOutput::Text(text.to_string());
    };

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value) => StructuredOutput::Json {
            value: unwrap_wrapper(value, wrapper_keys),
            raw: text.to_string(),
        },
        Err(e) => {
            debug!(error = %e, "MALFORMED_RESPONSE recovered: JSON span did not parse, keeping raw text");
            StructuredOutput::Text(text.to_string())
        },
    }
}

/// Byte range (inclusive) of the chosen candidate.
///
/// Object span = first `{` .. last `}`; array span = first `[` .. last `]`. The span
/// whose opening delimiter comes first wins. The other candidate is never tried.
fn candidate_span(text: &str) -> Option<(usize, usize)> {
    let span = |open: char, close: char| -> Option<(usize, usize)> {
        let start = text.find(open)?;
        let end = text.rfind(close)?;
        (end > start).then_some((start, end))
    };

    match (span('{', '}'), span('[', ']')) {
        (Some(object), Some(array)) => Some(if array.0 < object.0 { array } else { object }),
        (object, array) => object.or(array),
    }
}

fn unwrap_wrapper(value: Value, wrapper_keys: &[&str]) -> Value {
    match value {
        Value::Object(map)
            if map.len() == 1 && map.keys().all(|k| wrapper_keys.contains(&k.as_str())) =>
        {
            map.into_iter().next().map_or(Value::Null, |(_, inner)| inner)
        },
        other => other,
    }
}
