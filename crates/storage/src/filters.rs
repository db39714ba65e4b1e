//! Filter and ordering translation for timeline slices.
//!
//! Callers filter slices with django-style kwargs (`activity_id__gte` and
//! friends) and order them with `activity_id` / `-activity_id`. This
//! module turns those into the score bounds and sort direction the
//! backend understands, rejecting everything else before any backend
//! call.

use fanout_core::{FeedError, Result};

/// The four accepted filter keys, in evaluation order.
pub const VALID_FILTER_KWARGS: [&str; 4] = [
    "activity_id__gte",
    "activity_id__lte",
    "activity_id__gt",
    "activity_id__lt",
];

/// A filter kwarg value. Only numeric values survive translation.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Integer bound.
    Int(i64),
    /// Float bound.
    Float(f64),
    /// Anything textual; always rejected.
    Text(String),
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Float(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

/// Backend-ready form of a slice query's filters and ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedQuery {
    /// Lower score bound as a filter string (`"5"` closed, `"(5"` open).
    pub min_score: Option<String>,
    /// Upper score bound, same encoding.
    pub max_score: Option<String>,
    /// Requested direction; None means the store default applies.
    pub sort_asc: Option<bool>,
}

/// Translate filter kwargs and ordering args to score bounds.
///
/// The interval specified by min/max is closed (inclusive) by default;
/// `__gt`/`__lt` produce an open (exclusive) interval by prefixing the
/// score with the `(` character. Unrecognized filter keys, non-numeric
/// values, unknown ordering values and multiple ordering args are all
/// fatal input errors.
pub fn translate_filters(
    filter_kwargs: &[(String, FilterValue)],
    ordering_args: &[String],
) -> Result<TranslatedQuery> {
    let mut pending: Vec<(&String, &FilterValue)> =
        filter_kwargs.iter().map(|(k, v)| (k, v)).collect();
    let mut translated = TranslatedQuery::default();

    for valid_key in VALID_FILTER_KWARGS {
        while let Some(pos) = pending.iter().position(|(k, _)| k.as_str() == valid_key) {
            let (key, value) = pending.remove(pos);
            let score = match value {
                FilterValue::Int(i) => i.to_string(),
                FilterValue::Float(f) => f.to_string(),
                FilterValue::Text(t) => {
                    return Err(FeedError::InvalidFilter(format!(
                        "filter kwarg values should be floats or ints, got {key}={t}"
                    )))
                }
            };

            let direction = key.rsplit("__").next().unwrap_or_default();
            let equal = direction.contains("te");
            let bound = if equal { score } else { format!("({score}") };
            if direction.starts_with("gt") {
                translated.min_score = Some(bound);
            } else {
                translated.max_score = Some(bound);
            }
        }
    }

    if !pending.is_empty() {
        let keys: Vec<&str> = pending.iter().map(|(k, _)| k.as_str()).collect();
        return Err(FeedError::InvalidFilter(format!(
            "unrecognized filter kwargs {keys:?}"
        )));
    }

    if ordering_args.len() > 1 {
        return Err(FeedError::InvalidOrdering(format!(
            "too many order kwargs {ordering_args:?}"
        )));
    }
    translated.sort_asc = match ordering_args.first().map(String::as_str) {
        None => None,
        Some("-activity_id") => Some(false),
        Some("activity_id") => Some(true),
        Some(other) => {
            return Err(FeedError::InvalidOrdering(format!(
                "unrecognized order kwargs [{other:?}]"
            )))
        }
    };

    Ok(translated)
}
