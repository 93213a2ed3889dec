//! Multi-criteria span filter used for search and highlighting.
//! Each active dimension (service name, operation name, duration bounds, tags) narrows the
//! result further, a span must pass every one of them. Tag filters look for a match across
//! span tags, process tags, log fields and a fixed set of intrinsic span attributes, any one
//! source is enough.

use std::collections::HashSet;

use uuid::Uuid;

use crate::types::{Span, Tag};

// Filter keys addressing intrinsic span attributes instead of tags.
pub const KIND: &str = "kind";
pub const STATUS: &str = "status";
pub const STATUS_MESSAGE: &str = "status.message";
pub const LIBRARY_NAME: &str = "library.name";
pub const LIBRARY_VERSION: &str = "library.version";
pub const TRACE_STATE: &str = "trace.state";
pub const ID: &str = "id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MatchOperator {
    /// Keep spans where the value equals the filter input
    #[default]
    EqualTo,
    /// Keep spans where the value differs from the filter input
    NotEqualTo,
}

impl std::fmt::Display for MatchOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOperator::EqualTo => write!(f, "="),
            MatchOperator::NotEqualTo => write!(f, "!="),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FromOperator {
    #[default]
    GreaterThan,
    GreaterOrEqual,
}

impl std::fmt::Display for FromOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FromOperator::GreaterThan => write!(f, ">"),
            FromOperator::GreaterOrEqual => write!(f, ">="),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ToOperator {
    #[default]
    LessThan,
    LessOrEqual,
}

impl std::fmt::Display for ToOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToOperator::LessThan => write!(f, "<"),
            ToOperator::LessOrEqual => write!(f, "<="),
        }
    }
}

/// One row of the tag criteria. `key` and `value` can be set independently:
/// key alone checks for existence of the key, value alone compares values of
/// any source regardless of key.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TagFilter {
    pub id: Uuid,
    pub key: Option<String>,
    pub value: Option<String>,
    pub operator: MatchOperator,
}

impl TagFilter {
    /// A fresh row with nothing filled in. Inactive until key or value is set.
    pub fn empty() -> TagFilter {
        TagFilter {
            id: Uuid::new_v4(),
            key: None,
            value: None,
            operator: MatchOperator::EqualTo,
        }
    }

    fn is_active(&self) -> bool {
        non_empty(&self.key).is_some() || non_empty(&self.value).is_some()
    }

    pub fn matches(&self, span: &Span) -> bool {
        let found = match (non_empty(&self.key), non_empty(&self.value)) {
            (Some(key), Some(value)) => key_value_found(span, key, value),
            (Some(key), None) => key_found(span, key),
            (None, Some(value)) => value_found(span, value),
            (None, None) => return true,
        };
        found == (self.operator == MatchOperator::EqualTo)
    }
}

/// Everything the span filter can constrain on. Empty fields and empty tag
/// rows leave their dimension unconstrained.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub service_name: Option<String>,
    pub service_name_operator: MatchOperator,
    pub span_name: Option<String>,
    pub span_name_operator: MatchOperator,
    /// Lower duration bound with a unit suffix, e.g. "10ms".
    pub from: Option<String>,
    pub from_operator: FromOperator,
    /// Upper duration bound with a unit suffix.
    pub to: Option<String>,
    pub to_operator: ToOperator,
    pub tags: Vec<TagFilter>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            service_name: None,
            service_name_operator: MatchOperator::EqualTo,
            span_name: None,
            span_name_operator: MatchOperator::EqualTo,
            from: None,
            from_operator: FromOperator::GreaterThan,
            to: None,
            to_operator: ToOperator::LessThan,
            tags: vec![TagFilter::empty()],
        }
    }
}

/// Outcome of a filter evaluation. No active dimension at all is distinct
/// from an active filter that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Unfiltered,
    Matched(HashSet<String>),
}

impl MatchResult {
    pub fn is_unfiltered(&self) -> bool {
        matches!(self, MatchResult::Unfiltered)
    }

    /// The matched span ids, `None` when no filter was active.
    pub fn matched_ids(&self) -> Option<&HashSet<String>> {
        match self {
            MatchResult::Unfiltered => None,
            MatchResult::Matched(ids) => Some(ids),
        }
    }
}

/// Evaluates `criteria` against `spans` and returns the ids of spans that
/// pass every active dimension. Spans are never modified.
pub fn filter_spans(criteria: &FilterCriteria, spans: &[Span]) -> MatchResult {
    #[cfg(feature = "profiling")]
    let _timing_guard = crate::profiling::GLOBAL_PROFILER.start_timing("filter_spans");

    let mut remaining: Vec<&Span> = spans.iter().collect();
    let mut filtered = false;

    if let Some(service_name) = non_empty(&criteria.service_name) {
        remaining.retain(|span| {
            (span.service_name == service_name)
                == (criteria.service_name_operator == MatchOperator::EqualTo)
        });
        filtered = true;
    }

    if let Some(span_name) = non_empty(&criteria.span_name) {
        remaining.retain(|span| {
            (span.operation_name == span_name)
                == (criteria.span_name_operator == MatchOperator::EqualTo)
        });
        filtered = true;
    }

    let from = parsed_duration_bound(&criteria.from);
    let to = parsed_duration_bound(&criteria.to);
    if from.is_some() || to.is_some() {
        remaining = duration_matches(
            remaining,
            from,
            criteria.from_operator,
            to,
            criteria.to_operator,
        );
        filtered = true;
    }

    let active_tags: Vec<&TagFilter> = criteria.tags.iter().filter(|tag| tag.is_active()).collect();
    if !active_tags.is_empty() {
        remaining.retain(|span| active_tags.iter().all(|tag| tag.matches(span)));
        filtered = true;
    }

    if !filtered {
        return MatchResult::Unfiltered;
    }
    MatchResult::Matched(
        remaining
            .into_iter()
            .map(|span| span.span_id.clone())
            .collect(),
    )
}

/// Parses a duration filter like "10ms" or "1.5s" into microseconds.
/// Returns `None` when no known unit suffix is present or the number in front
/// of it does not parse.
pub fn convert_time_filter(time: &str) -> Option<f64> {
    // Checked in order, so "ms" wins over "m" and "s".
    const TIME_UNITS: [(&str, f64); 7] = [
        ("ns", 1e-3),
        ("us", 1.0),
        ("µs", 1.0),
        ("ms", 1e3),
        ("s", 1e6),
        ("m", 6e7),
        ("h", 3.6e9),
    ];

    for (unit, to_micros) in TIME_UNITS {
        if time.contains(unit) {
            let number = time.split(unit).next().unwrap_or("").trim();
            return number.parse::<f64>().ok().map(|value| value * to_micros);
        }
    }
    None
}

// Zero and NaN bounds count as unset, same as an empty input box.
fn parsed_duration_bound(input: &Option<String>) -> Option<f64> {
    input
        .as_deref()
        .and_then(convert_time_filter)
        .filter(|micros| *micros != 0.0 && !micros.is_nan())
}

fn duration_matches<'a>(
    spans: Vec<&'a Span>,
    from: Option<f64>,
    from_operator: FromOperator,
    to: Option<f64>,
    to_operator: ToOperator,
) -> Vec<&'a Span> {
    let mut filtered: Vec<&Span> = Vec::new();
    if let Some(from) = from {
        filtered = spans
            .iter()
            .copied()
            .filter(|span| match from_operator {
                FromOperator::GreaterThan => (span.duration as f64) > from,
                FromOperator::GreaterOrEqual => (span.duration as f64) >= from,
            })
            .collect();
    }
    if let Some(to) = to {
        // The upper bound narrows the lower-bound subset when both are set,
        // without a lower bound it runs against the full input list.
        let base = if from.is_some() { filtered } else { spans };
        filtered = base
            .into_iter()
            .filter(|span| match to_operator {
                ToOperator::LessThan => (span.duration as f64) < to,
                ToOperator::LessOrEqual => (span.duration as f64) <= to,
            })
            .collect();
    }
    filtered
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn key_value_found(span: &Span, key: &str, value: &str) -> bool {
    let tag_matches = |tag: &Tag| tag.key == key && tag.value.to_string() == value;
    span.tags.iter().any(tag_matches)
        || span.process_tags.iter().any(tag_matches)
        || span
            .logs
            .iter()
            .any(|log| log.fields.iter().any(tag_matches))
        || intrinsic_key_value_found(span, key, value)
}

fn key_found(span: &Span, key: &str) -> bool {
    let tag_matches = |tag: &Tag| tag.key == key;
    span.tags.iter().any(tag_matches)
        || span.process_tags.iter().any(tag_matches)
        || span
            .logs
            .iter()
            .any(|log| log.fields.iter().any(tag_matches))
        || intrinsic_key_found(span, key)
}

fn value_found(span: &Span, value: &str) -> bool {
    let tag_matches = |tag: &Tag| tag.value.to_string() == value;
    span.tags.iter().any(tag_matches)
        || span.process_tags.iter().any(tag_matches)
        || span
            .logs
            .iter()
            .any(|log| log.fields.iter().any(tag_matches))
        || intrinsic_value_found(span, value)
}

fn intrinsic_key_value_found(span: &Span, key: &str, value: &str) -> bool {
    (key == KIND && span.kind.as_deref() == Some(value))
        || (key == LIBRARY_NAME && span.instrumentation_library_name.as_deref() == Some(value))
        || (key == LIBRARY_VERSION
            && span.instrumentation_library_version.as_deref() == Some(value))
        || (key == STATUS && span.status_code.is_some_and(|code| code.as_str() == value))
        || (key == STATUS_MESSAGE && span.status_message.as_deref() == Some(value))
        || (key == TRACE_STATE && span.trace_state.as_deref() == Some(value))
        || (key == ID && span.span_id == value)
}

// Existence of an intrinsic follows the same rule as the filter fields
// themselves, an empty string counts as not there. The status code is the
// exception, Unset is still a present status. The id always exists.
fn intrinsic_key_found(span: &Span, key: &str) -> bool {
    (key == KIND && non_empty(&span.kind).is_some())
        || (key == LIBRARY_NAME && non_empty(&span.instrumentation_library_name).is_some())
        || (key == LIBRARY_VERSION && non_empty(&span.instrumentation_library_version).is_some())
        || (key == STATUS && span.status_code.is_some())
        || (key == STATUS_MESSAGE && non_empty(&span.status_message).is_some())
        || (key == TRACE_STATE && non_empty(&span.trace_state).is_some())
        || key == ID
}

fn intrinsic_value_found(span: &Span, value: &str) -> bool {
    span.kind.as_deref() == Some(value)
        || span.instrumentation_library_name.as_deref() == Some(value)
        || span.instrumentation_library_version.as_deref() == Some(value)
        || span.status_code.is_some_and(|code| code.as_str() == value)
        || span.status_message.as_deref() == Some(value)
        || span.trace_state.as_deref() == Some(value)
        || span.span_id == value
}
