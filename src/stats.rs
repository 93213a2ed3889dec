use crate::intervals::non_overlapping_duration;
use crate::span_map::SpanMap;
use crate::types::GraphSpan;

/// Time between the earliest span start and the latest span end, microseconds.
/// Considers every span in the list, not just roots. Empty list is 0.
pub fn find_trace_duration<S: GraphSpan>(spans: &[S]) -> i64 {
    if spans.is_empty() {
        return 0;
    }

    let mut min_start = i64::MAX;
    let mut max_end = i64::MIN;
    for span in spans {
        min_start = min_start.min(span.start_time());
        max_end = max_end.max(span.start_time() + span.duration());
    }
    max_end - min_start
}

/// Time covered by the direct children of `span`, with overlap between
/// children counted once. Children without a span payload are skipped.
pub fn children_duration<S: GraphSpan>(span: &S, span_map: &SpanMap<'_, S>) -> i64 {
    let Some(entry) = span_map.get(span.span_id()) else {
        return 0;
    };

    let ranges: Vec<(i64, i64)> = entry
        .children
        .iter()
        .filter_map(|child_id| span_map.get(child_id))
        .filter_map(|child_entry| child_entry.span)
        .map(|child| (child.start_time(), child.start_time() + child.duration()))
        .collect();
    non_overlapping_duration(ranges)
}

/// Formatted per-span statistics shown on a graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanStats {
    /// Total time, with its share of the trace duration.
    pub main: String,
    /// Self time, with its share of the span's own duration.
    pub secondary: String,
}

/// All inputs are milliseconds. Division by zero is not guarded, a zero
/// trace or span duration shows up as `NaN%` or `Infinity%`.
pub fn get_stats(duration: f64, trace_duration: f64, self_duration: f64) -> SpanStats {
    SpanStats {
        main: format!(
            "{}ms ({}%)",
            to_fixed_no_trailing_zeros(duration),
            to_fixed_no_trailing_zeros(duration / trace_duration * 100.0)
        ),
        secondary: format!(
            "{}ms ({}%)",
            to_fixed_no_trailing_zeros(self_duration),
            to_fixed_no_trailing_zeros(self_duration / duration * 100.0)
        ),
    }
}

/// Rounds to two decimal places and drops trailing zeros: "14.98", "100",
/// "0.02". NaN and infinities pass through as "NaN"/"Infinity"/"-Infinity".
pub fn to_fixed_no_trailing_zeros(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Also normalizes -0.0.
        return "0".to_string();
    }
    format!("{}", rounded)
}
