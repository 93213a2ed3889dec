use std::collections::HashSet;

use crate::stats::find_trace_duration;
use crate::types::{Span, StatusCode};

/// Headline numbers for a loaded trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TraceSummary {
    pub span_count: usize,
    pub service_count: usize,
    /// Spans with an Error status code.
    pub error_count: usize,
    /// Microseconds between the earliest span start and the latest span end.
    pub duration: i64,
}

pub fn trace_summary(spans: &[Span]) -> TraceSummary {
    let mut services: HashSet<&str> = HashSet::new();
    let mut error_count = 0;
    for span in spans {
        services.insert(span.service_name.as_str());
        if span.status_code == Some(StatusCode::Error) {
            error_count += 1;
        }
    }

    TraceSummary {
        span_count: spans.len(),
        service_count: services.len(),
        error_count,
        duration: find_trace_duration(spans),
    }
}

/// Stores and calculates statistics for a collection of span durations.
#[derive(Debug, Clone)]
pub struct DurationStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub total: f64,
    pub data_points: Vec<f64>,
}

impl DurationStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            min: f64::MAX,
            max: f64::MIN,
            total: 0.0,
            data_points: Vec::new(),
        }
    }

    pub fn add_value(&mut self, value: f64) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.total += value;
        self.data_points.push(value);
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total / self.count as f64
    }

    pub fn median(&self) -> f64 {
        if self.data_points.is_empty() {
            return 0.0;
        }

        let mut sorted_values = self.data_points.clone();
        sorted_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mid = sorted_values.len() / 2;
        if sorted_values.len() % 2 == 0 {
            (sorted_values[mid - 1] + sorted_values[mid]) / 2.0
        } else {
            sorted_values[mid]
        }
    }
}

impl Default for DurationStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-trace duration statistics, milliseconds.
pub fn duration_stats(spans: &[Span]) -> DurationStats {
    let mut stats = DurationStats::new();
    for span in spans {
        stats.add_value(span.duration as f64 / 1000.0);
    }
    stats
}
