use std::collections::HashSet;

use crate::filter::{filter_spans, FilterCriteria, MatchResult};
use crate::types::Span;

/// Owns the current search criteria and span list, recomputes matches
/// whenever either is replaced, and tracks which match is focused for
/// prev/next navigation.
///
/// Matched ids are also kept as an ordered list following the span order of
/// the trace, navigation walks that list.
#[derive(Debug)]
pub struct SearchController {
    spans: Vec<Span>,
    criteria: FilterCriteria,
    matches: MatchResult,
    ordered_matches: Vec<String>,
    focused_index: Option<usize>,
}

impl SearchController {
    pub fn new(spans: Vec<Span>) -> SearchController {
        let mut controller = SearchController {
            spans,
            criteria: FilterCriteria::default(),
            matches: MatchResult::Unfiltered,
            ordered_matches: Vec::new(),
            focused_index: None,
        };
        controller.recompute();
        controller
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn matches(&self) -> &MatchResult {
        &self.matches
    }

    /// Matched span ids in trace order.
    pub fn ordered_matches(&self) -> &[String] {
        &self.ordered_matches
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused_index
    }

    pub fn focused_span_id(&self) -> Option<&str> {
        let index = self.focused_index?;
        self.ordered_matches.get(index).map(|id| id.as_str())
    }

    /// Replaces the criteria wholesale and recomputes. Focus is cleared, the
    /// old position is meaningless against a new match list.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    pub fn set_spans(&mut self, spans: Vec<Span>) {
        self.spans = spans;
        self.recompute();
    }

    /// Moves focus to the next match and returns its span id. Wraps around,
    /// with no focus or focus on the last match it goes to the first one.
    pub fn next_match(&mut self) -> Option<&str> {
        if self.ordered_matches.is_empty() {
            self.focused_index = None;
            return None;
        }
        let last = self.ordered_matches.len() - 1;
        let next = match self.focused_index {
            None => 0,
            Some(index) if index >= last => 0,
            Some(index) => index + 1,
        };
        self.focused_index = Some(next);
        Some(self.ordered_matches[next].as_str())
    }

    /// Moves focus to the previous match and returns its span id. Wraps
    /// around, with no focus or focus on the first match it goes to the last.
    pub fn prev_match(&mut self) -> Option<&str> {
        if self.ordered_matches.is_empty() {
            self.focused_index = None;
            return None;
        }
        let last = self.ordered_matches.len() - 1;
        let prev = match self.focused_index {
            None => last,
            Some(0) => last,
            Some(index) => index - 1,
        };
        self.focused_index = Some(prev);
        Some(self.ordered_matches[prev].as_str())
    }

    pub fn clear_focus(&mut self) {
        self.focused_index = None;
    }

    fn recompute(&mut self) {
        self.matches = filter_spans(&self.criteria, &self.spans);
        self.ordered_matches = match self.matches.matched_ids() {
            Some(ids) => {
                // Spans with duplicate ids would repeat in the ordered list,
                // keep the first occurrence only.
                let mut seen: HashSet<&str> = HashSet::new();
                let mut ordered = Vec::new();
                for span in &self.spans {
                    if ids.contains(&span.span_id) && seen.insert(span.span_id.as_str()) {
                        ordered.push(span.span_id.clone());
                    }
                }
                ordered
            }
            None => Vec::new(),
        };
        self.focused_index = None;
    }
}
