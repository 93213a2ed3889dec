use std::collections::HashMap;

use crate::types::GraphSpan;

/// One entry per span id seen anywhere in the trace.
///
/// `span` is `None` for ids that were only ever referenced as a parent and
/// never supplied themselves. `children` holds the ids of direct children in
/// the order their spans were yielded.
#[derive(Debug)]
pub struct SpanMapEntry<'a, S> {
    pub span: Option<&'a S>,
    pub children: Vec<String>,
}

impl<S> SpanMapEntry<'_, S> {
    fn placeholder() -> Self {
        SpanMapEntry {
            span: None,
            children: Vec::new(),
        }
    }
}

pub type SpanMap<'a, S> = HashMap<String, SpanMapEntry<'a, S>>;

/// Builds the id to entry mapping by calling `next` with 0, 1, 2, ... until it
/// returns `None`.
///
/// Never fails. Missing parents become placeholder entries. If two spans share
/// an id the later one keeps the payload while children recorded under the
/// earlier one stay attached.
pub fn make_span_map<'a, S, F>(mut next: F) -> SpanMap<'a, S>
where
    S: GraphSpan,
    F: FnMut(usize) -> Option<&'a S>,
{
    let mut span_map: SpanMap<'a, S> = HashMap::new();

    let mut index = 0;
    while let Some(span) = next(index) {
        index += 1;

        let entry = span_map
            .entry(span.span_id().to_string())
            .or_insert_with(SpanMapEntry::placeholder);
        entry.span = Some(span);

        for parent_id in span.parent_ids() {
            if parent_id.is_empty() {
                continue;
            }
            span_map
                .entry(parent_id.clone())
                .or_insert_with(SpanMapEntry::placeholder)
                .children
                .push(span.span_id().to_string());
        }
    }

    span_map
}
