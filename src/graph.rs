use crate::span_map::make_span_map;
use crate::stats::{children_duration, find_trace_duration, get_stats};
use crate::task_timer::TaskTimer;
use crate::types::GraphSpan;

/// One row of the nodes table consumed by an external graph renderer.
/// Serialized field names are part of the contract with that renderer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    /// Service name.
    pub title: String,
    /// Operation name.
    pub sub_title: String,
    /// Total time and its share of the trace duration.
    pub main_stat: String,
    /// Self time and its share of the span's own duration.
    pub secondary_stat: String,
    /// Self duration over trace duration.
    pub color: f64,
}

/// One row of the edges table, a parent to child call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphFrames {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Turns a flat span list into node and edge tables.
///
/// Every supplied span gets a node, in input order. An edge is added only for
/// a span whose first parent reference points to a span that is itself
/// present in the list, dangling references get neither a node nor an edge.
pub fn create_graph_frames<S: GraphSpan>(spans: &[S]) -> GraphFrames {
    let timer = TaskTimer::new("Building graph frames");
    #[cfg(feature = "profiling")]
    let _timing_guard = crate::profiling::GLOBAL_PROFILER.start_timing("create_graph_frames");

    let trace_duration = find_trace_duration(spans);
    let span_map = make_span_map(|index| spans.get(index));

    let mut frames = GraphFrames::default();
    for span in spans {
        let self_duration = span.duration() - children_duration(span, &span_map);
        let stats = get_stats(
            span.duration() as f64 / 1000.0,
            trace_duration as f64 / 1000.0,
            self_duration as f64 / 1000.0,
        );

        frames.nodes.push(GraphNode {
            id: span.span_id().to_string(),
            title: span.service_name().to_string(),
            sub_title: span.operation_name().to_string(),
            main_stat: stats.main,
            secondary_stat: stats.secondary,
            color: self_duration as f64 / trace_duration as f64,
        });

        let Some(parent_id) = span.parent_ids().first() else {
            continue;
        };
        if parent_id.is_empty() {
            continue;
        }
        let parent_has_span = span_map
            .get(parent_id)
            .is_some_and(|entry| entry.span.is_some());
        if parent_has_span {
            frames.edges.push(GraphEdge {
                id: format!("{}--{}", parent_id, span.span_id()),
                source: parent_id.clone(),
                target: span.span_id().to_string(),
            });
        }
    }

    timer.stop_with_count(spans.len());
    frames
}
