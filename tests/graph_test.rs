use approx::assert_abs_diff_eq;

use tracemap::graph::{create_graph_frames, GraphEdge};
use tracemap::span_map::make_span_map;
use tracemap::stats::{find_trace_duration, get_stats, to_fixed_no_trailing_zeros};
use tracemap::types::Span;

use test_helpers::*;

#[test]
fn test_span_map_links_children_to_parents() {
    let spans = vec![
        make_span("parent", "", "svc", "op", 0, 100),
        make_span("child_a", "parent", "svc", "op", 0, 10),
        make_span("child_b", "parent", "svc", "op", 20, 10),
    ];
    let span_map = make_span_map(|index| spans.get(index));

    assert_eq!(span_map.len(), 3);
    let parent = &span_map["parent"];
    assert!(parent.span.is_some());
    assert_eq!(parent.children, vec!["child_a", "child_b"]);
    assert!(span_map["child_a"].children.is_empty());
}

#[test]
fn test_missing_parent_becomes_placeholder() {
    let spans = vec![make_span("b", "a", "svc", "op", 0, 10)];
    let span_map = make_span_map(|index| spans.get(index));

    assert_eq!(span_map.len(), 2);
    let placeholder = &span_map["a"];
    assert!(placeholder.span.is_none());
    assert_eq!(placeholder.children, vec!["b"]);
}

#[test]
fn test_children_keep_encounter_order() {
    // The parent arriving in the middle must not disturb the order.
    let spans = vec![
        make_span("c1", "p", "svc", "op", 0, 1),
        make_span("c2", "p", "svc", "op", 1, 1),
        make_span("p", "", "svc", "op", 0, 10),
        make_span("c3", "p", "svc", "op", 2, 1),
    ];
    let span_map = make_span_map(|index| spans.get(index));

    assert_eq!(span_map["p"].children, vec!["c1", "c2", "c3"]);
    assert!(span_map["p"].span.is_some());
}

#[test]
fn test_empty_parent_ids_are_skipped() {
    let mut root = make_span("root", "", "svc", "op", 0, 10);
    root.parent_ids = vec![String::new()];
    let spans = vec![root];
    let span_map = make_span_map(|index| spans.get(index));

    assert_eq!(span_map.len(), 1);
    assert!(span_map["root"].children.is_empty());
}

#[test]
fn test_duplicate_id_keeps_children_and_last_payload() {
    let spans = vec![
        make_span("child", "dup", "svc", "op", 0, 1),
        make_span("dup", "", "svc", "first", 0, 10),
        make_span("dup", "", "svc", "second", 5, 10),
    ];
    let span_map = make_span_map(|index| spans.get(index));

    let dup = &span_map["dup"];
    assert_eq!(dup.children, vec!["child"]);
    assert_eq!(
        dup.span.map(|span| span.operation_name.as_str()),
        Some("second")
    );
}

#[test]
fn test_trace_duration_spans_the_extremes() {
    let spans = vec![
        make_span("1", "", "svc", "op", 10_000, 5_000),
        make_span("2", "", "svc", "op", 30_000, 20_000),
        make_span("3", "", "svc", "op", 12_000, 1_000),
    ];
    assert_eq!(find_trace_duration(&spans), 40_000);
}

#[test]
fn test_trace_duration_of_empty_trace_is_zero() {
    assert_eq!(find_trace_duration::<Span>(&[]), 0);
}

#[test]
fn test_stat_number_formatting() {
    assert_eq!(to_fixed_no_trailing_zeros(14.984), "14.98");
    assert_eq!(to_fixed_no_trailing_zeros(100.0), "100");
    assert_eq!(to_fixed_no_trailing_zeros(0.019), "0.02");
    assert_eq!(to_fixed_no_trailing_zeros(0.0), "0");
    assert_eq!(to_fixed_no_trailing_zeros(-0.001), "0");
    assert_eq!(to_fixed_no_trailing_zeros(2.5), "2.5");
    assert_eq!(to_fixed_no_trailing_zeros(-3.456), "-3.46");
    assert_eq!(to_fixed_no_trailing_zeros(f64::NAN), "NaN");
    assert_eq!(to_fixed_no_trailing_zeros(f64::INFINITY), "Infinity");
    assert_eq!(to_fixed_no_trailing_zeros(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn test_get_stats_strings() {
    let stats = get_stats(100.0, 100.0, 60.0);
    assert_eq!(stats.main, "100ms (100%)");
    assert_eq!(stats.secondary, "60ms (60%)");

    let stats = get_stats(14.984, 120.0, 7.5);
    assert_eq!(stats.main, "14.98ms (12.49%)");
    assert_eq!(stats.secondary, "7.5ms (50.05%)");

    // Zero trace duration surfaces as Infinity, zero span duration as NaN.
    let stats = get_stats(10.0, 0.0, 10.0);
    assert_eq!(stats.main, "10ms (Infinity%)");
    let stats = get_stats(0.0, 100.0, 0.0);
    assert_eq!(stats.secondary, "0ms (NaN%)");
}

#[test]
fn test_two_span_trace_builds_expected_frames() {
    let frames = create_graph_frames(&root_child_trace());

    assert_eq!(frames.nodes.len(), 2);
    let root = &frames.nodes[0];
    assert_eq!(root.id, "1");
    assert_eq!(root.title, "service_a");
    assert_eq!(root.sub_title, "root");
    assert_eq!(root.main_stat, "100ms (100%)");
    assert_eq!(root.secondary_stat, "60ms (60%)");
    assert_abs_diff_eq!(root.color, 0.6);

    let child = &frames.nodes[1];
    assert_eq!(child.id, "2");
    assert_eq!(child.title, "service_b");
    assert_eq!(child.sub_title, "child");
    assert_eq!(child.main_stat, "40ms (40%)");
    assert_eq!(child.secondary_stat, "40ms (100%)");
    assert_abs_diff_eq!(child.color, 0.4);

    assert_eq!(
        frames.edges,
        vec![GraphEdge {
            id: "1--2".to_string(),
            source: "1".to_string(),
            target: "2".to_string(),
        }]
    );
}

#[test]
fn test_dangling_parent_gets_no_node_and_no_edge() {
    let spans = vec![make_span("b", "a", "svc_b", "op_b", 0, 10_000)];
    let frames = create_graph_frames(&spans);

    assert_eq!(frames.nodes.len(), 1);
    assert_eq!(frames.nodes[0].id, "b");
    assert!(frames.edges.is_empty());
}

#[test]
fn test_rebuilding_frames_gives_identical_output() {
    let spans = root_child_trace();
    assert_eq!(create_graph_frames(&spans), create_graph_frames(&spans));
}

#[test]
fn test_self_time_counts_overlapping_children_once() {
    let spans = vec![
        make_span("parent", "", "svc", "op", 0, 100_000),
        make_span("c1", "parent", "svc", "op", 0, 60_000),
        make_span("c2", "parent", "svc", "op", 50_000, 40_000),
    ];
    let frames = create_graph_frames(&spans);

    // The children cover 0..90ms once merged, the parent keeps 10ms of self time.
    assert_eq!(frames.nodes[0].secondary_stat, "10ms (10%)");
}

#[test]
fn test_negative_self_time_passes_through() {
    let spans = vec![
        make_span("parent", "", "svc", "op", 0, 50_000),
        make_span("child", "parent", "svc", "op", 0, 80_000),
    ];
    let frames = create_graph_frames(&spans);

    assert_eq!(frames.nodes[0].secondary_stat, "-30ms (-60%)");
}

#[test]
fn test_node_rows_serialize_with_camel_case_columns() {
    let frames = create_graph_frames(&root_child_trace());

    let json = serde_json::to_value(&frames.nodes[0]).unwrap();
    let object = json.as_object().unwrap();
    for column in ["id", "title", "subTitle", "mainStat", "secondaryStat", "color"] {
        assert!(object.contains_key(column), "missing column {}", column);
    }
    assert_eq!(object.len(), 6);
    assert_eq!(object["subTitle"], "root");
}
