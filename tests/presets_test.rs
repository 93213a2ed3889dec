use tracemap::filter::{filter_spans, FilterCriteria, MatchOperator, MatchResult};
use tracemap::presets::{builtin_presets, uuid_from_seed, PersistentData, SearchPreset};
use tracemap::types::StatusCode;

use test_helpers::*;

#[test]
fn test_uuid_from_seed_is_stable() {
    assert_eq!(uuid_from_seed("some seed"), uuid_from_seed("some seed"));
    assert_ne!(uuid_from_seed("some seed"), uuid_from_seed("other seed"));
}

#[test]
fn test_builtin_presets_are_deterministic() {
    let first = builtin_presets();
    let second = builtin_presets();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert!(first.iter().all(|preset| preset.is_builtin));
}

#[test]
fn test_preset_json_round_trip() {
    let preset = SearchPreset {
        id: uuid_from_seed("test:round-trip"),
        name: "My preset".to_string(),
        criteria: FilterCriteria {
            service_name: Some("svc".to_string()),
            from: Some("5ms".to_string()),
            tags: vec![tag_filter(
                Some("env"),
                Some("prod"),
                MatchOperator::EqualTo,
            )],
            ..FilterCriteria::default()
        },
        is_builtin: false,
    };

    let serialized = serde_json::to_string_pretty(&preset).unwrap();
    let deserialized: SearchPreset = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, preset);
}

#[test]
fn test_persistent_data_json_is_versioned_and_round_trips() {
    let json = serde_json::to_value(PersistentData::default()).unwrap();
    assert!(json.get("V1").is_some());

    let read_back: PersistentData = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(serde_json::to_value(read_back).unwrap(), json);
}

#[test]
fn test_error_spans_preset_finds_error_status() {
    let mut failed = make_span("failed", "", "svc", "op", 0, 100);
    failed.status_code = Some(StatusCode::Error);
    let healthy = make_span("healthy", "", "svc", "op", 0, 100);
    let spans = vec![failed, healthy];

    let presets = builtin_presets();
    let preset = presets
        .iter()
        .find(|preset| preset.name == "Error spans")
        .unwrap();

    match filter_spans(&preset.criteria, &spans) {
        MatchResult::Matched(ids) => {
            assert_eq!(ids.len(), 1);
            assert!(ids.contains("failed"));
        }
        MatchResult::Unfiltered => panic!("preset criteria should be active"),
    }
}

#[test]
fn test_error_tag_preset_checks_existence() {
    let mut tagged = make_span("tagged", "", "svc", "op", 0, 100);
    tagged.tags.push(bool_tag("error", true));
    let plain = make_span("plain", "", "svc", "op", 0, 100);
    let spans = vec![tagged, plain];

    let presets = builtin_presets();
    let preset = presets
        .iter()
        .find(|preset| preset.name == "Spans tagged error")
        .unwrap();

    let result = filter_spans(&preset.criteria, &spans);
    assert_eq!(result.matched_ids().map(|ids| ids.len()), Some(1));
    assert!(result.matched_ids().unwrap().contains("tagged"));
}
