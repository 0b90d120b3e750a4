use polygon_api::types::{AggregateBar, AggregatesResponse};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_minute_aggregates() {
    let json = load_fixture("aggs_nvda_minute.json");
    let resp: AggregatesResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.ticker.as_deref(), Some("NVDA"));
    assert_eq!(resp.status.as_deref(), Some("OK"));
    assert_eq!(resp.results_count, Some(3));
    assert_eq!(
        resp.request_id.as_deref(),
        Some("6a7e466379af0a71039d60cc78e72282")
    );

    let bars = resp.bars();
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].timestamp_ms, Some(1_760_707_800_000));
    assert_eq!(bars[0].open, Some(181.05));
    assert_eq!(bars[0].high, Some(181.6));
    assert_eq!(bars[0].low, Some(180.91));
    assert_eq!(bars[0].close, Some(181.42));
    assert_eq!(bars[0].volume, Some(412_873.0));
}

#[test]
fn deserialize_volume_with_fraction_syntax() {
    let json = load_fixture("aggs_nvda_minute.json");
    let resp: AggregatesResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.bars()[1].volume, Some(201_554.0));
}

#[test]
fn deserialize_missing_results_is_empty() {
    let json = load_fixture("aggs_empty.json");
    let resp: AggregatesResponse = serde_json::from_str(&json).unwrap();
    assert!(resp.results.is_none());
    assert!(resp.bars().is_empty());
}

#[test]
fn deserialize_null_and_missing_bar_fields() {
    let json = load_fixture("aggs_partial_fields.json");
    let resp: AggregatesResponse = serde_json::from_str(&json).unwrap();
    let bars = resp.bars();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].volume, Some(95_001.0));
    assert_eq!(bars[0].close, Some(438.4));
    assert_eq!(bars[1].close, None);
}

#[test]
fn deserialize_null_results_is_empty() {
    let json = r#"{"status": "OK", "results": null}"#;
    let resp: AggregatesResponse = serde_json::from_str(json).unwrap();
    assert!(resp.bars().is_empty());
}

#[test]
fn deserialize_empty_bar_object() {
    let bar: AggregateBar = serde_json::from_str("{}").unwrap();
    assert_eq!(bar, AggregateBar::default());
}

#[test]
fn deserialize_malformed_json_returns_error() {
    let bad_json = r#"{"results": not valid json}"#;
    let result = serde_json::from_str::<AggregatesResponse>(bad_json);
    assert!(result.is_err());
}

#[test]
fn wrong_typed_field_reads_as_none() {
    let json = r#"{"results": [
        {"t": 1760707800000, "o": 10.0, "h": 11.0, "l": 9.5, "c": 10.5, "v": 1000},
        {"t": 1760707860000, "o": 10.5, "h": 11.2, "l": "n/a", "c": 11.0, "v": 1200, "n": 3.5, "vw": "x"}
    ]}"#;
    let resp: AggregatesResponse = serde_json::from_str(json).unwrap();
    let bars = resp.bars();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].low, Some(9.5));
    assert_eq!(bars[1].low, None);
    assert_eq!(bars[1].close, Some(11.0));
    assert_eq!(bars[1].volume, Some(1200.0));
}

#[test]
fn fractional_timestamp_reads_as_none() {
    let bar: AggregateBar = serde_json::from_str(r#"{"t": 1760707800000.5, "c": 1.0}"#).unwrap();
    assert_eq!(bar.timestamp_ms, None);
    assert_eq!(bar.close, Some(1.0));
}

#[test]
fn non_object_bar_returns_error() {
    let json = r#"{"results": [42]}"#;
    let result = serde_json::from_str::<AggregatesResponse>(json);
    assert!(result.is_err());
}
