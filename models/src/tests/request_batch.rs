use crate::request_batch::{JSON_REQUEST_KEY, SNAPSHOT_TIME_KEY};
use crate::{DataRequestBatch, ModelError};

use serde_json::{Value, json};

/// **VALUE**: Verifies that every item gets the configured snapshot time and order is kept.
///
/// **WHY THIS MATTERS**: The snapshot time fixes the as-of point of the data. An item
/// missing it (or keeping a stale one) would mix vintages inside a single forecast.
///
/// **BUG THIS CATCHES**: Would catch if stamping skipped items that already had a
/// value, or if items were reordered on the way to the request body.
#[test]
fn given_mixed_items_when_stamped_then_all_carry_timestamp_in_order() {
    // GIVEN: Items with no, empty, and stale snapshot times
    let document = json!([
        {"key": "US_GDP"},
        {"key": "US_CPI", "snapshot_time": ""},
        {"key": "US_RATE", "snapshot_time": "2020-01-01T00:00:00Z"}
    ]);
    let mut batch = DataRequestBatch::from_value(document).unwrap();

    // WHEN: Stamping
    batch.stamp_snapshot_time("2024-03-01T12:00:00Z");

    // THEN: All items carry the new timestamp, in the original order
    let body = batch.to_request_body();
    let items = body.as_array().unwrap();
    let keys: Vec<&str> = items.iter().map(|i| i["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["US_GDP", "US_CPI", "US_RATE"]);
    for item in items {
        assert_eq!(item[SNAPSHOT_TIME_KEY], "2024-03-01T12:00:00Z");
    }
}

#[test]
fn given_duplicate_items_when_loaded_then_not_deduplicated() {
    let document = json!([{"key": "A"}, {"key": "A"}]);

    let batch = DataRequestBatch::from_value(document).unwrap();

    assert_eq!(batch.len(), 2);
}

#[test]
fn given_settings_document_when_round_tripped_then_shape_and_members_preserved() {
    // GIVEN: A settings object wrapping the item array
    let document = json!({
        "report": "forecast",
        JSON_REQUEST_KEY: [{"key": "A", "snapshot_time": null}],
        "mapping": "us"
    });

    // WHEN: Loading, filling and writing back
    let mut batch = DataRequestBatch::from_value(document).unwrap();
    batch.fill_empty_snapshot_times("2024-01-01T00:00:00.000Z");
    let rebuilt = batch.into_document();

    // THEN: Same shape, same sibling members, same key order
    let keys: Vec<&String> = rebuilt.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["report", JSON_REQUEST_KEY, "mapping"]);
    assert_eq!(rebuilt["report"], "forecast");
    assert_eq!(
        rebuilt[JSON_REQUEST_KEY][0][SNAPSHOT_TIME_KEY],
        "2024-01-01T00:00:00.000Z"
    );
}

#[test]
fn given_items_without_snapshot_key_when_filling_then_left_alone() {
    // GIVEN: One item with a real value, one without the key, one null
    let mut batch = DataRequestBatch::from_value(json!([
        {"snapshot_time": "keep"},
        {"key": "no-field"},
        {"snapshot_time": null}
    ]))
    .unwrap();

    // WHEN: Filling
    batch.fill_empty_snapshot_times("now");

    // THEN: Only the blank one changes
    let items = batch.items();
    assert_eq!(items[0][SNAPSHOT_TIME_KEY], "keep");
    assert!(!items[1].contains_key(SNAPSHOT_TIME_KEY));
    assert_eq!(items[2][SNAPSHOT_TIME_KEY], "now");
}

#[test]
fn given_params_when_applied_then_every_item_overwritten() {
    let mut batch =
        DataRequestBatch::from_value(json!([{"freq": "M"}, {"freq": "Q", "x": 1}])).unwrap();
    let params = json!({"freq": "A", "snapshot_time": "t"});

    batch.apply_params(params.as_object().unwrap());

    for item in batch.items() {
        assert_eq!(item["freq"], "A");
        assert_eq!(item["snapshot_time"], "t");
    }
    assert_eq!(batch.items()[1]["x"], 1);
}

#[test]
fn given_invalid_documents_when_loaded_then_returns_validation_error() {
    let cases: Vec<Value> = vec![
        json!("a string"),
        json!([1, 2]),
        json!({"other": []}),
        json!({JSON_REQUEST_KEY: {"not": "an array"}}),
    ];

    for document in cases {
        let result = DataRequestBatch::from_value(document.clone());
        assert!(
            matches!(result, Err(ModelError::Validation { .. })),
            "Should reject {document}"
        );
    }
}
