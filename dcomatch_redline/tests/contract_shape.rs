use dcomatch_redline::{RedlineOptions, render_diff};
use serde_json::Value;

#[test]
fn redline_json_shape_contract() {
    let redline = render_diff(
        "The undertaker must consult the relevant planning authority.",
        "The undertaker must consult the local planning authority.",
        &RedlineOptions::default(),
    )
    .expect("render");
    let value = serde_json::to_value(&redline).expect("serialize redline");

    let obj = value.as_object().expect("redline should be object");
    for key in ["has_changes", "spans", "markup", "stats"] {
        assert!(obj.contains_key(key), "missing redline key {key}");
    }

    let spans = obj["spans"].as_array().expect("spans array");
    for span in spans {
        let span = span.as_object().expect("span object");
        assert_eq!(span.len(), 2);
        let tag = span.get("tag").and_then(Value::as_str).expect("tag");
        assert!(matches!(tag, "added" | "removed" | "unchanged"));
        assert!(span.get("value").and_then(Value::as_str).is_some());
    }

    let stats = obj["stats"].as_object().expect("stats object");
    assert_eq!(stats["added_words"], 1);
    assert_eq!(stats["removed_words"], 1);
}
