use std::path::Path;

use dcomatch_rank::{CancelToken, EditDistanceComparator, MemoryStore, RankOptions, Ranker};
use serde_json::Value;

fn sample_store() -> MemoryStore {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures/corpus/sample.json");
    MemoryStore::from_path(&path).expect("load sample corpus")
}

#[test]
fn rank_report_json_shape_contract() {
    let ranker = Ranker::new(
        sample_store(),
        EditDistanceComparator::default(),
        RankOptions::default(),
    )
    .expect("options");
    let source = ranker.store().article(101).cloned().expect("article 101");
    let report = ranker
        .rank_article(&source, &CancelToken::new())
        .expect("rank");
    let value = serde_json::to_value(&report).expect("serialize report");

    let obj = value.as_object().expect("report should be object");
    for key in ["word_count", "band", "matches", "stats"] {
        assert!(obj.contains_key(key), "missing report key {key}");
    }
    let stats = obj["stats"].as_object().expect("stats object");
    for key in ["fetched", "compared", "skipped", "comparison_failures", "elapsed_micros"] {
        assert!(stats.contains_key(key), "missing stats key {key}");
    }

    let matches = obj["matches"].as_array().expect("matches array");
    assert!(!matches.is_empty());
    for m in matches {
        let m = m.as_object().expect("match object");
        for key in [
            "similarity",
            "reordered",
            "article_number",
            "article_title",
            "first_paragraph",
            "category",
            "word_count",
            "order_id",
            "order_name",
            "year",
            "url",
        ] {
            assert!(m.contains_key(key), "missing match key {key}");
        }
        assert!(m["similarity"].is_f64());
        assert!(m["category"].is_string());
    }
}

#[test]
fn options_round_trip_through_json() {
    let options = RankOptions::default().with_parallel(true);
    let value = serde_json::to_value(&options).expect("serialize options");
    for key in [
        "bands",
        "length_ratio",
        "min_word_overlap",
        "min_similarity",
        "identical_min_paragraphs",
        "parallel",
        "pass_budget_ms",
        "align",
    ] {
        assert!(value.get(key).is_some(), "missing options key {key}");
    }
    assert!(
        value["align"]
            .get("reorder_margin")
            .and_then(Value::as_f64)
            .is_some()
    );
    let back: RankOptions = serde_json::from_value(value).expect("deserialize options");
    assert_eq!(back, options);
}
