use std::fs;
use std::path::Path;

use dcomatch_rank::{EditDistanceComparator, MemoryStore, RankOptions, Ranker};
use dcomatch_redline::{RedlineOptions, SpanTag, render_diff};
use dcomatch_text::Category;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Fixture {
    Rank {
        name: String,
        corpus: serde_json::Value,
        source: String,
        #[serde(default)]
        category: Option<Category>,
        #[serde(default)]
        options: RankOptions,
        expected: ExpectedRank,
    },
    Diff {
        name: String,
        earlier: String,
        later: String,
        #[serde(default)]
        options: RedlineOptions,
        expected: ExpectedDiff,
    },
}

#[derive(Debug, Deserialize)]
struct ExpectedRank {
    order_ids: Vec<i64>,
    #[serde(default)]
    reordered: Option<Vec<bool>>,
    #[serde(default)]
    min_top_similarity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ExpectedDiff {
    has_changes: bool,
    tags: Vec<SpanTag>,
    #[serde(default)]
    added: Option<Vec<String>>,
    #[serde(default)]
    removed: Option<Vec<String>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let fixtures_dir = repo_root.join("fixtures");

    let mut entries = fs::read_dir(&fixtures_dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.path());

    let mut checked = 0usize;
    for entry in entries {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str::<Fixture>(&raw)? {
            Fixture::Rank {
                name,
                corpus,
                source,
                category,
                options,
                expected,
            } => replay_rank(&name, &corpus, &source, category, options, &expected)?,
            Fixture::Diff {
                name,
                earlier,
                later,
                options,
                expected,
            } => replay_diff(&name, &earlier, &later, &options, &expected)?,
        }

        checked += 1;
    }

    println!("replayed {checked} fixture(s)");
    Ok(())
}

fn replay_rank(
    name: &str,
    corpus: &serde_json::Value,
    source: &str,
    category: Option<Category>,
    options: RankOptions,
    expected: &ExpectedRank,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::from_json_str(&corpus.to_string())?;
    let comparator = EditDistanceComparator::new(options.align);
    let ranker = Ranker::new(store, comparator, options)?;
    let matches = ranker.rank(source, category)?;

    let order_ids = matches.iter().map(|m| m.order_id).collect::<Vec<_>>();
    if order_ids != expected.order_ids {
        return Err(format!(
            "fixture {name}: order_ids mismatch: expected {:?}, got {:?}",
            expected.order_ids, order_ids
        )
        .into());
    }

    if let Some(want) = &expected.reordered {
        let got = matches.iter().map(|m| m.reordered).collect::<Vec<_>>();
        if &got != want {
            return Err(format!(
                "fixture {name}: reordered mismatch: expected {want:?}, got {got:?}"
            )
            .into());
        }
    }

    if let (Some(min), Some(top)) = (expected.min_top_similarity, matches.first()) {
        if top.similarity < min {
            return Err(format!(
                "fixture {name}: top similarity {} below {min}",
                top.similarity
            )
            .into());
        }
    }
    Ok(())
}

fn replay_diff(
    name: &str,
    earlier: &str,
    later: &str,
    options: &RedlineOptions,
    expected: &ExpectedDiff,
) -> Result<(), Box<dyn std::error::Error>> {
    let redline = render_diff(earlier, later, options)?;

    if redline.has_changes != expected.has_changes {
        return Err(format!(
            "fixture {name}: has_changes mismatch: expected {}, got {}",
            expected.has_changes, redline.has_changes
        )
        .into());
    }

    let tags = redline.spans.iter().map(|s| s.tag).collect::<Vec<_>>();
    if tags != expected.tags {
        return Err(format!(
            "fixture {name}: tags mismatch: expected {:?}, got {:?}",
            expected.tags, tags
        )
        .into());
    }

    for (tag, want) in [
        (SpanTag::Added, &expected.added),
        (SpanTag::Removed, &expected.removed),
    ] {
        let Some(want) = want else { continue };
        let got = redline
            .spans
            .iter()
            .filter(|s| s.tag == tag)
            .map(|s| s.value.clone())
            .collect::<Vec<_>>();
        if &got != want {
            return Err(format!(
                "fixture {name}: {tag:?} values mismatch: expected {want:?}, got {got:?}"
            )
            .into());
        }
    }
    Ok(())
}
