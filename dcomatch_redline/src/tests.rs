use dcomatch_text::tokenize;

use super::engine::{Op, compute_ops};
use super::{
    DiffSpan, RedlineError, RedlineOptions, SpanTag, format_markup, format_plain, render_diff,
    side_text,
};

fn spans_of(earlier: &str, later: &str) -> Vec<DiffSpan> {
    render_diff(earlier, later, &RedlineOptions::default())
        .expect("valid input")
        .spans
}

fn words(text: &str) -> Vec<String> {
    tokenize(text, true)
        .tokens
        .iter()
        .map(|t| t.text.to_string())
        .collect()
}

fn tagged(spans: &[DiffSpan], tag: SpanTag) -> Vec<&str> {
    spans
        .iter()
        .filter(|s| s.tag == tag)
        .map(|s| s.value.as_str())
        .collect()
}

#[test]
fn identical_text_is_one_unchanged_span() {
    let text = "Subject to paragraph (2), the undertaker may\n(a) enter land;\n";
    let spans = spans_of(text, text);
    assert_eq!(spans, vec![DiffSpan::new(SpanTag::Unchanged, text)]);
}

#[test]
fn inserted_clause_is_a_single_added_span() {
    let earlier = "The undertaker must consult the local authority before works begin.";
    let later = "The undertaker must consult the local authority and the Secretary of State before works begin.";

    let spans = spans_of(earlier, later);
    assert_eq!(tagged(&spans, SpanTag::Added), vec!["and the Secretary of State"]);
    assert!(tagged(&spans, SpanTag::Removed).is_empty());
    assert_eq!(side_text(&spans, SpanTag::Added), later);
}

#[test]
fn replaced_word_emits_removed_then_added() {
    let spans = spans_of("the old bridge", "the new bridge");
    assert_eq!(
        spans,
        vec![
            DiffSpan::new(SpanTag::Unchanged, "the "),
            DiffSpan::new(SpanTag::Removed, "old"),
            DiffSpan::new(SpanTag::Added, "new"),
            DiffSpan::new(SpanTag::Unchanged, " bridge"),
        ]
    );
}

#[test]
fn deleted_words_keep_earlier_spacing() {
    let spans = spans_of("works on the street and highway", "works on the highway");
    assert_eq!(tagged(&spans, SpanTag::Removed), vec!["street and"]);
    assert_eq!(
        side_text(&spans, SpanTag::Removed),
        "works on the street and highway"
    );
    assert_eq!(
        words(&side_text(&spans, SpanTag::Added)),
        words("works on the highway")
    );
}

#[test]
fn newline_tokens_keep_paragraph_structure() {
    let earlier = "(1) First.\n(2) Second.";
    let later = "(1) First.\n(2) Second.\n(3) Third.";
    let spans = spans_of(earlier, later);
    assert_eq!(tagged(&spans, SpanTag::Added), vec!["\n(3) Third."]);
}

#[test]
fn ignore_case_treats_case_changes_as_unchanged() {
    let options = RedlineOptions {
        ignore_case: true,
        ..RedlineOptions::default()
    };
    let redline = render_diff("The Undertaker", "the undertaker", &options).expect("valid");
    assert!(!redline.has_changes);
    assert_eq!(redline.spans.len(), 1);
}

#[test]
fn blank_inputs_are_rejected_with_field_name() {
    let options = RedlineOptions::default();
    assert_eq!(
        render_diff("  ", "text", &options),
        Err(RedlineError::Validation {
            field: "earlier_text"
        })
    );
    assert_eq!(
        render_diff("text", "", &options),
        Err(RedlineError::Validation {
            field: "later_text"
        })
    );
}

#[test]
fn stats_count_words_only() {
    let redline = render_diff("a, b.", "a, c.", &RedlineOptions::default()).expect("valid");
    assert_eq!(redline.stats.unchanged_words, 1);
    assert_eq!(redline.stats.removed_words, 1);
    assert_eq!(redline.stats.added_words, 1);
}

#[test]
fn markup_wraps_changes_and_escapes_text() {
    let spans = vec![
        DiffSpan::new(SpanTag::Unchanged, "a < b "),
        DiffSpan::new(SpanTag::Removed, "&"),
        DiffSpan::new(SpanTag::Added, "\"c\""),
    ];
    let html = format_markup(&spans);
    assert!(html.starts_with("<div class=\"LegSnippet\" style=\"white-space: pre-wrap;\">"));
    assert!(html.contains("a &lt; b "));
    assert!(html.contains("<span class=\"LegRepeal\""));
    assert!(html.contains(">&amp;</span>"));
    assert!(html.contains("<span class=\"LegAddition\""));
    assert!(html.contains(">&quot;c&quot;</span>"));
    assert!(html.ends_with("</div>"));
}

#[test]
fn plain_format_uses_word_diff_markers() {
    let spans = spans_of("the old bridge", "the new bridge");
    assert_eq!(format_plain(&spans), "the [-old-]{+new+} bridge");
}

#[test]
fn compute_ops_handles_empty_sides() {
    assert_eq!(compute_ops(&[], &[1, 2]), vec![Op::Insert, Op::Insert]);
    assert_eq!(compute_ops(&[1], &[]), vec![Op::Delete]);
    assert!(compute_ops(&[], &[]).is_empty());
}

#[test]
fn compute_ops_is_a_valid_edit_script() {
    let a = [1, 2, 3, 4, 5, 6];
    let b = [1, 9, 3, 4, 7, 6, 8];
    let ops = compute_ops(&a, &b);

    let mut i = 0;
    let mut j = 0;
    for op in &ops {
        match op {
            Op::Equal => {
                assert_eq!(a[i], b[j]);
                i += 1;
                j += 1;
            }
            Op::Delete => i += 1,
            Op::Insert => j += 1,
        }
    }
    assert_eq!((i, j), (a.len(), b.len()));
    let equal = ops.iter().filter(|op| **op == Op::Equal).count();
    assert_eq!(equal, 4);
}

#[test]
fn compute_ops_keeps_minimal_script_across_scattered_edits() {
    let a = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let b = [0, 1, 3, 4, 11, 6, 7, 12, 9, 10, 13];
    let ops = compute_ops(&a, &b);
    let equal = ops.iter().filter(|op| **op == Op::Equal).count();
    let deletes = ops.iter().filter(|op| **op == Op::Delete).count();
    let inserts = ops.iter().filter(|op| **op == Op::Insert).count();
    assert_eq!((equal, deletes, inserts), (7, 3, 4));
}

#[test]
fn long_unrelated_texts_diff_in_linear_space() {
    let earlier = (0..4000)
        .map(|i| format!("alpha{i}"))
        .collect::<Vec<_>>()
        .join(" ");
    let later = (0..4000)
        .map(|i| format!("beta{i}"))
        .collect::<Vec<_>>()
        .join(" ");

    let redline = render_diff(&earlier, &later, &RedlineOptions::default()).expect("valid");
    assert_eq!(redline.spans.len(), 2);
    assert_eq!(redline.spans[0], DiffSpan::new(SpanTag::Removed, earlier.as_str()));
    assert_eq!(redline.spans[1], DiffSpan::new(SpanTag::Added, later.as_str()));
    assert_eq!(redline.stats.removed_words, 4000);
    assert_eq!(redline.stats.added_words, 4000);
}
