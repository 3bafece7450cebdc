use dcomatch_redline::{RedlineOptions, SpanTag, diff_spans, side_text};
use dcomatch_text::tokenize;
use proptest::prelude::*;

const VOCAB: &[&str] = &[
    "the", "undertaker", "may", "(1)", "(a)", "land", "Order", "article", "must", "not", "works,",
    "highway;", "Secretary", "of", "State", "—", "consent.",
];

fn text_strategy() -> impl Strategy<Value = String> {
    let word = prop::sample::select(VOCAB.to_vec());
    let sep = prop::sample::select(vec![" ", " ", "  ", "\n", "\r\n", "\t", ""]);
    prop::collection::vec((word, sep), 1..40).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(word, sep)| format!("{word}{sep}"))
            .collect::<String>()
    })
}

fn stream(text: &str, newline_is_token: bool) -> Vec<String> {
    tokenize(text, newline_is_token)
        .tokens
        .iter()
        .map(|t| if t.text == "\r\n" { "\n".to_string() } else { t.text.to_string() })
        .collect()
}

proptest! {
    #[test]
    fn later_side_reconstructs_later_tokens(
        earlier in text_strategy(),
        later in text_strategy(),
        newline_is_token in any::<bool>(),
    ) {
        let options = RedlineOptions { newline_is_token, ignore_case: false };
        let (spans, _) = diff_spans(&earlier, &later, &options);
        let rebuilt = side_text(&spans, SpanTag::Added);
        prop_assert_eq!(stream(&rebuilt, newline_is_token), stream(&later, newline_is_token));
    }

    #[test]
    fn earlier_side_reconstructs_earlier_tokens(
        earlier in text_strategy(),
        later in text_strategy(),
        newline_is_token in any::<bool>(),
    ) {
        let options = RedlineOptions { newline_is_token, ignore_case: false };
        let (spans, _) = diff_spans(&earlier, &later, &options);
        let rebuilt = side_text(&spans, SpanTag::Removed);
        prop_assert_eq!(stream(&rebuilt, newline_is_token), stream(&earlier, newline_is_token));
    }

    #[test]
    fn self_diff_is_a_single_unchanged_span(text in text_strategy()) {
        let (spans, stats) = diff_spans(&text, &text, &RedlineOptions::default());
        prop_assert_eq!(spans.len(), 1);
        prop_assert_eq!(spans[0].tag, SpanTag::Unchanged);
        prop_assert_eq!(&spans[0].value, &text);
        prop_assert_eq!(stats.added_words + stats.removed_words, 0);
    }

    #[test]
    fn adjacent_spans_never_share_a_tag(earlier in text_strategy(), later in text_strategy()) {
        let (spans, _) = diff_spans(&earlier, &later, &RedlineOptions::default());
        prop_assert!(spans.windows(2).all(|w| w[0].tag != w[1].tag));
        prop_assert!(spans.iter().all(|s| !s.value.is_empty()));
    }
}
