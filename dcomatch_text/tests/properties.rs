use dcomatch_text::{preprocess, tokenize, word_count};
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    let line = prop::string::string_regex("[ -~\t]{0,40}").expect("valid regex");
    let ending = prop::sample::select(vec!["\n", "\r\n", "\r", "\n\n"]);
    prop::collection::vec((line, ending), 0..30).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(line, ending)| format!("{line}{ending}"))
            .collect::<String>()
    })
}

proptest! {
    #[test]
    fn preprocess_never_yields_empty_paragraphs(input in text_strategy()) {
        let paragraphs = preprocess(&input);
        prop_assert!(paragraphs.iter().all(|p| !p.is_empty()));
        prop_assert!(paragraphs.iter().all(|p| p.trim() == p));
    }

    #[test]
    fn preprocess_preserves_relative_order(input in text_strategy()) {
        let expected = input
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        prop_assert_eq!(preprocess(&input), expected);
    }

    #[test]
    fn word_count_is_permutation_invariant(input in text_strategy(), seed in any::<u64>()) {
        let paragraphs = preprocess(&input);
        let mut shuffled = paragraphs.clone();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }
        prop_assert_eq!(word_count(&paragraphs), word_count(&shuffled));
    }

    #[test]
    fn word_count_grows_with_added_word(input in text_strategy()) {
        let mut paragraphs = preprocess(&input);
        let before = word_count(&paragraphs);
        paragraphs.push("extra".to_string());
        prop_assert_eq!(word_count(&paragraphs), before + 1);
    }

    #[test]
    fn tokenize_round_trips(input in text_strategy(), newline_is_token in any::<bool>()) {
        prop_assert_eq!(tokenize(&input, newline_is_token).render(), input);
    }
}
