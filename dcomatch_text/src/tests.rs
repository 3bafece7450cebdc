use super::{
    Article, Category, Order, TokenKind, fold_paragraph, joined_len, paragraph_fingerprint,
    preprocess, text_fingerprint, tokenize, word_count,
};

fn order() -> Order {
    Order {
        id: 7,
        name: "The Example Offshore Wind Farm Order 2020".to_string(),
        year: Some(2020),
    }
}

#[test]
fn preprocess_normalizes_line_endings_and_drops_blanks() {
    let raw = "first\r\nsecond\rthird\n\n   \n  fourth  ";
    assert_eq!(preprocess(raw), vec!["first", "second", "third", "fourth"]);
}

#[test]
fn preprocess_keeps_numbering_prefixes() {
    let raw = "43.—(1) Nothing in this Order\n(a) belonging to His Majesty;\n(iv) a roman item\n";
    let paragraphs = preprocess(raw);
    assert_eq!(paragraphs[0], "43.—(1) Nothing in this Order");
    assert_eq!(paragraphs[1], "(a) belonging to His Majesty;");
    assert_eq!(paragraphs[2], "(iv) a roman item");
}

#[test]
fn preprocess_of_whitespace_only_is_empty() {
    assert!(preprocess(" \r\n\t\n").is_empty());
    assert!(preprocess("").is_empty());
}

#[test]
fn word_count_matches_joined_split() {
    let paragraphs = vec!["one  two".to_string(), "three".to_string()];
    assert_eq!(word_count(&paragraphs), 3);
    assert_eq!(word_count::<String>(&[]), 0);
}

#[test]
fn joined_len_counts_separators_and_chars() {
    assert_eq!(joined_len(&["ab", "cd"]), 5);
    assert_eq!(joined_len(&["é"]), 1);
    assert_eq!(joined_len::<&str>(&[]), 0);
}

#[test]
fn text_fingerprint_is_boundary_sensitive() {
    assert_ne!(text_fingerprint(&["ab", "c"]), text_fingerprint(&["a", "bc"]));
    assert_eq!(text_fingerprint(&["ab", "c"]), text_fingerprint(&["ab", "c"]));
    assert_eq!(paragraph_fingerprint("x"), paragraph_fingerprint("x"));
}

#[test]
fn fold_paragraph_ignores_case_and_padding() {
    assert_eq!(fold_paragraph("  The Undertaker "), "the undertaker");
}

#[test]
fn category_from_title_uses_first_matching_bucket() {
    assert_eq!(Category::from_title("Citation and commencement"), Category::Administrative);
    assert_eq!(Category::from_title("Street works"), Category::Infrastructure);
    assert_eq!(Category::from_title("Compulsory acquisition of land"), Category::Rights);
    assert_eq!(Category::from_title("Felling or lopping of trees"), Category::Environmental);
    assert_eq!(Category::from_title("Interpretation"), Category::Interpretation);
    assert_eq!(Category::from_title("Operation of generating station"), Category::Operation);
    assert_eq!(Category::from_title("Miscellaneous"), Category::Other);
}

#[test]
fn category_parses_case_insensitively() {
    assert_eq!("rights".parse::<Category>(), Ok(Category::Rights));
    assert_eq!(" Other ".parse::<Category>(), Ok(Category::Other));
    assert!("nonsense".parse::<Category>().is_err());
}

#[test]
fn category_serializes_as_display_name() {
    let json = serde_json::to_string(&Category::Environmental).expect("serialize");
    assert_eq!(json, "\"Environmental\"");
    assert_eq!(Category::default(), Category::Other);
}

#[test]
fn category_deserializes_like_from_str() {
    let parsed: Vec<Category> =
        serde_json::from_str(r#"["rights", "ENVIRONMENTAL", "Other"]"#).expect("categories");
    assert_eq!(
        parsed,
        vec![Category::Rights, Category::Environmental, Category::Other]
    );
    assert!(serde_json::from_str::<Category>(r#""nonsense""#).is_err());
}

#[test]
fn article_from_text_derives_fields() {
    let article = Article::from_text(
        1,
        "12",
        "Temporary stopping up of streets",
        None,
        "12.—(1) The undertaker may\n\n(2) Without limitation\n",
        order(),
    )
    .with_url("https://example.test/12");

    assert_eq!(article.paragraphs.len(), 2);
    assert_eq!(article.word_count, 7);
    assert_eq!(article.category, Category::Infrastructure);
    assert_eq!(article.first_paragraph(), "12.—(1) The undertaker may");
    assert_eq!(article.url.as_deref(), Some("https://example.test/12"));
}

#[test]
fn tokenize_splits_words_punctuation_and_newlines() {
    let stream = tokenize("(1) The  undertaker,\nmay", true);
    let texts = stream.tokens.iter().map(|t| t.text).collect::<Vec<_>>();
    assert_eq!(texts, vec!["(", "1", ")", "The", "undertaker", ",", "\n", "may"]);
    assert_eq!(stream.tokens[4].gap, "  ");
    assert_eq!(stream.tokens[6].kind, TokenKind::Newline);
}

#[test]
fn tokenize_without_newline_tokens_folds_them_into_gaps() {
    let stream = tokenize("a\r\nb ", false);
    assert_eq!(stream.tokens.len(), 2);
    assert_eq!(stream.tokens[1].gap, "\r\n");
    assert_eq!(stream.trailing, " ");
}

#[test]
fn tokenize_treats_crlf_as_one_token() {
    let stream = tokenize("a\r\nb", true);
    assert_eq!(stream.tokens[1].text, "\r\n");
    assert_eq!(stream.tokens.len(), 3);
}

#[test]
fn token_stream_renders_losslessly() {
    let input = "  Subject to paragraph (2),\r\n\tthe undertaker—may… ";
    assert_eq!(tokenize(input, true).render(), input);
    assert_eq!(tokenize(input, false).render(), input);
}
