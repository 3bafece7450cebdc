use xxhash_rust::xxh3::xxh3_64;

/// Split raw article text into trimmed, non-empty paragraphs.
///
/// Line endings (`\r\n`, lone `\r`) are folded to `\n` first. Numbering such
/// as `(1)`, `(a)` or `43.—(1)` stays part of the paragraph text.
pub fn preprocess(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0usize;

    while start < raw.len() {
        let next_break = raw[start..]
            .find(['\n', '\r'])
            .map(|idx| start + idx);
        let (segment, next_start) = match next_break {
            Some(idx) => (&raw[start..idx], idx + line_ending_len(&raw[idx..])),
            None => (&raw[start..], raw.len()),
        };

        let trimmed = segment.trim();
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
        start = next_start;
    }

    out
}

fn line_ending_len(rest: &str) -> usize {
    if rest.starts_with("\r\n") { 2 } else { 1 }
}

/// Count whitespace-separated words across all paragraphs.
pub fn word_count<S: AsRef<str>>(paragraphs: &[S]) -> usize {
    paragraphs
        .iter()
        .map(|p| p.as_ref().split_whitespace().count())
        .sum()
}

/// Character length of the paragraphs joined by single spaces.
pub fn joined_len<S: AsRef<str>>(paragraphs: &[S]) -> usize {
    let chars = paragraphs
        .iter()
        .map(|p| p.as_ref().chars().count())
        .sum::<usize>();
    chars + paragraphs.len().saturating_sub(1)
}

/// Paragraphs joined by single spaces.
pub fn join_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stable 64-bit identity of one paragraph's exact text.
pub fn paragraph_fingerprint(paragraph: &str) -> u64 {
    xxh3_64(paragraph.as_bytes())
}

/// Stable 64-bit identity of a whole paragraph sequence.
///
/// Paragraphs are length-prefixed so that `["ab", "c"]` and `["a", "bc"]`
/// hash differently.
pub fn text_fingerprint<S: AsRef<str>>(paragraphs: &[S]) -> u64 {
    let mut canonical = String::new();
    for p in paragraphs {
        let p = p.as_ref();
        canonical.push_str(&p.len().to_string());
        canonical.push(':');
        canonical.push_str(p);
    }
    xxh3_64(canonical.as_bytes())
}

/// Lowercased, trimmed paragraph used for identical-paragraph matching.
pub fn fold_paragraph(paragraph: &str) -> String {
    paragraph.trim().to_lowercase()
}
