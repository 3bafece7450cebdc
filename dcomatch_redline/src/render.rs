use crate::model::{DiffSpan, SpanTag};

const SNIPPET_OPEN: &str = r#"<div class="LegSnippet" style="white-space: pre-wrap;">"#;
const ADDITION_OPEN: &str = r#"<span class="LegAddition" style="background-color: #e6ffe6;">"#;
const REPEAL_OPEN: &str =
    r#"<span class="LegRepeal" style="background-color: #ffe6e6; text-decoration: line-through;">"#;

/// Serialize spans as an HTML fragment.
///
/// Added and removed spans are wrapped in styled `<span>` elements,
/// unchanged text is emitted bare. The wrapper keeps whitespace verbatim.
pub fn format_markup(spans: &[DiffSpan]) -> String {
    let mut out = String::from(SNIPPET_OPEN);
    for span in spans {
        match span.tag {
            SpanTag::Added => {
                out.push_str(ADDITION_OPEN);
                push_escaped(&mut out, &span.value);
                out.push_str("</span>");
            }
            SpanTag::Removed => {
                out.push_str(REPEAL_OPEN);
                push_escaped(&mut out, &span.value);
                out.push_str("</span>");
            }
            SpanTag::Unchanged => push_escaped(&mut out, &span.value),
        }
    }
    out.push_str("</div>");
    out
}

/// Serialize spans with `[-removed-]` and `{+added+}` markers.
pub fn format_plain(spans: &[DiffSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        match span.tag {
            SpanTag::Added => {
                out.push_str("{+");
                out.push_str(&span.value);
                out.push_str("+}");
            }
            SpanTag::Removed => {
                out.push_str("[-");
                out.push_str(&span.value);
                out.push_str("-]");
            }
            SpanTag::Unchanged => out.push_str(&span.value),
        }
    }
    out
}

/// Concatenate the spans one side of the comparison would show.
///
/// `SpanTag::Added` selects the later text (added + unchanged),
/// `SpanTag::Removed` the earlier one (removed + unchanged).
pub fn side_text(spans: &[DiffSpan], side: SpanTag) -> String {
    spans
        .iter()
        .filter(|span| span.tag == side || span.tag == SpanTag::Unchanged)
        .map(|span| span.value.as_str())
        .collect()
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
