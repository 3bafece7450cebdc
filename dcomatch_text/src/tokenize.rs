use serde::{Deserialize, Serialize};

/// Lexical class of a diff token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Word,
    Punct,
    Newline,
}

/// One comparable token plus the whitespace gap that precedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub gap: &'a str,
    pub text: &'a str,
    pub kind: TokenKind,
}

/// Tokenized text: comparable tokens and the whitespace after the last one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenStream<'a> {
    pub tokens: Vec<Token<'a>>,
    pub trailing: &'a str,
}

impl TokenStream<'_> {
    /// Reassemble the exact source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            out.push_str(token.gap);
            out.push_str(token.text);
        }
        out.push_str(self.trailing);
        out
    }
}

/// Split text into words, single punctuation characters and, when
/// `newline_is_token` is set, newline tokens.
///
/// Everything else is whitespace and is carried as the `gap` of the next
/// token, so rendering the stream reproduces the input byte for byte.
pub fn tokenize(text: &str, newline_is_token: bool) -> TokenStream<'_> {
    let mut tokens = Vec::new();
    let mut gap_start = 0usize;
    let mut iter = text.char_indices().peekable();

    while let Some((idx, ch)) = iter.next() {
        if newline_is_token && (ch == '\n' || ch == '\r') {
            let mut end = idx + ch.len_utf8();
            if ch == '\r' && iter.peek().is_some_and(|(_, next)| *next == '\n') {
                iter.next();
                end += 1;
            }
            tokens.push(Token {
                gap: &text[gap_start..idx],
                text: &text[idx..end],
                kind: TokenKind::Newline,
            });
            gap_start = end;
            continue;
        }

        if ch.is_whitespace() {
            continue;
        }

        let mut end = idx + ch.len_utf8();
        let kind = if is_word_char(ch) {
            while let Some((next_idx, next)) = iter.peek().copied() {
                if !is_word_char(next) {
                    break;
                }
                end = next_idx + next.len_utf8();
                iter.next();
            }
            TokenKind::Word
        } else {
            TokenKind::Punct
        };

        tokens.push(Token {
            gap: &text[gap_start..idx],
            text: &text[idx..end],
            kind,
        });
        gap_start = end;
    }

    TokenStream {
        tokens,
        trailing: &text[gap_start..],
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
