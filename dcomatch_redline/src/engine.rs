use std::ops::{Index, IndexMut};

use dcomatch_text::{Token, TokenKind, TokenStream};
use xxhash_rust::xxh3::xxh3_64;

use crate::model::{DiffSpan, RedlineOptions, RedlineStats, SpanTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Equal,
    Delete,
    Insert,
}

pub(crate) fn token_keys(stream: &TokenStream<'_>, options: &RedlineOptions) -> Vec<u64> {
    stream
        .tokens
        .iter()
        .map(|token| token_key(token, options))
        .collect()
}

fn token_key(token: &Token<'_>, options: &RedlineOptions) -> u64 {
    match token.kind {
        TokenKind::Newline => xxh3_64(b"\n"),
        _ if options.ignore_case => xxh3_64(token.text.to_lowercase().as_bytes()),
        _ => xxh3_64(token.text.as_bytes()),
    }
}

/// Walk the edit script and emit classified spans in document order.
///
/// Whitespace that is identical on both sides is unchanged; differing
/// whitespace is emitted as a removed/added pair. A pure insertion or
/// deletion emits its leading whitespace once, as unchanged, so the changed
/// run itself starts and ends on a token.
pub(crate) fn build_spans(
    a: &TokenStream<'_>,
    b: &TokenStream<'_>,
    ops: &[Op],
) -> (Vec<DiffSpan>, RedlineStats) {
    let mut out = SpanBuilder::default();
    let mut stats = RedlineStats::default();
    let mut i = 0usize;
    let mut j = 0usize;
    let mut pending_deletes: Vec<&Token<'_>> = Vec::new();
    let mut pending_inserts: Vec<&Token<'_>> = Vec::new();

    for op in ops {
        match op {
            Op::Equal => {
                flush_group(&mut out, &mut stats, &mut pending_deletes, &mut pending_inserts);
                let left = &a.tokens[i];
                let right = &b.tokens[j];
                out.push_gap(left.gap, right.gap);
                out.push(SpanTag::Unchanged, right.text);
                if right.kind == TokenKind::Word {
                    stats.unchanged_words += 1;
                }
                i += 1;
                j += 1;
            }
            Op::Delete => {
                pending_deletes.push(&a.tokens[i]);
                i += 1;
            }
            Op::Insert => {
                pending_inserts.push(&b.tokens[j]);
                j += 1;
            }
        }
    }

    flush_group(&mut out, &mut stats, &mut pending_deletes, &mut pending_inserts);
    out.push_gap(a.trailing, b.trailing);

    (out.finish(), stats)
}

fn flush_group(
    out: &mut SpanBuilder,
    stats: &mut RedlineStats,
    deletes: &mut Vec<&Token<'_>>,
    inserts: &mut Vec<&Token<'_>>,
) {
    let shared_lead = match (deletes.first(), inserts.first()) {
        (None, None) => return,
        (Some(d), Some(i)) if d.gap != i.gap => None,
        (Some(d), _) => Some(d.gap),
        (None, Some(i)) => Some(i.gap),
    };
    if let Some(gap) = shared_lead {
        out.push(SpanTag::Unchanged, gap);
    }

    for (idx, token) in deletes.iter().enumerate() {
        if idx > 0 || shared_lead.is_none() {
            out.push(SpanTag::Removed, token.gap);
        }
        out.push(SpanTag::Removed, token.text);
        if token.kind == TokenKind::Word {
            stats.removed_words += 1;
        }
    }
    for (idx, token) in inserts.iter().enumerate() {
        if idx > 0 || shared_lead.is_none() {
            out.push(SpanTag::Added, token.gap);
        }
        out.push(SpanTag::Added, token.text);
        if token.kind == TokenKind::Word {
            stats.added_words += 1;
        }
    }

    deletes.clear();
    inserts.clear();
}

#[derive(Debug, Default)]
struct SpanBuilder {
    spans: Vec<DiffSpan>,
}

impl SpanBuilder {
    fn push(&mut self, tag: SpanTag, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.tag == tag => last.value.push_str(text),
            _ => self.spans.push(DiffSpan::new(tag, text)),
        }
    }

    fn push_gap(&mut self, earlier: &str, later: &str) {
        if earlier == later {
            self.push(SpanTag::Unchanged, later);
        } else {
            self.push(SpanTag::Removed, earlier);
            self.push(SpanTag::Added, later);
        }
    }

    fn finish(self) -> Vec<DiffSpan> {
        self.spans
    }
}

/// Shortest edit script between two key sequences.
///
/// Linear-space Myers: common prefix and suffix are peeled off, then the
/// middle snake of the remaining window splits it into two halves that are
/// solved independently. Only two diagonal frontiers are kept alive.
pub(crate) fn compute_ops(a: &[u64], b: &[u64]) -> Vec<Op> {
    let max_d = max_d(a.len(), b.len());
    let mut forward = Frontier::new(max_d);
    let mut backward = Frontier::new(max_d);
    let mut ops = Vec::with_capacity(a.len() + b.len());
    conquer(a, b, &mut forward, &mut backward, &mut ops);
    ops
}

fn max_d(n: usize, m: usize) -> usize {
    (n + m).div_ceil(2) + 1
}

/// Furthest-reaching `x` per diagonal `k`, for `k` in `-d..=d`.
struct Frontier {
    offset: isize,
    v: Vec<usize>,
}

impl Frontier {
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            v: vec![0; 2 * max_d],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn common_prefix(a: &[u64], b: &[u64]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[u64], b: &[u64]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

fn conquer(
    a: &[u64],
    b: &[u64],
    forward: &mut Frontier,
    backward: &mut Frontier,
    ops: &mut Vec<Op>,
) {
    let prefix = common_prefix(a, b);
    ops.extend(std::iter::repeat_n(Op::Equal, prefix));
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = common_suffix(a, b);
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    if a.is_empty() {
        ops.extend(std::iter::repeat_n(Op::Insert, b.len()));
    } else if b.is_empty() {
        ops.extend(std::iter::repeat_n(Op::Delete, a.len()));
    } else if let Some((x, y)) = middle_snake(a, b, forward, backward) {
        conquer(&a[..x], &b[..y], forward, backward, ops);
        conquer(&a[x..], &b[y..], forward, backward, ops);
    } else {
        ops.extend(std::iter::repeat_n(Op::Delete, a.len()));
        ops.extend(std::iter::repeat_n(Op::Insert, b.len()));
    }

    ops.extend(std::iter::repeat_n(Op::Equal, suffix));
}

/// Point on an optimal path where the forward and backward searches meet.
///
/// Callers pass non-empty windows with no common prefix or suffix, so the
/// returned point always splits the window into two smaller ones.
fn middle_snake(
    a: &[u64],
    b: &[u64],
    forward: &mut Frontier,
    backward: &mut Frontier,
) -> Option<(usize, usize)> {
    let n = a.len();
    let m = b.len();
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;
    forward[1] = 0;
    backward[1] = 0;

    for d in 0..max_d(n, m) as isize {
        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                forward[k + 1]
            } else {
                forward[k - 1] + 1
            };
            let y = (x as isize - k) as usize;
            let (x0, y0) = (x, y);
            if x < n && y < m {
                x += common_prefix(&a[x..], &b[y..]);
            }
            forward[k] = x;
            if odd && (k - delta).abs() < d && forward[k] + backward[delta - k] >= n {
                return Some((x0, y0));
            }
        }

        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                backward[k + 1]
            } else {
                backward[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            if x < n && y < m {
                let run = common_suffix(&a[..n - x], &b[..m - y]);
                x += run;
                y += run;
            }
            backward[k] = x;
            if !odd && (k - delta).abs() <= d && backward[k] + forward[delta - k] >= n {
                return Some((n - x, m - y));
            }
        }
    }

    None
}
