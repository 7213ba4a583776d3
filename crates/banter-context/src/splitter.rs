//! Transmission-safe splitting of oversized outgoing messages.
//!
//! Long messages are broken on paragraph boundaries into parts that fit a
//! character limit. Fenced code blocks and inline code spans are protected:
//! no part boundary may fall inside them. Oversized paragraphs are
//! force-split at the best break point found backward from the limit.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Default per-part character limit
pub const DEFAULT_SPLIT_LIMIT: usize = 3000;

/// Smallest acceptable part produced by a soft break
const MIN_PART_SIZE: usize = 500;

/// Separator used when packing paragraphs into a part
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One ordered part of a split message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePart {
    /// 1-based position within the batch
    pub index: usize,
    /// Total parts in the batch
    pub total: usize,
    pub content: String,
}

impl MessagePart {
    /// Display form, e.g. `"2/5"`.
    pub fn progress_indicator(&self) -> String {
        format!("{}/{}", self.index, self.total)
    }
}

/// A batch of message parts with a stable, content-derived identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitResult {
    pub batch_id: String,
    pub parts: Vec<MessagePart>,
}

impl SplitResult {
    pub fn is_split(&self) -> bool {
        self.parts.len() > 1
    }
}

/// Split with the default limit.
pub fn split_default(text: &str) -> SplitResult {
    split(text, DEFAULT_SPLIT_LIMIT)
}

/// Split `text` into parts of at most `limit` characters without cutting
/// through protected spans.
pub fn split(text: &str, limit: usize) -> SplitResult {
    let batch_id = batch_id(text);

    if text.len() <= limit {
        return SplitResult {
            batch_id,
            parts: vec![MessagePart {
                index: 1,
                total: 1,
                content: text.to_string(),
            }],
        };
    }

    let spans = protected_spans(text);
    let paragraphs = paragraphs(text, &spans);

    // Greedy packing. A part's first paragraph is always placed even when
    // it alone exceeds the limit; such parts are force-split below.
    let mut packed: Vec<(usize, String)> = Vec::new();
    for (start, para) in paragraphs {
        match packed.last_mut() {
            Some((_, current))
                if current.len() + PARAGRAPH_SEPARATOR.len() + para.len() <= limit =>
            {
                current.push_str(PARAGRAPH_SEPARATOR);
                current.push_str(para);
            }
            _ => packed.push((start, para.to_string())),
        }
    }

    let mut contents: Vec<String> = Vec::new();
    for (start, content) in packed {
        if content.len() <= limit {
            contents.push(content);
        } else {
            contents.extend(force_split(&content, start, limit, &spans));
        }
    }

    let total = contents.len();
    let parts = contents
        .into_iter()
        .enumerate()
        .map(|(i, content)| MessagePart {
            index: i + 1,
            total,
            content,
        })
        .collect();

    SplitResult { batch_id, parts }
}

/// Stable batch identifier derived from the text's hash and length.
fn batch_id(text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    format!("batch-{:x}-{}", hasher.finish(), text.len())
}

/// Character ranges that must never contain a part boundary: fenced code
/// blocks (greedy triple-backtick pairs) and inline code spans.
fn protected_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let bytes = text.as_bytes();

    // Fenced blocks first; an unclosed fence protects to the end.
    let mut fences = Vec::new();
    let mut pos = 0;
    while let Some(found) = text[pos..].find("```") {
        fences.push(pos + found);
        pos += found + 3;
    }
    for pair in fences.chunks(2) {
        match *pair {
            [open, close] => spans.push(open..close + 3),
            [open] => spans.push(open..text.len()),
            _ => {}
        }
    }

    // Inline spans outside the fences.
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' || inside_any(&spans, i) {
            i += 1;
            continue;
        }
        let Some(close) = text[i + 1..].find('`') else {
            break;
        };
        let end = i + 1 + close + 1;
        if !inside_any(&spans, end - 1) {
            spans.push(i..end);
        }
        i = end;
    }

    spans.sort_by_key(|s| s.start);
    spans
}

fn inside_any(spans: &[Range<usize>], pos: usize) -> bool {
    spans.iter().any(|s| s.contains(&pos))
}

/// Whether a cut at `pos` would sever a protected span.
fn cuts_span(spans: &[Range<usize>], pos: usize) -> bool {
    spans.iter().any(|s| pos > s.start && pos < s.end)
}

/// Split `text` into paragraphs at runs of two or more newlines, skipping
/// runs inside protected spans. Returns each paragraph with its absolute
/// start offset.
fn paragraphs<'a>(text: &'a str, spans: &[Range<usize>]) -> Vec<(usize, &'a str)> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'\n' && bytes[i + 1] == b'\n' && !cuts_span(spans, i + 1) {
            if start < i {
                out.push((start, &text[start..i]));
            }
            while i < bytes.len() && bytes[i] == b'\n' {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }

    if start < text.len() {
        out.push((start, &text[start..]));
    }
    out
}

/// Break an oversized paragraph into limit-sized pieces.
///
/// Break points are searched backward from the limit offset in priority
/// order (sentence end + space, newline, space), rejecting candidates
/// inside protected spans or below the minimum part size. A hard cut at
/// the limit is the last resort.
fn force_split(text: &str, abs_start: usize, limit: usize, spans: &[Range<usize>]) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut offset = 0;

    while text.len() - offset > limit {
        let break_at = find_break(text, offset, limit, abs_start, spans);
        pieces.push(text[offset..break_at].to_string());
        offset = break_at;
    }
    pieces.push(text[offset..].to_string());
    pieces
}

fn find_break(
    text: &str,
    offset: usize,
    limit: usize,
    abs_start: usize,
    spans: &[Range<usize>],
) -> usize {
    let bytes = text.as_bytes();
    let hard_end = offset + limit;
    let floor = offset + MIN_PART_SIZE;

    let acceptable =
        |pos: usize| pos >= floor && !cuts_span(spans, abs_start + pos) && text.is_char_boundary(pos);

    // Sentence-ending punctuation followed by a space.
    for pos in (floor..hard_end.saturating_sub(1)).rev() {
        if matches!(bytes[pos], b'.' | b'!' | b'?')
            && bytes.get(pos + 1) == Some(&b' ')
            && acceptable(pos + 2)
        {
            return pos + 2;
        }
    }

    // Newline.
    for pos in (floor..hard_end).rev() {
        if bytes[pos] == b'\n' && acceptable(pos + 1) {
            return pos + 1;
        }
    }

    // Plain space.
    for pos in (floor..hard_end).rev() {
        if bytes[pos] == b' ' && acceptable(pos + 1) {
            return pos + 1;
        }
    }

    // Hard cut, backed off to a char boundary.
    let mut cut = hard_end;
    while cut > offset && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}
