//! Compact wire encoding for message lists.
//!
//! The encoding is a tabular, token-frugal representation: a header line
//! declaring the message count, then one `role,content` line per message
//! with backslash, comma, and newline escaped. It is the engine's internal
//! transport payload; `decode` exists for diagnostics and round-trips.

use serde::{Deserialize, Serialize};
use serde_json::json;

use banter_core::{Message, MessageRole};

/// Comparative savings of the compact encoding over a naive JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncodingSavings {
    pub baseline_tokens: usize,
    pub compact_tokens: usize,
    pub saved_tokens: usize,
    pub percentage: f64,
}

/// Escape content for a single encoded line.
///
/// Backslash first, then comma, then newline, so unescaping is
/// unambiguous.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Exact inverse of `escape`.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(',') => out.push(','),
            Some('\\') => out.push('\\'),
            Some(other) => {
                // Unknown escape; keep it verbatim.
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Encode an ordered message list into the compact representation.
///
/// Empty input encodes to the empty string.
pub fn encode(messages: &[Message]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let mut out = format!("messages[{}]{{role,content}}:", messages.len());
    for message in messages {
        out.push('\n');
        out.push_str(message.role.as_str());
        out.push(',');
        out.push_str(&escape(&message.content));
    }
    out
}

/// Decode a compact representation back into messages.
///
/// Wire format carries no identity, so decoded messages get synthetic
/// `toon-<index>` ids. Unknown role tokens default to `user`.
pub fn decode(text: &str) -> Vec<Message> {
    let mut lines = text.lines();

    let count = loop {
        let Some(line) = lines.next() else {
            return Vec::new();
        };
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("messages[") {
            if let Some(end) = rest.find(']') {
                if let Ok(count) = rest[..end].parse::<usize>() {
                    break count;
                }
            }
        }
    };

    let mut messages = Vec::with_capacity(count);
    for line in lines {
        if messages.len() == count {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let (role_token, content) = line.split_once(',').unwrap_or((line, ""));
        let role = match role_token.trim() {
            "assistant" => MessageRole::Assistant,
            _ => MessageRole::User,
        };
        let message = Message::new(role, unescape(content)).with_id(format!(
            "toon-{}",
            messages.len()
        ));
        messages.push(message);
    }
    messages
}

/// Deterministic token approximation: roughly 4 characters per token,
/// minimum 1 for any non-blank text.
pub fn estimate_tokens(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    (text.len() / 4).max(1)
}

/// Summed per-message token estimates, preferring already-known counts.
pub fn estimate_conversation_tokens(messages: &[Message]) -> usize {
    messages
        .iter()
        .map(|m| m.token_count.unwrap_or_else(|| estimate_tokens(&m.content)))
        .sum()
}

/// Compare the compact encoding against a naive JSON message payload.
pub fn savings(messages: &[Message]) -> EncodingSavings {
    let baseline: Vec<_> = messages
        .iter()
        .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
        .collect();
    let baseline_tokens = estimate_tokens(&json!(baseline).to_string());
    let compact_tokens = estimate_tokens(&encode(messages));
    let saved_tokens = baseline_tokens.saturating_sub(compact_tokens);
    let percentage = if baseline_tokens == 0 {
        0.0
    } else {
        saved_tokens as f64 / baseline_tokens as f64 * 100.0
    };

    EncodingSavings {
        baseline_tokens,
        compact_tokens,
        saved_tokens,
        percentage,
    }
}
