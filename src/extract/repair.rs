//! Truncated JSON repair.
//!
//! Output cut off by the length bound usually stops in the middle of an object member.
//! Repair drops that dangling member, closes every object and array still open
//! (innermost first) and parses the result exactly once.

use serde_json::Value;

/// Repair a JSON document that was cut off mid-stream.
///
/// Already-valid input comes back unchanged. A parse failure of the repaired text is
/// returned as-is; there is no second attempt.
pub fn repair(text: &str) -> Result<Value, serde_json::Error> {
    let Some(complete) = complete_prefix(text) else {
        return serde_json::from_str(text);
    };
    let mut repaired = String::with_capacity(complete.len() + 8);
    repaired.push_str(complete);
    for opener in open_brackets(complete).into_iter().rev() {
        repaired.push(if opener == '{' { '}' } else { ']' });
    }
    serde_json::from_str(&repaired)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    expecting_key: bool,
}

/// Longest prefix of `text` that ends right after a complete value or an opener.
///
/// Whatever follows is a dangling fragment: a trailing comma, a key without a value,
/// an unterminated string, a partial literal. Structural characters inside strings are
/// never boundaries. Returns `None` when a bare token that is not a JSON literal is
/// followed by more input, since truncation only ever damages the tail.
fn complete_prefix(text: &str) -> Option<&str> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut cut = 0usize;
    let mut in_string = false;
    let mut string_is_key = false;
    let mut escaped = false;
    let mut scalar_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
                // a key only becomes part of a complete member once its value lands
                if !string_is_key {
                    cut = idx + 1;
                    if frames.is_empty() {
                        break;
                    }
                }
            }
            continue;
        }

        if let Some(start) = scalar_start {
            if is_scalar_char(ch) {
                continue;
            }
            scalar_start = None;
            if !is_complete_scalar(&text[start..idx]) {
                return None;
            }
            cut = idx;
            if frames.is_empty() {
                break;
            }
        }

        match ch {
            '"' => {
                in_string = true;
                string_is_key = match frames.last_mut() {
                    Some(frame) if frame.container == Container::Object && frame.expecting_key => {
                        frame.expecting_key = false;
                        true
                    }
                    _ => false,
                };
            }
            '{' => {
                frames.push(Frame {
                    container: Container::Object,
                    expecting_key: true,
                });
                cut = idx + 1;
            }
            '[' => {
                frames.push(Frame {
                    container: Container::Array,
                    expecting_key: false,
                });
                cut = idx + 1;
            }
            '}' | ']' => {
                let closes = if ch == '}' {
                    Container::Object
                } else {
                    Container::Array
                };
                // mismatched closers are stray characters, not errors
                if frames.last().map(|frame| frame.container) == Some(closes) {
                    frames.pop();
                    cut = idx + 1;
                    if frames.is_empty() {
                        break;
                    }
                }
            }
            ',' => {
                if let Some(frame) = frames.last_mut() {
                    if frame.container == Container::Object {
                        frame.expecting_key = true;
                    }
                }
            }
            ':' => {}
            c if c.is_whitespace() => {}
            _ => scalar_start = Some(idx),
        }
    }

    if let Some(start) = scalar_start {
        if is_complete_scalar(&text[start..]) {
            cut = text.len();
        }
    }

    Some(&text[..cut])
}

/// Brackets still open at the end of `text`, outermost first.
fn open_brackets(text: &str) -> Vec<char> {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => stack.push(ch),
            '}' => {
                if stack.last() == Some(&'{') {
                    stack.pop();
                }
            }
            ']' => {
                if stack.last() == Some(&'[') {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    stack
}

fn is_scalar_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '{' | '}' | '[' | ']' | ',' | ':' | '"')
}

fn is_complete_scalar(token: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(token),
        Ok(Value::Number(_) | Value::Bool(_) | Value::Null)
    )
}
