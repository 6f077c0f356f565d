//! JSON Extraction
//!
//! Models are told to answer with bare JSON but still prepend prose, wrap the answer in
//! code fences, or run out of output budget halfway through. Extraction tries one
//! strategy per failure mode, cheapest first, and returns the first value that parses.

pub mod repair;

pub use repair::repair;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace};

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*").expect("code fence pattern is valid"));

/// Strategy that produced an extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Verbatim,
    FenceStripped,
    OutermostBraces,
    Repaired,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Verbatim => "verbatim",
            Strategy::FenceStripped => "fence_stripped",
            Strategy::OutermostBraces => "outermost_braces",
            Strategy::Repaired => "repaired",
        }
    }
}

/// A value recovered from model output together with how it was recovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub value: Value,
    pub strategy: Strategy,
}

/// Locate and parse the JSON payload in `text`, or `None` when every strategy fails.
pub fn extract(text: &str) -> Option<Value> {
    extract_detailed(text).map(|extraction| extraction.value)
}

/// Like [`extract`], but also reports which strategy succeeded.
pub fn extract_detailed(text: &str) -> Option<Extraction> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(Extraction {
            value,
            strategy: Strategy::Verbatim,
        });
    }

    let stripped = strip_code_fences(text);
    if let Ok(value) = serde_json::from_str(&stripped) {
        trace!("Parsed model output after stripping code fences");
        return Some(Extraction {
            value,
            strategy: Strategy::FenceStripped,
        });
    }

    let first_brace = stripped.find('{');
    if let (Some(first), Some(last)) = (first_brace, stripped.rfind('}')) {
        if last > first {
            if let Ok(value) = serde_json::from_str(&stripped[first..=last]) {
                trace!(first, last, "Parsed outermost brace span of model output");
                return Some(Extraction {
                    value,
                    strategy: Strategy::OutermostBraces,
                });
            }
        }
    }

    let first = first_brace?;
    match repair(&stripped[first..]) {
        Ok(value) => {
            debug!(
                original_len = stripped.len() - first,
                "Recovered truncated JSON from model output"
            );
            Some(Extraction {
                value,
                strategy: Strategy::Repaired,
            })
        }
        Err(e) => {
            debug!(error = %e, "All JSON extraction strategies failed");
            None
        }
    }
}

/// Remove every code fence marker (optionally tagged `json`) and trim the result.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// First `max_chars` characters of `text`. Used for prompt budgets and error previews.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
