//! Fenced-block JSON extraction.
//!
//! Models frequently wrap their answer in a markdown code fence, sometimes tagged
//! `json`, sometimes not. Tagged blocks are always candidates; untagged blocks only
//! when their content looks like a JSON object.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(json)?\s*((?s:.*?))\s*```").expect("fenced block pattern is valid")
});

/// Yields the inner text of every candidate fenced block, in order of appearance.
pub fn extract_json_blocks(text: &str) -> impl Iterator<Item = &str> + '_ {
    FENCED_BLOCK.captures_iter(text).filter_map(|caps| {
        let body = caps.get(2)?.as_str();
        if caps.get(1).is_some() || body.trim_start().starts_with('{') {
            Some(body)
        } else {
            None
        }
    })
}
