//! Reply parser: pulls score, explanation and recommendation out of free text.
//!
//! Each field is located by its own case-insensitive, line-anchored label and parsed
//! independently, so a malformed or missing line never hides the others. Nothing here
//! returns an error: a field that cannot be read is `None`.
//!
//! Only the labelled line itself is captured. An explanation that wraps onto following
//! lines is truncated to its first line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::review::models::{Recommendation, MAX_SCORE};

// `[0-9]` rather than `\d`: the regex crate's `\d` also matches non-ASCII digits.
static SCORE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*score:[ \t]*([0-9]+)").unwrap());

static EXPLANATION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*explanation:(.*)$").unwrap());

static RECOMMENDATION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*recommendation:(.*)$").unwrap());

/// Fields recovered from one reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReply {
    pub score: Option<u8>,
    pub explanation: Option<String>,
    pub recommendation: Option<Recommendation>,
}

pub fn parse_reply(raw: &str) -> ParsedReply {
    ParsedReply {
        score: extract_score(raw),
        explanation: extract_explanation(raw),
        recommendation: extract_recommendation(raw),
    }
}

/// First digit run after a `Score:` label. Out-of-range or overflowing values are dropped.
fn extract_score(raw: &str) -> Option<u8> {
    let digits = SCORE_LINE.captures(raw)?.get(1)?.as_str();
    let value: u32 = digits.parse().ok()?;
    u8::try_from(value).ok().filter(|score| *score <= MAX_SCORE)
}

fn extract_explanation(raw: &str) -> Option<String> {
    let text = EXPLANATION_LINE.captures(raw)?.get(1)?.as_str().trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn extract_recommendation(raw: &str) -> Option<Recommendation> {
    let label = RECOMMENDATION_LINE.captures(raw)?.get(1)?.as_str();
    Recommendation::from_label(label)
}
