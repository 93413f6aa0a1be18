//! Query text normalisation.
//!
//! Queries arrive with arbitrary casing, punctuation, and spacing; catalog
//! descriptions are clean lowercase Vietnamese. Both sides of a match go
//! through the same normalisation so identical phrasings compare equal.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalise raw query text: lowercase, strip punctuation, collapse
/// whitespace runs to single spaces, trim.
///
/// `\w` here is Unicode-aware, so Vietnamese letters (đ, ơ, ệ, ...) survive
/// and only punctuation/symbols are removed. Pure; returns an empty string
/// when the input carried no word characters at all.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}
