//! Vehicle-category detection over normalised query text.
//!
//! An ordered list of word-boundary patterns, first match wins. Order is
//! load-bearing: the special-purpose motorbike term contains the plain
//! motorbike term, and motorbike terms must be tried before car terms so
//! compound phrases classify as the two-wheeler they mention first.

use std::sync::LazyLock;

use regex::Regex;

use crate::violation::VehicleCategory;

/// Ordered `(pattern, category)` rules, evaluated top to bottom.
///
/// `\s*` keeps multi-word terms tolerant of run-together or extra internal
/// spacing ("xe máy" / "xemáy"); `\b` anchors on Unicode word boundaries so
/// "oto" never fires inside a longer word. Expects [`normalize`]d input;
/// the patterns are all lowercase.
///
/// [`normalize`]: crate::normalize::normalize
pub const RULE_PATTERNS: &[(&str, VehicleCategory)] = &[
    (
        r"\bxe\s*máy\s*chuyên\s*dụng\b",
        VehicleCategory::SpecialPurposeMotorbike,
    ),
    (r"\bmô\s*tô\b", VehicleCategory::MotorbikeOrMoped),
    (r"\bxe\s*máy\b", VehicleCategory::MotorbikeOrMoped),
    (r"\bgắn\s*máy\b", VehicleCategory::MotorbikeOrMoped),
    (r"\bô\s*tô\b", VehicleCategory::Car),
    (r"\boto\b", VehicleCategory::Car),
    (r"\bxe\s*hơi\b", VehicleCategory::Car),
    (r"\bxe\s*đạp\b", VehicleCategory::Bicycle),
    (r"\bxe\s*dap\b", VehicleCategory::Bicycle),
    (r"\bngười\s*đi\s*bộ\b", VehicleCategory::Pedestrian),
    (r"\bđi\s*bộ\b", VehicleCategory::Pedestrian),
];

static RULES: LazyLock<Vec<(Regex, VehicleCategory)>> = LazyLock::new(|| {
    RULE_PATTERNS
        .iter()
        .map(|&(pattern, category)| (Regex::new(pattern).unwrap(), category))
        .collect()
});

/// Detect the vehicle category named in normalised query text.
///
/// Returns the category of the first matching rule, or `None` when the text
/// names no known vehicle type. Deterministic, no side effects.
pub fn detect_category(text: &str) -> Option<VehicleCategory> {
    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|&(_, category)| category)
}
