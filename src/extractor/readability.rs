//! Flesch Reading Ease approximation.
//!
//! Syllables are estimated as one per three characters instead of being
//! counted. Historical scores were produced with this proxy, so it stays.
//! For the same reason words are runs of ASCII word characters and text
//! length is measured in UTF-16 code units.

use regex::Regex;
use std::sync::OnceLock;

/// Estimate reading ease of `text` on a 0..=100 scale (higher = easier).
pub fn estimate_readability(text: &str) -> u8 {
    static SENTENCE_END: OnceLock<Regex> = OnceLock::new();
    static WORD: OnceLock<Regex> = OnceLock::new();
    let sentence_end = SENTENCE_END.get_or_init(|| Regex::new(r"[.!?]+").unwrap());
    let word = WORD.get_or_init(|| Regex::new(r"(?-u:\w)+").unwrap());

    let sentences = sentence_end.find_iter(text).count().max(1) as f64;
    let words = word.find_iter(text).count().max(1) as f64;
    let syllables = (text.encode_utf16().count() as f64 / 3.0).round();

    let score = 206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words);
    score.clamp(0.0, 100.0).round() as u8
}
