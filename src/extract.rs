//! Chinese run extraction
//!
//! Scans text for maximal runs of CJK Unified Ideographs (U+4E00 to U+9FFF).
//! The renderer uses these runs to offer one pronunciation trigger per phrase
//! found in a bot reply.

use regex::Regex;
use std::sync::OnceLock;

fn chinese_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\x{4E00}-\x{9FFF}]+").expect("static pattern is valid"))
}

/// Extracts maximal contiguous runs of Chinese characters
///
/// Returns the runs in left-to-right order as slices borrowed from `text`.
/// Everything outside the CJK Unified Ideographs block (punctuation such as
/// `！` or `。`, Latin text, emoji) separates runs and is never returned.
///
/// # Arguments
///
/// * `text` - Any text, typically a bot reply
///
/// # Returns
///
/// The Chinese runs, possibly empty
///
/// # Examples
///
/// ```
/// use hanyu_tutor::extract::extract_chinese_runs;
///
/// let runs = extract_chinese_runs("Hello 你好 world 再见!");
/// assert_eq!(runs, vec!["你好", "再见"]);
/// assert!(extract_chinese_runs("no chinese here").is_empty());
/// ```
pub fn extract_chinese_runs(text: &str) -> Vec<&str> {
    chinese_run_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// Returns true if `text` contains at least one Chinese run
///
/// # Examples
///
/// ```
/// use hanyu_tutor::extract::contains_chinese;
///
/// assert!(contains_chinese("ni hao 你好"));
/// assert!(!contains_chinese("ni hao"));
/// ```
pub fn contains_chinese(text: &str) -> bool {
    chinese_run_regex().is_match(text)
}
