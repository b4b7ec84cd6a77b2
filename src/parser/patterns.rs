// file: src/parser/patterns.rs
// description: compiled regex patterns for post metadata extraction
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // First heading line of any level: "## Title"
    pub static ref TITLE_LINE: Regex = Regex::new(
        r"(?m)^#+[ \t]+(.+)$"
    ).expect("TITLE_LINE regex is valid");

    // Paired triple-backtick fences, shortest match, across lines
    pub static ref FENCED_CODE: Regex = Regex::new(
        r"(?s)```.*?```"
    ).expect("FENCED_CODE regex is valid");

    pub static ref HEADING_LINE: Regex = Regex::new(
        r"(?m)^[ \t]*#[^\n]*"
    ).expect("HEADING_LINE regex is valid");

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).expect("WHITESPACE_RUN regex is valid");

    // Bare URLs in running text
    pub static ref BARE_URL: Regex = Regex::new(
        r#"\b(?:https?://|www\.)[^\s<>"']+"#
    ).expect("BARE_URL regex is valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_line_requires_space() {
        assert!(TITLE_LINE.is_match("## Title"));
        assert!(!TITLE_LINE.is_match("#hashtag"));
        assert!(!TITLE_LINE.is_match("#\nnext line"));
    }

    #[test]
    fn test_fenced_code_is_non_greedy() {
        let text = "a ```x``` b ```y``` c";
        assert_eq!(FENCED_CODE.replace_all(text, ""), "a  b  c");
    }

    #[test]
    fn test_bare_url_matches() {
        let found: Vec<&str> = BARE_URL
            .find_iter("see https://example.com/a and www.rust-lang.org")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["https://example.com/a", "www.rust-lang.org"]);
    }
}
