// file: src/parser/excerpt.rs
// description: title extraction and plain-text excerpt generation
// reference: https://github.github.com/gfm/

use crate::parser::patterns::{FENCED_CODE, HEADING_LINE, TITLE_LINE, WHITESPACE_RUN};
use crate::parser::slug::strip_extension;
use crate::utils::Validator;

pub const ELLIPSIS: &str = "...";

/// Text of the first non-blank heading line, else the file name without its
/// extension.
pub fn extract_title(content: &str, path: &str) -> String {
    if let Some(title) = TITLE_LINE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|title| !title.is_empty())
    {
        return title.to_string();
    }

    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    strip_extension(file_name).to_string()
}

/// Plain-text preview: fenced code and heading lines removed, whitespace
/// collapsed, cut to `max_chars` code points plus [`ELLIPSIS`].
pub fn make_excerpt(content: &str, max_chars: usize) -> String {
    let without_code = FENCED_CODE.replace_all(content, " ");
    let without_headings = HEADING_LINE.replace_all(&without_code, " ");
    let collapsed = WHITESPACE_RUN.replace_all(&without_headings, " ");

    Validator::truncate_chars(collapsed.trim(), max_chars, ELLIPSIS)
}
