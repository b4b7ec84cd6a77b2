// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{MirrorError, Result};

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(MirrorError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_body_size(path: &str, body: &str, max_size_kb: usize) -> Result<()> {
        let max_bytes = max_size_kb.saturating_mul(1024);
        if max_bytes > 0 && body.len() > max_bytes {
            return Err(MirrorError::RenderFailed {
                path: path.to_string(),
                message: format!(
                    "body is {} bytes, limit is {} KiB",
                    body.len(),
                    max_size_kb
                ),
            });
        }
        Ok(())
    }

    /// Case-insensitive extension check against a configured list (`md`, `markdown`).
    pub fn has_markdown_extension(path: &str, extensions: &[String]) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }

    pub fn sanitize_file_path(path: &str) -> String {
        let mut sanitized = path.trim().replace('\\', "/");
        while sanitized.contains("//") {
            sanitized = sanitized.replace("//", "/");
        }
        sanitized
    }

    /// Cuts `text` to `max_chars` code points, appending `marker` when cut.
    pub fn truncate_chars(text: &str, max_chars: usize, marker: &str) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => format!("{}{}", &text[..byte_index], marker),
            None => text.to_string(),
        }
    }
}
