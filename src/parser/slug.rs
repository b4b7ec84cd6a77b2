// file: src/parser/slug.rs
// description: URL-safe slug derivation from repository paths
// reference: deterministic path normalization

use crate::utils::Validator;

pub const FALLBACK_SLUG: &str = "post";

const SEPARATOR: char = '-';

/// Lower-cases `input`, collapses separator runs (path separators, whitespace,
/// underscores, hyphens) into one `-`, drops anything not alphanumeric and
/// trims separators from both ends. Returns an empty string when nothing
/// survives.
pub fn normalize(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for ch in input.chars() {
        if is_separator(ch) {
            pending_separator = !slug.is_empty();
            continue;
        }

        for lower in ch.to_lowercase().filter(|c| c.is_alphanumeric()) {
            if pending_separator {
                slug.push(SEPARATOR);
                pending_separator = false;
            }
            slug.push(lower);
        }
    }

    slug
}

/// [`normalize`], falling back to [`FALLBACK_SLUG`] for empty results.
pub fn slugify(input: &str) -> String {
    let slug = normalize(input);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Slug of a repository path: `data/2024/My Post.md` under `data` becomes
/// `2024-my-post`.
pub fn slug_for_path(path: &str, content_root: &str) -> String {
    let path = Validator::sanitize_file_path(path);
    let root = content_root.trim_matches('/');

    let relative = if root.is_empty() {
        path.as_str()
    } else {
        path.strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path.as_str())
    };

    slugify(strip_extension(relative))
}

/// Removes the final extension from the last path component, if any.
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '/' | '\\' | '_' | '-') || ch.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_for_path_strips_root_and_extension() {
        assert_eq!(slug_for_path("data/b.md", "data"), "b");
        assert_eq!(slug_for_path("data/2024/My Post.md", "data"), "2024-my-post");
        assert_eq!(slug_for_path("data/notes.markdown", "/data/"), "notes");
        assert_eq!(slug_for_path("other/x.md", "data"), "other-x");
    }

    #[test]
    fn test_collapses_separator_runs() {
        assert_eq!(slugify("Hello __ World"), "hello-world");
        assert_eq!(slugify("a//b\\\\c"), "a-b-c");
        assert_eq!(slugify("--lead and trail--"), "lead-and-trail");
        assert_eq!(slugify("a - ! - b"), "a-b");
    }

    #[test]
    fn test_strips_disallowed_characters() {
        assert_eq!(slugify("What's new? (v2.0)"), "whats-new-v20");
        assert_eq!(slugify("Rust 入门"), "rust-入门");
    }

    #[test]
    fn test_empty_result_uses_fallback() {
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slug_for_path("data/!!!.md", "data"), FALLBACK_SLUG);
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in [
            "data/2024/My Post",
            "Hello __ World",
            "What's new? (v2.0)",
            "İstanbul Notes",
            "Rust 入门",
            "!!!",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_colliding_paths_share_a_slug() {
        assert_eq!(slug_for_path("foo/bar.md", ""), "foo-bar");
        assert_eq!(slug_for_path("foo-bar.md", ""), "foo-bar");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("a/b.md"), "a/b");
        assert_eq!(strip_extension("a.b/c"), "a.b/c");
        assert_eq!(strip_extension("a/.hidden"), "a/.hidden");
    }
}
