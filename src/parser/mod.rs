// file: src/parser/mod.rs
// description: markdown parsing module exports
// reference: internal module structure

pub mod excerpt;
pub mod markdown;
pub mod patterns;
pub mod slug;
pub mod transformer;

pub use excerpt::{ELLIPSIS, extract_title, make_excerpt};
pub use markdown::MarkdownRenderer;
pub use slug::{FALLBACK_SLUG, slug_for_path, slugify};
pub use transformer::PostTransformer;
