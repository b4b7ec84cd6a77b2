// file: src/parser/transformer.rs
// description: converts one raw markdown document into a rendered post
// reference: parses markdown, derives metadata, and renders html

use crate::config::{ContentConfig, RemoteConfig};
use crate::error::{MirrorError, Result};
use crate::models::Post;
use crate::parser::excerpt::{extract_title, make_excerpt};
use crate::parser::markdown::MarkdownRenderer;
use crate::parser::slug::slug_for_path;
use crate::utils::Validator;
use tracing::debug;

/// Pure `(path, markdown) -> Post` conversion; performs no I/O.
pub struct PostTransformer {
    renderer: MarkdownRenderer,
    content_root: String,
    excerpt_max_chars: usize,
    max_file_size_kb: usize,
}

impl PostTransformer {
    pub fn new(content_root: impl Into<String>, content: &ContentConfig) -> Self {
        Self {
            renderer: MarkdownRenderer::new(content.image_prefix.clone()),
            content_root: content_root.into(),
            excerpt_max_chars: content.excerpt_max_chars,
            max_file_size_kb: content.max_file_size_kb,
        }
    }

    pub fn from_config(remote: &RemoteConfig, content: &ContentConfig) -> Self {
        Self::new(remote.content_root(), content)
    }

    pub fn slug_for(&self, path: &str) -> String {
        slug_for_path(path, &self.content_root)
    }

    pub fn transform(&self, path: &str, raw: &str) -> Result<Post> {
        Validator::validate_body_size(path, raw, self.max_file_size_kb)?;

        let html = self
            .renderer
            .render(raw)
            .map_err(|e| MirrorError::RenderFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let post = Post {
            slug: self.slug_for(path),
            title: extract_title(raw, path),
            excerpt: make_excerpt(raw, self.excerpt_max_chars),
            html,
            source_path: path.to_string(),
        };

        debug!("Transformed {} into slug {}", path, post.slug);
        Ok(post)
    }
}
