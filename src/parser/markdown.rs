// file: src/parser/markdown.rs
// description: markdown to html rendering with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use crate::error::Result;
use crate::parser::patterns::BARE_URL;
use crate::parser::slug;
use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html};
use std::collections::HashMap;

const TRAILING_URL_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '*', '_'];

/// Renders GitHub-flavoured markdown to HTML. Raw HTML in the source is
/// passed through untouched.
pub struct MarkdownRenderer {
    image_prefix: String,
    hard_wraps: bool,
}

impl MarkdownRenderer {
    pub fn new(image_prefix: impl Into<String>) -> Self {
        Self {
            image_prefix: image_prefix.into(),
            hard_wraps: true,
        }
    }

    pub fn with_hard_wraps(mut self, hard_wraps: bool) -> Self {
        self.hard_wraps = hard_wraps;
        self
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options
    }

    pub fn render(&self, content: &str) -> Result<String> {
        let parser = TextMergeStream::new(Parser::new_ext(content, Self::options()));
        let mut events = self.convert_events(parser);
        assign_heading_ids(&mut events);

        let mut rendered = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut rendered, events.into_iter());

        Ok(self.rewrite_image_sources(rendered))
    }

    /// Expects adjacent text already merged, so a URL split by entities or
    /// escapes is seen whole.
    fn convert_events<'a>(&self, parser: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut link_depth = 0usize;
        let mut in_code_block = false;

        for event in parser {
            match event {
                Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                    link_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(event);
                }
                Event::InlineHtml(ref tag) => {
                    match anchor_tag(tag) {
                        Some(AnchorTag::Open) => link_depth += 1,
                        Some(AnchorTag::Close) => link_depth = link_depth.saturating_sub(1),
                        None => {}
                    }
                    events.push(event);
                }
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                    events.push(event);
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    events.push(event);
                }
                Event::SoftBreak if self.hard_wraps => events.push(Event::HardBreak),
                Event::Text(text) if link_depth == 0 && !in_code_block => {
                    autolink_text(text, &mut events);
                }
                other => events.push(other),
            }
        }

        events
    }

    /// Points `images/...` and `./images/...` sources, including raw `<img>`
    /// tags, at the public image prefix.
    fn rewrite_image_sources(&self, rendered: String) -> String {
        if self.image_prefix.is_empty() {
            return rendered;
        }
        let target = format!("src=\"{}", self.image_prefix);
        rendered
            .replace("src=\"./images/", &target)
            .replace("src=\"images/", &target)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new("/images/")
    }
}

enum AnchorTag {
    Open,
    Close,
}

/// Recognises raw `<a ...>` and `</a>` tags.
fn anchor_tag(html: &str) -> Option<AnchorTag> {
    let tag = html.trim_start();
    let (kind, rest) = match tag.strip_prefix("</") {
        Some(rest) => (AnchorTag::Close, rest),
        None => (AnchorTag::Open, tag.strip_prefix('<')?),
    };

    let mut chars = rest.chars();
    if !matches!(chars.next(), Some('a' | 'A')) {
        return None;
    }
    match chars.next() {
        Some(c) if c == '>' || c.is_whitespace() => Some(kind),
        _ => None,
    }
}

/// Splits bare URLs out of a text event into autolinks.
fn autolink_text<'a>(text: CowStr<'a>, events: &mut Vec<Event<'a>>) {
    if !BARE_URL.is_match(&text) {
        events.push(Event::Text(text));
        return;
    }

    let mut cursor = 0;
    for found in BARE_URL.find_iter(&text) {
        let url = found.as_str().trim_end_matches(TRAILING_URL_PUNCTUATION);
        if url.is_empty() {
            continue;
        }
        if found.start() > cursor {
            events.push(Event::Text(CowStr::from(
                text[cursor..found.start()].to_string(),
            )));
        }

        let href = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        events.push(Event::Text(CowStr::from(url.to_string())));
        events.push(Event::End(TagEnd::Link));

        cursor = found.start() + url.len();
    }

    if cursor < text.len() {
        events.push(Event::Text(CowStr::from(text[cursor..].to_string())));
    }
}

/// Gives every heading without an explicit id one derived from its text,
/// suffixing `-1`, `-2`, ... on repeats.
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for start in 0..events.len() {
        if !matches!(&events[start], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }

        let mut text = String::new();
        for event in &events[start + 1..] {
            match event {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
        }

        let mut base = slug::normalize(&text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let count = seen.entry(base.clone()).or_insert(0);
        let unique = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
            *id = Some(CowStr::from(unique));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(content: &str) -> String {
        MarkdownRenderer::default().render(content).unwrap()
    }

    #[test]
    fn test_basic_rendering() {
        let html = render("# Title\n\nSome *content* here.");
        assert!(html.contains("<h1 id=\"title\">Title</h1>"));
        assert!(html.contains("<em>content</em>"));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render("<div class=\"note\">kept</div>\n\ninline <kbd>Ctrl</kbd>");
        assert!(html.contains("<div class=\"note\">kept</div>"));
        assert!(html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn test_bare_urls_become_links() {
        let html = render("Visit https://example.com/docs. Or www.rust-lang.org");
        assert!(html.contains("<a href=\"https://example.com/docs\">https://example.com/docs</a>."));
        assert!(html.contains("<a href=\"http://www.rust-lang.org\">www.rust-lang.org</a>"));
    }

    #[test]
    fn test_existing_links_are_not_relinked() {
        let html = render("[https://example.com](https://example.com)");
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_bare_url_survives_entities_and_escapes() {
        let html = render("see https://example.com/?a=1&amp;b=2 now");
        assert!(html.contains(
            "<a href=\"https://example.com/?a=1&amp;b=2\">https://example.com/?a=1&amp;b=2</a> now"
        ));

        let html = render("see https://example.com/a\\_b now");
        assert!(html.contains("<a href=\"https://example.com/a_b\">https://example.com/a_b</a> now"));
    }

    #[test]
    fn test_raw_anchor_is_not_relinked() {
        let source = "<a href=\"https://x.org\">https://x.org</a> and https://y.org";
        let html = render(source);
        assert!(html.contains("<a href=\"https://x.org\">https://x.org</a>"));
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(html.contains("<a href=\"https://y.org\">https://y.org</a>"));
    }

    #[test]
    fn test_anchor_tag_recognition() {
        assert!(matches!(anchor_tag("<a href=\"x\">"), Some(AnchorTag::Open)));
        assert!(matches!(anchor_tag("<A>"), Some(AnchorTag::Open)));
        assert!(matches!(anchor_tag("</a>"), Some(AnchorTag::Close)));
        assert!(anchor_tag("<abbr>").is_none());
        assert!(anchor_tag("<br />").is_none());
    }

    #[test]
    fn test_urls_in_code_are_left_alone() {
        let html = render("```\ncurl https://example.com\n```");
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let html = render("## Setup\n\n## Setup\n\n## `cargo` usage");
        assert!(html.contains("<h2 id=\"setup\">"));
        assert!(html.contains("<h2 id=\"setup-1\">"));
        assert!(html.contains("<h2 id=\"cargo-usage\">"));
    }

    #[test]
    fn test_soft_breaks_render_as_hard_breaks() {
        assert!(render("line one\nline two").contains("<br />"));
        let plain = MarkdownRenderer::default()
            .with_hard_wraps(false)
            .render("line one\nline two")
            .unwrap();
        assert!(!plain.contains("<br />"));
    }

    #[test]
    fn test_relative_images_are_rewritten() {
        let html = render("![a](images/a.png)\n\n![b](./images/b.png)\n\n<img src=\"images/c.png\">");
        assert!(html.contains("src=\"/images/a.png\""));
        assert!(html.contains("src=\"/images/b.png\""));
        assert!(html.contains("src=\"/images/c.png\""));
    }
}
