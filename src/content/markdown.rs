//! Markdown rendering: front-matter, parsing, event stages, serialization

use pulldown_cmark::{html, Options, Parser};
use std::path::Path;

use super::pipeline::{self, Events, Highlighter, StageContext, STAGES};
use super::{FrontMatter, RenderedDocument};
use crate::config::{HighlightConfig, MarkdownConfig};
use crate::error::Result;

/// Markdown renderer with math, emoji, footnotes and syntax highlighting
pub struct MarkdownRenderer {
    options: Options,
    raw_html: bool,
    highlighter: Highlighter,
}

impl MarkdownRenderer {
    /// Create a renderer from configuration, loading the highlight theme once
    pub fn new(
        markdown: &MarkdownConfig,
        highlight: &HighlightConfig,
        base_dir: &Path,
    ) -> Result<Self> {
        let highlighter = Highlighter::new(highlight, base_dir)?;
        Ok(Self::with_highlighter(markdown, highlighter))
    }

    /// Create with an already built highlighter
    pub fn with_highlighter(markdown: &MarkdownConfig, highlighter: Highlighter) -> Self {
        // YAML metadata blocks stay off; front-matter is handled by FrontMatter::parse()
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_MATH
            | Options::ENABLE_GFM;
        if markdown.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }

        Self {
            options,
            raw_html: markdown.raw_html,
            highlighter,
        }
    }

    /// Render a full document: front-matter plus markdown body
    pub fn render_document(&self, raw: &str) -> Result<RenderedDocument> {
        let (front_matter, body) = FrontMatter::parse(raw)?;
        let content = self.render(body)?;
        Ok(RenderedDocument {
            content,
            front_matter,
        })
    }

    /// Render a markdown body to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let markdown = pipeline::expand_inline_notes(markdown);
        let events: Events = Parser::new_ext(&markdown, self.options).collect();

        let ctx = StageContext {
            raw_html: self.raw_html,
            highlighter: &self.highlighter,
        };
        let events = pipeline::run(events, &STAGES, &ctx)?;

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }
}
