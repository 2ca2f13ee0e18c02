//! Markdown body rendering

use pulldown_cmark::{html, Options, Parser};

use crate::core::config::MarkdownConfig;

/// Turns a document body into its presentation form
pub trait Renderer {
    fn render(&self, body: &str) -> String;
}

/// CommonMark to HTML renderer
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::from_config(&MarkdownConfig::default())
    }
}

impl MarkdownRenderer {
    /// Create a renderer with an explicit set of parser extensions
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Create a renderer from the configured extension flags
    pub fn from_config(config: &MarkdownConfig) -> Self {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, config.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, config.tasklists);
        options.set(Options::ENABLE_FOOTNOTES, config.footnotes);
        options.set(Options::ENABLE_SMART_PUNCTUATION, config.smart_punctuation);
        Self { options }
    }

    pub fn options(&self) -> Options {
        self.options
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, body: &str) -> String {
        let parser = Parser::new_ext(body, self.options);
        let mut out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
