//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // URL
    #[serde(default)]
    pub slug: SlugConfig,

    // Writing
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Post listing
    #[serde(default)]
    pub index: IndexConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Connecting the dots".to_string(),
            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            slug: SlugConfig::default(),
            markdown: MarkdownConfig::default(),
            highlight: HighlightConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::parse(path.display().to_string(), e))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

/// How URL slugs are derived from post file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlugStyle {
    /// A single segment equal to the post id
    Id,
    /// `YYYY-MM-DD-title` split into a date segment and a title segment
    DatePrefix,
}

/// Slug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugConfig {
    pub style: SlugStyle,
    /// Length of the date prefix for `date_prefix` slugs
    pub prefix_len: usize,
    /// chrono format the date prefix must match
    pub prefix_format: String,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            style: SlugStyle::Id,
            prefix_len: 10,
            prefix_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Keep raw HTML embedded in posts. When off, it is escaped.
    pub raw_html: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            raw_html: true,
            smart_punctuation: false,
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a built-in syntect theme
    pub theme: String,
    /// Path to a `.tmTheme` file, relative to the site directory. Wins over `theme`.
    pub theme_file: Option<String>,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            theme_file: None,
            line_number: false,
        }
    }
}

/// Post index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub excerpt_words: usize,
    pub excerpt_ending: String,
    /// chrono format string for listing dates
    pub date_format: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            excerpt_words: 25,
            excerpt_ending: "...".to_string(),
            date_format: "%B %d, %Y".to_string(),
        }
    }
}
