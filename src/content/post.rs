//! Post models

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_yaml::Value;
use std::path::PathBuf;

use super::FrontMatter;

/// A post discovered in the content directory, not yet loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    /// File name without extension
    pub id: String,

    /// URL path segments
    pub slug: Vec<String>,

    /// Full source file path
    #[serde(skip)]
    pub path: PathBuf,
}

/// A rendered post: HTML content plus the front-matter exactly as written
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    /// Rendered HTML content
    pub content: String,

    #[serde(flatten)]
    pub front_matter: FrontMatter,
}

/// One entry of the post listing
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub categories: Option<Value>,
    pub id: String,
    pub slug: Vec<String>,

    /// Formatted for display
    pub date: String,

    /// Plain-text excerpt
    pub desc: String,

    /// Sort key
    #[serde(skip)]
    pub published: NaiveDateTime,
}

/// Everything the single-post page needs
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub id: String,
    pub slug: Vec<String>,
    pub title: String,
    pub content: String,

    /// Formatted for display
    pub date: String,
    pub categories: Option<Value>,
}

impl PostSummary {
    /// Order newest first
    pub fn sort_newest_first(summaries: &mut [PostSummary]) {
        // Stable, so equal dates keep discovery order
        summaries.sort_by(|a, b| b.published.cmp(&a.published));
    }
}
