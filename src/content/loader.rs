//! Content loader - discovers, renders and indexes posts

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::slug::slug_for;
use super::{MarkdownRenderer, PostEntry, PostPage, PostSummary, RenderedDocument};
use crate::error::{Error, Result};
use crate::helpers::{excerpt, format_date};
use crate::Site;

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    ///
    /// The highlight theme is loaded here, once, and reused for every post.
    pub fn new(site: &'a Site) -> Result<Self> {
        let renderer = MarkdownRenderer::new(
            &site.config.markdown,
            &site.config.highlight,
            &site.base_dir,
        )?;
        Ok(Self { site, renderer })
    }

    /// Create a loader around an existing renderer
    pub fn with_renderer(site: &'a Site, renderer: MarkdownRenderer) -> Self {
        Self { site, renderer }
    }

    /// List the posts in the content directory, ordered by file name
    pub fn discover(&self) -> Result<Vec<PostEntry>> {
        let content_dir = &self.site.content_dir;
        let metadata = fs::metadata(content_dir).map_err(|e| Error::io(content_dir, e))?;
        if !metadata.is_dir() {
            return Err(Error::io(
                content_dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| content_dir.clone());
                Error::io(path, e.into())
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() || is_hidden(path) || !is_markdown_file(path) {
                continue;
            }

            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| Error::parse(path.display().to_string(), "file name is not UTF-8"))?
                .to_string();
            let slug = slug_for(&id, &self.site.config.slug).map_err(|e| e.in_document(&id))?;

            entries.push(PostEntry {
                id,
                slug,
                path: path.to_path_buf(),
            });
        }

        tracing::debug!("Discovered {} posts in {:?}", entries.len(), content_dir);
        Ok(entries)
    }

    /// Load and render a single post by id
    pub fn load_post(&self, id: &str) -> Result<RenderedDocument> {
        let path = self.post_path(id)?;
        self.render_file(&path).map_err(|e| e.in_document(id))
    }

    /// Load a post in the shape the post page consumes
    pub fn load_page(&self, id: &str) -> Result<PostPage> {
        let slug = slug_for(id, &self.site.config.slug).map_err(|e| e.in_document(id))?;
        let doc = self.load_post(id)?;
        self.page_for(id, slug, doc).map_err(|e| e.in_document(id))
    }

    /// Render every post into a page payload, in discovery order
    pub fn load_pages(&self) -> Result<Vec<PostPage>> {
        self.render_all()?
            .into_iter()
            .map(|(entry, doc)| {
                self.page_for(&entry.id, entry.slug, doc)
                    .map_err(|e| e.in_document(&entry.id))
            })
            .collect()
    }

    /// Render all posts and build the listing, newest first
    ///
    /// Posts render in parallel; results are gathered in discovery order
    /// before sorting, so equal dates always come out in file-name order.
    pub fn load_summaries(&self) -> Result<Vec<PostSummary>> {
        let mut summaries = self
            .render_all()?
            .iter()
            .map(|(entry, doc)| {
                self.summarize(entry, doc)
                    .map_err(|e| e.in_document(&entry.id))
            })
            .collect::<Result<Vec<_>>>()?;

        PostSummary::sort_newest_first(&mut summaries);

        tracing::info!("Indexed {} posts", summaries.len());
        Ok(summaries)
    }

    /// The listing and the page payloads from a single render of each post
    pub fn load_index(&self) -> Result<(Vec<PostSummary>, Vec<PostPage>)> {
        let rendered = self.render_all()?;
        let mut summaries = Vec::with_capacity(rendered.len());
        let mut pages = Vec::with_capacity(rendered.len());

        for (entry, doc) in rendered {
            let summary = self.summarize(&entry, &doc).map_err(|e| e.in_document(&entry.id))?;
            let page = self
                .page_for(&entry.id, entry.slug, doc)
                .map_err(|e| e.in_document(&entry.id))?;
            summaries.push(summary);
            pages.push(page);
        }

        PostSummary::sort_newest_first(&mut summaries);

        tracing::info!("Indexed {} posts", summaries.len());
        Ok((summaries, pages))
    }

    /// Render every discovered post in parallel, keeping discovery order
    fn render_all(&self) -> Result<Vec<(PostEntry, RenderedDocument)>> {
        self.discover()?
            .into_par_iter()
            .map(|entry| {
                let doc = self
                    .render_file(&entry.path)
                    .map_err(|e| e.in_document(&entry.id))?;
                Ok((entry, doc))
            })
            .collect()
    }

    fn render_file(&self, path: &Path) -> Result<RenderedDocument> {
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let doc = self.renderer.render_document(&raw)?;
        tracing::debug!("Rendered {:?}", path);
        Ok(doc)
    }

    fn summarize(&self, entry: &PostEntry, doc: &RenderedDocument) -> Result<PostSummary> {
        let index = &self.site.config.index;
        let published = doc.front_matter.parse_date()?;

        Ok(PostSummary {
            title: doc.front_matter.title_or(&entry.id),
            categories: doc.front_matter.categories().cloned(),
            date: format_date(&published, &index.date_format),
            desc: excerpt(&doc.content, index.excerpt_words, &index.excerpt_ending),
            id: entry.id.clone(),
            slug: entry.slug.clone(),
            published,
        })
    }

    fn page_for(&self, id: &str, slug: Vec<String>, doc: RenderedDocument) -> Result<PostPage> {
        let published = doc.front_matter.parse_date()?;
        Ok(PostPage {
            id: id.to_string(),
            slug,
            title: doc.front_matter.title_or(id),
            date: format_date(&published, &self.site.config.index.date_format),
            categories: doc.front_matter.categories().cloned(),
            content: doc.content,
        })
    }

    /// Source file for an id, preferring `.md`
    fn post_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(Error::parse(format!("post id {:?}", id), "not a file name"));
        }

        let md = self.site.content_dir.join(format!("{}.md", id));
        if md.exists() {
            return Ok(md);
        }
        let markdown = self.site.content_dir.join(format!("{}.markdown", id));
        if markdown.exists() {
            return Ok(markdown);
        }
        // Report the conventional name
        Ok(md)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
