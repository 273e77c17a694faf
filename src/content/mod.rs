//! Content module - posts, front-matter and the markdown pipeline

mod frontmatter;
pub mod loader;
mod markdown;
pub mod pipeline;
mod post;
pub mod slug;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{PostEntry, PostPage, PostSummary, RenderedDocument};
