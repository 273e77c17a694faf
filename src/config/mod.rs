//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::IndexConfig;
pub use site::MarkdownConfig;
pub use site::SiteConfig;
pub use site::SlugConfig;
pub use site::SlugStyle;
