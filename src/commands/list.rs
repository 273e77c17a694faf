//! List posts

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::Site;

/// Print the post listing, newest first
pub fn run(site: &Site) -> Result<()> {
    let loader = ContentLoader::new(site)?;
    let summaries = loader.load_summaries()?;

    println!("Posts ({}):", summaries.len());
    for post in summaries {
        println!(
            "  {} - {} [{}]",
            post.published.format("%Y-%m-%d"),
            post.title,
            post.slug.join("/")
        );
    }

    Ok(())
}
