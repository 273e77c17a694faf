//! Render a single post

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::Site;

/// Print a post's HTML, or the whole document as JSON
pub fn run(site: &Site, id: &str, json: bool) -> Result<()> {
    let loader = ContentLoader::new(site)?;
    let doc = loader.load_post(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", doc.content);
    }

    Ok(())
}
