//! Build the post index and post pages

use anyhow::{Context, Result};
use notify::Watcher;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::content::loader::ContentLoader;
use crate::content::PostPage;
use crate::Site;

/// Build `posts.json` and one JSON file per post into the public directory
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let loader = ContentLoader::new(site)?;
    let (summaries, pages) = loader.load_index()?;

    fs::create_dir_all(&site.public_dir)
        .with_context(|| format!("Failed to create {:?}", site.public_dir))?;
    write_json(&site.public_dir.join("posts.json"), &summaries)?;

    for page in &pages {
        write_json(&page_path(&site.public_dir, page), page)?;
    }

    let duration = start.elapsed();
    tracing::info!(
        "Built {} posts in {:.2}s",
        pages.len(),
        duration.as_secs_f64()
    );

    Ok(())
}

/// `<public>/blog/<segment>/.../<last segment>.json`
fn page_path(public_dir: &Path, page: &PostPage) -> PathBuf {
    let mut path = public_dir.join("blog");
    if let Some((last, parents)) = page.slug.split_last() {
        for segment in parents {
            path.push(segment);
        }
        path.push(format!("{}.json", last));
    }
    path
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

/// Watch for file changes and rebuild
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    // Watch content directory
    watcher.watch(&site.content_dir, notify::RecursiveMode::NonRecursive)?;

    // Watch config file
    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let debounce = Duration::from_millis(500);

    while let Some(events) = next_change(&mut rx, debounce).await {
        tracing::info!("{} file events, rebuilding...", events);
        let site = match Site::new(&site.base_dir) {
            Ok(site) => site,
            Err(e) => {
                tracing::error!("Failed to reload config: {}", e);
                continue;
            }
        };
        if let Err(e) = run(&site) {
            tracing::error!("Build failed: {:#}", e);
        }
    }

    Ok(())
}

/// Wait for a change, then fold the rest of its burst into it
///
/// Returns how many events were coalesced, or `None` once the channel closes.
/// Events that arrive while a rebuild runs stay queued and start the next one.
async fn next_change<T>(
    rx: &mut mpsc::UnboundedReceiver<T>,
    debounce: Duration,
) -> Option<usize> {
    rx.recv().await?;
    let mut events = 1;

    loop {
        tokio::time::sleep(debounce).await;
        let mut drained = 0;
        while rx.try_recv().is_ok() {
            drained += 1;
        }
        if drained == 0 {
            return Some(events);
        }
        events += drained;
    }
}
