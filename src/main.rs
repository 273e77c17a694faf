//! CLI entry point for dots-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dots-rs")]
#[command(version = "0.1.0")]
#[command(about = "Content pipeline for a markdown blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the post index and post pages
    #[command(alias = "b")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List posts, newest first
    List,

    /// Render a single post to stdout
    Render {
        /// Post id (file name without extension)
        id: String,

        /// Print the document with its front-matter as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "dots_rs=debug,info"
    } else {
        "dots_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build { watch } => {
            let site = dots_rs::Site::new(&base_dir)?;
            tracing::info!("Building site data...");

            site.build()?;
            println!("Built successfully!");

            if watch {
                dots_rs::commands::build::watch(&site).await?;
            }
        }

        Commands::List => {
            let site = dots_rs::Site::new(&base_dir)?;
            dots_rs::commands::list::run(&site)?;
        }

        Commands::Render { id, json } => {
            let site = dots_rs::Site::new(&base_dir)?;
            dots_rs::commands::render::run(&site, &id, json)?;
        }

        Commands::Clean => {
            let site = dots_rs::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("dots-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
