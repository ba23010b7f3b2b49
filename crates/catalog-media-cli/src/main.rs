//! catalog-media: ingest local image files into the catalog upload store.
//!
//! Configuration comes from the environment (and `.env`): UPLOAD_DIR,
//! BASE_URL, MAX_FILE_SIZE_MB, IMAGE_MAX_WIDTH, THUMBNAIL_SIZE, ...

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use catalog_media_cli::{init_tracing, read_raw_file, upload_files};
use catalog_media_core::{AssetKind, MediaConfig, UrlResolver};
use catalog_media_processing::UploadPipeline;
use catalog_media_storage::{LocalStorage, Storage};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalog-media", about = "Catalog image upload pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the upload directories
    Init,
    /// Upload one or more image files
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the public URL of a stored file
    Url {
        /// Stored filename
        filename: String,
        /// Asset kind: original, processed, thumbnail
        #[arg(long, default_value = "original")]
        kind: AssetKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = MediaConfig::from_env().context("Invalid configuration")?;
    let resolver = UrlResolver::new(Some(&config.storage.base_url));

    match cli.command {
        Commands::Init => {
            let storage = LocalStorage::new(&config.storage);
            storage.init().await?;
            println!("{}", config.storage.images_dir().display());
            println!("{}", config.storage.thumbnails_dir().display());
        }
        Commands::Upload { files } => {
            let storage = LocalStorage::new(&config.storage);
            storage.init().await?;
            let pipeline = UploadPipeline::new(&config, Arc::new(storage));

            let mut raw_files = Vec::with_capacity(files.len());
            for path in &files {
                raw_files.push(read_raw_file(path).await?);
            }

            tracing::info!(
                files = raw_files.len(),
                root = %config.storage.root_dir.display(),
                "Uploading"
            );
            let report = upload_files(&pipeline, &resolver, raw_files).await?;
            println!("{}", serde_json::to_string_pretty(&report.body)?);
            if !report.success {
                std::process::exit(1);
            }
        }
        Commands::Url { filename, kind } => {
            println!("{}", resolver.resolve(&filename, kind));
        }
    }

    Ok(())
}
