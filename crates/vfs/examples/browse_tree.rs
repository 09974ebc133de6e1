//! Example: Browse a mount tree over an in-memory blob store.
//!
//! Usage:
//!   cargo run -p blobmount-vfs --example browse_tree -- <config.json> <blobs.json> [options]
//!
//! Options:
//!   --depth <n>     Maximum depth to print (default: 3)
//!   --read <path>   Print the content of one file instead of the tree
//!
//! The blobs file is a JSON array of seeded blobs:
//!
//! ```json
//! [
//!   { "id": "D1", "meta": { "name": "docs", "blob_type": "Directory" } },
//!   { "id": "F1", "meta": { "name": "a.txt", "blob_type": "File", "size": 5,
//!     "tags": ["photos"], "parents": ["D1"] }, "content": "hello" }
//! ]
//! ```
//!
//! Set `RUST_LOG=blobmount_vfs=debug` to see resolution steps.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use blobmount_model::BlobMeta;
use blobmount_vfs::{
    BlobFilesystem, BlobStore, ByteRange, Entry, FilesystemConfig, MemoryBlobStore, MountOptions,
    VfsError,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// One blob of the fixture file.
#[derive(Deserialize)]
struct SeedBlob {
    id: String,
    meta: BlobMeta,
    #[serde(default)]
    content: String,
}

struct CliArgs {
    config_path: PathBuf,
    blobs_path: PathBuf,
    depth: usize,
    read: Option<String>,
}

impl CliArgs {
    /// Parse CLI arguments.
    ///
    /// # Returns
    /// Parsed CLI arguments or None if help was requested or args invalid.
    fn parse() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();

        if args.len() < 3 || args.iter().any(|a| a == "--help" || a == "-h") {
            Self::print_usage(&args[0]);
            return None;
        }

        let mut config_path: Option<PathBuf> = None;
        let mut blobs_path: Option<PathBuf> = None;
        let mut depth: usize = 3;
        let mut read: Option<String> = None;

        let mut i: usize = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--depth" => {
                    i += 1;
                    depth = args.get(i)?.parse().ok()?;
                }
                "--read" => {
                    i += 1;
                    read = Some(args.get(i)?.clone());
                }
                arg if !arg.starts_with('-') => {
                    if config_path.is_none() {
                        config_path = Some(PathBuf::from(arg));
                    } else if blobs_path.is_none() {
                        blobs_path = Some(PathBuf::from(arg));
                    }
                }
                _ => {
                    eprintln!("Unknown option: {}", args[i]);
                    Self::print_usage(&args[0]);
                    return None;
                }
            }
            i += 1;
        }

        Some(Self {
            config_path: config_path?,
            blobs_path: blobs_path?,
            depth,
            read,
        })
    }

    /// Print usage information.
    ///
    /// # Arguments
    /// * `program` - Program name for usage message
    fn print_usage(program: &str) {
        eprintln!("Usage: {} <config.json> <blobs.json> [options]", program);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --depth <n>     Maximum depth to print (default: 3)");
        eprintln!("  --read <path>   Print the content of one file instead of the tree");
    }
}

/// Load the fixture blobs into a fresh memory store.
fn seed_store(path: &Path) -> Result<MemoryBlobStore, Box<dyn std::error::Error>> {
    let json: String = std::fs::read_to_string(path)?;
    let blobs: Vec<SeedBlob> = serde_json::from_str(&json)?;

    let store: MemoryBlobStore = MemoryBlobStore::new();
    for blob in blobs {
        store.insert(blob.id, blob.meta, blob.content.into_bytes());
    }
    Ok(store)
}

/// Print the tree depth-first, up to `max_depth` levels.
async fn print_tree(fs: &BlobFilesystem, max_depth: usize) -> Result<(), VfsError> {
    let mut pending: Vec<(Entry, usize)> = Vec::new();
    for entry in fs.list("").await?.into_iter().rev() {
        pending.push((entry, 0));
    }

    while let Some((entry, depth)) = pending.pop() {
        let indent: String = "  ".repeat(depth);
        match &entry {
            Entry::File(file) => {
                println!("{}{} ({} bytes, {})", indent, file.name(), file.size(), file.id())
            }
            Entry::Directory(dir) => println!("{}{}/ ({})", indent, dir.name(), dir.id()),
            Entry::Virtual(vdir) => println!("{}{}/", indent, vdir.name()),
        }

        if entry.is_dir() && depth + 1 < max_depth {
            for child in fs.list(entry.path()).await?.into_iter().rev() {
                pending.push((child, depth + 1));
            }
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: CliArgs = match CliArgs::parse() {
        Some(a) => a,
        None => std::process::exit(1),
    };

    let config: FilesystemConfig = FilesystemConfig::load(&args.config_path)?;
    let store: Arc<dyn BlobStore> = Arc::new(seed_store(&args.blobs_path)?);
    println!(
        "Mounting profile '{}' at {} (in-memory store)",
        config.profile,
        config.mount_point.display()
    );

    let runtime: tokio::runtime::Runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let fs: BlobFilesystem =
            BlobFilesystem::from_config(&config, store, MountOptions::default())?;

        match &args.read {
            Some(path) => {
                let content: Vec<u8> = fs.read(path, ByteRange::full()).await?;
                println!("{}", String::from_utf8_lossy(&content));
            }
            None => print_tree(&fs, args.depth).await?,
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
