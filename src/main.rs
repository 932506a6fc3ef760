//! AutoHunter main entry point
//!
//! This is the command-line interface for scanning directory listings,
//! bundling files into archives, and running the HTTP service.

use anyhow::{bail, Context};
use autohunter::archive::{normalize_payload, normalize_refs, ArchivePackager, FileRef};
use autohunter::category::FileCategory;
use autohunter::config::{
    default_config, load_config_with_hash, load_env_file, load_env_file_from, Config,
};
use autohunter::crawler::{DirectoryCrawler, ScanRequest};
use autohunter::url::UrlAdvisory;
use autohunter::HunterError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// AutoHunter: find and bundle files from HTTP directory listings
///
/// AutoHunter walks Apache/Nginx-style directory listings, collects links to
/// files of a chosen type, and packages selected files into one ZIP archive.
#[derive(Parser, Debug)]
#[command(name = "autohunter")]
#[command(version)]
#[command(about = "Find and bundle files from HTTP directory listings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Dotenv file to load instead of `.env` (variables such as PORT)
    #[arg(long, value_name = "FILE", global = true)]
    env_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Scan a directory listing and print the files found
    Scan {
        /// Listing URL (or direct file URL) to start from
        url: String,

        /// File type to collect: zip, images or pdf
        #[arg(long, default_value = "zip")]
        file_type: FileCategory,

        /// Also collect src links of embedded resources (img, script, ...)
        #[arg(long)]
        include_src: bool,

        /// Number of listing levels to visit (defaults to the configured depth)
        #[arg(long)]
        max_depth: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download files into a single ZIP archive
    Download {
        /// URLs or JSON descriptors ({"url": ..., "filename": ...})
        entries: Vec<String>,

        /// JSON file holding a file list (as accepted by POST /download)
        #[arg(long, value_name = "FILE", conflicts_with = "entries")]
        input: Option<PathBuf>,

        /// Where to write the archive
        #[arg(short, long, default_value = "autohunter_files.zip")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // .env must be loaded before environment overrides are applied
    match &cli.env_file {
        Some(path) => {
            if load_env_file_from(path).is_none() {
                bail!("failed to load environment file {}", path.display());
            }
        }
        None => {
            load_env_file();
        }
    }

    let config = load_configuration(cli.config.as_ref())?;

    match cli.command {
        Command::Serve { port } => handle_serve(config, port).await,
        Command::Scan {
            url,
            file_type,
            include_src,
            max_depth,
            json,
        } => {
            let request = ScanRequest::new(url, file_type)
                .with_embedded_src(include_src)
                .with_max_depth(max_depth.unwrap_or(config.crawler.max_depth));
            handle_scan(&config, request, json).await
        }
        Command::Download {
            entries,
            input,
            output,
        } => handle_download(&config, entries, input, output).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("autohunter=info,warn"),
            1 => EnvFilter::new("autohunter=debug,info"),
            2 => EnvFilter::new("autohunter=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file if one was given, defaults otherwise
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(default_config()?);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Runs the HTTP service
async fn handle_serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!(
        "Default scan depth: {}, request timeout: {}s, probe timeout: {}s",
        config.crawler.max_depth,
        config.crawler.request_timeout_secs,
        config.crawler.probe_timeout_secs
    );

    autohunter::server::serve(config).await?;
    Ok(())
}

/// Runs one scan and prints the descriptors
async fn handle_scan(config: &Config, mut request: ScanRequest, json: bool) -> anyhow::Result<()> {
    request.validate()?;
    if request.max_depth > config.crawler.max_depth_limit {
        bail!(
            "max depth {} exceeds the configured limit of {}",
            request.max_depth,
            config.crawler.max_depth_limit
        );
    }

    UrlAdvisory::inspect(&request.root_url).log(&request.root_url);

    let crawler = DirectoryCrawler::new(config.crawler.clone())?;
    let result = crawler.scan(&request).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for file in &result.files {
        println!("{:>12}  {:<40}  {}", file.size, file.filename, file.url);
    }
    println!(
        "\nFound {} files of type {}",
        result.count, request.category
    );

    Ok(())
}

/// Downloads the given entries into a ZIP file on disk
async fn handle_download(
    config: &Config,
    entries: Vec<String>,
    input: Option<PathBuf>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let batch = match input {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let payload: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()))?;
            normalize_payload(&payload)?
        }
        None => normalize_refs(entries.iter().map(|entry| Some(FileRef::from_text(entry)))),
    };

    if batch.skipped > 0 {
        tracing::warn!("Skipped {} unusable entries", batch.skipped);
    }
    if batch.entries.is_empty() {
        bail!("no usable file entries given");
    }

    let packager = ArchivePackager::new(config.archive.clone())?;
    let result = match packager.package(&batch.entries).await {
        Ok(result) => result,
        Err(HunterError::NothingDownloaded { errors }) => {
            for error in &errors {
                eprintln!("  {}", error);
            }
            bail!("no files could be downloaded");
        }
        Err(e) => return Err(e.into()),
    };

    std::fs::write(&output, &result.archive_bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "✓ Wrote {} ({} downloaded, {} failed)",
        output.display(),
        result.downloaded_count,
        result.failed_count
    );
    for error in &result.errors {
        println!("  ✗ {}", error);
    }

    Ok(())
}
