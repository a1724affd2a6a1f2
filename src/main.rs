mod cli;

use scrubview::{
    config::{self, Config},
    JellyfinClient, MediaServer, PreviewLoader,
};
use scrubview_common::time::{format_timestamp, parse_timestamp};
use scrubview_common::{ItemId, MediaSourceId};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use image::ImageFormat;
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "scrubview=trace,scrubview_media=debug,reqwest=debug".to_string()
        } else {
            "scrubview=info,scrubview_media=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info {
            item,
            json,
            media_source,
        } => {
            let config = load_with_source(cli.config.as_deref(), media_source)?;
            block_on(show_info(config, &item, json))
        }
        Commands::Preview {
            item,
            position,
            output,
            media_source,
        } => {
            let config = load_with_source(cli.config.as_deref(), media_source)?;
            let position_ms = parse_timestamp(&position)?;
            block_on(write_preview(config, &item, position_ms, &output))
        }
        Commands::Strip {
            item,
            count,
            output_dir,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            block_on(write_strip(config, &item, count, &output_dir))
        }
        Commands::Ping => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            block_on(ping(config))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("scrubview {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(future)
}

fn load_with_source(path: Option<&Path>, media_source: Option<String>) -> Result<Config> {
    let mut config = config::load_config_or_default(path)?;
    if let Some(id) = media_source {
        config.preview.media_source_id = Some(MediaSourceId::new(id));
    }
    Ok(config)
}

fn connect(config: &Config) -> Result<Arc<dyn MediaServer>> {
    let user_id = config::require_credentials(config)?;
    Ok(Arc::new(JellyfinClient::new(&config.server, user_id)))
}

fn loader_for(config: &Config, item: &str) -> Result<PreviewLoader> {
    let item_id: ItemId = item.parse()?;
    let server = connect(config)?;
    Ok(PreviewLoader::new(server, item_id, &config.preview))
}

async fn show_info(config: Config, item: &str, json: bool) -> Result<()> {
    let loader = loader_for(&config, item)?;
    let descriptor = loader
        .resolve_descriptor()
        .await
        .with_context(|| format!("No usable trickplay data for item {}", item))?;

    if json {
        println!("{}", serde_json::to_string_pretty(descriptor.as_ref())?);
        return Ok(());
    }

    println!("Item: {}", loader.item_id());
    println!("Media source: {}", descriptor.media_source_id);
    println!(
        "Sheet: {}x{} ({}x{} tiles)",
        descriptor.sheet_width,
        descriptor.sheet_height,
        descriptor.tile_count_x,
        descriptor.tile_count_y
    );
    println!(
        "Thumbnails: {} across {} sheet(s)",
        descriptor.thumbnail_count,
        descriptor.sheet_count()
    );
    println!("Interval: {} ms", descriptor.interval_ms);
    println!("Covers: {}", format_timestamp(descriptor.covered_ms()));
    println!("Bandwidth: {}", descriptor.bandwidth);

    Ok(())
}

async fn write_preview(config: Config, item: &str, position_ms: u64, output: &Path) -> Result<()> {
    let loader = loader_for(&config, item)?;

    let thumbnail = loader
        .try_load_preview(position_ms)
        .await
        .with_context(|| format!("No preview at {}", format_timestamp(position_ms)))?;

    thumbnail
        .to_rgb8()
        .save_with_format(output, ImageFormat::Jpeg)
        .with_context(|| format!("Failed to write {:?}", output))?;

    println!(
        "{} {}x{} -> {}",
        format_timestamp(position_ms),
        thumbnail.width(),
        thumbnail.height(),
        output.display()
    );
    loader.release();
    Ok(())
}

async fn write_strip(config: Config, item: &str, count: u32, output_dir: &Path) -> Result<()> {
    if count == 0 {
        anyhow::bail!("Count must be at least 1");
    }

    let loader = Arc::new(loader_for(&config, item)?);
    let descriptor = loader
        .resolve_descriptor()
        .await
        .with_context(|| format!("No usable trickplay data for item {}", item))?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {:?}", output_dir))?;

    let positions = strip_positions(descriptor.covered_ms(), count);

    let tasks = positions.iter().map(|&position_ms| {
        let loader = Arc::clone(&loader);
        async move { (position_ms, loader.load_preview(position_ms).await) }
    });
    let results = futures::future::join_all(tasks).await;

    let mut written = 0;
    for (i, (position_ms, thumbnail)) in results.into_iter().enumerate() {
        let Some(thumbnail) = thumbnail else {
            println!("  {} (no preview)", format_timestamp(position_ms));
            continue;
        };
        let path = output_dir.join(format!("preview_{:03}_{}ms.jpg", i, position_ms));
        thumbnail
            .to_rgb8()
            .save_with_format(&path, ImageFormat::Jpeg)
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!("  {} -> {}", format_timestamp(position_ms), path.display());
        written += 1;
    }

    println!("Wrote {} of {} previews", written, count);
    loader.release();
    Ok(())
}

/// `count` evenly spaced positions across `covered_ms`, starting at 0.
fn strip_positions(covered_ms: u64, count: u32) -> Vec<u64> {
    let count = u128::from(count);
    (0..count)
        .map(|i| (i * u128::from(covered_ms) / count) as u64)
        .collect()
}

async fn ping(config: Config) -> Result<()> {
    let user_id = config::require_credentials(&config)?;
    let client = JellyfinClient::new(&config.server, user_id);

    if client.test_connection().await? {
        println!("✓ {} is reachable", client.base_url());
        Ok(())
    } else {
        anyhow::bail!("{} answered but rejected the request", client.base_url())
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => match config::find_config_file() {
            Some(found) => {
                println!("Validating config: {:?}", found);
                config::load_config(&found)?
            }
            None => {
                println!("No config file found, using defaults");
                config::load_config_or_default(None)?
            }
        },
    };

    println!("✓ Configuration is valid");
    println!("  Server: {}", config.server.url);
    println!("  API key set: {}", !config.server.api_key.is_empty());
    println!(
        "  User: {}",
        config
            .server
            .user_id
            .map(|u| u.to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!(
        "  Preview cache: {} entries, evict {} at a time",
        config.preview.cache_capacity, config.preview.eviction_batch
    );
    println!("  Sheet cache: {} sheets", config.preview.sheet_cache_capacity);
    println!("  Out of range: {:?}", config.preview.out_of_range);

    Ok(())
}
