use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use photofeed::application::{RefreshFeedUseCase, RetrieveResourceUseCase};
use photofeed::domain::{ConnectivityStatus, ImageVariant, Post};
use photofeed::infrastructure::config::CacheConfig;
use photofeed::infrastructure::{
    AppConfig, CliArgs, ConfigStorage, ConnectivityMonitor, DiskByteStore, HttpTransport,
    MemoryByteStore, TieredByteStore,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let storage = ConfigStorage::locate(args.config.as_deref())?;
    let mut config = storage
        .load_config()
        .wrap_err_with(|| format!("failed to load {}", storage.path().display()))?;
    config.merge_with_args(args);
    Ok(config)
}

fn build_store(config: &CacheConfig) -> TieredByteStore {
    let memory = MemoryByteStore::new(config.memory_entries);
    if !config.disk_enabled {
        return TieredByteStore::memory_only(memory);
    }

    let disk = config
        .effective_dir()
        .and_then(|dir| match DiskByteStore::new(dir, config.disk_max_bytes) {
            Ok(disk) => Some(disk),
            Err(e) => {
                warn!(error = %e, "Disk cache unavailable, continuing in memory");
                None
            }
        });
    TieredByteStore::new(memory, disk)
}

fn print_posts(posts: &[Post]) {
    for post in posts {
        println!(
            "{}  {}",
            post.published_date().format("%Y-%m-%d %H:%M"),
            post.title().filter(|t| !t.is_empty()).unwrap_or("(untitled)")
        );
        println!("    {}", post.link());
        if let Some(author) = post.author() {
            println!("    by {author}");
        }
        if let Some(url) = post.image_url(ImageVariant::Large) {
            println!("    {url} ({})", post.preview_size());
        }
        let tags: Vec<_> = post.tag_list().collect();
        if !tags.is_empty() {
            println!("    #{}", tags.join(" #"));
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let config = load_config()?;
    init_logging(&config)?;

    info!(version = photofeed::VERSION, "Starting photofeed");

    let feed_url = config.feed.base_url()?;
    let transport = Arc::new(HttpTransport::new(
        &config.network.user_agent,
        config.network.timeout(),
    )?);
    let store = Arc::new(build_store(&config.cache));

    let monitor = Arc::new(ConnectivityMonitor::new(ConnectivityStatus::from(
        !config.offline,
    )));
    let probe_host = config.network.probe_host.trim();
    let _probe = if config.offline || probe_host.is_empty() {
        None
    } else {
        monitor.set_status(ConnectivityMonitor::probe(probe_host, config.network.timeout()).await);
        Some(monitor.start_probe(
            probe_host.to_string(),
            config.network.probe_interval(),
            config.network.timeout(),
        ))
    };

    let retrieve = RetrieveResourceUseCase::new(store.clone(), transport, monitor.clone());
    let refresh = RefreshFeedUseCase::new(retrieve, feed_url);

    let posts = refresh
        .execute(&config.feed.tags, config.feed.sort_order)
        .await
        .map_err(|e| eyre!("{}: {}", e.title(), e.failure_reason()))?;

    println!("{} posts, sorted by {}", posts.len(), config.feed.sort_order);
    print_posts(&posts);

    if let Some(variant) = config.prefetch {
        let outcomes = refresh
            .prefetch(&posts, variant, config.network.max_concurrent_downloads)
            .await;
        let fetched = outcomes.iter().filter(|o| o.is_ok()).count();
        println!("prefetched {fetched}/{} {variant} images", outcomes.len());
    }

    monitor.stop();
    debug!(stats = %store.memory().stats(), "Shutting down");

    Ok(())
}
