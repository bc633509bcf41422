use clap::{Parser, Subcommand};
use simrec::{ArtifactStore, ImageFetcher, NoImages, RecommenderConfig, RestApi, TmdbConfig, TmdbPosterClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend similar items from a precomputed similarity matrix
#[derive(Parser, Debug)]
#[command(name = "simrec")]
#[command(about = "Item-to-item recommender over precomputed similarities", long_about = None)]
struct Args {
    /// Directory holding the catalog and similarity artifacts
    #[arg(short, long, default_value = "./artifacts")]
    data_dir: PathBuf,

    /// Catalog file name inside the data directory
    #[arg(long, default_value = simrec_storage::DEFAULT_CATALOG_FILE)]
    catalog_file: String,

    /// Similarity matrix file name inside the data directory
    #[arg(long, default_value = simrec_storage::DEFAULT_MATRIX_FILE)]
    matrix_file: String,

    /// TMDB API key; posters are skipped when unset
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    tmdb_api_key: Option<String>,

    /// Per-request timeout for poster lookups
    #[arg(long, default_value_t = 5)]
    image_timeout_secs: u64,

    /// Maximum concurrent poster lookups per recommendation
    #[arg(long, default_value_t = simrec_core::DEFAULT_IMAGE_CONCURRENCY)]
    image_concurrency: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8501)]
        http_port: u16,
    },
    /// Print recommendations for one title
    Recommend {
        title: String,

        /// Number of recommendations; defaults to 5, capped at the catalog size
        #[arg(short)]
        k: Option<usize>,
    },
    /// List catalog titles in order
    Titles,
}

fn image_fetcher(args: &Args) -> anyhow::Result<Arc<dyn ImageFetcher>> {
    match &args.tmdb_api_key {
        Some(key) if !key.is_empty() => {
            let config = TmdbConfig::new(key.clone())
                .with_timeout(Duration::from_secs(args.image_timeout_secs));
            Ok(Arc::new(TmdbPosterClient::new(config)?))
        }
        _ => {
            warn!("TMDB_API_KEY not set; posters will be unavailable");
            Ok(Arc::new(NoImages))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting simrec v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let config = RecommenderConfig {
        image_concurrency: args.image_concurrency.max(1),
        ..RecommenderConfig::default()
    };
    let store = Arc::new(
        ArtifactStore::new(&args.data_dir)
            .with_files(args.catalog_file.clone(), args.matrix_file.clone())
            .with_config(config),
    );

    // No catalog, no service
    let recommender = store.init().map_err(|e| {
        anyhow::anyhow!(
            "{}. Run the offline pipeline to generate {:?} and {:?}",
            e,
            store.catalog_path(),
            store.matrix_path()
        )
    })?;
    let images = image_fetcher(&args)?;

    match args.command {
        Command::Serve { http_port } => {
            let storage_http = store.clone();
            let http_handle = std::thread::spawn(move || {
                info!("Starting HTTP server on port {}", http_port);
                let sys = actix_web::rt::System::new();
                sys.block_on(async {
                    if let Err(e) = RestApi::start(storage_http, images, http_port).await {
                        error!("HTTP server error: {}", e);
                    }
                })
            });

            info!("HTTP API: http://localhost:{}/", http_port);

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }
        }
        Command::Recommend { title, k } => {
            let result = match k {
                Some(k) => recommender.recommend(&title, k, images.as_ref()).await,
                None => recommender.recommend_default(&title, images.as_ref()).await,
            };
            match &result.failure {
                Some(e) => {
                    println!("Could not retrieve recommendations.");
                    println!("{}", e);
                }
                None => {
                    for (rank, entry) in result.entries.iter().enumerate() {
                        println!(
                            "{:>2}. {:<40} {:.4}  {}",
                            rank + 1,
                            entry.item.title,
                            entry.score,
                            entry.image.display()
                        );
                    }
                }
            }
        }
        Command::Titles => {
            for title in recommender.catalog().titles() {
                println!("{}", title);
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}
