use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frog::api::{self, AppState, SecurityConfig};
use frog::catalog::{CatalogClient, Library};
use frog::config::Config;
use frog::optim::OptimizerClient;

#[derive(Parser)]
#[command(name = "frog")]
#[command(about = "Classroom orchestration: activity library and optimizer relay")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Search the activity catalog
    Library {
        /// Case-insensitive search over type, title, description and tags
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Ask the optimizer for a recommendation
    Recommend {
        /// Context as JSON
        #[arg(short, long)]
        context: String,
    },
    /// Report a score to the optimizer
    Report {
        /// Context as JSON
        #[arg(short, long)]
        context: String,
        /// Item as JSON
        #[arg(short, long)]
        item: String,
        /// Score as JSON
        #[arg(short, long)]
        score: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "frog=debug,tower_http=debug".into()),
    );

    // stdout carries command output, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_json(name: &str, raw: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).with_context(|| format!("--{} is not valid JSON", name))
}

async fn serve(config: &Config, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting FROG server on port {}", port);
    tracing::info!("Catalog: {}", config.catalog_url);
    tracing::info!("Optimizer: {}", config.optimizer_url);

    let app = api::create_router(AppState::from_config(config), SecurityConfig::from_env());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("FROG server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load();

    match cli.command {
        Some(Commands::Serve { port }) => {
            serve(&config, port.unwrap_or(config.port)).await?;
        }
        Some(Commands::Library { search }) => {
            let mut library = Library::new(CatalogClient::new(&config.catalog_url));
            library.mount().await?;

            let results = library.results(&search);
            if results.is_empty() {
                println!("No result");
            }
            for entry in results {
                println!(
                    "{}  {:<20}  {}",
                    entry.uuid,
                    entry.activity_type.as_deref().unwrap_or("-"),
                    entry.title
                );
            }
        }
        Some(Commands::Recommend { context }) => {
            let optimizer = OptimizerClient::new(&config.optimizer_url);
            let response = optimizer.recommend(parse_json("context", &context)?).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Some(Commands::Report {
            context,
            item,
            score,
        }) => {
            let optimizer = OptimizerClient::new(&config.optimizer_url);
            let response = optimizer
                .report(
                    parse_json("context", &context)?,
                    parse_json("item", &item)?,
                    parse_json("score", &score)?,
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        None => serve(&config, config.port).await?,
    }

    Ok(())
}
