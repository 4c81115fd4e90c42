//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::content::ContentType;

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version = "0.1.0")]
#[command(about = "A personal portfolio and blog server", long_about = None)]
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
    /// Start the API server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (overrides _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (overrides _config.yml)
        #[arg(long)]
        host: Option<String>,
    },

    /// List on-disk content
    List {
        /// Type of content to list (blog, projects)
        #[arg(default_value = "blog")]
        r#type: String,
    },

    /// Initialize engagement counters for all on-disk content
    Init,

    /// Create a new content file
    New {
        /// Title of the new post
        title: String,

        /// Content type to create (blog, projects)
        #[arg(short, long, default_value = "blog")]
        r#type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Serve { port, host } => {
            let mut folio = folio_rs::Folio::new(&base_dir)?;
            if let Some(port) = port {
                folio.config.server.port = port;
            }
            if let Some(host) = host {
                folio.config.server.host = host;
            }

            let store = folio.document_store();
            tracing::info!(
                "Starting server at http://{}:{}",
                folio.config.server.host,
                folio.config.server.port
            );
            folio_rs::server::start(&folio, store).await?;
        }

        Commands::List { r#type } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let content_type: ContentType = r#type
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            folio_rs::commands::list::run(&folio, content_type)?;
        }

        Commands::Init => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Initializing engagement counters...");
            folio_rs::commands::init::run(&folio).await?;
        }

        Commands::New { title, r#type } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let content_type: ContentType = r#type
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            tracing::info!("Creating new {} post: {}", content_type, title);
            folio_rs::commands::new::run(&folio, &title, content_type)?;
        }
    }

    Ok(())
}
