use anyhow::Result;
use clap::{Parser, Subcommand};
use docsearch_common::{logger, AppConfig};
use std::path::PathBuf;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            return None;
        }
    }
}

/// Load .env file from project root, falling back to the working directory
fn load_dotenv() {
    match find_project_root().map(|root| root.join(".env")) {
        Some(env_path) if env_path.exists() => {
            dotenv::from_path(&env_path).ok();
        }
        _ => {
            dotenv::dotenv().ok();
        }
    }
}

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "docsearch - in-memory semantic document search service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Embedding provider (ollama or gemini)
        #[arg(long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv();

    let mut config = AppConfig::from_env()?;

    if let Some(Commands::Serve {
        host,
        port,
        provider,
    }) = cli.command
    {
        if let Some(host) = host {
            config.server_host = host;
        }
        if let Some(port) = port {
            config.server_port = port;
        }
        if let Some(provider) = provider {
            config.embedding_provider = provider.parse()?;
            if std::env::var("EMBEDDING_MODEL").is_err() {
                config.embedding_model = config.embedding_provider.default_model().to_string();
            }
        }
        config.validate()?;
    }

    if let Err(e) = logger::setup_logging(&config.log_dir, &config.log_level) {
        eprintln!("File logging unavailable ({}), using console only", e);
        logger::setup_console_logging(&config.log_level)?;
    }

    tracing::info!("docsearch starting...");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!(
        "  Embeddings: {} ({}, dim={})",
        config.embedding_provider,
        config.embedding_model,
        config.embedding_dim
    );

    docsearch_server::start_server(config).await?;

    Ok(())
}
