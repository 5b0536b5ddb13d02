use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notebook::config::ServeArgs;
use notebook::{api, AppState};

#[derive(Parser)]
#[command(name = "notebook")]
#[command(about = "Student notebook backend: notes with attachments and a task list")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the resolved configuration and exit
    Config(ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "notebook=debug,notebook_core=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        Some(Commands::Config(args)) => {
            let config = args.into_config();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        // Default: start server with flags taken from the environment
        None => serve(ServeArgs::parse_from(["notebook"])).await?,
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.into_config();
    let addr = config.addr();

    tracing::info!(
        "Using {:?} backend in {}",
        config.backend,
        config.data_dir.display()
    );

    let state = AppState::open(config)?;
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Notebook server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
