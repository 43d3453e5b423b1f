mod render;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tp_core::config::load_config;
use tp_core::init::{generate_trip_planner_structure, InitOptions};
use tp_core::plan_trip;
use tp_core::request::parse_request;
use tp_protocol::ipc::Event;
use tp_protocol::trip_models::PlanResponse;
use tp_protocol::travel_models::HealthStatus;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "trip", version, about = "Plan a family trip from a JSON request")]
struct Cli {
    /// Include debug logs on stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a trip and print the itinerary.
    Plan {
        /// Path to the request JSON, or `-` for stdin.
        #[arg(short, long)]
        request: String,

        /// Project root containing `.trip-planner/`.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Print the raw response JSON instead of the itinerary.
        #[arg(long)]
        json: bool,
    },
    /// Probe every configured provider.
    Health {
        #[arg(long, default_value = ".")]
        root: PathBuf,

        #[arg(long)]
        json: bool,
    },
    /// Scaffold a `.trip-planner/` directory.
    Init {
        #[arg(long, default_value = ".")]
        target: PathBuf,

        /// Overwrite an existing `.trip-planner/` directory.
        #[arg(long)]
        force: bool,

        /// Write only `config.toml`.
        #[arg(long)]
        minimal: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let succeeded = match cli.command {
        Command::Plan {
            request,
            root,
            json,
        } => plan(&request, &root, json).await?,
        Command::Health { root, json } => health(&root, json).await?,
        Command::Init {
            target,
            force,
            minimal,
        } => {
            init(InitOptions {
                target_dir: target,
                force,
                minimal,
            })
            .await?
        }
    };

    if !succeeded {
        std::io::stdout().flush()?;
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn read_request(source: &str) -> color_eyre::Result<String> {
    if source == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .wrap_err("Failed to read request from stdin")?;
        return Ok(body);
    }
    tokio::fs::read_to_string(source)
        .await
        .wrap_err_with(|| format!("Failed to read request file {source}"))
}

async fn plan(source: &str, root: &Path, json: bool) -> color_eyre::Result<bool> {
    let config = load_config(root)
        .await
        .wrap_err_with(|| format!("Failed to load configuration from {}", root.display()))?;
    tracing::debug!(
        root = %root.display(),
        providers = config.providers.len(),
        "configuration loaded"
    );
    let body = read_request(source).await?;

    let response = match parse_request(&body) {
        Ok(request) => {
            let providers = Arc::new(config.build_providers());
            let (tx, rx) = mpsc::channel(64);
            let printer = tokio::spawn(print_events(rx));
            let response = plan_trip(request, providers, &config.global, Some(tx)).await;
            printer.await.map_err(|e| eyre!("event printer failed: {e}"))?;
            response
        }
        Err(err) => PlanResponse::from(err),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        match (&response.data, &response.error) {
            (Some(data), _) => print!("{}", render::plan(data)),
            (None, error) => eprintln!(
                "{}",
                render::failure(error.as_deref().unwrap_or("planning failed"))
            ),
        }
    }
    Ok(response.success)
}

async fn print_events(rx: mpsc::Receiver<Event>) {
    let mut events = ReceiverStream::new(rx);
    while let Some(event) = events.next().await {
        if let Some(line) = render::event(&event) {
            eprintln!("{line}");
        }
    }
}

async fn health(root: &Path, json: bool) -> color_eyre::Result<bool> {
    let config = load_config(root)
        .await
        .wrap_err_with(|| format!("Failed to load configuration from {}", root.display()))?;
    let report = config.build_providers().health_check().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::health(&report));
    }
    Ok(report.status == HealthStatus::Healthy)
}

async fn init(options: InitOptions) -> color_eyre::Result<bool> {
    let written = generate_trip_planner_structure(options).await?;
    for path in written {
        println!("created {}", path.display());
    }
    Ok(true)
}
