use anyhow::Result;
use clap::{Parser, Subcommand};
use labtrace::common;
use labtrace::config::load_layer_map;
use labtrace::errors::GraphError;
use labtrace::graph::{build_graph, GraphInput};
use labtrace::repository::Dataset;
use labtrace::trace;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the graph, trace and search API
    #[cfg(feature = "server")]
    Serve {
        #[clap(short, long, env = "PORT", default_value = "8000")]
        port: u16,
        /// Dataset file (.json, .yaml, .yml); the bundled sample when omitted
        #[clap(short, long)]
        data: Option<PathBuf>,
        /// Layer descriptor YAML; the bundled default when omitted
        #[clap(long)]
        layers: Option<PathBuf>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Print the layered graph as JSON
    Graph {
        #[clap(short, long)]
        data: Option<PathBuf>,
        #[clap(long)]
        layers: Option<PathBuf>,
        #[clap(short, long)]
        output: Option<String>,
    },
    /// Print the upstream and downstream trace of a record
    Trace {
        id: String,
        #[clap(short, long)]
        data: Option<PathBuf>,
    },
    /// Check the dataset for integrity violations
    Check {
        #[clap(short, long)]
        data: Option<PathBuf>,
    },
    /// Write the bundled sample dataset as YAML
    Init {
        #[clap(short, long, default_value = "labtrace-data.yaml")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        #[cfg(feature = "server")]
        Commands::Serve {
            port,
            data,
            layers,
            cors_origin,
        } => {
            let (dataset, mode) = load_dataset(data.as_deref())?;
            let layers = load_layer_map(layers.as_deref())?;
            info!("Starting server on port {}", port);
            labtrace::server::start_server(
                port,
                std::sync::Arc::new(dataset),
                layers,
                mode,
                cors_origin.as_deref(),
            )
            .await?;
        }
        Commands::Graph {
            data,
            layers,
            output,
        } => {
            let (dataset, _) = load_dataset(data.as_deref())?;
            let layers = load_layer_map(layers.as_deref())?;
            let graph = build_graph(GraphInput::from_repository(&dataset), &layers);
            info!("Built graph: {}", graph.stats());
            let json = serde_json::to_string_pretty(&graph)?;
            match output {
                Some(path) => {
                    common::write_string_to_file(&path, &json)?;
                    info!("Graph written to {}", path);
                }
                None => println!("{}", json),
            }
        }
        Commands::Trace { id, data } => {
            let (dataset, _) = load_dataset(data.as_deref())?;
            let trace = trace::trace(&id, &dataset)?;
            println!("{}", serde_json::to_string_pretty(&trace)?);
        }
        Commands::Check { data } => {
            let (dataset, _) = load_dataset(data.as_deref())?;
            let layers = load_layer_map(None)?;
            let graph = build_graph(GraphInput::from_repository(&dataset), &layers);
            if let Err(violations) = graph.verify_graph_integrity() {
                for violation in &violations {
                    warn!("{}", violation);
                }
                return Err(GraphError::Validation(format!(
                    "{} integrity violations found",
                    violations.len()
                ))
                .into());
            }
            info!("No integrity violations: {}", graph.stats());
        }
        Commands::Init { output } => {
            info!("Writing sample dataset to {}", output);
            let dataset = Dataset::sample()?;
            common::write_string_to_file(&output, &dataset.to_yaml()?)?;
        }
    }

    Ok(())
}

fn load_dataset(path: Option<&Path>) -> Result<(Dataset, &'static str)> {
    match path {
        Some(path) => Ok((Dataset::load(path)?, "file")),
        None => {
            info!("No data file given, using the bundled sample dataset");
            Ok((Dataset::sample()?, "sample"))
        }
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("tower_http=warn,{}", log_level)))
        .without_time()
        .init();
}
