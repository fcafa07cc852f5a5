use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use mobility_api::config::Config;
use mobility_api::domain::Dataset;
use mobility_api::logging;
use mobility_api::registry::DatasetRegistry;
use mobility_api::server::{start_server, AppState};
use mobility_api::sources::SourceDir;

#[derive(Parser)]
#[command(name = "mobility_api")]
#[command(about = "Intergenerational income mobility statistics backend")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load all datasets and serve the HTTP API
    Serve {
        /// Port to listen on (overrides config.toml)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Load all datasets and print their summaries
    Report {
        /// Only report this dataset
        #[arg(long)]
        dataset: Option<String>,
    },
}

fn build_registry(config: &Config) -> DatasetRegistry {
    let sources = SourceDir::new(&config.data.dir);
    info!("Loading datasets from '{}'", config.data.dir);
    DatasetRegistry::build(&sources, config)
}

fn print_report(dataset: &Dataset) {
    let summary = &dataset.summary;
    println!("\n📊 Dataset '{}':", dataset.name);
    println!("   Records: {}", summary.count);
    match summary.correlation {
        Some(r) => println!("   Correlation: {:.3}", r),
        None => println!("   Correlation: undefined"),
    }
    if !summary.region_mobility.is_empty() {
        println!("   Regions by mobility:");
        for entry in &summary.region_mobility {
            println!("   - {}: {:.3}", entry.region, entry.mobility);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            let registry = build_registry(&config);
            let state = AppState {
                registry: Arc::new(registry),
                default_dataset: config.server.default_dataset.clone(),
            };
            start_server(state, port).await?;
        }
        Commands::Report { dataset } => {
            let registry = build_registry(&config);
            let names = match dataset {
                Some(name) => vec![name],
                None => registry.names(),
            };
            for name in names {
                match registry.get(&name) {
                    Some(dataset) => print_report(dataset),
                    None => println!("⚠️  Unknown dataset: {}", name),
                }
            }
        }
    }
    Ok(())
}
