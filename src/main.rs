use anyhow::Result;
use clap::{Parser, Subcommand};
use howfucked::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "howfucked",
    about = "Continuous health monitoring for global Internet routing and naming infrastructure",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file; defaults apply for any missing keys
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon (monitor loop + status API)
    Serve {
        /// Bind address for the status API
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
    },

    /// Run a single evaluation cycle and print the verdict
    Check {
        /// Print the full results document as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve { bind } => {
            tracing::info!(%bind, "Starting howfucked daemon");
            howfucked::serve(&bind, cfg).await?;
        }
        Commands::Check { json } => {
            tracing::info!("Running a single evaluation cycle");
            let report = howfucked::check_once(cfg).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report.results)?);
            } else {
                println!("\n{}", report.status);
                for (category, reasons) in report.reasons.iter() {
                    println!("\n{category}:");
                    let mut sorted: Vec<&String> = reasons.iter().collect();
                    sorted.sort();
                    for reason in sorted {
                        println!(" - {reason}");
                    }
                }
                println!(
                    "\nWeighted: {} - Unweighted: {}",
                    report.metrics.weighted, report.metrics.unweighted
                );
            }
        }
    }

    Ok(())
}
