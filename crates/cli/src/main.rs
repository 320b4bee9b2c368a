mod serve;
mod tracker;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// VeriFarm supply-chain product registry.
#[derive(Parser)]
#[command(
    name = "verifarm",
    version,
    about = "VeriFarm supply-chain product registry"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Registry API base URL (default: $VERIFARM_API_URL or http://localhost:3001/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the registry HTTP API
    Serve {
        /// Port to listen on (default: $PORT or 3001)
        #[arg(long)]
        port: Option<u16>,
        /// Registry JSON file (default: $VERIFARM_DATA or products.json)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Check that the registry API is up
    Health,

    /// List every registered product
    List,

    /// Show a product's summary and supply-chain timeline
    Track {
        /// Product identifier (case-insensitive); the first demo product when omitted
        #[arg(default_value = "AGT001")]
        id: String,
        /// Print the HTML fragment instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Register a new product
    Add {
        /// Product name
        #[arg(long, default_value = "")]
        name: String,
        /// Originating farm
        #[arg(long, default_value = "")]
        farm: String,
        /// Harvest date, e.g. 2024-01-15
        #[arg(long, default_value = "")]
        harvest_date: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, data } => {
            init_tracing("info");
            let config = match serve::ServeConfig::resolve(port, data) {
                Ok(config) => config,
                Err(e) => {
                    report_error(&format!("error: {}", e), cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("error: failed to create tokio runtime: {}", e);
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(config)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Health => {
            init_tracing("warn");
            tracker::cmd_health(cli.api_url.as_deref(), cli.output, cli.quiet);
        }
        Commands::List => {
            init_tracing("warn");
            tracker::cmd_list(cli.api_url.as_deref(), cli.output, cli.quiet);
        }
        Commands::Track { id, html } => {
            init_tracing("warn");
            tracker::cmd_track(cli.api_url.as_deref(), &id, html, cli.output, cli.quiet);
        }
        Commands::Add {
            name,
            farm,
            harvest_date,
        } => {
            init_tracing("warn");
            tracker::cmd_add(
                cli.api_url.as_deref(),
                tracker::AddArgs {
                    name,
                    farm,
                    harvest_date,
                },
                cli.output,
                cli.quiet,
            );
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `default_level`.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Report an error in the appropriate format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
