mod backend;
mod cli_messages;
mod config;
mod consts;
mod environment;
mod events;
mod export;
mod logging;
mod models;
mod network;
mod notice;
mod page;
mod session;
mod sync;
mod thresholds;
mod ui;

use crate::backend::{Backend, BackendClient};
use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::export::{EnvironmentSnapshotProvider, ExportOutcome, export_current_view};
use crate::logging::get_rust_log_level;
use crate::session::{ExportSource, run_headless_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable selecting the backend when no flag is given.
const BACKEND_URL_ENV: &str = "ORCHARD_BACKEND_URL";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Orchard pest & disease monitoring dashboard",
    long_about = None
)]
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the live dashboard
    Start {
        /// Backend base URL, or `local`
        #[arg(long, value_name = "URL")]
        backend_url: Option<String>,

        /// Run without the terminal UI and print events to stdout
        #[arg(long, default_value_t = false)]
        headless: bool,

        /// Data written by the export key
        #[arg(long, value_enum, default_value_t = ExportSource::None)]
        export_source: ExportSource,

        /// Seconds between automatic refreshes (overrides the config file)
        #[arg(long, value_name = "SECONDS")]
        refresh_interval: Option<u64>,

        /// Disable background colors in the dashboard
        #[arg(long = "no-background-color", action = clap::ArgAction::SetTrue)]
        no_background_color: bool,
    },
    /// Fetch the latest environment data once and write it to CSV
    Export {
        /// Backend base URL, or `local`
        #[arg(long, value_name = "URL")]
        backend_url: Option<String>,

        /// Directory for agricultural_data.csv (overrides the config file)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Days of history to request
        #[arg(long, value_name = "DAYS")]
        days: Option<u32>,
    },
    /// Print the configuration file
    Config {
        /// Overwrite the file with the defaults first
        #[arg(long, default_value_t = false)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log::set_max_level(get_rust_log_level().into());

    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start {
            backend_url,
            headless,
            export_source,
            refresh_interval,
            no_background_color,
        } => {
            let mut config = Config::load_or_default(&config_path)?;
            if let Some(secs) = refresh_interval {
                if secs == 0 {
                    crate::print_cmd_warn!("Refresh interval", "0s is not allowed, using 1s");
                }
                config.refresh_interval_secs = secs;
            }
            let environment = resolve_environment(backend_url.as_deref(), &config)?;
            let session =
                setup_session(&config, environment, export_source, !no_background_color)?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session).await
            }
        }
        Command::Export {
            backend_url,
            output_dir,
            days,
        } => {
            let config = Config::load_or_default(&config_path)?;
            let environment = resolve_environment(backend_url.as_deref(), &config)?;
            let directory = output_dir.unwrap_or_else(|| config.export_dir());
            export_once(
                environment,
                days.unwrap_or(config.history_days),
                directory,
            )
            .await
        }
        Command::Config { reset } => {
            if reset {
                Config::default()
                    .save(&config_path)
                    .map_err(|e| format!("Failed to save config: {}", e))?;
                crate::print_cmd_success!("Config reset", "{}", config_path.display());
            }
            let config = Config::load_or_default(&config_path)?;
            crate::print_cmd_info!("Config file", "{}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// CLI flag first, then `ORCHARD_BACKEND_URL`, then the config file.
fn resolve_environment(cli_url: Option<&str>, config: &Config) -> Result<Environment, Box<dyn Error>> {
    let env_url = std::env::var(BACKEND_URL_ENV).ok();
    let environment = Environment::resolve(
        cli_url,
        env_url.as_deref(),
        config.backend_url.as_deref(),
    )?;
    Ok(environment)
}

/// Fetches the environment series once and exports it.
async fn export_once(
    environment: Environment,
    days: u32,
    directory: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let client = BackendClient::new(environment)?;
    let sample = match client.environmental_data(days).await {
        Ok(sample) => sample,
        Err(e) => {
            crate::print_cmd_error!("Failed to fetch environment data", e.to_string().as_str());
            return Err(e.into());
        }
    };

    let provider = EnvironmentSnapshotProvider::new(Arc::new(RwLock::new(Some(sample))));
    match export_current_view(&provider, &directory)? {
        ExportOutcome::Written { path, rows } => {
            crate::print_cmd_success!("Export complete", "{} rows written to {}", rows, path.display());
        }
        ExportOutcome::Empty => {
            crate::print_cmd_info!("Nothing to export", "the backend returned no readings");
        }
    }
    Ok(())
}
