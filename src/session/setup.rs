//! Session setup and initialization

use crate::backend::BackendClient;
use crate::config::Config;
use crate::consts::cli_consts::UPDATE_QUEUE_SIZE;
use crate::environment::Environment;
use crate::export::{DataProvider, EmptyProvider, EnvironmentSnapshotProvider, Exporter};
use crate::sync::{DashboardController, SyncUpdate};
use crate::ui::UIConfig;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// What the export key writes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExportSource {
    /// Nothing; export is a no-op.
    #[default]
    None,
    /// One row per reading of the latest environment data.
    Environment,
}

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Owns the refresh timer and issues the backend reads
    pub controller: DashboardController,
    /// Fetch results for the dashboard state
    pub update_receiver: mpsc::Receiver<SyncUpdate>,
    /// Writes the current view to CSV
    pub exporter: Exporter,
    /// Shutdown sender to stop the session
    pub shutdown_sender: broadcast::Sender<()>,
    /// Backend the session reads from
    pub environment: Environment,
    pub ui_config: UIConfig,
}

/// Sets up a dashboard session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Creates the backend client
/// 2. Wires the controller to the update channel
/// 3. Picks the export provider
///
/// The controller is returned stopped; each mode starts it when it is ready.
pub fn setup_session(
    config: &Config,
    env: Environment,
    export_source: ExportSource,
    with_background: bool,
) -> Result<SessionData, Box<dyn Error>> {
    let backend = BackendClient::new(env.clone())?;

    let (update_sender, update_receiver) = mpsc::channel(UPDATE_QUEUE_SIZE);
    let controller = DashboardController::new(
        Arc::new(backend),
        update_sender,
        config.refresh_interval(),
        config.history_days,
    );

    let (provider, snapshot): (Box<dyn DataProvider>, _) = match export_source {
        ExportSource::None => (Box::new(EmptyProvider), None),
        ExportSource::Environment => {
            let provider = EnvironmentSnapshotProvider::default();
            let snapshot = provider.snapshot();
            (Box::new(provider), Some(snapshot))
        }
    };
    let exporter = Exporter::new(provider, config.export_dir());

    let ui_config = UIConfig {
        with_background_color: with_background,
        mounted_slots: config.slots.clone(),
        thresholds: config.thresholds.clone(),
        notice_ttl: config.notice_ttl(),
        refresh_interval: controller.period(),
        snapshot,
    };

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    Ok(SessionData {
        controller,
        update_receiver,
        exporter,
        shutdown_sender,
        environment: env,
        ui_config,
    })
}
