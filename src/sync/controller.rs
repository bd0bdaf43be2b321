//! Dashboard Controller
//!
//! Issues the backend reads, either on demand or from a recurring timer, and
//! forwards every outcome to the dashboard state over a channel.

use crate::backend::Backend;
use crate::sync::messages::{RefreshTrigger, SyncUpdate};
use crate::sync::sequence::{Endpoint, RequestSequencer};
use chrono::Local;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shared by the timer task and on-demand refreshes.
#[derive(Clone)]
struct Fetcher {
    backend: Arc<dyn Backend>,
    sequencer: Arc<RequestSequencer>,
    updates: mpsc::Sender<SyncUpdate>,
    history_days: u32,
}

impl Fetcher {
    fn fetch_environment(&self) -> JoinHandle<()> {
        // Numbered now, not when the task first runs
        let seq = self.sequencer.next(Endpoint::Environment);
        log::debug!("Requesting environment data #{}", seq);
        let fetcher = self.clone();
        tokio::spawn(async move {
            let result = fetcher
                .backend
                .environmental_data(fetcher.history_days)
                .await;
            let _ = fetcher
                .updates
                .send(SyncUpdate::Environment { seq, result })
                .await;
        })
    }

    fn fetch_prediction(&self) -> JoinHandle<()> {
        let seq = self.sequencer.next(Endpoint::Prediction);
        log::debug!("Requesting prediction #{}", seq);
        let fetcher = self.clone();
        tokio::spawn(async move {
            let result = fetcher.backend.prediction().await;
            let _ = fetcher
                .updates
                .send(SyncUpdate::Prediction { seq, result })
                .await;
        })
    }

    fn refresh_all(&self, trigger: RefreshTrigger) -> RefreshHandle {
        let refreshed = SyncUpdate::Refreshed {
            at: Local::now(),
            trigger,
        };
        if self.updates.try_send(refreshed).is_err() {
            log::warn!("Update queue full or closed, last-updated time not sent");
        }
        RefreshHandle {
            handles: vec![self.fetch_environment(), self.fetch_prediction()],
        }
    }
}

/// The requests issued by one refresh.
#[derive(Debug)]
pub struct RefreshHandle {
    handles: Vec<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Waits until every request has resolved and its outcome has been queued.
    pub async fn join(self) {
        join_all(self.handles).await;
    }
}

pub struct DashboardController {
    fetcher: Fetcher,
    period: Duration,
    timer: Option<JoinHandle<()>>,
}

impl DashboardController {
    pub fn new(
        backend: Arc<dyn Backend>,
        updates: mpsc::Sender<SyncUpdate>,
        period: Duration,
        history_days: u32,
    ) -> Self {
        Self {
            fetcher: Fetcher {
                backend,
                sequencer: Arc::new(RequestSequencer::new()),
                updates,
                history_days,
            },
            period,
            timer: None,
        }
    }

    /// Starts the recurring refresh. The first refresh runs immediately.
    /// Calling this while the timer is running does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let fetcher = self.fetcher.clone();
        let period = self.period;
        self.timer = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                // The next tick waits until this refresh has resolved
                fetcher.refresh_all(RefreshTrigger::Timer).join().await;
            }
        }));
        log::info!("Refreshing every {}s", self.period.as_secs());
    }

    /// Stops the recurring refresh. Requests already issued still resolve.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            log::debug!(
                "Refresh timer stopped after {} environment requests",
                self.sequencer().last_issued(Endpoint::Environment)
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn sequencer(&self) -> &RequestSequencer {
        &self.fetcher.sequencer
    }

    /// Refreshes the last-updated time and issues both reads concurrently.
    pub fn refresh_all(&self, trigger: RefreshTrigger) -> RefreshHandle {
        self.fetcher.refresh_all(trigger)
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.stop();
    }
}
