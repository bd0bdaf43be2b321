//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::cli_consts::{sync, ui};
use crate::environment::Environment;
use crate::export::{Exporter, SharedEnvironment};
use crate::page::SlotId;
use crate::sync::{DashboardController, RefreshTrigger, SyncUpdate};
use crate::thresholds::WarningThresholds;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    /// Slots the layout mounts; controls without a slot get no key binding.
    pub mounted_slots: Vec<SlotId>,
    pub thresholds: WarningThresholds,
    pub notice_ttl: Duration,
    pub refresh_interval: Duration,
    /// Shared with the export provider when environment export is enabled.
    pub snapshot: Option<SharedEnvironment>,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            with_background_color: true,
            mounted_slots: SlotId::all(),
            thresholds: WarningThresholds::default(),
            notice_ttl: ui::notice_ttl(),
            refresh_interval: sync::refresh_interval(),
            snapshot: None,
        }
    }
}

/// The different screens in the application.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Dashboard screen with readings, charts and the activity log.
    Dashboard,
}

/// Application state
pub struct App {
    current_screen: Screen,

    /// Applied sync results. Updates arriving during the splash land here too.
    state: DashboardState,

    /// Owns the refresh timer.
    controller: DashboardController,

    /// Receives fetch results from the sync tasks.
    update_receiver: mpsc::Receiver<SyncUpdate>,

    exporter: Exporter,

    /// Broadcasts shutdown to the rest of the session.
    shutdown_sender: broadcast::Sender<()>,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        controller: DashboardController,
        update_receiver: mpsc::Receiver<SyncUpdate>,
        exporter: Exporter,
        shutdown_sender: broadcast::Sender<()>,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            current_screen: Screen::Splash,
            state: DashboardState::new(environment, Instant::now(), ui_config),
            controller,
            update_receiver,
            exporter,
            shutdown_sender,
        }
    }

    /// Shows the dashboard and starts the refresh timer. Runs once.
    pub fn enter_dashboard(&mut self) {
        if self.current_screen == Screen::Dashboard {
            return;
        }
        self.current_screen = Screen::Dashboard;
        self.state.shown_at = Instant::now();
        self.controller.start();
    }

    /// Applies every queued sync result.
    pub fn drain_updates(&mut self) {
        while let Ok(update) = self.update_receiver.try_recv() {
            self.state.apply(update);
        }
    }

    /// Stops the timer and tells the session to wind down.
    pub fn shutdown(&mut self) {
        self.controller.stop();
        let _ = self.shutdown_sender.send(());
    }

    /// Handles a key on the dashboard. Returns `true` when the app should quit.
    pub fn handle_dashboard_key(&mut self, key: KeyEvent) -> bool {
        if self.state.search.editing {
            match key.code {
                KeyCode::Char(c) => self.state.search.query.push(c),
                KeyCode::Backspace => {
                    self.state.search.query.pop();
                }
                KeyCode::Enter => self.state.search.editing = false,
                KeyCode::Esc => {
                    self.state.search.query.clear();
                    self.state.search.editing = false;
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Esc if self.state.search.is_filtering() => {
                self.state.search.query.clear();
            }
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Char('r') if self.state.page.is_mounted(SlotId::Refresh) => {
                // Results arrive through the update channel
                self.controller.refresh_all(RefreshTrigger::Manual);
            }
            KeyCode::Char('e') if self.state.page.is_mounted(SlotId::Export) => {
                let result = self.exporter.export();
                self.state.record_export(result);
            }
            KeyCode::Char('/') if self.state.page.is_mounted(SlotId::Search) => {
                self.state.search.editing = true;
            }
            KeyCode::Char('x') => {
                self.state.notices.dismiss_latest();
            }
            _ => {}
        }
        false
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();

    // UI event loop
    loop {
        app.drain_updates();

        if app.current_screen == Screen::Dashboard {
            app.state.update();
        }
        terminal.draw(|f| render(f, &app))?;

        if app.current_screen == Screen::Splash && splash_start.elapsed() >= ui::SPLASH_DURATION {
            app.enter_dashboard();
            continue;
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                match app.current_screen {
                    Screen::Splash => {
                        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                            app.shutdown();
                            return Ok(());
                        }
                        // Any other key skips the splash screen
                        app.enter_dashboard();
                    }
                    Screen::Dashboard => {
                        if app.handle_dashboard_key(key) {
                            app.shutdown();
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Splash => render_splash(f, &app.state.environment.backend_url()),
        Screen::Dashboard => render_dashboard(f, &app.state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::consts::cli_consts::{EXPORT_FILE_NAME, UPDATE_QUEUE_SIZE};
    use crate::export::EmptyProvider;
    use crate::notice::Severity;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(ui_config: UIConfig, export_dir: std::path::PathBuf) -> App {
        let (tx, rx) = mpsc::channel(UPDATE_QUEUE_SIZE);
        let (shutdown_sender, _) = broadcast::channel(1);
        let controller =
            DashboardController::new(Arc::new(MockBackend::new()), tx, sync::refresh_interval(), 7);
        App::new(
            Environment::Local,
            controller,
            rx,
            Exporter::new(Box::new(EmptyProvider), export_dir),
            shutdown_sender,
            ui_config,
        )
    }

    #[tokio::test]
    async fn test_search_typing_and_escape() {
        let dir = tempdir().unwrap();
        let mut app = app_with(UIConfig::default(), dir.path().to_path_buf());

        assert!(!app.handle_dashboard_key(key(KeyCode::Char('/'))));
        for c in "risk".chars() {
            app.handle_dashboard_key(key(KeyCode::Char(c)));
        }
        // 'q' goes into the query while typing
        assert!(!app.handle_dashboard_key(key(KeyCode::Char('q'))));
        app.handle_dashboard_key(key(KeyCode::Backspace));
        app.handle_dashboard_key(key(KeyCode::Enter));
        assert_eq!(app.state.search.query, "risk");
        assert!(!app.state.search.editing);

        // First Esc clears the filter, the second quits
        assert!(!app.handle_dashboard_key(key(KeyCode::Esc)));
        assert!(app.state.search.query.is_empty());
        assert!(app.handle_dashboard_key(key(KeyCode::Esc)));
    }

    #[tokio::test]
    async fn test_unmounted_controls_are_not_wired() {
        let dir = tempdir().unwrap();
        let mut app = app_with(
            UIConfig {
                mounted_slots: vec![SlotId::Temperature, SlotId::Humidity],
                ..UIConfig::default()
            },
            dir.path().to_path_buf(),
        );

        // The mock has no expectations, so a refresh would panic inside the fetch task
        app.handle_dashboard_key(key(KeyCode::Char('r')));
        app.handle_dashboard_key(key(KeyCode::Char('/')));
        app.handle_dashboard_key(key(KeyCode::Char('e')));

        assert!(!app.state.search.editing);
        assert!(app.state.activity_logs.is_empty());
        assert_eq!(app.controller.sequencer().last_issued(crate::sync::Endpoint::Environment), 0);
    }

    #[tokio::test]
    async fn test_export_key_with_empty_provider_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut app = app_with(UIConfig::default(), dir.path().to_path_buf());

        app.handle_dashboard_key(key(KeyCode::Char('e')));

        assert!(!dir.path().join(EXPORT_FILE_NAME).exists());
        assert_eq!(app.state.activity_logs.len(), 1);
        assert_eq!(app.state.notices.visible()[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_dismiss_key_removes_newest_banner() {
        let dir = tempdir().unwrap();
        let mut app = app_with(UIConfig::default(), dir.path().to_path_buf());
        app.state.notices.notify("older", Severity::Info);
        app.state.notices.notify("newer", Severity::Warning);

        app.handle_dashboard_key(key(KeyCode::Char('x')));

        assert_eq!(app.state.notices.visible().len(), 1);
        assert_eq!(app.state.notices.visible()[0].message, "older");
    }
}
