//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::events::EventType;
use crate::page::{Page, SlotId};
use crate::sync::SyncUpdate;
use crate::ui::dashboard::DashboardState;
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

/// How often banners are aged while headless.
const HEADLESS_TICK: Duration = Duration::from_millis(250);

const SUMMARY_SLOTS: [SlotId; 4] = [
    SlotId::Temperature,
    SlotId::Humidity,
    SlotId::RiskLevel,
    SlotId::LastUpdate,
];

/// One line with every rendered value slot, e.g. `temperature=23.5°C humidity=61.5%`.
pub fn slot_summary(page: &Page) -> String {
    SUMMARY_SLOTS
        .iter()
        .filter_map(|slot| page.text(*slot).map(|text| format!("{}={}", slot, text)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Applies sync results and ages banners until shutdown, printing each
/// displayable event and the slot values after every applied payload.
async fn drive_headless(
    state: &mut DashboardState,
    updates: &mut mpsc::Receiver<SyncUpdate>,
    shutdown: &mut broadcast::Receiver<()>,
    tick: Duration,
) {
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            Some(update) = updates.recv() => {
                let events = state.apply(update);
                for event in events.iter().filter(|event| event.should_display()) {
                    println!("{}", event);
                }
                if events.iter().any(|event| event.event_type == EventType::Success) {
                    println!("  {}", slot_summary(&state.page));
                }
            }
            _ = ticker.tick() => state.update(),
            _ = shutdown.recv() => break,
        }
    }
}

/// Runs the application in headless mode
///
/// Drives the same controller and state as the TUI and prints each event,
/// plus the slot values after every applied payload, until Ctrl+C.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting("headless", &session.environment);

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();
    let mut state = DashboardState::new(
        session.environment.clone(),
        Instant::now(),
        session.ui_config.clone(),
    );
    session.controller.start();

    drive_headless(
        &mut state,
        &mut session.update_receiver,
        &mut shutdown_receiver,
        HEADLESS_TICK,
    )
    .await;

    print_session_shutdown();
    session.controller.stop();
    print_session_exit_success();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::models::{EnvironmentSample, PredictionResult, RiskLevel};
    use crate::ui::UIConfig;

    #[test]
    fn test_summary_lists_rendered_slots_only() {
        let mut page = Page::new([SlotId::Temperature, SlotId::Humidity, SlotId::RiskLevel]);
        assert_eq!(slot_summary(&page), "");

        page.show_environment(&EnvironmentSample::new(vec![23.5], vec![61.5]));
        page.show_prediction(&PredictionResult::new(RiskLevel::Medium));

        assert_eq!(
            slot_summary(&page),
            "temperature=23.5°C humidity=61.5% risk-level=medium"
        );
    }

    #[tokio::test]
    async fn test_headless_loop_expires_banners() {
        let mut state = DashboardState::new(
            Environment::Local,
            Instant::now(),
            UIConfig {
                notice_ttl: Duration::from_millis(50),
                ..UIConfig::default()
            },
        );
        let (tx, mut rx) = mpsc::channel(8);
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let feed = async {
            // Hot, cool, hot: two banners
            for (seq, temperature) in [(1, 40.0), (2, 20.0), (3, 40.0)] {
                tx.send(SyncUpdate::Environment {
                    seq,
                    result: Ok(EnvironmentSample::new(vec![temperature], vec![60.0])),
                })
                .await
                .unwrap();
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
            shutdown_tx.send(()).unwrap();
        };
        tokio::join!(
            drive_headless(&mut state, &mut rx, &mut shutdown_rx, Duration::from_millis(10)),
            feed
        );

        assert_eq!(state.page.text(SlotId::Temperature), Some("40.0°C"));
        assert!(state.notices.is_empty());
        assert!(state.tick > 0);
    }
}
