//! Dashboard header component
//!
//! Renders the title and the countdown to the next refresh

use super::super::state::DashboardState;
use super::super::utils::format_duration;
use crate::page::format_time;
use crate::sync::RefreshTrigger;

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Render header with title and refresh countdown.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let title_text = format!(
        "ORCHARD DASH v{}  ·  {}  ·  up {}",
        env!("CARGO_PKG_VERSION"),
        state.environment.backend_url(),
        format_duration(state.uptime())
    );
    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let interval_ms = state.refresh_interval.as_millis().max(1) as i64;
    let (label, color, percent) = match state.last_refresh {
        Some((at, trigger)) => {
            let elapsed_ms = (Local::now() - at).num_milliseconds().clamp(0, interval_ms);
            let remaining_secs = (interval_ms - elapsed_ms) / 1000;
            let how = match trigger {
                RefreshTrigger::Timer => "auto",
                RefreshTrigger::Manual => "manual",
            };
            (
                format!(
                    "Last refresh {} ({})  ·  next in {}s",
                    format_time(at),
                    how,
                    remaining_secs
                ),
                Color::LightBlue,
                (elapsed_ms * 100 / interval_ms) as u16,
            )
        }
        None => {
            // Animated while the first refresh is in flight
            let progress = ((state.tick % 20) as f64 / 20.0 * 100.0) as u16;
            ("Waiting for first refresh".to_string(), Color::Yellow, progress)
        }
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .percent(percent.min(100))
        .label(label);

    f.render_widget(gauge, header_chunks[1]);
}
