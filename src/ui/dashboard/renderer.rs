//! Dashboard main renderer

use super::components::{charts, footer, header, logs, notices, readings};
use super::state::DashboardState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(14, 22, 16))),
            f.area(),
        );
    }

    let cards_height = if readings::mounted_cards(state).is_empty() {
        0
    } else {
        3
    };
    let charts_constraint = if charts::has_charts(state) {
        Constraint::Fill(1)
    } else {
        Constraint::Length(0)
    };

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(notices::notices_height(state)),
            Constraint::Length(cards_height),
            charts_constraint,
            Constraint::Percentage(30),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);
    notices::render_notices(f, main_chunks[1], state);
    readings::render_readings(f, main_chunks[2], state);
    if charts::has_charts(state) {
        charts::render_charts(f, main_chunks[3], state);
    }
    logs::render_logs_panel(f, main_chunks[4], state);
    footer::render_footer(f, main_chunks[5], state);
}
