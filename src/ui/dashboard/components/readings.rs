//! Reading cards: temperature, humidity, risk level and last update
//!
//! Only mounted slots get a card. Cards slide in one after another when the
//! dashboard is first shown.

use super::super::state::DashboardState;
use super::super::utils::badge_color;
use crate::models::BadgeStyle;
use crate::page::SlotId;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

const CARDS: [(SlotId, &str); 4] = [
    (SlotId::Temperature, "Temperature"),
    (SlotId::Humidity, "Humidity"),
    (SlotId::RiskLevel, "Risk Level"),
    (SlotId::LastUpdate, "Last Update"),
];

/// Mounted card slots in display order.
pub fn mounted_cards(state: &DashboardState) -> Vec<(SlotId, &'static str)> {
    CARDS
        .into_iter()
        .filter(|(slot, _)| state.page.is_mounted(*slot))
        .collect()
}

pub fn render_readings(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let cards = mounted_cards(state);
    if cards.is_empty() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(area);

    for (index, (slot_id, title)) in cards.into_iter().enumerate() {
        if !state.card_visible(index) {
            continue;
        }
        let Some(slot) = state.page.slot(slot_id) else {
            continue;
        };

        let value_color = match (slot_id, slot.style) {
            (SlotId::RiskLevel, style) => badge_color(style),
            (_, BadgeStyle::Neutral) => Color::White,
            (_, style) => badge_color(style),
        };
        let text = slot.text.clone().unwrap_or_else(|| "--".to_string());

        let card = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(value_color)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(card, chunks[index]);
    }
}
