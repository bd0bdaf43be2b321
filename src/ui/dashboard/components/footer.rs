//! Dashboard footer component
//!
//! Renders key hints for the controls mounted on the page, or the search
//! prompt while a query is being typed

use super::super::state::DashboardState;
use crate::page::SlotId;

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Key hints for the mounted controls, in display order.
pub fn key_hints(state: &DashboardState) -> Vec<&'static str> {
    let controls = [
        (SlotId::Refresh, "[R] Refresh"),
        (SlotId::Export, "[E] Export"),
        (SlotId::Search, "[/] Search"),
    ];
    let mut hints: Vec<&'static str> = controls
        .into_iter()
        .filter(|(slot, _)| state.page.is_mounted(*slot))
        .map(|(_, hint)| hint)
        .collect();
    if !state.notices.is_empty() {
        hints.push("[X] Dismiss");
    }
    hints.push("[Q] Quit");
    hints
}

pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let (footer_text, footer_color) = if state.search.editing {
        (
            format!("Search: {}_   [Enter] Keep  [Esc] Clear", state.search.query),
            Color::Yellow,
        )
    } else {
        (key_hints(state).join(" | "), Color::LightGreen)
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(footer_color)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::ui::app::UIConfig;
    use std::time::Instant;

    #[test]
    fn test_hints_follow_mounted_controls() {
        let state = DashboardState::new(
            Environment::Local,
            Instant::now(),
            UIConfig {
                mounted_slots: vec![SlotId::Temperature, SlotId::Export],
                ..UIConfig::default()
            },
        );
        assert_eq!(key_hints(&state), vec!["[E] Export", "[Q] Quit"]);
    }
}
