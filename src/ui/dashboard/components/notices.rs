//! Banner strip above the cards

use super::super::state::DashboardState;
use super::super::utils::severity_color;
use crate::consts::cli_consts::ui::MAX_VISIBLE_NOTICES;

use ratatui::Frame;
use ratatui::prelude::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Rows the banner strip needs, 0 when there is nothing to show.
pub fn notices_height(state: &DashboardState) -> u16 {
    state.notices.visible().len().min(MAX_VISIBLE_NOTICES) as u16
}

/// Newest banner first.
pub fn render_notices(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let lines: Vec<Line> = state
        .notices
        .visible()
        .iter()
        .rev()
        .take(MAX_VISIBLE_NOTICES)
        .map(|notice| {
            let style = Style::default()
                .fg(severity_color(notice.severity))
                .add_modifier(Modifier::BOLD);
            Line::from(vec![
                Span::styled(
                    format!(" {} ", notice.severity.to_string().to_uppercase()),
                    style.add_modifier(Modifier::REVERSED),
                ),
                Span::styled(format!(" {}", notice.message), style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}
