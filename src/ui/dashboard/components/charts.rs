//! Environment line chart and pest/disease risk bar chart
//!
//! Each chart is built only when its slot is mounted.

use super::super::state::DashboardState;
use crate::models::{EnvironmentSample, PredictionResult};
use crate::page::SlotId;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::symbols;
use ratatui::text::Line;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
    Paragraph,
};

/// Whether any chart slot is mounted.
pub fn has_charts(state: &DashboardState) -> bool {
    state.page.is_mounted(SlotId::EnvironmentChart) || state.page.is_mounted(SlotId::RiskChart)
}

pub fn render_charts(f: &mut Frame, area: Rect, state: &DashboardState) {
    let environment = state.page.is_mounted(SlotId::EnvironmentChart);
    let risk = state.page.is_mounted(SlotId::RiskChart);

    let constraints = match (environment, risk) {
        (true, true) => vec![Constraint::Percentage(60), Constraint::Percentage(40)],
        _ => vec![Constraint::Percentage(100)],
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let mut next = chunks.iter().copied();
    if environment {
        if let Some(chunk) = next.next() {
            render_environment_chart(f, chunk, state.latest_environment.as_ref());
        }
    }
    if risk {
        if let Some(chunk) = next.next() {
            render_risk_chart(f, chunk, state.latest_prediction.as_ref());
        }
    }
}

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

fn render_placeholder(f: &mut Frame, area: Rect, title: &str) {
    let placeholder = Paragraph::new("No data yet")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(chart_block(title));
    f.render_widget(placeholder, area);
}

/// Points `(index, value)` of a series.
fn points(series: &[f64]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64, *value))
        .collect()
}

/// Y bounds covering both series with a little headroom.
fn value_bounds(first: &[f64], second: &[f64]) -> [f64; 2] {
    let values = first.iter().chain(second.iter()).copied();
    let (min, max) = values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max {
        return [0.0, 100.0];
    }
    [(min - 5.0).floor().min(0.0), (max + 5.0).ceil()]
}

fn render_environment_chart(f: &mut Frame, area: Rect, sample: Option<&EnvironmentSample>) {
    const TITLE: &str = "ENVIRONMENT";
    let Some(sample) = sample else {
        render_placeholder(f, area, TITLE);
        return;
    };

    let temperature = points(&sample.temperature);
    let humidity = points(&sample.humidity);
    let len = sample.temperature.len().max(sample.humidity.len()).max(1);
    let bounds = value_bounds(&sample.temperature, &sample.humidity);

    let datasets = vec![
        Dataset::default()
            .name("Temperature °C")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightRed))
            .data(&temperature),
        Dataset::default()
            .name("Humidity %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightBlue))
            .data(&humidity),
    ];

    let first_label = sample.timestamps.first().cloned().unwrap_or_default();
    let last_label = sample.timestamps.last().cloned().unwrap_or_default();
    let chart = Chart::new(datasets)
        .block(chart_block(TITLE))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, (len - 1).max(1) as f64])
                .labels(vec![first_label, last_label]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(bounds)
                .labels(vec![
                    format!("{:.0}", bounds[0]),
                    format!("{:.0}", bounds[1]),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_risk_chart(f: &mut Frame, area: Rect, prediction: Option<&PredictionResult>) {
    const TITLE: &str = "PEST & DISEASE RISK";
    let Some(prediction) = prediction else {
        render_placeholder(f, area, TITLE);
        return;
    };
    let breakdown = prediction.risk_breakdown();
    if breakdown.is_empty() {
        render_placeholder(f, area, TITLE);
        return;
    }

    let bars: Vec<Bar> = breakdown
        .iter()
        .map(|(name, risk)| {
            let percent = (risk * 100.0).round().clamp(0.0, 100.0) as u64;
            let color = match percent {
                0..=39 => Color::Green,
                40..=69 => Color::Yellow,
                _ => Color::Red,
            };
            Bar::default()
                .value(percent)
                .text_value(format!("{}%", percent))
                .label(Line::from(name.replace('_', " ")))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(TITLE))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max(100)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}
