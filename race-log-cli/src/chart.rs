//! Text chart of the shared value over log position
//!
//! Draws the ratatui `Chart` widget into an off-screen buffer and returns the
//! cells as plain text, so the chart can be printed or written to a file
//! without taking over the terminal.

use race_log_analyzer::{AnalysisReport, Event};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Widget},
};

const TITLE: &str = "Global Variable Progression with Overlap Events";

/// Render the value series with overlap segments highlighted.
///
/// Each overlap event is drawn from `(stale_index, stale_value)` to
/// `(resolving_index, new_value)`.
pub fn render(events: &[Event], report: &AnalysisReport, width: u16, height: u16) -> String {
    let series: Vec<(f64, f64)> = events
        .iter()
        .enumerate()
        .map(|(i, e)| (i as f64, e.value as f64))
        .collect();

    let segments: Vec<[(f64, f64); 2]> = report
        .overlap_events
        .iter()
        .map(|o| {
            [
                (o.stale_index as f64, o.stale_value as f64),
                (o.resolving_index as f64, o.new_value as f64),
            ]
        })
        .collect();

    let mut datasets = vec![Dataset::default()
        .name("Global value")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&series)];

    for (idx, segment) in segments.iter().enumerate() {
        let dataset = Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&segment[..]);
        // Only the first segment gets a legend entry
        datasets.push(if idx == 0 {
            dataset.name("Overlap event")
        } else {
            dataset
        });
    }

    let x_max = events.len().saturating_sub(1).max(1) as u64;
    let (y_min, y_max) = value_bounds(events);

    let chart = Chart::new(datasets)
        .block(Block::bordered().title(TITLE))
        .x_axis(
            Axis::default()
                .title("Log Entry Index")
                .bounds([0.0, x_max as f64])
                .labels(axis_labels(0, x_max)),
        )
        .y_axis(
            Axis::default()
                .title("Global Value")
                .bounds([y_min as f64, y_max as f64])
                .labels(axis_labels(y_min, y_max)),
        );

    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);

    buffer_to_text(&buffer)
}

/// Smallest and largest value, widened so the range is never empty
fn value_bounds(events: &[Event]) -> (u64, u64) {
    let min = events.iter().map(|e| e.value).min().unwrap_or(0);
    let max = events.iter().map(|e| e.value).max().unwrap_or(0);
    if min == max {
        (min.saturating_sub(1), max.saturating_add(1))
    } else {
        (min, max)
    }
}

fn axis_labels(min: u64, max: u64) -> Vec<Span<'static>> {
    let mid = min + (max - min) / 2;
    vec![
        Span::raw(format_thousands(min)),
        Span::raw(format_thousands(mid)),
        Span::raw(format_thousands(max)),
    ]
}

/// Full integer with `,` thousands separators
fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn buffer_to_text(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
