// Situation chart: one diverging horizontal bar per metric, centred on zero.
//
//   G60                |██████        1.20
//   xGA60           ███|              -0.85
//
//   G60      Goals per 60 minutes
//   xGA60    Expected goals against per 60, relative (higher is better)
//
// Bar length is clamped to the [-3, +3] axis; the label keeps the true value.
// The legend is drawn only when the panel has rows to spare.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use rinkview_core::color::{clamp_to_scale, Rgb, SCALE_LIMIT};

use crate::protocol::{MetricBar, PanelView};

/// Width of the metric code column.
const LABEL_WIDTH: usize = 9;
/// Width of the value column.
const VALUE_WIDTH: usize = 7;
/// Smallest half-track worth drawing.
const MIN_HALF_TRACK: usize = 2;

pub fn render(frame: &mut Frame, area: Rect, panel: &PanelView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            panel.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));

    if panel.is_placeholder() {
        let mut lines = Vec::new();
        if let Some(header) = &panel.header {
            lines.push(Line::styled(header.line(), Style::default().fg(Color::Gray)));
        }
        lines.push(Line::styled("No data", Style::default().fg(Color::DarkGray)));
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let half = half_track(inner_width);

    let mut lines = Vec::with_capacity(panel.bars.len() + 2);
    if let Some(header) = &panel.header {
        lines.push(Line::styled(header.line(), Style::default().fg(Color::Gray)));
        lines.push(Line::raw(""));
    }
    lines.extend(panel.bars.iter().map(|bar| bar_line(bar, half)));

    if lines.len() + 1 + panel.bars.len() <= inner_height {
        lines.push(Line::raw(""));
        lines.extend(panel.bars.iter().map(legend_line));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Cells on each side of the zero axis for a chart `inner_width` wide.
pub fn half_track(inner_width: usize) -> usize {
    let fixed = LABEL_WIDTH + VALUE_WIDTH + 3;
    (inner_width.saturating_sub(fixed) / 2).max(MIN_HALF_TRACK)
}

/// Number of filled cells for `value` on a half-track of `half` cells.
pub fn bar_cells(value: f64, half: usize) -> usize {
    let frac = clamp_to_scale(value).abs() / SCALE_LIMIT;
    (frac * half as f64).round() as usize
}

fn bar_line(bar: &MetricBar, half: usize) -> Line<'static> {
    let value = bar.entry.value;
    let cells = bar_cells(value, half);
    let fill = "\u{2588}".repeat(cells);
    let color = to_color(bar.color);
    let axis = Style::default().fg(Color::DarkGray);

    let (left, right) = if value >= 0.0 {
        (
            Span::raw(" ".repeat(half)),
            Span::styled(format!("{:<half$}", fill, half = half), Style::default().fg(color)),
        )
    } else {
        (
            Span::styled(format!("{:>half$}", fill, half = half), Style::default().fg(color)),
            Span::raw(" ".repeat(half)),
        )
    };

    Line::from(vec![
        Span::raw(format!("{:<width$}", bar.entry.code.as_str(), width = LABEL_WIDTH)),
        left,
        Span::styled("|", axis),
        right,
        Span::styled(
            format!(" {:>width$.2}", value, width = VALUE_WIDTH - 1),
            Style::default().fg(color),
        ),
    ])
}

fn legend_line(bar: &MetricBar) -> Line<'static> {
    let style = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", bar.entry.code.as_str(), width = LABEL_WIDTH),
            style,
        ),
        Span::styled(bar.entry.description, style),
    ])
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
