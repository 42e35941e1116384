// Status bar: season selector and load status.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use rinkview_core::season::Season;

use crate::tui::{LoadStatus, ViewState};

/// Layout: ` rinkview | [2022-23] [2023-24] | status`
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            " rinkview ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(Color::Gray)),
    ];
    spans.extend(season_spans(&state.seasons, state.season));
    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));

    let (text, color) = status_text(&state.load_status, state.players.len());
    spans.push(Span::styled(text, Style::default().fg(color)));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// One `[label]` span per season, the active one highlighted.
pub fn season_spans(seasons: &[Season], active: Option<Season>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for season in seasons {
        let style = if Some(*season) == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", season.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn status_text(status: &LoadStatus, player_count: usize) -> (String, Color) {
    match status {
        LoadStatus::Idle => ("Starting".to_string(), Color::Gray),
        LoadStatus::Loading(season) => (format!("Loading {}...", season.label()), Color::Yellow),
        LoadStatus::Loaded(season) => (
            format!("{}: {} players", season.label(), player_count),
            Color::Green,
        ),
        LoadStatus::Failed { season, message } => (
            format!("Failed to load {}: {}", season.label(), message),
            Color::Red,
        ),
    }
}
