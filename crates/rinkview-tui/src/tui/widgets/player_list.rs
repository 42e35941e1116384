// Player list: sorted names of the loaded season, narrowed by the search
// text. The cursor row is highlighted; the charted player is marked.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let filtered = state.filtered_players();
    let selected = state.selected_player.as_deref();

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|name| {
            let style = if Some(*name) == selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::styled(name.to_string(), style))
        })
        .collect();

    let border_style = if state.filter_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(build_title(state, filtered.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !filtered.is_empty() {
        list_state.select(Some(state.cursor.min(filtered.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// `Players (N)`, with the search text when there is one.
fn build_title(state: &ViewState, filtered_count: usize) -> Line<'static> {
    let mut title = String::from("Players");
    if state.filter_mode || !state.filter_text.is_empty() {
        title.push_str(&format!(" /{}", state.filter_text));
    }
    title.push_str(&format!(" ({})", filtered_count));
    Line::from(title)
}
