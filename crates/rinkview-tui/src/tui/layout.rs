// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------------------+
// | Status Bar (1 row)                                           |
// +--------------+-----------------------------------------------+
// | Players      | 5 on 5 Performance (60%)                      |
// | (28 cols)    +-----------------------+-----------------------+
// |              | 4 on 5 (50%)          | 5 on 4 (50%)          |
// +--------------+-----------------------+-----------------------+
// | Help Bar (1 row)                                             |
// +--------------------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the player list column.
pub const PLAYER_LIST_WIDTH: u16 = 28;

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: season selector and load status.
    pub status_bar: Rect,
    /// Left column: searchable player list.
    pub player_list: Rect,
    /// Full-width chart for even strength.
    pub even_strength: Rect,
    /// Lower left chart.
    pub penalty_kill: Rect,
    /// Lower right chart.
    pub power_play: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

impl AppLayout {
    /// Chart areas in panel order (5 on 5, 4 on 5, 5 on 4).
    pub fn chart_areas(&self) -> [Rect; 3] {
        [self.even_strength, self.penalty_kill, self.power_play]
    }
}

pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | body(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let body = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: player list | charts
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(PLAYER_LIST_WIDTH), Constraint::Min(20)])
        .split(body);

    let player_list = horizontal[0];
    let charts = horizontal[1];

    // Charts: even strength on top, special teams side by side below
    let chart_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(charts);

    let special_teams = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chart_rows[1]);

    AppLayout {
        status_bar,
        player_list,
        even_strength: chart_rows[0],
        penalty_kill: special_teams[0],
        power_play: special_teams[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
