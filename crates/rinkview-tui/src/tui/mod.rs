// Terminal dashboard: view state, rendering and the input loop.
//
// The TUI keeps a `ViewState` mirroring what the app orchestrator last sent.
// `UiUpdate` messages are applied as they arrive and the frame is redrawn at
// ~30 fps. Search text and the list cursor live only here.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::debug;

use rinkview_core::season::Season;

use crate::protocol::{PlayerPanels, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// LoadStatus
// ---------------------------------------------------------------------------

/// Progress of the most recent season request, as shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading(Season),
    Loaded(Season),
    Failed { season: Season, message: String },
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

pub struct ViewState {
    /// Configured seasons, for the selector.
    pub seasons: Vec<Season>,
    /// Most recently requested season.
    pub season: Option<Season>,
    pub load_status: LoadStatus,
    /// Sorted player names of the installed season.
    pub players: Vec<String>,
    pub selected_player: Option<String>,
    /// Index into the filtered player list.
    pub cursor: usize,
    pub panels: PlayerPanels,
    /// Current search text.
    pub filter_text: String,
    /// Whether search input is active.
    pub filter_mode: bool,
    /// Whether the quit confirmation overlay is shown.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            seasons: Vec::new(),
            season: None,
            load_status: LoadStatus::Idle,
            players: Vec::new(),
            selected_player: None,
            cursor: 0,
            panels: PlayerPanels::empty(),
            filter_text: String::new(),
            filter_mode: false,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// Players whose name contains the search text, case-insensitively.
    pub fn filtered_players(&self) -> Vec<&str> {
        let needle = self.filter_text.to_lowercase();
        self.players
            .iter()
            .map(String::as_str)
            .filter(|p| needle.is_empty() || p.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn cursor_player(&self) -> Option<&str> {
        self.filtered_players().get(self.cursor).copied()
    }

    /// Put the cursor on the selected player if it is visible, otherwise
    /// clamp it to the filtered list.
    pub fn sync_cursor(&mut self) {
        let filtered = self.filtered_players();
        let pos = self
            .selected_player
            .as_deref()
            .and_then(|sel| filtered.iter().position(|p| *p == sel));
        let len = filtered.len();
        self.cursor = match pos {
            Some(i) => i,
            None => self.cursor.min(len.saturating_sub(1)),
        };
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Seasons { seasons, current } => {
            state.seasons = seasons;
            state.season = Some(current);
        }
        UiUpdate::SeasonRequested { season } => {
            state.season = Some(season);
            state.load_status = LoadStatus::Loading(season);
        }
        UiUpdate::DatasetLoaded {
            season,
            players,
            selected,
        } => {
            state.players = players;
            state.selected_player = selected;
            state.load_status = LoadStatus::Loaded(season);
            state.sync_cursor();
        }
        UiUpdate::LoadFailed { season, message } => {
            state.players.clear();
            state.selected_player = None;
            state.cursor = 0;
            state.load_status = LoadStatus::Failed { season, message };
        }
        UiUpdate::Panels(panels) => {
            state.panels = *panels;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::player_list::render(frame, layout.player_list, state);
    for (area, panel) in layout.chart_areas().into_iter().zip(&state.panels.panels) {
        widgets::situation_chart::render(frame, area, panel);
    }
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the terminal UI until the user quits or the app closes its channel.
///
/// Sets up the terminal and a panic hook that restores it, then selects
/// over UI updates, keyboard input and the render tick.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
