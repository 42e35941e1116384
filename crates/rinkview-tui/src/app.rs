// App orchestrator: owns the season store and selection, runs season loads
// and feeds view models to the TUI.
//
// Every season request bumps `load_generation` and spawns one loader task.
// Loader results come back as `LoadEvent`s; a result is installed only when
// its generation is still the current one, so a slow response for a season
// the user already left can never overwrite a newer one.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use rinkview_core::season::Season;
use rinkview_core::store::StatStore;

use crate::protocol::{LoadEvent, PlayerPanels, UiUpdate, UserCommand};
use crate::source::SeasonSource;

/// What `handle_load_event` did with a loader result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store was replaced with the loaded season.
    Installed,
    /// The current season failed to load; the store is now empty.
    Failed(String),
    /// The result belonged to a superseded request and was dropped.
    Stale,
}

pub struct AppState {
    /// Store for the last committed load. Replaced wholesale, never merged.
    pub store: StatStore,
    /// Season the store holds, `None` before the first commit or after a
    /// failed load.
    pub store_season: Option<Season>,
    /// Most recently requested season.
    pub season: Season,
    /// Configured seasons, ascending.
    pub seasons: Vec<Season>,
    /// Incremented on every season request.
    pub load_generation: u64,
    pub selected_player: Option<String>,
    source: Arc<dyn SeasonSource>,
    load_tx: mpsc::Sender<LoadEvent>,
    current_load: Option<JoinHandle<()>>,
}

impl AppState {
    pub fn new(
        seasons: Vec<Season>,
        initial: Season,
        source: Arc<dyn SeasonSource>,
        load_tx: mpsc::Sender<LoadEvent>,
    ) -> Self {
        let mut seasons = seasons;
        seasons.sort();
        seasons.dedup();
        AppState {
            store: StatStore::empty(),
            store_season: None,
            season: initial,
            seasons,
            load_generation: 0,
            selected_player: None,
            source,
            load_tx,
            current_load: None,
        }
    }

    /// Start loading `season`. Any load still in flight keeps running, but
    /// its result will be discarded as stale.
    ///
    /// Returns the generation assigned to the new request.
    pub fn request_season(&mut self, season: Season) -> u64 {
        self.load_generation += 1;
        let generation = self.load_generation;
        self.season = season;

        let source = Arc::clone(&self.source);
        let tx = self.load_tx.clone();
        let handle = tokio::spawn(async move {
            let result = source.load(season).await.map_err(|e| e.to_string());
            let _ = tx.send(LoadEvent { season, generation, result }).await;
        });
        self.current_load = Some(handle);

        info!("requested {} (gen: {})", season.label(), generation);
        generation
    }

    /// Commit or discard a loader result.
    pub fn handle_load_event(&mut self, event: LoadEvent) -> LoadOutcome {
        if event.generation != self.load_generation {
            debug!(
                "discarding stale load of {} (event gen: {}, current gen: {})",
                event.season.label(),
                event.generation,
                self.load_generation
            );
            return LoadOutcome::Stale;
        }

        match event.result {
            Ok(store) => {
                self.store = store;
                self.store_season = Some(event.season);
                let players = self.store.players();
                let keep = self
                    .selected_player
                    .as_ref()
                    .is_some_and(|p| players.contains(p));
                if !keep {
                    self.selected_player = players.first().cloned();
                }
                info!(
                    "installed {}: {} records, {} players",
                    event.season.label(),
                    self.store.len(),
                    players.len()
                );
                LoadOutcome::Installed
            }
            Err(message) => {
                warn!("failed to load {}: {}", event.season.label(), message);
                self.store = StatStore::empty();
                self.store_season = None;
                self.selected_player = None;
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Change the player being charted. Names missing from the installed
    /// store are ignored and the current selection is kept.
    ///
    /// Returns whether the selection was accepted.
    pub fn select_player(&mut self, player: String) -> bool {
        if self.store.players().binary_search(&player).is_err() {
            debug!("ignoring selection of {}: not in the installed store", player);
            return false;
        }
        debug!("selected player {}", player);
        self.selected_player = Some(player);
        true
    }

    /// The configured season `offset` steps from the current one, or `None`
    /// past either end of the list.
    pub fn adjacent_season(&self, offset: isize) -> Option<Season> {
        let idx = self.seasons.iter().position(|s| *s == self.season)?;
        let target = idx.checked_add_signed(offset)?;
        self.seasons.get(target).copied()
    }

    pub fn players(&self) -> Vec<String> {
        self.store.players()
    }

    pub fn build_panels(&self) -> PlayerPanels {
        PlayerPanels::build(&self.store, self.selected_player.as_deref())
    }

    /// Abort the most recent loader task, if it is still running.
    pub fn cancel_load(&mut self) {
        if let Some(handle) = self.current_load.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until the TUI quits or its channel closes.
pub async fn run(
    mut load_rx: mpsc::Receiver<LoadEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("application event loop started");

    let _ = ui_tx
        .send(UiUpdate::Seasons {
            seasons: state.seasons.clone(),
            current: state.season,
        })
        .await;
    let initial = state.season;
    start_load(&mut state, initial, &ui_tx).await;

    loop {
        tokio::select! {
            event = load_rx.recv() => {
                match event {
                    Some(event) => {
                        handle_load_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("load channel closed, shutting down");
                        break;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    state.cancel_load();
    info!("application event loop exiting");
    Ok(())
}

async fn start_load(state: &mut AppState, season: Season, ui_tx: &mpsc::Sender<UiUpdate>) {
    state.request_season(season);
    let _ = ui_tx.send(UiUpdate::SeasonRequested { season }).await;
}

async fn step_season(state: &mut AppState, offset: isize, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(season) = state.adjacent_season(offset) {
        start_load(state, season, ui_tx).await;
    }
}

/// Apply a loader result and push whatever changed to the TUI.
pub async fn handle_load_event(
    state: &mut AppState,
    event: LoadEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) -> LoadOutcome {
    let season = event.season;
    let outcome = state.handle_load_event(event);
    match &outcome {
        LoadOutcome::Installed => {
            let _ = ui_tx
                .send(UiUpdate::DatasetLoaded {
                    season,
                    players: state.players(),
                    selected: state.selected_player.clone(),
                })
                .await;
            let _ = ui_tx.send(UiUpdate::Panels(Box::new(state.build_panels()))).await;
        }
        LoadOutcome::Failed(message) => {
            let _ = ui_tx
                .send(UiUpdate::LoadFailed {
                    season,
                    message: message.clone(),
                })
                .await;
            let _ = ui_tx.send(UiUpdate::Panels(Box::new(PlayerPanels::empty()))).await;
        }
        LoadOutcome::Stale => {}
    }
    outcome
}

/// Handle a command from the TUI. `Quit` is handled by the event loop.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::SelectPlayer(player) => {
            if state.select_player(player) {
                let _ = ui_tx.send(UiUpdate::Panels(Box::new(state.build_panels()))).await;
            } else if let Some(season) = state.store_season {
                // Put the TUI list back in step with the installed store.
                let _ = ui_tx
                    .send(UiUpdate::DatasetLoaded {
                        season,
                        players: state.players(),
                        selected: state.selected_player.clone(),
                    })
                    .await;
            }
        }
        UserCommand::SelectSeason(season) => {
            if !state.seasons.contains(&season) {
                warn!("ignoring unconfigured season {}", season);
                return;
            }
            if season == state.season {
                return;
            }
            start_load(state, season, ui_tx).await;
        }
        UserCommand::NextSeason => step_season(state, 1, ui_tx).await,
        UserCommand::PrevSeason => step_season(state, -1, ui_tx).await,
        UserCommand::Reload => {
            let season = state.season;
            start_load(state, season, ui_tx).await;
        }
        UserCommand::Quit => {}
    }
}
