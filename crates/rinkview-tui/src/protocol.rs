// Messages between the TUI, the app orchestrator and season loader tasks.

use rinkview_core::catalog::Situation;
use rinkview_core::color::{color_for, Rgb};
use rinkview_core::projector::{project, MetricEntry, SituationProfile};
use rinkview_core::season::Season;
use rinkview_core::store::{StatRecord, StatStore};

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Chart this player.
    SelectPlayer(String),
    SelectSeason(Season),
    NextSeason,
    PrevSeason,
    /// Fetch the current season again.
    Reload,
    Quit,
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// The configured season list and the season being loaded first.
    Seasons { seasons: Vec<Season>, current: Season },
    /// A fetch for `season` has started. Previous data stays visible.
    SeasonRequested { season: Season },
    /// A season's store was installed.
    DatasetLoaded {
        season: Season,
        players: Vec<String>,
        selected: Option<String>,
    },
    /// A season failed to load; the store is now empty.
    LoadFailed { season: Season, message: String },
    /// Chart panels for the selected player.
    Panels(Box<PlayerPanels>),
}

/// Result of one season fetch-and-parse task.
#[derive(Debug)]
pub struct LoadEvent {
    pub season: Season,
    /// Value of the load counter when the task was spawned.
    pub generation: u64,
    pub result: Result<StatStore, String>,
}

// ---------------------------------------------------------------------------
// Panel view models
// ---------------------------------------------------------------------------

/// The three situation panels for one player, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPanels {
    pub player: Option<String>,
    pub panels: Vec<PanelView>,
}

impl PlayerPanels {
    /// Build every panel for `player` from `store`.
    pub fn build(store: &StatStore, player: Option<&str>) -> Self {
        let panels = SituationProfile::ALL
            .iter()
            .map(|profile| {
                let record = player.and_then(|p| store.lookup(p, profile.situation));
                PanelView::build(record, profile)
            })
            .collect();
        PlayerPanels {
            player: player.map(str::to_string),
            panels,
        }
    }

    /// Panels with no player: every chart shows its placeholder.
    pub fn empty() -> Self {
        Self::build(&StatStore::empty(), None)
    }

    pub fn panel(&self, situation: Situation) -> Option<&PanelView> {
        self.panels.iter().find(|p| p.situation == situation)
    }
}

/// One situation chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub situation: Situation,
    pub title: String,
    /// `None` when the player has no row for this situation.
    pub header: Option<PlayerHeader>,
    pub bars: Vec<MetricBar>,
}

impl PanelView {
    pub fn build(record: Option<&StatRecord>, profile: &SituationProfile) -> Self {
        let bars = project(record, profile)
            .into_iter()
            .map(|entry| MetricBar {
                entry,
                color: color_for(Some(entry.value)),
            })
            .collect();
        PanelView {
            situation: profile.situation,
            title: profile.title(),
            header: record.map(PlayerHeader::from_record),
            bars,
        }
    }

    /// True when there is nothing to chart.
    pub fn is_placeholder(&self) -> bool {
        self.header.is_none() || self.bars.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBar {
    pub entry: MetricEntry,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHeader {
    pub name: String,
    pub team: String,
    pub position: String,
    pub icetime_minutes: Option<f64>,
}

impl PlayerHeader {
    pub fn from_record(record: &StatRecord) -> Self {
        PlayerHeader {
            name: record.player.clone(),
            team: record.team.clone(),
            position: record.position.clone(),
            icetime_minutes: record.icetime_minutes(),
        }
    }

    /// `name | team | position | Ice time: X.X minutes`
    pub fn line(&self) -> String {
        let icetime = self
            .icetime_minutes
            .map(|m| format!("{:.1}", m))
            .unwrap_or_else(|| "--".to_string());
        format!(
            "{} | {} | {} | Ice time: {} minutes",
            self.name, self.team, self.position, icetime
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rinkview_core::catalog::MetricCode;

    const CSV: &str = "name,team,position,situation,icetime,G60,A160,xGA60,CA60,xGF60,CF60\n\
A. Player,BOS,C,5on5,72000,1.2,,-0.4,0.1,2.0,0.3\n\
A. Player,BOS,C,4on5,9000,,,0.8,-1.5,,\n\
B. Player,NYR,D,5on5,60000,0.0,0.2,0.5,0.5,0.5,0.5\n";

    #[test]
    fn header_line_format() {
        let store = StatStore::load(CSV).unwrap();
        let rec = store.lookup("A. Player", Situation::FiveOnFive).unwrap();
        assert_eq!(
            PlayerHeader::from_record(rec).line(),
            "A. Player | BOS | C | Ice time: 1200.0 minutes"
        );
    }

    #[test]
    fn header_without_icetime() {
        let header = PlayerHeader {
            name: "X".into(),
            team: "T".into(),
            position: "D".into(),
            icetime_minutes: None,
        };
        assert_eq!(header.line(), "X | T | D | Ice time: -- minutes");
    }

    #[test]
    fn panels_follow_profile_order() {
        let store = StatStore::load(CSV).unwrap();
        let panels = PlayerPanels::build(&store, Some("A. Player"));
        let situations: Vec<Situation> = panels.panels.iter().map(|p| p.situation).collect();
        assert_eq!(
            situations,
            vec![Situation::FiveOnFive, Situation::FourOnFive, Situation::FiveOnFour]
        );

        let even = panels.panel(Situation::FiveOnFive).unwrap();
        let codes: Vec<MetricCode> = even.bars.iter().map(|b| b.entry.code).collect();
        // A160 is empty and dropped.
        assert_eq!(
            codes,
            vec![
                MetricCode::G60,
                MetricCode::XgF60,
                MetricCode::Cf60,
                MetricCode::XgA60,
                MetricCode::Ca60
            ]
        );
    }

    #[test]
    fn bars_are_colored_by_value() {
        let store = StatStore::load(CSV).unwrap();
        let panels = PlayerPanels::build(&store, Some("A. Player"));
        let pk = panels.panel(Situation::FourOnFive).unwrap();
        for bar in &pk.bars {
            assert_eq!(bar.color, color_for(Some(bar.entry.value)));
        }
        assert!(pk.bars[0].color.g > pk.bars[0].color.r);
        assert!(pk.bars[1].color.r > pk.bars[1].color.g);
    }

    #[test]
    fn missing_situation_is_placeholder() {
        let store = StatStore::load(CSV).unwrap();
        let panels = PlayerPanels::build(&store, Some("A. Player"));
        let pp = panels.panel(Situation::FiveOnFour).unwrap();
        assert!(pp.header.is_none());
        assert!(pp.bars.is_empty());
        assert!(pp.is_placeholder());
        assert_eq!(pp.title, "5 on 4 Performance");
    }

    #[test]
    fn empty_panels_are_all_placeholders() {
        let panels = PlayerPanels::empty();
        assert_eq!(panels.panels.len(), 3);
        assert!(panels.player.is_none());
        assert!(panels.panels.iter().all(PanelView::is_placeholder));
    }
}
