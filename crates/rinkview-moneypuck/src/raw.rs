// MoneyPuck skater season summary: the raw CSV schema.
//
// One row per (player, situation) with on-ice, off-ice and individual
// counting stats. Only the columns the summary needs are read; the file's
// other ~150 columns are ignored.

use std::io::Read;

use serde::Deserialize;
use tracing::warn;

/// A raw skater row. Stat cells that are empty or unparseable come through
/// as `None` instead of failing the row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSkaterRow {
    #[serde(rename = "playerId")]
    pub player_id: u64,
    pub season: u16,
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    pub situation: String,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub icetime: Option<f64>,
    #[serde(rename = "timeOnBench", default, deserialize_with = "csv::invalid_option")]
    pub time_on_bench: Option<f64>,

    #[serde(rename = "OnIce_F_xGoals", default, deserialize_with = "csv::invalid_option")]
    pub on_ice_f_xgoals: Option<f64>,
    #[serde(rename = "OnIce_F_shotAttempts", default, deserialize_with = "csv::invalid_option")]
    pub on_ice_f_shot_attempts: Option<f64>,
    #[serde(rename = "OnIce_A_xGoals", default, deserialize_with = "csv::invalid_option")]
    pub on_ice_a_xgoals: Option<f64>,
    #[serde(rename = "OnIce_A_shotAttempts", default, deserialize_with = "csv::invalid_option")]
    pub on_ice_a_shot_attempts: Option<f64>,

    #[serde(rename = "OffIce_F_xGoals", default, deserialize_with = "csv::invalid_option")]
    pub off_ice_f_xgoals: Option<f64>,
    #[serde(rename = "OffIce_F_shotAttempts", default, deserialize_with = "csv::invalid_option")]
    pub off_ice_f_shot_attempts: Option<f64>,
    #[serde(rename = "OffIce_A_xGoals", default, deserialize_with = "csv::invalid_option")]
    pub off_ice_a_xgoals: Option<f64>,
    #[serde(rename = "OffIce_A_shotAttempts", default, deserialize_with = "csv::invalid_option")]
    pub off_ice_a_shot_attempts: Option<f64>,

    #[serde(rename = "I_F_primaryAssists", default, deserialize_with = "csv::invalid_option")]
    pub primary_assists: Option<f64>,
    #[serde(rename = "I_F_goals", default, deserialize_with = "csv::invalid_option")]
    pub goals: Option<f64>,

    #[serde(rename = "onIce_xGoalsPercentage", default, deserialize_with = "csv::invalid_option")]
    pub on_ice_xgoals_pct: Option<f64>,
    #[serde(rename = "offIce_xGoalsPercentage", default, deserialize_with = "csv::invalid_option")]
    pub off_ice_xgoals_pct: Option<f64>,
    #[serde(rename = "onIce_corsiPercentage", default, deserialize_with = "csv::invalid_option")]
    pub on_ice_corsi_pct: Option<f64>,
    #[serde(rename = "offIce_corsiPercentage", default, deserialize_with = "csv::invalid_option")]
    pub off_ice_corsi_pct: Option<f64>,
}

/// Read raw skater rows, skipping rows whose identity columns are malformed.
pub fn load_raw_from_reader<R: Read>(rdr: R) -> Result<Vec<RawSkaterRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    // Fail fast on an unreadable header rather than skipping every row.
    reader.headers()?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawSkaterRow>() {
        match result {
            Ok(raw) => rows.push(raw),
            Err(e) => {
                warn!("skipping malformed skater row: {}", e);
            }
        }
    }
    Ok(rows)
}
