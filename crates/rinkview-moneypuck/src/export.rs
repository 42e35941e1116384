// Season file export: CSV for the dashboard, JSON records alongside.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use rinkview_core::season::Season;

use crate::refresh::RefreshError;
use crate::summary::SummaryRow;

/// Export column order. Matches the field order of [`SummaryRow`].
pub const EXPORT_COLUMNS: [&str; 15] = [
    "playerId", "season", "name", "team", "position", "situation", "icetime", "xGF60", "xGA60",
    "CF60", "CA60", "xGImpact", "CFImpact", "A160", "G60",
];

pub fn csv_file_name(season: Season) -> String {
    format!("hockey_stats_{}.csv", season.start_year())
}

pub fn json_file_name(season: Season) -> String {
    format!("hockey_stats_{}.json", season.start_year())
}

/// Write rows as CSV with a header line. An empty slice still gets the header.
pub fn write_csv<W: Write>(wtr: W, rows: &[SummaryRow]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    if rows.is_empty() {
        writer.write_record(EXPORT_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write rows as a JSON array of records.
pub fn write_json<W: Write>(wtr: W, rows: &[SummaryRow]) -> Result<(), serde_json::Error> {
    serde_json::to_writer(wtr, rows)
}

/// Paths produced by [`export_season`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub csv: PathBuf,
    pub json: Option<PathBuf>,
}

/// Write the season files into `dir`, creating it if needed. Existing files
/// for the same season are replaced.
pub fn export_season(
    dir: &Path,
    season: Season,
    rows: &[SummaryRow],
    with_json: bool,
) -> Result<ExportedFiles, RefreshError> {
    fs::create_dir_all(dir).map_err(|e| RefreshError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let csv_path = dir.join(csv_file_name(season));
    write_csv(BufWriter::new(create(&csv_path)?), rows)?;
    info!("wrote {} rows to {}", rows.len(), csv_path.display());

    let json = if with_json {
        let json_path = dir.join(json_file_name(season));
        let mut out = BufWriter::new(create(&json_path)?);
        write_json(&mut out, rows)?;
        out.flush().map_err(|e| RefreshError::Io {
            path: json_path.display().to_string(),
            source: e,
        })?;
        info!("wrote {}", json_path.display());
        Some(json_path)
    } else {
        None
    };

    Ok(ExportedFiles { csv: csv_path, json })
}

fn create(path: &Path) -> Result<File, RefreshError> {
    File::create(path).map_err(|e| RefreshError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(g60: Option<f64>) -> SummaryRow {
        SummaryRow {
            player_id: 8478402,
            season: 2023,
            name: "Connor McDavid".into(),
            team: "EDM".into(),
            position: "C".into(),
            situation: "5on5".into(),
            icetime: 72000.0,
            xgf60: Some(1.5),
            xga60: Some(-0.25),
            cf60: None,
            ca60: None,
            xg_impact: Some(2.0),
            cf_impact: Some(0.5),
            a160: Some(3.0),
            g60,
        }
    }

    #[test]
    fn csv_header_follows_export_order() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[row(Some(1.0))]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, EXPORT_COLUMNS.join(","));
    }

    #[test]
    fn absent_metrics_are_empty_cells() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[row(None)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let data = text.lines().nth(1).unwrap();
        assert_eq!(
            data,
            "8478402,2023,Connor McDavid,EDM,C,5on5,72000.0,1.5,-0.25,,,2.0,0.5,3.0,"
        );
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), EXPORT_COLUMNS.join(","));
    }

    #[test]
    fn json_records_use_null_for_absent() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[row(None)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let rec = &value.as_array().unwrap()[0];
        assert_eq!(rec["playerId"], 8478402);
        assert_eq!(rec["xGF60"], 1.5);
        assert!(rec["G60"].is_null());
        assert!(rec["CF60"].is_null());
    }

    #[test]
    fn exported_csv_loads_into_store() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[row(Some(1.25))]).unwrap();
        let store = rinkview_core::store::StatStore::load_bytes(&buf).unwrap();
        let rec = store
            .lookup("Connor McDavid", rinkview_core::catalog::Situation::FiveOnFive)
            .unwrap();
        assert_eq!(rec.metric(rinkview_core::catalog::MetricCode::G60), Some(1.25));
        assert_eq!(rec.metric(rinkview_core::catalog::MetricCode::Cf60), None);
    }

    #[test]
    fn file_names() {
        assert_eq!(csv_file_name(Season::new(2024)), "hockey_stats_2024.csv");
        assert_eq!(json_file_name(Season::new(2024)), "hockey_stats_2024.json");
    }
}
