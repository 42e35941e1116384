// Season stats table: CSV parsing with dynamic field typing and
// (player, situation) lookup.
//
// The first row names the columns. Numeric-looking cells become numbers,
// `true`/`false` become booleans, empty cells become null and everything else
// is kept verbatim as text. Lookup is a linear scan where the first matching
// row wins.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{MetricCode, Situation};

/// Columns a stats file must provide.
pub const REQUIRED_COLUMNS: [&str; 2] = ["name", "situation"];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is empty (no header row)")]
    Empty,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line} is not valid UTF-8")]
    Utf8 { line: u64 },

    #[error("header is missing required column `{0}`")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A dynamically typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl FieldValue {
    /// Coerce a raw cell into a typed value.
    pub fn coerce(raw: &str) -> FieldValue {
        if raw.is_empty() {
            return FieldValue::Null;
        }
        let trimmed = raw.trim();
        match trimmed {
            "true" | "TRUE" => return FieldValue::Bool(true),
            "false" | "FALSE" => return FieldValue::Bool(false),
            _ => {}
        }
        match parse_number(trimmed) {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Parse a finite decimal literal (`12`, `-0.5`, `.25`, `1e-3`).
///
/// Rejects the words Rust's float parser also accepts (`inf`, `NaN`) and a
/// leading `+`, so those stay text.
fn parse_number(s: &str) -> Option<f64> {
    let first = s.chars().next()?;
    if !(first.is_ascii_digit() || first == '-' || first == '.') {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

// ---------------------------------------------------------------------------
// StatRecord
// ---------------------------------------------------------------------------

/// One row of a season stats file.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRecord {
    /// Display name; the identity key for lookups.
    pub player: String,
    /// Raw `situation` column (`5on5`, `4on5`, `5on4`, or anything else).
    pub situation: String,
    pub team: String,
    pub position: String,
    /// Time on ice in seconds, when present and non-negative.
    pub icetime_seconds: Option<f64>,
    /// Every column of the row, keyed by header name.
    fields: BTreeMap<String, FieldValue>,
}

impl StatRecord {
    pub fn field(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Numeric value of `column`, or `None` when it is missing, null or text.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.field(column).and_then(FieldValue::as_number)
    }

    pub fn metric(&self, code: MetricCode) -> Option<f64> {
        self.number(code.as_str())
    }

    /// Ice time in minutes, for display with one decimal.
    pub fn icetime_minutes(&self) -> Option<f64> {
        self.icetime_seconds.map(|s| s / 60.0)
    }

    fn from_cells(headers: &[String], cells: Vec<String>) -> Self {
        let text_of = |name: &str| -> String {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| cells.get(i))
                .cloned()
                .unwrap_or_default()
        };

        let player = text_of("name");
        let situation = text_of("situation");
        let team = text_of("team");
        let position = text_of("position");

        let mut fields = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            let value = cells
                .get(i)
                .map(|c| FieldValue::coerce(c))
                .unwrap_or(FieldValue::Null);
            // Duplicate header names: the first column wins.
            fields.entry(header.clone()).or_insert(value);
        }

        let icetime_seconds = fields
            .get("icetime")
            .and_then(FieldValue::as_number)
            .filter(|s| *s >= 0.0);

        StatRecord {
            player,
            situation,
            team,
            position,
            icetime_seconds,
            fields,
        }
    }
}

// ---------------------------------------------------------------------------
// StatStore
// ---------------------------------------------------------------------------

/// All rows of one season's stats file, in file order.
#[derive(Debug, Clone, Default)]
pub struct StatStore {
    records: Vec<StatRecord>,
}

impl StatStore {
    pub fn empty() -> Self {
        StatStore::default()
    }

    /// Parse CSV text into a store.
    pub fn load(text: &str) -> Result<StatStore, ParseError> {
        Self::from_reader(text.as_bytes())
    }

    /// Parse raw bytes, rejecting input that is not UTF-8.
    pub fn load_bytes(bytes: &[u8]) -> Result<StatStore, ParseError> {
        Self::from_reader(bytes)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<StatStore, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| decode(h, 1))
            .collect::<Result<_, _>>()?;

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ParseError::Empty);
        }
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(ParseError::MissingColumn(required));
            }
        }

        let mut records = Vec::new();
        for result in reader.byte_records() {
            let row = result?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            let cells: Vec<String> = row
                .iter()
                .map(|c| decode(c, line))
                .collect::<Result<_, _>>()?;

            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            if cells.len() > headers.len() {
                warn!(
                    "line {}: {} cells for {} columns, ignoring the extra cells",
                    line,
                    cells.len(),
                    headers.len()
                );
            }

            records.push(StatRecord::from_cells(&headers, cells));
        }

        debug!("parsed {} stat records", records.len());
        Ok(StatStore { records })
    }

    pub fn records(&self) -> &[StatRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record for `player` in `situation`, matching names exactly.
    ///
    /// A well-formed file has at most one such row; if it has more, the
    /// earliest row in file order is returned.
    pub fn lookup(&self, player: &str, situation: Situation) -> Option<&StatRecord> {
        self.records
            .iter()
            .find(|r| r.player == player && r.situation == situation.code())
    }

    /// Distinct player names, sorted.
    pub fn players(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.player.is_empty())
            .map(|r| r.player.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn decode(bytes: &[u8], line: u64) -> Result<String, ParseError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| ParseError::Utf8 { line })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
playerId,season,name,team,position,situation,icetime,xGF60,xGA60,CF60,CA60,xGImpact,CFImpact,A160,G60
8478402,2023,Connor McDavid,EDM,C,5on5,78000,2.1,0.4,1.9,0.2,1.8,1.7,2.6,1.9
8478402,2023,Connor McDavid,EDM,C,4on5,600,,,,,,,,
8478402,2023,Connor McDavid,EDM,C,5on4,14000,2.7,,2.2,,,,,
8477934,2023,Leon Draisaitl,EDM,C,5on5,75000,1.2,-0.3,1.0,-0.1,0.9,0.8,1.1,2.2";

    #[test]
    fn load_counts_data_rows() {
        let store = StatStore::load(SAMPLE).unwrap();
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn numeric_and_text_fields_preserved() {
        let store = StatStore::load(SAMPLE).unwrap();
        let rec = &store.records()[0];
        assert_eq!(rec.player, "Connor McDavid");
        assert_eq!(rec.team, "EDM");
        assert_eq!(rec.position, "C");
        assert_eq!(rec.situation, "5on5");
        assert_eq!(rec.number("playerId"), Some(8478402.0));
        assert_eq!(rec.icetime_seconds, Some(78000.0));
        assert_eq!(rec.metric(MetricCode::G60), Some(1.9));
        assert_eq!(rec.field("team"), Some(&FieldValue::Text("EDM".into())));
    }

    #[test]
    fn empty_cells_are_null_and_absent_as_metrics() {
        let store = StatStore::load(SAMPLE).unwrap();
        let pk = &store.records()[1];
        assert_eq!(pk.field("xGA60"), Some(&FieldValue::Null));
        assert_eq!(pk.metric(MetricCode::XgA60), None);
    }

    #[test]
    fn coerce_rules() {
        assert_eq!(FieldValue::coerce("1.25"), FieldValue::Number(1.25));
        assert_eq!(FieldValue::coerce("-3"), FieldValue::Number(-3.0));
        assert_eq!(FieldValue::coerce(".5"), FieldValue::Number(0.5));
        assert_eq!(FieldValue::coerce(" 42 "), FieldValue::Number(42.0));
        assert_eq!(FieldValue::coerce("1e3"), FieldValue::Number(1000.0));
        assert_eq!(FieldValue::coerce("true"), FieldValue::Bool(true));
        assert_eq!(FieldValue::coerce("FALSE"), FieldValue::Bool(false));
        assert_eq!(FieldValue::coerce(""), FieldValue::Null);
        assert_eq!(FieldValue::coerce("NaN"), FieldValue::Text("NaN".into()));
        assert_eq!(FieldValue::coerce("inf"), FieldValue::Text("inf".into()));
        assert_eq!(FieldValue::coerce("+5"), FieldValue::Text("+5".into()));
        assert_eq!(FieldValue::coerce("5on5"), FieldValue::Text("5on5".into()));
        assert_eq!(FieldValue::coerce(" L "), FieldValue::Text(" L ".into()));
    }

    #[test]
    fn skips_empty_lines() {
        let text = "name,situation,G60\n\nA,5on5,1.0\n\n,,\nB,5on5,2.0\n\n";
        let store = StatStore::load(text).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[1].player, "B");
    }

    #[test]
    fn short_rows_padded_with_null() {
        let text = "name,situation,G60,A160\nA,5on5,1.0";
        let store = StatStore::load(text).unwrap();
        let rec = &store.records()[0];
        assert_eq!(rec.metric(MetricCode::G60), Some(1.0));
        assert_eq!(rec.field("A160"), Some(&FieldValue::Null));
    }

    #[test]
    fn quoted_fields_with_commas() {
        let text = "name,situation,team\n\"Smith, John\",5on5,\"NYR\"";
        let store = StatStore::load(text).unwrap();
        assert_eq!(store.records()[0].player, "Smith, John");
        assert_eq!(store.records()[0].team, "NYR");
    }

    #[test]
    fn lookup_first_match_wins() {
        let text = "name,situation,team,G60\nA,5on5,BOS,1.0\nA,5on5,TOR,2.0";
        let store = StatStore::load(text).unwrap();
        let rec = store.lookup("A", Situation::FiveOnFive).unwrap();
        assert_eq!(rec.team, "BOS");
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let store = StatStore::load(SAMPLE).unwrap();
        assert!(store.lookup("Connor McDavid", Situation::FiveOnFour).is_some());
        assert!(store.lookup("connor mcdavid", Situation::FiveOnFive).is_none());
        assert!(store.lookup("Connor", Situation::FiveOnFive).is_none());
        assert!(store.lookup("Leon Draisaitl", Situation::FourOnFive).is_none());
    }

    #[test]
    fn unknown_situations_are_kept_but_never_match() {
        let text = "name,situation\nA,all\nA,other";
        let store = StatStore::load(text).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].situation, "all");
        for situation in [Situation::FiveOnFive, Situation::FourOnFive, Situation::FiveOnFour] {
            assert!(store.lookup("A", situation).is_none());
        }
    }

    #[test]
    fn players_are_distinct_and_sorted() {
        let store = StatStore::load(SAMPLE).unwrap();
        assert_eq!(store.players(), vec!["Connor McDavid", "Leon Draisaitl"]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(StatStore::load(""), Err(ParseError::Empty)));
    }

    #[test]
    fn missing_required_column_is_an_error() {
        match StatStore::load("player,situation\nA,5on5") {
            Err(ParseError::MissingColumn(col)) => assert_eq!(col, "name"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut bytes = b"name,situation\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b',', b'5']);
        assert!(matches!(
            StatStore::load_bytes(&bytes),
            Err(ParseError::Utf8 { .. })
        ));
    }

    #[test]
    fn negative_icetime_is_not_exposed() {
        let store = StatStore::load("name,situation,icetime\nA,5on5,-60").unwrap();
        let rec = &store.records()[0];
        assert_eq!(rec.icetime_seconds, None);
        assert_eq!(rec.number("icetime"), Some(-60.0));
    }

    #[test]
    fn icetime_minutes_conversion() {
        let store = StatStore::load("name,situation,icetime\nA,5on5,1200").unwrap();
        assert_eq!(store.records()[0].icetime_minutes(), Some(20.0));
    }
}
