// Season identifiers and URL templating.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Placeholder substituted by `Season::url`.
pub const SEASON_PLACEHOLDER: &str = "{season}";

/// First month (1-based) that belongs to a new NHL season.
const SEASON_START_MONTH: u32 = 8;

/// An NHL season, identified by the calendar year it starts in
/// (2023 is the 2023-24 season).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season(u16);

impl Season {
    pub const fn new(start_year: u16) -> Self {
        Season(start_year)
    }

    pub fn start_year(self) -> u16 {
        self.0
    }

    /// Substitute this season into a URL or path template.
    pub fn url(self, template: &str) -> String {
        template.replace(SEASON_PLACEHOLDER, &self.0.to_string())
    }

    /// Display label in the usual "2023-24" form.
    pub fn label(self) -> String {
        format!("{}-{:02}", self.0, (self.0 % 100 + 1) % 100)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The season in progress on `date`.
///
/// August through December belong to the season starting that year;
/// January through July belong to the season that started the year before.
pub fn current_nhl_season(date: NaiveDate) -> Season {
    let year = date.year();
    let start = if date.month() >= SEASON_START_MONTH {
        year
    } else {
        year - 1
    };
    Season(start.clamp(0, u16::MAX as i32) as u16)
}
