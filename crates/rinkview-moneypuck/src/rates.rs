// Per-60 and on-ice-relative rates derived from a raw skater row.
//
// These are the un-normalized sources for each exported metric. The summary
// step turns them into z-scores within a comparison pool.

use rinkview_core::catalog::MetricCode;

use crate::raw::RawSkaterRow;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Rate per 60 minutes of `seconds`. `None` when either input is missing or
/// the time is not positive.
pub fn per60(count: Option<f64>, seconds: Option<f64>) -> Option<f64> {
    let (count, seconds) = (count?, seconds?);
    if !(seconds > 0.0) || !seconds.is_finite() {
        return None;
    }
    let rate = count * SECONDS_PER_HOUR / seconds;
    rate.is_finite().then_some(rate)
}

fn diff(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    let d = a? - b?;
    d.is_finite().then_some(d)
}

/// Source values for every exported metric, before normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkaterRates {
    /// On-ice minus off-ice expected goals for, per 60.
    pub rel_xgoals_for: Option<f64>,
    /// On-ice minus off-ice expected goals against, per 60.
    pub rel_xgoals_against: Option<f64>,
    pub rel_shot_attempts_for: Option<f64>,
    pub rel_shot_attempts_against: Option<f64>,
    /// On-ice minus off-ice expected goals share.
    pub rel_xgoals_pct: Option<f64>,
    /// On-ice minus off-ice Corsi share.
    pub rel_corsi_pct: Option<f64>,
    pub primary_assists_per60: Option<f64>,
    pub goals_per60: Option<f64>,
}

impl SkaterRates {
    pub fn from_raw(row: &RawSkaterRow) -> Self {
        let on = |x| per60(x, row.icetime);
        let off = |x| per60(x, row.time_on_bench);

        SkaterRates {
            rel_xgoals_for: diff(on(row.on_ice_f_xgoals), off(row.off_ice_f_xgoals)),
            rel_xgoals_against: diff(on(row.on_ice_a_xgoals), off(row.off_ice_a_xgoals)),
            rel_shot_attempts_for: diff(
                on(row.on_ice_f_shot_attempts),
                off(row.off_ice_f_shot_attempts),
            ),
            rel_shot_attempts_against: diff(
                on(row.on_ice_a_shot_attempts),
                off(row.off_ice_a_shot_attempts),
            ),
            rel_xgoals_pct: diff(row.on_ice_xgoals_pct, row.off_ice_xgoals_pct),
            rel_corsi_pct: diff(row.on_ice_corsi_pct, row.off_ice_corsi_pct),
            primary_assists_per60: on(row.primary_assists),
            goals_per60: on(row.goals),
        }
    }

    /// The rate a metric is normalized from.
    pub fn source(&self, code: MetricCode) -> Option<f64> {
        match code {
            MetricCode::XgF60 => self.rel_xgoals_for,
            MetricCode::XgA60 => self.rel_xgoals_against,
            MetricCode::Cf60 => self.rel_shot_attempts_for,
            MetricCode::Ca60 => self.rel_shot_attempts_against,
            MetricCode::XgImpact => self.rel_xgoals_pct,
            MetricCode::CfImpact => self.rel_corsi_pct,
            MetricCode::A160 => self.primary_assists_per60,
            MetricCode::G60 => self.goals_per60,
        }
    }
}
