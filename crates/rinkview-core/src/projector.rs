// Situation profiles and metric projection.
//
// A profile is the ordered list of metric codes charted for one situation.
// Projection reads those metrics off a record in profile order and drops the
// ones the record does not have.

use crate::catalog::{MetricCode, Situation};
use crate::store::StatRecord;

/// The metric set charted for one game situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SituationProfile {
    pub situation: Situation,
    pub codes: &'static [MetricCode],
}

impl SituationProfile {
    /// Even strength: every metric.
    pub const FULL: SituationProfile = SituationProfile {
        situation: Situation::FiveOnFive,
        codes: &[
            MetricCode::G60,
            MetricCode::A160,
            MetricCode::XgImpact,
            MetricCode::CfImpact,
            MetricCode::XgF60,
            MetricCode::Cf60,
            MetricCode::XgA60,
            MetricCode::Ca60,
        ],
    };

    /// Penalty kill: suppression metrics only.
    pub const DEFENSIVE: SituationProfile = SituationProfile {
        situation: Situation::FourOnFive,
        codes: &[MetricCode::XgA60, MetricCode::Ca60],
    };

    /// Power play: generation metrics only.
    pub const OFFENSIVE: SituationProfile = SituationProfile {
        situation: Situation::FiveOnFour,
        codes: &[MetricCode::XgF60, MetricCode::Cf60],
    };

    /// Profiles in panel order.
    pub const ALL: [SituationProfile; 3] = [Self::FULL, Self::DEFENSIVE, Self::OFFENSIVE];

    /// Chart title, e.g. "5 on 5 Performance".
    pub fn title(&self) -> String {
        format!("{} Performance", self.situation.display_str())
    }
}

/// One displayable bar: a metric that is present on the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricEntry {
    pub code: MetricCode,
    pub description: &'static str,
    pub value: f64,
}

/// Project `record` onto `profile`.
///
/// Entries come out in profile order. Metrics the record lacks (missing
/// column, empty cell, non-numeric text) are left out entirely rather than
/// shown as zero. `None` projects to an empty list.
pub fn project(record: Option<&StatRecord>, profile: &SituationProfile) -> Vec<MetricEntry> {
    let Some(record) = record else {
        return Vec::new();
    };

    profile
        .codes
        .iter()
        .filter_map(|&code| {
            record.metric(code).map(|value| MetricEntry {
                code,
                description: code.description(),
                value,
            })
        })
        .collect()
}
