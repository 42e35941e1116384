// Season summary: raw skater rows in, normalized metric rows out.
//
// Rows below the ice-time cutoff are dropped. The rest are pooled by
// (position group, situation) and every metric becomes a z-score within its
// pool. Defensive metrics are sign-flipped so that positive always reads as
// better than the pool.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use rinkview_core::catalog::MetricCode;

use crate::raw::RawSkaterRow;
use crate::rates::SkaterRates;
use crate::zscore::{compute_pool_stats, compute_zscore, PositionGroup};

/// Default ice-time cutoff in seconds (100 minutes).
pub const DEFAULT_MIN_ICETIME_SECONDS: f64 = 6000.0;

/// One exported row. Field order is the export column order; absent metrics
/// serialize as empty CSV cells and JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "playerId")]
    pub player_id: u64,
    pub season: u16,
    pub name: String,
    pub team: String,
    pub position: String,
    pub situation: String,
    pub icetime: f64,
    #[serde(rename = "xGF60")]
    pub xgf60: Option<f64>,
    #[serde(rename = "xGA60")]
    pub xga60: Option<f64>,
    #[serde(rename = "CF60")]
    pub cf60: Option<f64>,
    #[serde(rename = "CA60")]
    pub ca60: Option<f64>,
    #[serde(rename = "xGImpact")]
    pub xg_impact: Option<f64>,
    #[serde(rename = "CFImpact")]
    pub cf_impact: Option<f64>,
    #[serde(rename = "A160")]
    pub a160: Option<f64>,
    #[serde(rename = "G60")]
    pub g60: Option<f64>,
}

impl SummaryRow {
    fn new(row: &RawSkaterRow, icetime: f64) -> Self {
        SummaryRow {
            player_id: row.player_id,
            season: row.season,
            name: row.name.clone(),
            team: row.team.clone(),
            position: row.position.clone(),
            situation: row.situation.clone(),
            icetime,
            xgf60: None,
            xga60: None,
            cf60: None,
            ca60: None,
            xg_impact: None,
            cf_impact: None,
            a160: None,
            g60: None,
        }
    }

    pub fn metric(&self, code: MetricCode) -> Option<f64> {
        match code {
            MetricCode::XgF60 => self.xgf60,
            MetricCode::XgA60 => self.xga60,
            MetricCode::Cf60 => self.cf60,
            MetricCode::Ca60 => self.ca60,
            MetricCode::XgImpact => self.xg_impact,
            MetricCode::CfImpact => self.cf_impact,
            MetricCode::A160 => self.a160,
            MetricCode::G60 => self.g60,
        }
    }

    fn metric_mut(&mut self, code: MetricCode) -> &mut Option<f64> {
        match code {
            MetricCode::XgF60 => &mut self.xgf60,
            MetricCode::XgA60 => &mut self.xga60,
            MetricCode::Cf60 => &mut self.cf60,
            MetricCode::Ca60 => &mut self.ca60,
            MetricCode::XgImpact => &mut self.xg_impact,
            MetricCode::CfImpact => &mut self.cf_impact,
            MetricCode::A160 => &mut self.a160,
            MetricCode::G60 => &mut self.g60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PoolKey<'a> {
    group: PositionGroup,
    situation: &'a str,
}

/// Build the normalized summary for `rows`, keeping input order among the
/// rows that pass the ice-time cutoff.
pub fn build_summary(rows: &[RawSkaterRow], min_icetime_seconds: f64) -> Vec<SummaryRow> {
    let eligible: Vec<(&RawSkaterRow, f64, PoolKey<'_>, SkaterRates)> = rows
        .iter()
        .filter_map(|row| {
            let icetime = row.icetime.filter(|t| *t >= min_icetime_seconds)?;
            let key = PoolKey {
                group: PositionGroup::from_position(&row.position),
                situation: row.situation.as_str(),
            };
            Some((row, icetime, key, SkaterRates::from_raw(row)))
        })
        .collect();

    debug!(
        "{} of {} rows pass the {}s ice-time cutoff",
        eligible.len(),
        rows.len(),
        min_icetime_seconds
    );

    let mut out: Vec<SummaryRow> = eligible
        .iter()
        .map(|(row, icetime, _, _)| SummaryRow::new(row, *icetime))
        .collect();

    for code in MetricCode::ALL {
        let mut pools: BTreeMap<&PoolKey<'_>, Vec<f64>> = BTreeMap::new();
        for (_, _, key, rates) in &eligible {
            if let Some(v) = rates.source(code) {
                pools.entry(key).or_default().push(v);
            }
        }
        let stats: BTreeMap<&PoolKey<'_>, _> = pools
            .into_iter()
            .map(|(key, values)| (key, compute_pool_stats(&values)))
            .collect();

        let sign = if code.is_defensive() { -1.0 } else { 1.0 };
        for ((_, _, key, rates), summary) in eligible.iter().zip(out.iter_mut()) {
            let z = match (rates.source(code), stats.get(key).copied().flatten()) {
                (Some(v), Some(pool)) => compute_zscore(v, &pool),
                _ => None,
            };
            *summary.metric_mut(code) = z.map(|z| z * sign);
        }
    }

    out
}
