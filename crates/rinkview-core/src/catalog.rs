// Metric catalog: game situations, short metric codes and their
// descriptions.

use std::fmt;

// ---------------------------------------------------------------------------
// Situation
// ---------------------------------------------------------------------------

/// Game strength state a stats row was recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Situation {
    /// Even strength.
    FiveOnFive,
    /// Penalty kill.
    FourOnFive,
    /// Power play.
    FiveOnFour,
}

impl Situation {
    /// The code used in the `situation` column (`5on5`, `4on5`, `5on4`).
    pub fn code(self) -> &'static str {
        match self {
            Situation::FiveOnFive => "5on5",
            Situation::FourOnFive => "4on5",
            Situation::FiveOnFour => "5on4",
        }
    }

    pub fn display_str(self) -> &'static str {
        match self {
            Situation::FiveOnFive => "5 on 5",
            Situation::FourOnFive => "4 on 5",
            Situation::FiveOnFour => "5 on 4",
        }
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// MetricCode
// ---------------------------------------------------------------------------

/// The normalized metrics carried by a season stats file. Every value is a
/// z-score within the player's (position group, situation) pool, so they
/// share one scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCode {
    G60,
    A160,
    XgImpact,
    CfImpact,
    XgF60,
    Cf60,
    XgA60,
    Ca60,
}

impl MetricCode {
    pub const ALL: [MetricCode; 8] = [
        MetricCode::G60,
        MetricCode::A160,
        MetricCode::XgImpact,
        MetricCode::CfImpact,
        MetricCode::XgF60,
        MetricCode::Cf60,
        MetricCode::XgA60,
        MetricCode::Ca60,
    ];

    /// Column name in the stats file.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricCode::G60 => "G60",
            MetricCode::A160 => "A160",
            MetricCode::XgImpact => "xGImpact",
            MetricCode::CfImpact => "CFImpact",
            MetricCode::XgF60 => "xGF60",
            MetricCode::Cf60 => "CF60",
            MetricCode::XgA60 => "xGA60",
            MetricCode::Ca60 => "CA60",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricCode::G60 => "Goals per 60 minutes",
            MetricCode::A160 => "Primary assists per 60 minutes",
            MetricCode::XgImpact => "On-ice expected goals share relative to off-ice",
            MetricCode::CfImpact => "On-ice shot attempt (Corsi) share relative to off-ice",
            MetricCode::XgF60 => "Expected goals for per 60, relative to off-ice",
            MetricCode::Cf60 => "Shot attempts for per 60, relative to off-ice",
            MetricCode::XgA60 => "Expected goals against per 60, relative (higher is better)",
            MetricCode::Ca60 => "Shot attempts against per 60, relative (higher is better)",
        }
    }

    /// Defensive metrics are stored sign-flipped so that a positive value
    /// always means better than the pool.
    pub fn is_defensive(self) -> bool {
        matches!(self, MetricCode::XgA60 | MetricCode::Ca60)
    }
}

impl fmt::Display for MetricCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
