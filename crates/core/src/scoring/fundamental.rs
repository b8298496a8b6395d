use crate::domain::market::FundamentalsPair;
use crate::error::FundamentalsInsufficient;
use serde::{Deserialize, Serialize};

/// Score used whenever the income statements cannot support a real computation.
pub const NEUTRAL_SCORE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FundamentalScore {
    Computed {
        score: f64,
        revenue_growth: f64,
        profit_margin: f64,
    },
    Neutral {
        reason: NeutralReason,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeutralReason {
    NoData,
    Insufficient(String),
    ZeroPreviousRevenue,
    ZeroLatestRevenue,
}

impl FundamentalScore {
    /// The score in [0, 1].
    pub fn value(&self) -> f64 {
        match self {
            Self::Computed { score, .. } => *score,
            Self::Neutral { .. } => NEUTRAL_SCORE,
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral { .. })
    }
}

/// Averages revenue growth and profit margin, each clamped to [0, 1]. Growth or margin beyond 100%
/// counts the same as exactly 100%.
pub fn score(pair: Option<&FundamentalsPair>) -> FundamentalScore {
    let Some(pair) = pair else {
        return neutral(NeutralReason::NoData);
    };

    let revenue_previous = pair.previous.revenue;
    let revenue_latest = pair.latest.revenue;
    if revenue_previous == 0.0 {
        return neutral(NeutralReason::ZeroPreviousRevenue);
    }
    if revenue_latest == 0.0 {
        return neutral(NeutralReason::ZeroLatestRevenue);
    }

    let revenue_growth = (revenue_latest - revenue_previous) / revenue_previous;
    let profit_margin = pair.latest.net_income / revenue_latest;
    let score = (unit_clamp(revenue_growth) + unit_clamp(profit_margin)) / 2.0;

    tracing::info!(
        revenue_growth,
        profit_margin,
        fundamental_score = score,
        "computed fundamental score"
    );

    FundamentalScore::Computed {
        score,
        revenue_growth,
        profit_margin,
    }
}

/// Scores a provider outcome; an insufficient-data outcome yields the neutral score.
pub fn score_outcome(
    outcome: &Result<FundamentalsPair, FundamentalsInsufficient>,
) -> FundamentalScore {
    match outcome {
        Ok(pair) => score(Some(pair)),
        Err(insufficient) => {
            tracing::warn!(error = %insufficient, "using neutral fundamental score");
            FundamentalScore::Neutral {
                reason: NeutralReason::Insufficient(insufficient.reason.to_string()),
            }
        }
    }
}

fn neutral(reason: NeutralReason) -> FundamentalScore {
    tracing::info!(?reason, "using neutral fundamental score");
    FundamentalScore::Neutral { reason }
}

fn unit_clamp(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
