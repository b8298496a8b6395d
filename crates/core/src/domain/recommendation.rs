use crate::scoring::fundamental::FundamentalScore;
use crate::scoring::signal::SignalNote;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Hold => "Hold",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub generated_at: DateTime<Utc>,
    pub technical_chance: f64,
    pub fundamental: FundamentalScore,
    pub composite_chance: f64,
    pub expectancy: f64,
    pub technical_recommendation: Recommendation,
    pub signal_notes: Vec<SignalNote>,
    pub final_recommendation: Recommendation,
}

impl EvaluationResult {
    pub fn fundamental_score(&self) -> f64 {
        self.fundamental.value()
    }
}
