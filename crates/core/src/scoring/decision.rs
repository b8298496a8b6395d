use crate::domain::recommendation::Recommendation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    pub chance: f64,
    pub expectancy: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            chance: 0.55,
            expectancy: 0.0,
        }
    }
}

/// Buy needs both a strong chance and strictly positive edge, Sell needs both to be weak. Any
/// mixed or boundary combination is Hold.
pub fn final_decision(
    composite_chance: f64,
    expectancy: f64,
    thresholds: DecisionThresholds,
) -> Recommendation {
    let strong_chance = composite_chance >= thresholds.chance;
    if strong_chance && expectancy > thresholds.expectancy {
        Recommendation::Buy
    } else if !strong_chance && expectancy < thresholds.expectancy {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    }
}
