use serde::{Deserialize, Serialize};

/// Geometric "chance of winning": the share of the total exit distance that lies on the stop-loss
/// side. Direction is ignored, so long and short setups are treated alike.
pub fn technical_chance(current: f64, target: f64, stop_loss: f64) -> f64 {
    let stop_distance = (current - stop_loss).abs();
    let target_distance = (target - current).abs();
    let total = stop_distance + target_distance;
    if total == 0.0 {
        return 0.5;
    }
    if total.is_infinite() {
        // Distances overflowed f64; the ratio is scale-free, so retry on quartered levels.
        return technical_chance(current * 0.25, target * 0.25, stop_loss * 0.25);
    }
    stop_distance / total
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub technical: f64,
    pub fundamental: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            technical: 0.7,
            fundamental: 0.3,
        }
    }
}

/// Blends the technical chance with a fundamental score. The result stays in [0, 1] only for
/// non-negative weights that sum to 1.
pub fn composite(
    current: f64,
    target: f64,
    stop_loss: f64,
    fundamental_score: f64,
    weights: CompositeWeights,
) -> f64 {
    let technical = technical_chance(current, target, stop_loss);
    weights.technical * technical + weights.fundamental * fundamental_score
}

pub fn expectancy(current: f64, target: f64, stop_loss: f64, chance_of_winning: f64) -> f64 {
    chance_of_winning * (target - current) - (1.0 - chance_of_winning) * (current - stop_loss)
}
