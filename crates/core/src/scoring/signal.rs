use crate::domain::market::QuoteSnapshot;
use crate::domain::recommendation::Recommendation;
use serde::{Deserialize, Serialize};

pub const SMALL_CAP_THRESHOLD: f64 = 1_000_000_000.0;
const NEAR_LOW_RATIO: f64 = 0.3;
const NEAR_HIGH_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInputs {
    pub current_price: f64,
    pub market_cap: Option<f64>,
    pub day_high: f64,
    pub day_low: f64,
    pub price_avg50: f64,
    pub price_avg200: f64,
}

impl From<&QuoteSnapshot> for SignalInputs {
    fn from(q: &QuoteSnapshot) -> Self {
        Self {
            current_price: q.current_price,
            market_cap: q.market_cap,
            day_high: q.day_high,
            day_low: q.day_low,
            price_avg50: q.price_avg50,
            price_avg200: q.price_avg200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalRule {
    MarketCap,
    Average50,
    Average200,
    DayRange,
}

/// What one rule concluded. `verdict` is the label the rule wrote, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalNote {
    pub rule: SignalRule,
    pub verdict: Option<Recommendation>,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAssessment {
    pub recommendation: Recommendation,
    pub notes: Vec<SignalNote>,
}

struct Verdict {
    set: Option<Recommendation>,
    detail: String,
}

type RuleFn = fn(&SignalInputs) -> Verdict;

// Applied in order; a later rule that sets a label overwrites anything before it.
const CASCADE: [(SignalRule, RuleFn); 4] = [
    (SignalRule::MarketCap, market_cap_rule),
    (SignalRule::Average50, average50_rule),
    (SignalRule::Average200, average200_rule),
    (SignalRule::DayRange, day_range_rule),
];

pub fn technical_recommendation(inputs: &SignalInputs) -> Recommendation {
    assess(inputs).recommendation
}

/// Runs the rule cascade starting from Hold and keeps every rule's rationale.
pub fn assess(inputs: &SignalInputs) -> TechnicalAssessment {
    let mut notes = Vec::with_capacity(CASCADE.len());
    let recommendation = CASCADE
        .iter()
        .fold(Recommendation::default(), |current, (rule, apply)| {
            let verdict = apply(inputs);
            tracing::info!(rule = ?rule, verdict = ?verdict.set, "{}", verdict.detail);
            notes.push(SignalNote {
                rule: *rule,
                verdict: verdict.set,
                detail: verdict.detail,
            });
            verdict.set.unwrap_or(current)
        });

    TechnicalAssessment {
        recommendation,
        notes,
    }
}

/// Position of `current` inside the day's range; 0.5 for a single-price day.
pub fn day_range_ratio(current: f64, day_high: f64, day_low: f64) -> f64 {
    let range = day_high - day_low;
    if range != 0.0 {
        (current - day_low) / range
    } else {
        0.5
    }
}

fn market_cap_rule(i: &SignalInputs) -> Verdict {
    match i.market_cap {
        Some(cap) if cap < SMALL_CAP_THRESHOLD => Verdict {
            set: Some(Recommendation::Sell),
            detail: format!("Market cap ${cap:.0} (small cap: consider selling)"),
        },
        Some(cap) => Verdict {
            set: None,
            detail: format!("Market cap ${cap:.0} (not a small cap)"),
        },
        None => Verdict {
            set: None,
            detail: "Market cap unavailable; small-cap check skipped".to_string(),
        },
    }
}

fn average50_rule(i: &SignalInputs) -> Verdict {
    if i.current_price > i.price_avg50 {
        Verdict {
            set: None,
            detail: format!(
                "Price is above the 50-day moving average ({}): bullish signal",
                i.price_avg50
            ),
        }
    } else {
        Verdict {
            set: Some(Recommendation::Sell),
            detail: format!(
                "Price is below the 50-day moving average ({}): bearish signal",
                i.price_avg50
            ),
        }
    }
}

fn average200_rule(i: &SignalInputs) -> Verdict {
    if i.current_price > i.price_avg200 {
        Verdict {
            set: None,
            detail: format!(
                "Price is above the 200-day moving average ({}): long-term bullish trend",
                i.price_avg200
            ),
        }
    } else {
        Verdict {
            set: Some(Recommendation::Sell),
            detail: format!(
                "Price is below the 200-day moving average ({}): long-term bearish trend",
                i.price_avg200
            ),
        }
    }
}

fn day_range_rule(i: &SignalInputs) -> Verdict {
    let ratio = day_range_ratio(i.current_price, i.day_high, i.day_low);
    if ratio < NEAR_LOW_RATIO {
        Verdict {
            set: Some(Recommendation::Buy),
            detail: format!("Price is close to the day's low (range ratio {ratio:.2}): potential buy"),
        }
    } else if ratio > NEAR_HIGH_RATIO {
        Verdict {
            set: Some(Recommendation::Sell),
            detail: format!("Price is close to the day's high (range ratio {ratio:.2}): potential sell"),
        }
    } else {
        Verdict {
            set: None,
            detail: format!("Price is mid-range for the day (range ratio {ratio:.2})"),
        }
    }
}
