use crate::error::InvalidUserInput;
use serde::{Deserialize, Serialize};

/// User supplied exit levels. Nothing ties them to the current price: a target below the price or a
/// stop-loss above it is accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeParameters {
    pub target_price: f64,
    pub stop_loss: f64,
}

impl TradeParameters {
    pub fn parse(target_price: &str, stop_loss: &str) -> Result<Self, InvalidUserInput> {
        Ok(Self {
            target_price: parse_price("target price", target_price)?,
            stop_loss: parse_price("stop-loss", stop_loss)?,
        })
    }
}

fn parse_price(field: &'static str, input: &str) -> Result<f64, InvalidUserInput> {
    let trimmed = input.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| InvalidUserInput::NotANumber {
            field,
            input: trimmed.to_string(),
        })?;
    if !value.is_finite() {
        return Err(InvalidUserInput::NotFinite {
            field,
            input: trimmed.to_string(),
        });
    }
    Ok(value)
}
