use crate::error::InvalidUserInput;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Normalizes user input: surrounding whitespace is dropped and the symbol is upper-cased.
    pub fn parse(input: &str) -> Result<Self, InvalidUserInput> {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(InvalidUserInput::EmptyTicker);
        }
        if !symbol.chars().all(is_symbol_char) {
            return Err(InvalidUserInput::MalformedTicker(input.to_string()));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^')
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque provider credential. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub current_price: f64,
    pub market_cap: Option<f64>,
    pub day_high: f64,
    pub day_low: f64,
    pub price_avg50: f64,
    pub price_avg200: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub period: Option<NaiveDate>,
    pub revenue: f64,
    pub net_income: f64,
}

/// The two most recent income statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsPair {
    pub latest: IncomeStatement,
    pub previous: IncomeStatement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_trimmed_and_upper_cased() {
        let t = Ticker::parse("  msft \n").unwrap();
        assert_eq!(t.as_str(), "MSFT");
    }

    #[test]
    fn ticker_rejects_url_characters() {
        for input in ["A/B", "AAPL?apikey=x", "MSFT#frag", "../quote", "AB%2F"] {
            assert!(
                matches!(Ticker::parse(input), Err(InvalidUserInput::MalformedTicker(_))),
                "{input} should be rejected"
            );
        }
        assert_eq!(Ticker::parse("brk-b").unwrap().as_str(), "BRK-B");
        assert_eq!(Ticker::parse("^gspc").unwrap().as_str(), "^GSPC");
        assert_eq!(Ticker::parse("rds.a").unwrap().as_str(), "RDS.A");
    }

    #[test]
    fn ticker_rejects_blank_and_inner_whitespace() {
        assert_eq!(Ticker::parse("   "), Err(InvalidUserInput::EmptyTicker));
        assert!(matches!(
            Ticker::parse("BRK B"),
            Err(InvalidUserInput::MalformedTicker(_))
        ));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let c = Credential::new("secret-key");
        assert_eq!(format!("{c:?}"), "Credential(***)");
        assert_eq!(c.expose(), "secret-key");
    }
}
