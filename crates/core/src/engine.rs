use crate::domain::market::{Credential, FundamentalsPair, QuoteSnapshot, Ticker};
use crate::domain::recommendation::EvaluationResult;
use crate::domain::trade::TradeParameters;
use crate::error::{FundamentalsInsufficient, QuoteUnavailable};
use crate::ingest::provider::{FundamentalsProvider, QuoteProvider};
use crate::scoring::fundamental::{self, FundamentalScore};
use crate::scoring::{decision, probability, signal};
use crate::scoring::{CompositeWeights, DecisionThresholds, SignalInputs};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvaluationConfig {
    pub weights: CompositeWeights,
    pub thresholds: DecisionThresholds,
}

impl EvaluationConfig {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Some(v) = env_f64("TRADECHECK_W_TECH") {
            out.weights.technical = v;
        }
        if let Some(v) = env_f64("TRADECHECK_W_FUND") {
            out.weights.fundamental = v;
        }
        if let Some(v) = env_f64("TRADECHECK_CHANCE_THRESHOLD") {
            out.thresholds.chance = v;
        }
        if let Some(v) = env_f64("TRADECHECK_EXPECTANCY_THRESHOLD") {
            out.thresholds.expectancy = v;
        }

        let weight_sum = out.weights.technical + out.weights.fundamental;
        if (weight_sum - 1.0).abs() > 1e-9 {
            tracing::warn!(
                w_tech = out.weights.technical,
                w_fund = out.weights.fundamental,
                "composite weights do not sum to 1; composite chance may leave [0, 1]"
            );
        }

        out
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<f64>().ok())
}

/// Everything fetched for one ticker. Fundamentals may be missing; the quote may not.
#[derive(Debug, Clone)]
pub struct MarketData {
    pub ticker: Ticker,
    pub quote: QuoteSnapshot,
    pub fundamentals: Result<FundamentalsPair, FundamentalsInsufficient>,
}

impl MarketData {
    pub fn fundamental_score(&self) -> FundamentalScore {
        fundamental::score_outcome(&self.fundamentals)
    }
}

/// Fetches the quote and then the fundamentals. A missing quote stops here and the fundamentals
/// provider is never called.
pub async fn fetch_market_data(
    quotes: &dyn QuoteProvider,
    fundamentals: &dyn FundamentalsProvider,
    ticker: &Ticker,
    credential: &Credential,
) -> Result<MarketData, QuoteUnavailable> {
    let quote = quotes.fetch_quote(ticker, credential).await?;
    tracing::info!(
        %ticker,
        provider = quotes.provider_name(),
        current_price = quote.current_price,
        "fetched quote"
    );

    let fundamentals = fundamentals.fetch_fundamentals(ticker, credential).await;
    if let Err(err) = &fundamentals {
        tracing::warn!(%ticker, error = %err, "fundamentals unavailable");
    }

    Ok(MarketData {
        ticker: ticker.clone(),
        quote,
        fundamentals,
    })
}

pub fn evaluate(
    quote: &QuoteSnapshot,
    fundamental: FundamentalScore,
    params: TradeParameters,
    config: &EvaluationConfig,
) -> EvaluationResult {
    let current = quote.current_price;
    let TradeParameters {
        target_price,
        stop_loss,
    } = params;

    let technical_chance = probability::technical_chance(current, target_price, stop_loss);
    let composite_chance = probability::composite(
        current,
        target_price,
        stop_loss,
        fundamental.value(),
        config.weights,
    );
    let expectancy = probability::expectancy(current, target_price, stop_loss, composite_chance);

    let assessment = signal::assess(&SignalInputs::from(quote));
    let final_recommendation =
        decision::final_decision(composite_chance, expectancy, config.thresholds);

    tracing::info!(
        technical_chance,
        fundamental_score = fundamental.value(),
        composite_chance,
        expectancy,
        technical_recommendation = %assessment.recommendation,
        final_recommendation = %final_recommendation,
        "evaluation complete"
    );

    EvaluationResult {
        generated_at: chrono::Utc::now(),
        technical_chance,
        fundamental,
        composite_chance,
        expectancy,
        technical_recommendation: assessment.recommendation,
        signal_notes: assessment.notes,
        final_recommendation,
    }
}
