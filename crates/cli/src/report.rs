use tradecheck_core::domain::market::{QuoteSnapshot, Ticker};
use tradecheck_core::domain::recommendation::EvaluationResult;
use tradecheck_core::domain::trade::TradeParameters;
use tradecheck_core::scoring::{FundamentalScore, NeutralReason, SignalNote};

pub fn quote_summary(ticker: &Ticker, quote: &QuoteSnapshot) -> String {
    let market_cap = quote
        .market_cap
        .map(|cap| format!("${cap:.0}"))
        .unwrap_or_else(|| "n/a".to_string());

    [
        String::new(),
        format!("Current price for {ticker}: ${:.2}", quote.current_price),
        format!("Market Cap: {market_cap}"),
        format!("Day High: ${}, Day Low: ${}", quote.day_high, quote.day_low),
        format!("50-Day Moving Average: ${}", quote.price_avg50),
        format!("200-Day Moving Average: ${}", quote.price_avg200),
    ]
    .join("\n")
}

pub fn fundamental_line(ticker: &Ticker, score: &FundamentalScore) -> String {
    match score {
        FundamentalScore::Computed {
            score,
            revenue_growth,
            profit_margin,
        } => format!(
            "Fundamental Score for {ticker}: {score:.2} (Profit Margin: {profit_margin:.2}, Revenue Growth: {revenue_growth:.2})"
        ),
        FundamentalScore::Neutral { reason } => {
            let why = match reason {
                NeutralReason::NoData => "no income statements".to_string(),
                NeutralReason::Insufficient(detail) => detail.clone(),
                NeutralReason::ZeroPreviousRevenue => "previous revenue is zero".to_string(),
                NeutralReason::ZeroLatestRevenue => "latest revenue is zero".to_string(),
            };
            format!(
                "Not enough income statement data for {ticker} ({why}). Using neutral score ({:.1}).",
                score.value()
            )
        }
    }
}

pub fn signal_lines(notes: &[SignalNote]) -> String {
    let mut lines = vec![String::from("\n--- Technical Signals ---")];
    lines.extend(notes.iter().map(|n| format!("- {}", n.detail)));
    lines.join("\n")
}

pub fn trade_analysis(
    ticker: &Ticker,
    quote: &QuoteSnapshot,
    params: &TradeParameters,
    result: &EvaluationResult,
) -> String {
    let rows = [
        ("Ticker:", ticker.to_string()),
        ("Current Price:", format!("${:.2}", quote.current_price)),
        ("Target Price:", format!("${:.2}", params.target_price)),
        ("Stop-Loss:", format!("${:.2}", params.stop_loss)),
        (
            "Technical Chance:",
            format!("{:.1}%", result.technical_chance * 100.0),
        ),
        (
            "Fundamental Score:",
            format!("{:.1}%", result.fundamental_score() * 100.0),
        ),
        (
            "Composite Chance:",
            format!("{:.1}%", result.composite_chance * 100.0),
        ),
        ("Calculated Expectancy:", format!("{:.2}", result.expectancy)),
        (
            "Technical Recommendation:",
            result.technical_recommendation.to_string(),
        ),
        ("Final Decision:", result.final_recommendation.to_string()),
    ];

    let mut lines = vec![String::from("\n--- Trade Analysis ---")];
    lines.extend(
        rows.iter()
            .map(|(label, value)| format!("{label:<29}{value}")),
    );
    lines.join("\n")
}
