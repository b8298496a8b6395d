use crate::config::Settings;
use crate::domain::market::{Credential, FundamentalsPair, IncomeStatement, QuoteSnapshot, Ticker};
use crate::error::{
    FetchFailure, FundamentalsInsufficient, InsufficientReason, QuoteUnavailable,
    UnavailableReason,
};
use crate::ingest::provider::{FundamentalsProvider, QuoteProvider};
use crate::ingest::types::{FmpIncomeStatement, FmpQuote};
use anyhow::Context;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
// One attempt: a failed request is reported straight away.
const DEFAULT_RETRIES: u32 = 1;
const QUOTE_PATH: &str = "/api/v3/quote";
const INCOME_STATEMENT_PATH: &str = "/api/v3/income-statement";

#[derive(Debug, Clone)]
pub struct FmpClient {
    http: reqwest::Client,
    base_url: String,
    retries: u32,
}

impl FmpClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings
            .fmp_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("FMP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("FMP_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        Self::new(base_url, Duration::from_secs(timeout_secs), retries)
    }

    pub fn new(base_url: String, timeout: Duration, retries: u32) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build FMP http client")?;

        Ok(Self {
            http,
            base_url,
            retries: retries.max(1),
        })
    }

    fn url(&self, path: &str, ticker: &Ticker) -> String {
        format!("{}{}/{}", self.base_url.trim_end_matches('/'), path, ticker)
    }

    async fn fetch_once(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, FetchFailure> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| FetchFailure::Transport(err.without_url().to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|err| FetchFailure::Transport(err.without_url().to_string()))?;

        if !status.is_success() {
            return Err(FetchFailure::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw_json = serde_json::from_str::<Value>(&text)
            .map_err(|err| FetchFailure::Decode(format!("{err}: {text}")))?;
        if let Some(message) = provider_error_message(&raw_json) {
            return Err(FetchFailure::Provider(message));
        }
        Ok(raw_json)
    }

    async fn fetch_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, FetchFailure> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(url, query).await {
                Ok(raw) => return Ok(raw),
                Err(failure) => {
                    if attempt >= self.retries || !is_retryable(&failure) {
                        return Err(failure);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, error = %failure, "FMP request failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl QuoteProvider for FmpClient {
    fn provider_name(&self) -> &'static str {
        "financial_modeling_prep"
    }

    async fn fetch_quote(
        &self,
        ticker: &Ticker,
        credential: &Credential,
    ) -> Result<QuoteSnapshot, QuoteUnavailable> {
        let url = self.url(QUOTE_PATH, ticker);
        let raw = self
            .fetch_json(&url, &[("apikey", credential.expose())])
            .await
            .map_err(|failure| QuoteUnavailable {
                ticker: ticker.to_string(),
                reason: UnavailableReason::Fetch(failure),
            })?;
        parse_quote(ticker, raw)
    }
}

#[async_trait::async_trait]
impl FundamentalsProvider for FmpClient {
    fn provider_name(&self) -> &'static str {
        "financial_modeling_prep"
    }

    async fn fetch_fundamentals(
        &self,
        ticker: &Ticker,
        credential: &Credential,
    ) -> Result<FundamentalsPair, FundamentalsInsufficient> {
        let url = self.url(INCOME_STATEMENT_PATH, ticker);
        let raw = self
            .fetch_json(&url, &[("limit", "2"), ("apikey", credential.expose())])
            .await
            .map_err(|failure| FundamentalsInsufficient {
                ticker: ticker.to_string(),
                reason: InsufficientReason::Fetch(failure),
            })?;
        parse_income_statements(ticker, raw)
    }
}

pub fn parse_quote(ticker: &Ticker, raw: Value) -> Result<QuoteSnapshot, QuoteUnavailable> {
    let unavailable = |reason| QuoteUnavailable {
        ticker: ticker.to_string(),
        reason,
    };

    let quotes = serde_json::from_value::<Vec<FmpQuote>>(raw).map_err(|err| {
        unavailable(UnavailableReason::Fetch(FetchFailure::Decode(err.to_string())))
    })?;
    let quote = quotes
        .into_iter()
        .next()
        .ok_or_else(|| unavailable(UnavailableReason::EmptyPayload))?;

    let current_price = quote
        .price
        .ok_or_else(|| unavailable(UnavailableReason::MissingField("price")))?;
    if current_price <= 0.0 {
        return Err(unavailable(UnavailableReason::NonPositivePrice(current_price)));
    }

    let required = |value: Option<f64>, field| {
        value.ok_or_else(|| unavailable(UnavailableReason::MissingField(field)))
    };

    Ok(QuoteSnapshot {
        current_price,
        market_cap: quote.market_cap,
        day_high: required(quote.day_high, "dayHigh")?,
        day_low: required(quote.day_low, "dayLow")?,
        price_avg50: required(quote.price_avg50, "priceAvg50")?,
        price_avg200: required(quote.price_avg200, "priceAvg200")?,
    })
}

pub fn parse_income_statements(
    ticker: &Ticker,
    raw: Value,
) -> Result<FundamentalsPair, FundamentalsInsufficient> {
    let insufficient = |reason| FundamentalsInsufficient {
        ticker: ticker.to_string(),
        reason,
    };

    let statements = serde_json::from_value::<Vec<FmpIncomeStatement>>(raw).map_err(|err| {
        insufficient(InsufficientReason::Fetch(FetchFailure::Decode(err.to_string())))
    })?;
    if statements.len() < 2 {
        return Err(insufficient(InsufficientReason::TooFewPeriods(
            statements.len(),
        )));
    }

    let mut periods = statements.into_iter();
    let (Some(latest), Some(previous)) = (periods.next(), periods.next()) else {
        return Err(insufficient(InsufficientReason::TooFewPeriods(0)));
    };

    let revenue_latest = latest
        .revenue
        .ok_or_else(|| insufficient(InsufficientReason::MissingField("revenue")))?;
    let net_income_latest = latest
        .net_income
        .ok_or_else(|| insufficient(InsufficientReason::MissingField("netIncome")))?;
    let revenue_previous = previous
        .revenue
        .ok_or_else(|| insufficient(InsufficientReason::MissingField("revenue")))?;

    Ok(FundamentalsPair {
        latest: IncomeStatement {
            period: latest.date,
            revenue: revenue_latest,
            net_income: net_income_latest,
        },
        previous: IncomeStatement {
            period: previous.date,
            revenue: revenue_previous,
            net_income: previous.net_income.unwrap_or_default(),
        },
    })
}

fn provider_error_message(raw: &Value) -> Option<String> {
    raw.get("Error Message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn is_retryable(failure: &FetchFailure) -> bool {
    match failure {
        FetchFailure::Transport(_) => true,
        FetchFailure::Status { status, .. } => StatusCode::from_u16(*status)
            .map(|s| s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error())
            .unwrap_or(false),
        FetchFailure::Decode(_) | FetchFailure::Provider(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::fundamental::score_outcome;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn aapl() -> Ticker {
        Ticker::parse("aapl").unwrap()
    }

    #[test]
    fn parses_quote_payload() {
        let raw = json!([{
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "price": 227.52,
            "marketCap": 3.45e12,
            "dayHigh": 229.0,
            "dayLow": 225.1,
            "priceAvg50": 221.3,
            "priceAvg200": 205.7,
            "volume": 41000000
        }]);

        let q = parse_quote(&aapl(), raw).unwrap();
        assert_eq!(q.current_price, 227.52);
        assert_eq!(q.market_cap, Some(3.45e12));
        assert_eq!(q.day_low, 225.1);
        assert_eq!(q.price_avg200, 205.7);
    }

    #[test]
    fn empty_quote_array_is_unavailable() {
        let err = parse_quote(&aapl(), json!([])).unwrap_err();
        assert_eq!(err.ticker, "AAPL");
        assert_eq!(err.reason, UnavailableReason::EmptyPayload);
    }

    #[test]
    fn quote_without_price_is_unavailable() {
        let raw = json!([{ "symbol": "AAPL", "price": null, "dayHigh": 1.0 }]);
        let err = parse_quote(&aapl(), raw).unwrap_err();
        assert_eq!(err.reason, UnavailableReason::MissingField("price"));
    }

    #[test]
    fn quote_with_missing_market_cap_is_kept() {
        let raw = json!([{
            "price": 10.0,
            "dayHigh": 11.0,
            "dayLow": 9.0,
            "priceAvg50": 10.5,
            "priceAvg200": 9.5
        }]);
        let q = parse_quote(&aapl(), raw).unwrap();
        assert_eq!(q.market_cap, None);
    }

    #[test]
    fn non_array_quote_payload_is_unavailable() {
        let err = parse_quote(&aapl(), json!({"unexpected": true})).unwrap_err();
        assert!(matches!(
            err.reason,
            UnavailableReason::Fetch(FetchFailure::Decode(_))
        ));
    }

    #[test]
    fn parses_latest_two_income_statements() {
        let raw = json!([
            { "date": "2024-09-28", "revenue": 391035000000.0, "netIncome": 93736000000.0 },
            { "date": "2023-09-30", "revenue": 383285000000.0, "netIncome": 96995000000.0 }
        ]);
        let pair = parse_income_statements(&aapl(), raw).unwrap();
        assert_eq!(pair.latest.period, NaiveDate::from_ymd_opt(2024, 9, 28));
        assert_eq!(pair.latest.revenue, 391035000000.0);
        assert_eq!(pair.latest.net_income, 93736000000.0);
        assert_eq!(pair.previous.revenue, 383285000000.0);
    }

    #[test]
    fn single_income_statement_is_insufficient() {
        let raw = json!([{ "date": "2024-09-28", "revenue": 1.0, "netIncome": 1.0 }]);
        let err = parse_income_statements(&aapl(), raw).unwrap_err();
        assert_eq!(err.reason, InsufficientReason::TooFewPeriods(1));
    }

    #[test]
    fn missing_latest_net_income_is_insufficient() {
        let raw = json!([
            { "revenue": 10.0, "netIncome": null },
            { "revenue": 9.0, "netIncome": 1.0 }
        ]);
        let err = parse_income_statements(&aapl(), raw).unwrap_err();
        assert_eq!(err.reason, InsufficientReason::MissingField("netIncome"));
    }

    #[test]
    fn missing_previous_revenue_is_insufficient() {
        let raw = json!([
            { "revenue": 10.0, "netIncome": 2.0 },
            { "revenue": null, "netIncome": 1.0 }
        ]);
        let err = parse_income_statements(&aapl(), raw).unwrap_err();
        assert_eq!(err.reason, InsufficientReason::MissingField("revenue"));
    }

    fn client_for(server: &MockServer, retries: u32) -> FmpClient {
        FmpClient::new(server.uri(), Duration::from_secs(5), retries).unwrap()
    }

    #[tokio::test]
    async fn fetches_quote_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/quote/AAPL"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "symbol": "AAPL",
                "price": 227.52,
                "marketCap": 3.45e12,
                "dayHigh": 229.0,
                "dayLow": 225.1,
                "priceAvg50": 221.3,
                "priceAvg200": 205.7
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let quote = client_for(&server, 1)
            .fetch_quote(&aapl(), &Credential::new("test-key"))
            .await
            .unwrap();
        assert_eq!(quote.current_price, 227.52);
    }

    #[tokio::test]
    async fn unauthorized_quote_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/quote/AAPL"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API KEY"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, 3)
            .fetch_quote(&aapl(), &Credential::new("bad-key"))
            .await
            .unwrap_err();
        assert_eq!(err.ticker, "AAPL");
        assert_eq!(
            err.reason,
            UnavailableReason::Fetch(FetchFailure::Status {
                status: 401,
                body: "Invalid API KEY".to_string()
            })
        );
    }

    #[tokio::test]
    async fn error_message_body_falls_back_to_neutral_fundamentals() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/income-statement/AAPL"))
            .and(query_param("limit", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "Error Message": "Limit Reach." })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server, 1)
            .fetch_fundamentals(&aapl(), &Credential::new("test-key"))
            .await;
        match &outcome {
            Err(err) => assert_eq!(
                err.reason,
                InsufficientReason::Fetch(FetchFailure::Provider("Limit Reach.".to_string()))
            ),
            Ok(pair) => panic!("expected insufficient fundamentals, got {pair:?}"),
        }
        let score = score_outcome(&outcome);
        assert!(score.is_neutral());
        assert_eq!(score.value(), 0.5);
    }

    #[tokio::test]
    async fn server_errors_are_retried_up_to_the_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/quote/AAPL"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .expect(2)
            .mount(&server)
            .await;

        let err = client_for(&server, 2)
            .fetch_quote(&aapl(), &Credential::new("test-key"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.reason,
            UnavailableReason::Fetch(FetchFailure::Status { status: 503, .. })
        ));
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn provider_error_object_is_detected() {
        let raw = json!({ "Error Message": "Invalid API KEY." });
        assert_eq!(
            provider_error_message(&raw).as_deref(),
            Some("Invalid API KEY.")
        );
        assert_eq!(provider_error_message(&json!([])), None);
    }

    #[test]
    fn only_transient_failures_are_retried() {
        assert!(is_retryable(&FetchFailure::Transport("timeout".into())));
        assert!(is_retryable(&FetchFailure::Status {
            status: 503,
            body: String::new()
        }));
        assert!(is_retryable(&FetchFailure::Status {
            status: 429,
            body: String::new()
        }));
        assert!(!is_retryable(&FetchFailure::Status {
            status: 401,
            body: String::new()
        }));
        assert!(!is_retryable(&FetchFailure::Provider("bad key".into())));
    }

    #[test]
    fn url_joins_base_path_and_ticker() {
        let client = FmpClient::new(
            "https://example.test/".to_string(),
            Duration::from_secs(1),
            0,
        )
        .unwrap();
        assert_eq!(client.retries, 1);
        assert_eq!(
            client.url(QUOTE_PATH, &aapl()),
            "https://example.test/api/v3/quote/AAPL"
        );
    }
}
