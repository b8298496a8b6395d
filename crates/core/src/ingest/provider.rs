use crate::domain::market::{Credential, FundamentalsPair, QuoteSnapshot, Ticker};
use crate::error::{FundamentalsInsufficient, QuoteUnavailable};

/// Live quote source. A failure is final for the evaluation; implementations convert every
/// transport or payload problem into `QuoteUnavailable`.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_quote(
        &self,
        ticker: &Ticker,
        credential: &Credential,
    ) -> Result<QuoteSnapshot, QuoteUnavailable>;
}

/// Source of the two latest income statements. `FundamentalsInsufficient` is an expected outcome,
/// not a hard error.
#[async_trait::async_trait]
pub trait FundamentalsProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_fundamentals(
        &self,
        ticker: &Ticker,
        credential: &Credential,
    ) -> Result<FundamentalsPair, FundamentalsInsufficient>;
}
