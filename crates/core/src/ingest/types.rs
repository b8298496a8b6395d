use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One element of the `/api/v3/quote/{ticker}` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpQuote {
    pub symbol: Option<String>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub price_avg50: Option<f64>,
    pub price_avg200: Option<f64>,
}

/// One element of the `/api/v3/income-statement/{ticker}` array, latest period first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpIncomeStatement {
    pub date: Option<NaiveDate>,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
}
