use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;

/// One entry of the remote symbol catalog: the currency code plus the
/// display description the endpoint carries for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencySymbol {
    pub code: String,
    pub description: String,
}

/// A single day of the historical series. `date` is the wire string exactly
/// as the source returned it; `day` is the parsed form the chart uses to cut
/// the series to a display timeframe.
#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    pub date: String,
    pub day: NaiveDate,
    pub rate: f64,
}

/// The three retrieval calls the converter is built on. Implemented by the
/// HTTP client and by in-memory stubs in tests.
#[async_trait]
pub trait RateSource {
    /// Supported currency codes, in the order the provider lists them.
    async fn fetch_symbols(&self) -> Result<Vec<CurrencySymbol>>;

    /// Current units of `target` per one unit of `base`.
    async fn fetch_rate(&self, base: &str, target: &str) -> Result<f64>;

    /// Daily rates for the pair over `[start_date, end_date]`, in source
    /// order. Dates absent from the response are absent from the series.
    async fn fetch_history(
        &self,
        base: &str,
        target: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<RatePoint>>;
}
