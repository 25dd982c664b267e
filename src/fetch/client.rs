use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, Context, Result};
use crate::utils::DATE_FMT;

use super::source::{CurrencySymbol, RatePoint, RateSource};

/// HTTP implementation of [`RateSource`] against an exchangerate.host-shaped
/// provider.
pub struct ExchangeRateClient {
    http: Client,
    base_url: String,
}

impl ExchangeRateClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to construct rates HTTP client")?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, url: &str, what: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| AppError::retrieval(format!("{} request failed: {}", what, err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::retrieval(format!(
                "{} request returned status {}",
                what, status
            )));
        }

        response
            .text()
            .await
            .map_err(|err| AppError::retrieval(format!("failed to read {} response: {}", what, err)))
    }
}

#[async_trait]
impl RateSource for ExchangeRateClient {
    async fn fetch_symbols(&self) -> Result<Vec<CurrencySymbol>> {
        let url = format!("{}/symbols", self.base_url);
        let body = self.get_text(&url, "symbol list").await?;
        parse_symbols(&body)
    }

    async fn fetch_rate(&self, base: &str, target: &str) -> Result<f64> {
        let url = format!("{}/convert?from={}&to={}", self.base_url, base, target);
        let body = self.get_text(&url, "conversion rate").await?;
        parse_rate(&body)
    }

    async fn fetch_history(
        &self,
        base: &str,
        target: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<RatePoint>> {
        let url = format!(
            "{}/timeseries?start_date={}&end_date={}&base={}&symbols={}",
            self.base_url, start_date, end_date, base, target
        );
        let body = self.get_text(&url, "historical rates").await?;
        reshape_series(&body, target)
    }
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    info: ConvertInfo,
}

#[derive(Debug, Deserialize)]
struct ConvertInfo {
    rate: f64,
}

fn parse_json(body: &str, what: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|err| AppError::retrieval(format!("malformed {} response: {}", what, err)))
}

/// Keys of the `symbols` mapping, in the order the provider lists them.
pub fn parse_symbols(body: &str) -> Result<Vec<CurrencySymbol>> {
    let root = parse_json(body, "symbol list")?;
    let symbols = root
        .get("symbols")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::retrieval("symbol list response has no symbols mapping"))?;

    let catalog = symbols
        .iter()
        .map(|(code, meta)| CurrencySymbol {
            code: code.clone(),
            description: meta
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    Ok(catalog)
}

pub fn parse_rate(body: &str) -> Result<f64> {
    let decoded: ConvertResponse = serde_json::from_str(body).map_err(|err| {
        AppError::retrieval(format!("conversion response has no usable rate: {}", err))
    })?;
    Ok(decoded.info.rate)
}

/// Flattens the `{date: {code: rate}}` mapping into a (date, rate) table.
/// Source order is kept exactly; dates missing from the response stay
/// missing. A date whose entry lacks the target code is a malformed
/// response, not a gap.
pub fn reshape_series(body: &str, target: &str) -> Result<Vec<RatePoint>> {
    let root = parse_json(body, "historical rates")?;
    let rates = root
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::retrieval("historical response has no rates mapping"))?;

    let mut series = Vec::with_capacity(rates.len());
    for (date, by_code) in rates {
        let rate = by_code.get(target).and_then(Value::as_f64).ok_or_else(|| {
            AppError::retrieval(format!("no {} rate recorded for {}", target, date))
        })?;
        let day = NaiveDate::parse_from_str(date, DATE_FMT).map_err(|_| {
            AppError::retrieval(format!("unparseable date {} in historical response", date))
        })?;
        series.push(RatePoint {
            date: date.clone(),
            day,
            rate,
        });
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_keep_provider_order() {
        let body = r#"{
            "symbols": {
                "USD": {"description": "United States Dollar", "code": "USD"},
                "AED": {"description": "United Arab Emirates Dirham", "code": "AED"},
                "EUR": {"description": "Euro", "code": "EUR"}
            }
        }"#;

        let catalog = parse_symbols(body).unwrap();

        let codes: Vec<&str> = catalog.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["USD", "AED", "EUR"]);
        assert_eq!(catalog[2].description, "Euro");
    }

    #[test]
    fn symbols_reject_missing_mapping() {
        let err = parse_symbols(r#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
    }

    #[test]
    fn rate_is_read_from_info() {
        let body = r#"{"query": {"from": "USD", "to": "EUR"}, "info": {"rate": 0.92}}"#;
        assert!((parse_rate(body).unwrap() - 0.92).abs() < 1e-9);
    }

    #[test]
    fn missing_rate_field_is_a_retrieval_error() {
        let err = parse_rate(r#"{"info": {}}"#).unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
    }

    #[test]
    fn series_preserves_source_order_without_sorting() {
        let body = r#"{
            "rates": {
                "2023-01-03": {"EUR": 0.94},
                "2023-01-01": {"EUR": 0.92},
                "2023-01-02": {"EUR": 0.93}
            }
        }"#;

        let series = reshape_series(body, "EUR").unwrap();

        let dates: Vec<&str> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, ["2023-01-03", "2023-01-01", "2023-01-02"]);
        assert!((series[1].rate - 0.92).abs() < 1e-9);
    }

    #[test]
    fn absent_dates_are_not_synthesized() {
        let body = r#"{
            "rates": {
                "2023-01-01": {"EUR": 0.92},
                "2023-01-03": {"EUR": 0.94}
            }
        }"#;

        let series = reshape_series(body, "EUR").unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, "2023-01-01");
        assert_eq!(series[1].date, "2023-01-03");
    }

    #[test]
    fn single_day_window_yields_at_most_one_point() {
        let body = r#"{"rates": {"2023-01-01": {"EUR": 0.92}}}"#;
        assert_eq!(reshape_series(body, "EUR").unwrap().len(), 1);

        let empty = r#"{"rates": {}}"#;
        assert!(reshape_series(empty, "EUR").unwrap().is_empty());
    }

    #[test]
    fn missing_target_code_is_a_retrieval_error() {
        let body = r#"{"rates": {"2023-01-01": {"JPY": 131.1}}}"#;
        let err = reshape_series(body, "EUR").unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
    }

    #[test]
    fn malformed_body_is_a_retrieval_error() {
        let err = reshape_series("not json", "EUR").unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
    }
}
