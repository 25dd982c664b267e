use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fetch::{convert, CurrencySymbol, ExchangeRateClient, RatePoint, RateService};
use crate::utils::trailing_window;

/// Runtime data behind the converter dashboard: the fetched catalog, the
/// current pair and amount, and the latest quote and series (or the error
/// that replaced them). Each selection change produces fresh values through
/// [`refresh`](ConverterState::refresh); nothing fetched earlier is mutated.
pub struct ConverterState {
    service: RateService<ExchangeRateClient>,
    catalog: Vec<CurrencySymbol>,
    base_index: usize,
    target_index: usize,
    amount: f64,
    rate: Option<f64>,
    series: Option<Vec<RatePoint>>,
    rate_error: Option<String>,
    series_error: Option<String>,
    window: (String, String),
    history_window_days: i64,
}

impl ConverterState {
    /// Fetch the catalog and resolve the default selections. Either failure
    /// aborts startup; no currency selection is possible without the
    /// catalog, and a missing default is a configuration error.
    pub async fn new(config: Config) -> Result<Self> {
        let client = ExchangeRateClient::new(&config)?;
        let mut service = RateService::new(client);

        let catalog = service.symbols().await?;
        let base_index = position_of(&catalog, &config.default_base)?;
        let target_index = position_of(&catalog, &config.default_target)?;
        let window = trailing_window(config.history_window_days);

        Ok(Self {
            service,
            catalog,
            base_index,
            target_index,
            amount: config.default_amount,
            rate: None,
            series: None,
            rate_error: None,
            series_error: None,
            window,
            history_window_days: config.history_window_days,
        })
    }

    pub fn catalog(&self) -> &[CurrencySymbol] {
        &self.catalog
    }

    pub fn base(&self) -> &str {
        &self.catalog[self.base_index].code
    }

    pub fn target(&self) -> &str {
        &self.catalog[self.target_index].code
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn rate(&self) -> Option<f64> {
        self.rate
    }

    pub fn series(&self) -> Option<&[RatePoint]> {
        self.series.as_deref()
    }

    pub fn rate_error(&self) -> Option<&str> {
        self.rate_error.as_deref()
    }

    pub fn series_error(&self) -> Option<&str> {
        self.series_error.as_deref()
    }

    pub fn window(&self) -> (&str, &str) {
        (&self.window.0, &self.window.1)
    }

    pub fn converted_amount(&self) -> Option<f64> {
        self.rate.map(|rate| convert(self.amount, rate))
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
    }

    /// Returns true when the selection actually changed. The picker only
    /// hands back codes from the catalog, so the lookup cannot miss.
    pub fn set_base(&mut self, code: &str) -> bool {
        match self.catalog.iter().position(|s| s.code == code) {
            Some(index) if index != self.base_index => {
                self.base_index = index;
                true
            }
            _ => false,
        }
    }

    pub fn set_target(&mut self, code: &str) -> bool {
        match self.catalog.iter().position(|s| s.code == code) {
            Some(index) if index != self.target_index => {
                self.target_index = index;
                true
            }
            _ => false,
        }
    }

    /// Quote the current pair, then fetch the trailing-year series. A failed
    /// quote abandons the rest of the interaction: nothing stale is left
    /// behind and the history call is never issued. A failed history fetch
    /// keeps the quote; the chart panel reports the error instead.
    pub async fn refresh(&mut self) {
        self.rate = None;
        self.series = None;
        self.rate_error = None;
        self.series_error = None;

        let base = self.base().to_string();
        let target = self.target().to_string();

        match self.service.quote(&base, &target).await {
            Ok(rate) => self.rate = Some(rate),
            Err(err) => {
                log::warn!("quote for {}/{} failed: {}", base, target, err);
                self.rate_error = Some(err.to_string());
                return;
            }
        }

        self.window = trailing_window(self.history_window_days);
        let (start, end) = (self.window.0.clone(), self.window.1.clone());
        match self.service.history(&base, &target, &start, &end).await {
            Ok(series) => self.series = Some(series),
            Err(err) => {
                log::warn!("history for {}/{} failed: {}", base, target, err);
                self.series_error = Some(err.to_string());
            }
        }
    }
}

fn position_of(catalog: &[CurrencySymbol], code: &str) -> Result<usize> {
    catalog
        .iter()
        .position(|symbol| symbol.code == code)
        .ok_or_else(|| {
            AppError::configuration(format!(
                "default currency {} is not in the fetched symbol catalog",
                code
            ))
        })
}
