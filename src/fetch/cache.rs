use std::collections::HashMap;

use crate::error::Result;

use super::source::{CurrencySymbol, RatePoint, RateSource};

type PairKey = (String, String);
type SeriesKey = (String, String, String, String);

/// Explicit memoization of the three retrieval calls, keyed purely by call
/// arguments. Entries are added on success and never rewritten; there is no
/// eviction at this tool's scale.
#[derive(Debug, Default)]
pub struct QuoteCache {
    symbols: Option<Vec<CurrencySymbol>>,
    rates: HashMap<PairKey, f64>,
    series: HashMap<SeriesKey, Vec<RatePoint>>,
}

impl QuoteCache {
    pub fn clear(&mut self) {
        self.symbols = None;
        self.rates.clear();
        self.series.clear();
    }
}

/// Couples a [`RateSource`] with the memoization cache. A failed call is
/// returned to the caller without being cached, so an identical later call
/// goes back to the source.
pub struct RateService<S> {
    source: S,
    cache: QuoteCache,
}

impl<S: RateSource> RateService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: QuoteCache::default(),
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The supported-currency catalog, fetched at most once per process.
    pub async fn symbols(&mut self) -> Result<Vec<CurrencySymbol>> {
        if let Some(catalog) = &self.cache.symbols {
            return Ok(catalog.clone());
        }

        let catalog = self.source.fetch_symbols().await?;
        self.cache.symbols = Some(catalog.clone());
        Ok(catalog)
    }

    /// Current rate for the pair, memoized per (base, target).
    pub async fn quote(&mut self, base: &str, target: &str) -> Result<f64> {
        let key = (base.to_string(), target.to_string());
        if let Some(rate) = self.cache.rates.get(&key) {
            return Ok(*rate);
        }

        let rate = self.source.fetch_rate(base, target).await?;
        self.cache.rates.insert(key, rate);
        Ok(rate)
    }

    /// Daily series for the pair and window, memoized per full signature.
    pub async fn history(
        &mut self,
        base: &str,
        target: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<RatePoint>> {
        let key = (
            base.to_string(),
            target.to_string(),
            start_date.to_string(),
            end_date.to_string(),
        );
        if let Some(series) = self.cache.series.get(&key) {
            return Ok(series.clone());
        }

        let series = self
            .source
            .fetch_history(base, target, start_date, end_date)
            .await?;
        self.cache.series.insert(key, series.clone());
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::error::AppError;
    use crate::fetch::convert;
    use crate::utils::DATE_FMT;

    use super::*;

    fn point(date: &str, rate: f64) -> RatePoint {
        RatePoint {
            date: date.to_string(),
            day: NaiveDate::parse_from_str(date, DATE_FMT).unwrap(),
            rate,
        }
    }

    fn symbol(code: &str) -> CurrencySymbol {
        CurrencySymbol {
            code: code.to_string(),
            description: String::new(),
        }
    }

    /// In-memory source that counts every network-equivalent fetch and can
    /// fail the first rate call.
    struct StubSource {
        symbols: Vec<CurrencySymbol>,
        rates: HashMap<PairKey, f64>,
        series: HashMap<SeriesKey, Vec<RatePoint>>,
        fetches: Arc<AtomicUsize>,
        fail_next_rate: AtomicBool,
    }

    impl StubSource {
        fn new(fetches: Arc<AtomicUsize>) -> Self {
            let mut rates = HashMap::new();
            rates.insert(("USD".to_string(), "EUR".to_string()), 0.92);
            rates.insert(("USD".to_string(), "JPY".to_string()), 131.5);

            let mut series = HashMap::new();
            series.insert(
                (
                    "USD".to_string(),
                    "EUR".to_string(),
                    "2023-01-01".to_string(),
                    "2023-01-03".to_string(),
                ),
                vec![point("2023-01-01", 0.92), point("2023-01-03", 0.94)],
            );

            Self {
                symbols: vec![symbol("USD"), symbol("EUR"), symbol("JPY")],
                rates,
                series,
                fetches,
                fail_next_rate: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl RateSource for StubSource {
        async fn fetch_symbols(&self) -> Result<Vec<CurrencySymbol>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.symbols.clone())
        }

        async fn fetch_rate(&self, base: &str, target: &str) -> Result<f64> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_next_rate.swap(false, Ordering::SeqCst) {
                return Err(AppError::retrieval("conversion rate request returned status 502"));
            }
            if base == target {
                return Ok(1.0);
            }
            self.rates
                .get(&(base.to_string(), target.to_string()))
                .copied()
                .ok_or_else(|| AppError::retrieval(format!("no rate for {}/{}", base, target)))
        }

        async fn fetch_history(
            &self,
            base: &str,
            target: &str,
            start_date: &str,
            end_date: &str,
        ) -> Result<Vec<RatePoint>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.series
                .get(&(
                    base.to_string(),
                    target.to_string(),
                    start_date.to_string(),
                    end_date.to_string(),
                ))
                .cloned()
                .ok_or_else(|| AppError::retrieval("historical rates request returned status 404"))
        }
    }

    fn service() -> (RateService<StubSource>, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        (RateService::new(StubSource::new(Arc::clone(&fetches))), fetches)
    }

    #[tokio::test]
    async fn symbol_catalog_is_fetched_once() {
        let (mut service, fetches) = service();

        let first = service.symbols().await.unwrap();
        let second = service.symbols().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn quotes_memoize_per_pair() {
        let (mut service, fetches) = service();

        assert!((service.quote("USD", "EUR").await.unwrap() - 0.92).abs() < 1e-9);
        assert!((service.quote("USD", "EUR").await.unwrap() - 0.92).abs() < 1e-9);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        assert!((service.quote("USD", "JPY").await.unwrap() - 131.5).abs() < 1e-9);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn history_memoizes_per_full_signature() {
        let (mut service, fetches) = service();

        let first = service
            .history("USD", "EUR", "2023-01-01", "2023-01-03")
            .await
            .unwrap();
        let second = service
            .history("USD", "EUR", "2023-01-01", "2023-01-03")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn identity_quote_follows_the_source() {
        let (mut service, _) = service();
        assert!((service.quote("USD", "USD").await.unwrap() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (mut service, fetches) = service();
        service.source.fail_next_rate.store(true, Ordering::SeqCst);

        let err = service.quote("USD", "EUR").await.unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));

        // The retry reaches the source again; only then is the value cached.
        assert!((service.quote("USD", "EUR").await.unwrap() - 0.92).abs() < 1e-9);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);

        let _ = service.quote("USD", "EUR").await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clearing_the_cache_refetches() {
        let (mut service, fetches) = service();

        let _ = service.symbols().await.unwrap();
        service.clear_cache();
        let _ = service.symbols().await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn converts_an_amount_end_to_end() {
        let (mut service, _) = service();

        let catalog = service.symbols().await.unwrap();
        let codes: Vec<&str> = catalog.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["USD", "EUR", "JPY"]);

        let rate = service.quote("USD", "EUR").await.unwrap();
        assert!((convert(10.0, rate) - 9.2).abs() < 1e-9);

        let series = service
            .history("USD", "EUR", "2023-01-01", "2023-01-03")
            .await
            .unwrap();
        let dates: Vec<&str> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, ["2023-01-01", "2023-01-03"]);
    }
}
