pub mod cache;
pub mod client;
pub mod source;

pub use cache::{QuoteCache, RateService};
pub use client::ExchangeRateClient;
pub use source::{CurrencySymbol, RatePoint, RateSource};

/// Units of the target currency equivalent to `amount` units of the base
/// currency at `rate`. No rounding is applied.
pub fn convert(amount: f64, rate: f64) -> f64 {
    amount * rate
}

#[cfg(test)]
mod tests {
    use super::convert;

    #[test]
    fn conversion_is_linear() {
        for amount in [0.0, 0.5, 1.0, 10.0, 1234.56] {
            for rate in [0.0072, 0.92, 1.0, 151.3] {
                let doubled = convert(2.0 * amount, rate);
                assert!((doubled - 2.0 * convert(amount, rate)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn converts_through_the_rate() {
        assert!((convert(10.0, 0.92) - 9.2).abs() < 1e-9);
    }
}
