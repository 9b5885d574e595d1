//! Runtime configuration.

use std::env;

use crate::{conversion::frankfurter::DEFAULT_RATES_URL, currency::Currency};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConfig {
    /// Base URL of the exchange-rate service
    pub rates_url: String,
    /// Currency the balance and loan are kept in
    pub domestic_currency: Currency,
    /// Clear the loading flag when a conversion fails
    pub reset_loading_on_failure: bool,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            rates_url: DEFAULT_RATES_URL.to_string(),
            domestic_currency: Currency::usd(),
            reset_loading_on_failure: true,
        }
    }
}

impl BankConfig {
    /// Defaults overridden by `RATES_URL`, `DOMESTIC_CURRENCY` and
    /// `RESET_LOADING_ON_FAILURE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            rates_url: lookup("RATES_URL").unwrap_or(defaults.rates_url),
            domestic_currency: lookup("DOMESTIC_CURRENCY")
                .map(Currency::new)
                .unwrap_or(defaults.domestic_currency),
            reset_loading_on_failure: lookup("RESET_LOADING_ON_FAILURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.reset_loading_on_failure),
        }
    }
}
