//! Client for the public Frankfurter exchange-rate API.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::currency::Currency;

use super::{ConversionError, RateSource};

pub const DEFAULT_RATES_URL: &str = "https://api.frankfurter.app";

/// Body of `GET /latest`. Only the rates are used; each value is the
/// requested amount already converted into that currency.
#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, Decimal>,
}

#[derive(Debug, Clone)]
pub struct FrankfurterClient {
    http: reqwest::Client,
    base_url: String,
}

impl FrankfurterClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl Default for FrankfurterClient {
    fn default() -> Self {
        Self::new(DEFAULT_RATES_URL)
    }
}

#[async_trait]
impl RateSource for FrankfurterClient {
    async fn convert(
        &self,
        amount: Decimal,
        from: &Currency,
        to: &Currency,
    ) -> Result<Decimal, ConversionError> {
        let url = format!("{}/latest", self.base_url.trim_end_matches('/'));
        debug!(%url, %amount, %from, %to, "requesting exchange rate");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("amount", amount.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConversionError::Status {
                status: status.as_u16(),
            });
        }

        let body: LatestResponse = response.json().await?;
        body.rates
            .get(to.code())
            .copied()
            .ok_or_else(|| ConversionError::MissingRate {
                currency: to.clone(),
            })
    }
}
