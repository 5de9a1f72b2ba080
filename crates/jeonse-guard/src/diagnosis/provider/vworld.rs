use std::time::Duration;

use reqwest::header::REFERER;
use tracing::{debug, warn};

use super::wire::{interpret_price, interpret_search};
use super::{ParcelGateway, ParcelId, ParcelLookup, PriceGateway, PriceLookup, ProviderError};
use crate::config::ProviderConfig;
use crate::diagnosis::address::normalize_address;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);
const PRICE_TIMEOUT: Duration = Duration::from_secs(10);
const PRICE_PAGE_SIZE: &str = "100";

/// V-World search (address → PNU) and apartment price registry client.
///
/// Each call is a single request bounded by its timeout; nothing is retried.
#[derive(Debug, Clone)]
pub struct VWorldClient {
    client: reqwest::Client,
    config: ProviderConfig,
    search_timeout: Duration,
    price_timeout: Duration,
}

impl VWorldClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_timeouts(config, SEARCH_TIMEOUT, PRICE_TIMEOUT)
    }

    pub fn with_timeouts(
        config: ProviderConfig,
        search_timeout: Duration,
        price_timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            search_timeout,
            price_timeout,
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<u8>, ProviderError> {
        let params = [
            ("service", "search"),
            ("request", "search"),
            ("version", "2.0"),
            ("query", query),
            ("type", "address"),
            ("category", "parcel"),
            ("format", "json"),
            ("key", self.config.api_key.as_str()),
            ("domain", self.config.domain.as_str()),
        ];

        let resp = self
            .client
            .get(&self.config.search_url)
            .query(&params)
            .timeout(self.search_timeout)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }

    /// `Ok(None)` when the registry answers with a non-success status.
    async fn price_rows(
        &self,
        parcel: &ParcelId,
        year: &str,
    ) -> Result<Option<Vec<u8>>, ProviderError> {
        let params = [
            ("key", self.config.api_key.as_str()),
            ("pnu", parcel.0.as_str()),
            ("stdrYear", year),
            ("format", "json"),
            ("numOfRows", PRICE_PAGE_SIZE),
        ];

        let resp = self
            .client
            .get(&self.config.price_url)
            .query(&params)
            .header(REFERER, self.config.domain.as_str())
            .timeout(self.price_timeout)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), %parcel, "price registry returned no data");
            return Ok(None);
        }
        Ok(Some(resp.bytes().await?.to_vec()))
    }
}

impl ParcelGateway for VWorldClient {
    async fn resolve(&self, address: &str) -> ParcelLookup {
        let query = normalize_address(address);
        debug!(query = %query, "resolving parcel");

        let lookup = match self.search(&query).await {
            Ok(body) => interpret_search(&body),
            Err(err) => ParcelLookup::Failed(err),
        };
        if let ParcelLookup::Failed(err) = &lookup {
            warn!(query = %query, error = %err, "parcel search failed");
        }
        lookup
    }
}

impl PriceGateway for VWorldClient {
    async fn fetch_price(&self, parcel: &ParcelId, year: &str) -> PriceLookup {
        let lookup = match self.price_rows(parcel, year).await {
            Ok(Some(body)) => interpret_price(&body),
            Ok(None) => PriceLookup::NoData,
            Err(err) => PriceLookup::Failed(err),
        };
        if let PriceLookup::Failed(err) = &lookup {
            warn!(%parcel, year, error = %err, "price registry request failed");
        }
        lookup
    }
}
