//! Boundary to the remote geocoding and price-registry services.
//!
//! Gateways report tagged outcomes so callers can tell "nothing matched" from
//! "the call failed"; `into_parcel` / `into_quote` fold both into the coarse
//! sentinels shown to agents.

mod vworld;
mod wire;

use std::future::Future;

use serde::{Deserialize, Serialize};

pub use vworld::VWorldClient;

pub const NO_DATA_LABEL: &str = "데이터 없음";
pub const COMMUNICATION_ERROR_LABEL: &str = "통신 오류";
pub const UNKNOWN_BUILDING_LABEL: &str = "주택명 미상";

/// Cadastral parcel number (PNU). Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelId(pub String);

impl std::fmt::Display for ParcelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit row from the price registry after field defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub building_name: String,
    pub assessed_price: i64,
    pub exclusive_area: f64,
}

/// Representative price for a parcel and year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub building_name: String,
    pub official_price: i64,
    pub exclusive_area: f64,
}

impl PriceQuote {
    fn sentinel(label: &str) -> Self {
        Self {
            building_name: label.to_string(),
            official_price: 0,
            exclusive_area: 0.0,
        }
    }
}

/// Highest price across all rows; name and area always come from the first
/// row in provider order, even when another row holds the maximum.
/// Returns `None` for an empty set.
pub fn aggregate(records: &[PriceRecord]) -> Option<PriceQuote> {
    let first = records.first()?;
    let official_price = records
        .iter()
        .map(|record| record.assessed_price)
        .max()
        .unwrap_or_default();

    Some(PriceQuote {
        building_name: first.building_name.clone(),
        official_price,
        exclusive_area: first.exclusive_area,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned HTTP {status}")]
    Status { status: u16 },
    #[error("provider reported status '{status}'")]
    Rejected { status: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Why a lookup produced nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    NotFound,
    Transport,
}

#[derive(Debug)]
pub enum ParcelLookup {
    Resolved(ParcelId),
    NotFound,
    Failed(ProviderError),
}

impl ParcelLookup {
    pub fn failure_cause(&self) -> Option<FailureCause> {
        match self {
            Self::Resolved(_) => None,
            Self::NotFound => Some(FailureCause::NotFound),
            Self::Failed(_) => Some(FailureCause::Transport),
        }
    }

    pub fn into_parcel(self) -> Option<ParcelId> {
        match self {
            Self::Resolved(parcel) => Some(parcel),
            Self::NotFound | Self::Failed(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum PriceLookup {
    Found(PriceQuote),
    NoData,
    Failed(ProviderError),
}

impl PriceLookup {
    pub fn failure_cause(&self) -> Option<FailureCause> {
        match self {
            Self::Found(_) => None,
            Self::NoData => Some(FailureCause::NotFound),
            Self::Failed(_) => Some(FailureCause::Transport),
        }
    }

    /// Collapse into a quote; failures become zero-priced sentinels.
    pub fn into_quote(self) -> PriceQuote {
        match self {
            Self::Found(quote) => quote,
            Self::NoData => PriceQuote::sentinel(NO_DATA_LABEL),
            Self::Failed(_) => PriceQuote::sentinel(COMMUNICATION_ERROR_LABEL),
        }
    }
}

/// Maps a normalized "province district detail" string to a parcel.
pub trait ParcelGateway: Send + Sync {
    fn resolve(&self, address: &str) -> impl Future<Output = ParcelLookup> + Send;
}

/// Fetches the assessed price rows for a parcel and assessment year.
pub trait PriceGateway: Send + Sync {
    fn fetch_price(
        &self,
        parcel: &ParcelId,
        year: &str,
    ) -> impl Future<Output = PriceLookup> + Send;
}
