//! Jeonse key-money trap diagnosis.
//!
//! An address is resolved to a parcel, the parcel's assessed price is scaled
//! into an estimated market price, and deposit plus prior loan is scored
//! against that estimate.

pub mod address;
pub mod jurisdiction;
pub mod money;
pub mod provider;
pub mod report;
pub mod risk;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use address::{normalize_address, AddressError, AddressQuery};
pub use jurisdiction::{District, JurisdictionCatalog, Province};
pub use money::format_korean_won;
pub use provider::{
    aggregate, FailureCause, ParcelGateway, ParcelId, ParcelLookup, PriceGateway, PriceLookup,
    PriceQuote, PriceRecord, ProviderError, VWorldClient,
};
pub use report::{DiagnosisReport, DiagnosisView};
pub use risk::{assess, ceilings, RiskAssessment, RiskTier, SafeCeilings};
pub use router::{diagnosis_router, DiagnosisResponse};
pub use service::{DiagnosisError, DiagnosisRequest, DiagnosisService, DiagnosisSettings};
