use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::address::{AddressError, AddressQuery};
use super::jurisdiction::JurisdictionCatalog;
use super::provider::{FailureCause, ParcelGateway, PriceGateway};
use super::report::DiagnosisReport;
use super::risk::{assess, ceilings};
use crate::config::{DiagnosisConfig, MarketRatio};

/// Valuation inputs and the agent's authorized districts.
#[derive(Debug, Clone)]
pub struct DiagnosisSettings {
    pub market_ratio: MarketRatio,
    pub target_year: String,
    pub jurisdictions: JurisdictionCatalog,
}

impl DiagnosisSettings {
    pub fn from_config(config: &DiagnosisConfig) -> Self {
        Self {
            market_ratio: config.market_ratio,
            target_year: config.target_year.clone(),
            jurisdictions: JurisdictionCatalog::standard().allowed(&config.allowed_codes),
        }
    }
}

/// One agent-initiated diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRequest {
    pub province: String,
    pub district: String,
    pub detail_address: String,
    pub deposit_amount: u64,
    pub loan_amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_year: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),
    #[error("{province} {district} is outside the authorized districts")]
    DistrictNotAuthorized { province: String, district: String },
    #[error("{field} exceeds the supported amount range")]
    AmountOutOfRange { field: &'static str },
    #[error("assessment year '{year}' must be four digits")]
    InvalidYear { year: String },
    #[error("could not resolve '{address}' to a parcel")]
    Unresolved { address: String, cause: FailureCause },
    #[error("no assessed price for {year}")]
    PriceUnavailable { year: String, cause: FailureCause },
}

impl DiagnosisError {
    pub fn cause(&self) -> Option<FailureCause> {
        match self {
            Self::Unresolved { cause, .. } | Self::PriceUnavailable { cause, .. } => Some(*cause),
            _ => None,
        }
    }
}

/// Runs address → parcel → price → risk for each request. Holds no
/// per-request state, so one instance can serve concurrent diagnoses.
pub struct DiagnosisService<P, Q> {
    parcels: Arc<P>,
    prices: Arc<Q>,
    settings: DiagnosisSettings,
}

impl<P, Q> DiagnosisService<P, Q>
where
    P: ParcelGateway + 'static,
    Q: PriceGateway + 'static,
{
    pub fn new(parcels: Arc<P>, prices: Arc<Q>, settings: DiagnosisSettings) -> Self {
        Self {
            parcels,
            prices,
            settings,
        }
    }

    pub fn jurisdictions(&self) -> &JurisdictionCatalog {
        &self.settings.jurisdictions
    }

    pub async fn diagnose(
        &self,
        request: DiagnosisRequest,
    ) -> Result<DiagnosisReport, DiagnosisError> {
        let address = AddressQuery::new(
            request.province.trim(),
            request.district.trim(),
            request.detail_address,
        );
        address.validate()?;

        if self
            .settings
            .jurisdictions
            .code_for(&address.province, &address.district)
            .is_none()
        {
            return Err(DiagnosisError::DistrictNotAuthorized {
                province: address.province,
                district: address.district,
            });
        }

        let deposit = to_amount(request.deposit_amount, "deposit_amount")?;
        let loan = to_amount(request.loan_amount, "loan_amount")?;

        let year = match request.target_year {
            Some(year) => {
                let year = year.trim().to_string();
                if !is_assessment_year(&year) {
                    return Err(DiagnosisError::InvalidYear { year });
                }
                year
            }
            None => self.settings.target_year.clone(),
        };

        let search_text = address.search_text();
        let lookup = self.parcels.resolve(&search_text).await;
        let cause = lookup.failure_cause();
        let Some(parcel) = lookup.into_parcel() else {
            let cause = cause.unwrap_or(FailureCause::NotFound);
            warn!(address = %search_text, ?cause, "parcel resolution failed");
            return Err(DiagnosisError::Unresolved {
                address: search_text,
                cause,
            });
        };
        info!(address = %search_text, %parcel, "parcel resolved");

        let lookup = self.prices.fetch_price(&parcel, &year).await;
        let cause = lookup.failure_cause();
        let quote = lookup.into_quote();
        if quote.official_price <= 0 {
            let cause = cause.unwrap_or(FailureCause::NotFound);
            warn!(%parcel, year = %year, ?cause, "no assessed price");
            return Err(DiagnosisError::PriceUnavailable { year, cause });
        }

        let assessment = assess(quote.official_price, self.settings.market_ratio, deposit, loan);
        let limits = ceilings(assessment.estimated_market_price, loan);

        info!(
            %parcel,
            official_price = quote.official_price,
            risk_percent = assessment.risk_percent,
            tier = assessment.tier.label(),
            "diagnosis complete"
        );

        Ok(DiagnosisReport {
            address: search_text,
            parcel_id: parcel,
            target_year: year,
            building_name: quote.building_name,
            exclusive_area: quote.exclusive_area,
            official_price: quote.official_price,
            market_ratio: self.settings.market_ratio.as_f64(),
            estimated_market_price: assessment.estimated_market_price,
            deposit,
            loan,
            total_burden: assessment.total_burden,
            risk_percent: assessment.risk_percent,
            tier: assessment.tier,
            max_safe_deposit: limits.max_safe_deposit,
            max_warning_deposit: limits.max_warning_deposit,
        })
    }
}

fn to_amount(value: u64, field: &'static str) -> Result<i64, DiagnosisError> {
    i64::try_from(value).map_err(|_| DiagnosisError::AmountOutOfRange { field })
}

fn is_assessment_year(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}
