use serde::Serialize;

use super::money::format_korean_won;
use super::provider::ParcelId;
use super::risk::RiskTier;

/// Outcome of a completed diagnosis, amounts in won.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisReport {
    pub address: String,
    pub parcel_id: ParcelId,
    pub target_year: String,
    pub building_name: String,
    pub exclusive_area: f64,
    pub official_price: i64,
    pub market_ratio: f64,
    pub estimated_market_price: i64,
    pub deposit: i64,
    pub loan: i64,
    pub total_burden: i64,
    pub risk_percent: f64,
    pub tier: RiskTier,
    pub max_safe_deposit: i64,
    pub max_warning_deposit: i64,
}

/// Display strings for the agent-facing result screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisView {
    pub title: String,
    pub tier_label: &'static str,
    pub headline: &'static str,
    pub risk_percent: String,
    pub official_price: String,
    pub estimated_market_price: String,
    pub total_burden: String,
    pub max_safe_deposit: String,
    pub max_warning_deposit: String,
    pub basis: String,
}

impl DiagnosisReport {
    pub fn view(&self) -> DiagnosisView {
        DiagnosisView {
            title: format!("{} ({}㎡)", self.building_name, self.exclusive_area),
            tier_label: self.tier.label(),
            headline: self.tier.headline(),
            risk_percent: format!("{:.2}%", self.risk_percent),
            official_price: format_korean_won(self.official_price),
            estimated_market_price: format_korean_won(self.estimated_market_price),
            total_burden: format_korean_won(self.total_burden),
            max_safe_deposit: format_korean_won(self.max_safe_deposit),
            max_warning_deposit: format_korean_won(self.max_warning_deposit),
            basis: format!(
                "{}년 공시가 × {} 배율 기준",
                self.target_year, self.market_ratio
            ),
        }
    }
}
