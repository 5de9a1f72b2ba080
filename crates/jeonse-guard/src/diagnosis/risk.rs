use serde::{Deserialize, Serialize};

use crate::config::MarketRatio;

/// Ratio of deposit plus prior loan to estimated market price at or above
/// which a lease is no longer considered safe.
pub const CAUTION_THRESHOLD_PERCENT: f64 = 70.0;
/// Ratio above which the deposit is likely unrecoverable at auction.
pub const DANGER_THRESHOLD_PERCENT: f64 = 80.0;

const SAFE_CEILING_PERCENT: i64 = 70;
const WARNING_CEILING_PERCENT: i64 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Safe,
    Caution,
    Danger,
}

impl RiskTier {
    /// `< 70` safe, `70..=80` caution, `> 80` danger.
    pub fn from_percent(risk_percent: f64) -> Self {
        if risk_percent < CAUTION_THRESHOLD_PERCENT {
            Self::Safe
        } else if risk_percent <= DANGER_THRESHOLD_PERCENT {
            Self::Caution
        } else {
            Self::Danger
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Safe => "안전",
            Self::Caution => "주의",
            Self::Danger => "위험",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Safe => "안전 (70% 미만)",
            Self::Caution => "주의 (80% 이하 - 보증보험 필요)",
            Self::Danger => "위험 (80% 초과 - 깡통전세 가능성 높음)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub estimated_market_price: i64,
    pub total_burden: i64,
    pub risk_percent: f64,
    pub tier: RiskTier,
}

/// Score a lease against the estimated market price of the property.
///
/// `deposit` and `loan` are expected to be non-negative; the caller validates
/// them. A non-positive market estimate is reported as exactly 100 %.
pub fn assess(
    official_price: i64,
    market_ratio: MarketRatio,
    deposit: i64,
    loan: i64,
) -> RiskAssessment {
    let estimated_market_price = market_ratio.apply(official_price);
    let total_burden = deposit.saturating_add(loan);

    let risk_percent = if estimated_market_price > 0 {
        (total_burden as f64 * 100.0) / estimated_market_price as f64
    } else {
        100.0
    };

    RiskAssessment {
        estimated_market_price,
        total_burden,
        risk_percent,
        tier: RiskTier::from_percent(risk_percent),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafeCeilings {
    pub max_safe_deposit: i64,
    pub max_warning_deposit: i64,
}

/// Largest deposits that keep the lease at 70 % and 80 % of market value.
pub fn ceilings(estimated_market_price: i64, loan: i64) -> SafeCeilings {
    SafeCeilings {
        max_safe_deposit: ceiling_at(estimated_market_price, loan, SAFE_CEILING_PERCENT),
        max_warning_deposit: ceiling_at(estimated_market_price, loan, WARNING_CEILING_PERCENT),
    }
}

fn ceiling_at(estimated_market_price: i64, loan: i64, percent: i64) -> i64 {
    let cap = i128::from(estimated_market_price) * i128::from(percent) / 100;
    let room = cap - i128::from(loan);
    room.clamp(0, i128::from(i64::MAX)) as i64
}
