use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::config::MarketRatio;
use crate::diagnosis::jurisdiction::JurisdictionCatalog;
use crate::diagnosis::provider::{
    ParcelGateway, ParcelId, ParcelLookup, PriceGateway, PriceLookup, PriceQuote, ProviderError,
};
use crate::diagnosis::service::{DiagnosisRequest, DiagnosisService, DiagnosisSettings};

pub(super) const GAEPO_PNU: &str = "1168010300100120000";

#[derive(Debug, Clone, Copy)]
pub(super) enum ParcelScript {
    Resolved,
    NotFound,
    Broken,
}

#[derive(Debug, Clone)]
pub(super) enum PriceScript {
    Found(i64),
    NoData,
    Broken,
}

pub(super) struct ScriptedParcels {
    script: ParcelScript,
    queries: Mutex<Vec<String>>,
}

impl ScriptedParcels {
    pub(super) fn new(script: ParcelScript) -> Self {
        Self {
            script,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("query mutex poisoned").clone()
    }
}

impl ParcelGateway for ScriptedParcels {
    async fn resolve(&self, address: &str) -> ParcelLookup {
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .push(address.to_string());
        match self.script {
            ParcelScript::Resolved => ParcelLookup::Resolved(ParcelId(GAEPO_PNU.to_string())),
            ParcelScript::NotFound => ParcelLookup::NotFound,
            ParcelScript::Broken => ParcelLookup::Failed(ProviderError::Status { status: 503 }),
        }
    }
}

pub(super) struct ScriptedPrices {
    script: PriceScript,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedPrices {
    pub(super) fn new(script: PriceScript) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("call mutex poisoned").clone()
    }
}

impl PriceGateway for ScriptedPrices {
    async fn fetch_price(&self, parcel: &ParcelId, year: &str) -> PriceLookup {
        self.calls
            .lock()
            .expect("call mutex poisoned")
            .push((parcel.0.clone(), year.to_string()));
        match &self.script {
            PriceScript::Found(price) => PriceLookup::Found(PriceQuote {
                building_name: "개포자이".to_string(),
                official_price: *price,
                exclusive_area: 84.97,
            }),
            PriceScript::NoData => PriceLookup::NoData,
            PriceScript::Broken => {
                PriceLookup::Failed(ProviderError::Malformed("truncated body".to_string()))
            }
        }
    }
}

pub(super) type ScriptedService = DiagnosisService<ScriptedParcels, ScriptedPrices>;

pub(super) fn settings() -> DiagnosisSettings {
    let codes: BTreeSet<String> = ["11680", "11650"].iter().map(|c| c.to_string()).collect();
    DiagnosisSettings {
        market_ratio: MarketRatio::default(),
        target_year: "2024".to_string(),
        jurisdictions: JurisdictionCatalog::standard().allowed(&codes),
    }
}

pub(super) fn build_service(
    parcels: ParcelScript,
    prices: PriceScript,
) -> (Arc<ScriptedService>, Arc<ScriptedParcels>, Arc<ScriptedPrices>) {
    let parcels = Arc::new(ScriptedParcels::new(parcels));
    let prices = Arc::new(ScriptedPrices::new(prices));
    let service = Arc::new(DiagnosisService::new(
        parcels.clone(),
        prices.clone(),
        settings(),
    ));
    (service, parcels, prices)
}

pub(super) fn request() -> DiagnosisRequest {
    DiagnosisRequest {
        province: "서울특별시".to_string(),
        district: "강남구".to_string(),
        detail_address: "개포동  12".to_string(),
        deposit_amount: 350_000_000,
        loan_amount: 100_000_000,
        target_year: None,
    }
}
