use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use jeonse_guard::diagnosis::{diagnosis_router, DiagnosisService, ParcelGateway, PriceGateway};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_diagnosis_routes<P, Q>(service: Arc<DiagnosisService<P, Q>>) -> axum::Router
where
    P: ParcelGateway + 'static,
    Q: PriceGateway + 'static,
{
    diagnosis_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use jeonse_guard::config::MarketRatio;
    use jeonse_guard::diagnosis::{
        DiagnosisSettings, JurisdictionCatalog, ParcelId, ParcelLookup, PriceLookup,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    struct Unreachable;

    impl ParcelGateway for Unreachable {
        async fn resolve(&self, _address: &str) -> ParcelLookup {
            ParcelLookup::NotFound
        }
    }

    impl PriceGateway for Unreachable {
        async fn fetch_price(&self, _parcel: &ParcelId, _year: &str) -> PriceLookup {
            PriceLookup::NoData
        }
    }

    fn app(ready: bool) -> axum::Router {
        let codes: BTreeSet<String> = ["11680".to_string()].into_iter().collect();
        let settings = DiagnosisSettings {
            market_ratio: MarketRatio::default(),
            target_year: "2024".to_string(),
            jurisdictions: JurisdictionCatalog::standard().allowed(&codes),
        };
        let gateway = Arc::new(Unreachable);
        let service = Arc::new(DiagnosisService::new(gateway.clone(), gateway, settings));

        let readiness = Arc::new(AtomicBool::new(false));
        readiness.store(ready, Ordering::Release);
        let state = AppState {
            readiness,
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_diagnosis_routes(service).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (status, body) = get(app(false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn diagnosis_routes_are_mounted() {
        let (status, body) = get(app(true), "/api/v1/jurisdictions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provinces"][0]["districts"][0]["name"], "강남구");
    }
}
