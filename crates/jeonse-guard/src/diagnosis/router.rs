use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::provider::{ParcelGateway, PriceGateway};
use super::report::{DiagnosisReport, DiagnosisView};
use super::service::{DiagnosisError, DiagnosisRequest, DiagnosisService};

#[derive(Debug, Serialize)]
pub struct DiagnosisResponse {
    pub report: DiagnosisReport,
    pub view: DiagnosisView,
}

/// Router builder exposing the diagnosis and jurisdiction endpoints.
pub fn diagnosis_router<P, Q>(service: Arc<DiagnosisService<P, Q>>) -> Router
where
    P: ParcelGateway + 'static,
    Q: PriceGateway + 'static,
{
    Router::new()
        .route("/api/v1/diagnosis", post(diagnose_handler::<P, Q>))
        .route("/api/v1/jurisdictions", get(jurisdictions_handler::<P, Q>))
        .with_state(service)
}

pub(crate) async fn diagnose_handler<P, Q>(
    State(service): State<Arc<DiagnosisService<P, Q>>>,
    axum::Json(request): axum::Json<DiagnosisRequest>,
) -> Response
where
    P: ParcelGateway + 'static,
    Q: PriceGateway + 'static,
{
    match service.diagnose(request).await {
        Ok(report) => {
            let view = report.view();
            (
                StatusCode::OK,
                axum::Json(DiagnosisResponse { report, view }),
            )
                .into_response()
        }
        Err(error) => {
            let status = match &error {
                DiagnosisError::InvalidAddress(_)
                | DiagnosisError::AmountOutOfRange { .. }
                | DiagnosisError::InvalidYear { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                DiagnosisError::DistrictNotAuthorized { .. } => StatusCode::FORBIDDEN,
                DiagnosisError::Unresolved { .. } | DiagnosisError::PriceUnavailable { .. } => {
                    StatusCode::NOT_FOUND
                }
            };
            let payload = json!({
                "error": error.to_string(),
                "cause": error.cause(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn jurisdictions_handler<P, Q>(
    State(service): State<Arc<DiagnosisService<P, Q>>>,
) -> Response
where
    P: ParcelGateway + 'static,
    Q: PriceGateway + 'static,
{
    let payload = json!({ "provinces": service.jurisdictions().provinces() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
