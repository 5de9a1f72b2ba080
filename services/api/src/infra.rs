use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use jeonse_guard::config::AppConfig;
use jeonse_guard::diagnosis::{DiagnosisService, DiagnosisSettings, VWorldClient};
use jeonse_guard::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type VWorldDiagnosisService = DiagnosisService<VWorldClient, VWorldClient>;

pub(crate) fn authorized_settings(config: &AppConfig) -> Result<DiagnosisSettings, AppError> {
    let settings = DiagnosisSettings::from_config(&config.diagnosis);
    if settings.jurisdictions.is_empty() {
        return Err(AppError::NoAuthorizedDistricts);
    }
    Ok(settings)
}

pub(crate) fn build_diagnosis_service(
    config: &AppConfig,
) -> Result<Arc<VWorldDiagnosisService>, AppError> {
    let settings = authorized_settings(config)?;
    let client = Arc::new(VWorldClient::new(config.provider.clone()));
    Ok(Arc::new(DiagnosisService::new(
        client.clone(),
        client,
        settings,
    )))
}
