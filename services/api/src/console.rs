use crate::infra::{authorized_settings, build_diagnosis_service};
use clap::Args;
use jeonse_guard::config::AppConfig;
use jeonse_guard::diagnosis::{DiagnosisReport, DiagnosisRequest, JurisdictionCatalog, RiskTier};
use jeonse_guard::error::AppError;
use jeonse_guard::telemetry;

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// Province (시/도), e.g. 서울특별시
    #[arg(long)]
    pub(crate) province: String,
    /// District (시/군/구), e.g. 강남구
    #[arg(long)]
    pub(crate) district: String,
    /// Neighborhood and lot number, e.g. "개포동 12"
    #[arg(long)]
    pub(crate) detail: String,
    /// Target jeonse deposit in won
    #[arg(long)]
    pub(crate) deposit: u64,
    /// Senior loan secured on the property in won
    #[arg(long, default_value_t = 0)]
    pub(crate) loan: u64,
    /// Assessment year to query (defaults to PRICE_TARGET_YEAR)
    #[arg(long)]
    pub(crate) year: Option<String>,
}

pub(crate) async fn run_diagnosis(args: DiagnoseArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = build_diagnosis_service(&config)?;

    let DiagnoseArgs {
        province,
        district,
        detail,
        deposit,
        loan,
        year,
    } = args;

    let request = DiagnosisRequest {
        province,
        district,
        detail_address: detail,
        deposit_amount: deposit,
        loan_amount: loan,
        target_year: year,
    };

    let report = service.diagnose(request).await?;
    print!("{}", render_report(&report));
    Ok(())
}

pub(crate) fn run_jurisdictions() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let settings = authorized_settings(&config)?;
    print!("{}", render_jurisdictions(&settings.jurisdictions));
    Ok(())
}

fn tier_marker(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Safe => "[OK]",
        RiskTier::Caution => "[!]",
        RiskTier::Danger => "[X]",
    }
}

pub(crate) fn render_report(report: &DiagnosisReport) -> String {
    let view = report.view();
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} 최종 판정 결과: {}\n",
        tier_marker(report.tier),
        view.title,
        view.headline
    ));
    out.push_str(&format!("검색 주소: {} (PNU {})\n", report.address, report.parcel_id));

    out.push_str("\n시세 및 부채\n");
    out.push_str(&format!("- 공시가격 (대표값): {}\n", view.official_price));
    out.push_str(&format!(
        "- 추정 시장가치 (공시가 x 비율): {}\n",
        view.estimated_market_price
    ));
    out.push_str(&format!("- 총 부담액 (전세금 + 대출): {}\n", view.total_burden));
    out.push_str(&format!("- 위험 전세가율: {}\n", view.risk_percent));

    out.push_str("\n적정 전세금 제안\n");
    out.push_str(&format!("- 최대 안전 전세금 (70% 기준): {}\n", view.max_safe_deposit));
    out.push_str(&format!(
        "- 최대 주의 전세금 (80% 기준): {}\n",
        view.max_warning_deposit
    ));

    out.push_str(&format!("\n{}\n", view.basis));
    out
}

pub(crate) fn render_jurisdictions(catalog: &JurisdictionCatalog) -> String {
    let mut out = String::from("담당 지역\n");
    for province in catalog.provinces() {
        out.push_str(&format!("- {}\n", province.name));
        for district in &province.districts {
            out.push_str(&format!("  - {} ({})\n", district.name, district.code));
        }
    }
    out
}
