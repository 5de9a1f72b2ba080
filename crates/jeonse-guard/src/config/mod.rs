use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_DOMAIN: &str = "http://localhost";
pub const DEFAULT_SEARCH_URL: &str = "http://api.vworld.kr/req/search";
pub const DEFAULT_PRICE_URL: &str = "https://api.vworld.kr/ned/data/getApartHousingPriceAttr";
pub const DEFAULT_TARGET_YEAR: &str = "2024";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub provider: ProviderConfig,
    pub diagnosis: DiagnosisConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_key = env::var("VWORLD_KEY")
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let provider = ProviderConfig {
            api_key,
            domain: env::var("VWORLD_DOMAIN").unwrap_or_else(|_| DEFAULT_DOMAIN.to_string()),
            search_url: env::var("VWORLD_SEARCH_URL")
                .unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string()),
            price_url: env::var("VWORLD_PRICE_URL")
                .unwrap_or_else(|_| DEFAULT_PRICE_URL.to_string()),
        };

        let market_ratio = match env::var("MARKET_RATIO") {
            Ok(raw) => MarketRatio::parse(&raw)?,
            Err(_) => MarketRatio::default(),
        };

        let allowed_codes = parse_allowed_codes(&env::var("ALLOWED_CODES").unwrap_or_default());
        if allowed_codes.is_empty() {
            return Err(ConfigError::MissingAllowedCodes);
        }

        let target_year =
            env::var("PRICE_TARGET_YEAR").unwrap_or_else(|_| DEFAULT_TARGET_YEAR.to_string());
        let target_year = target_year.trim().to_string();
        if target_year.len() != 4 || !target_year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidTargetYear(target_year));
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            provider,
            diagnosis: DiagnosisConfig {
                market_ratio,
                allowed_codes,
                target_year,
            },
        })
    }
}

fn parse_allowed_codes(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Credentials and endpoints for the V-World search and price services.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub domain: String,
    pub search_url: String,
    pub price_url: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("search_url", &self.search_url)
            .field("price_url", &self.price_url)
            .finish()
    }
}

/// Valuation inputs shared by every diagnosis.
#[derive(Debug, Clone)]
pub struct DiagnosisConfig {
    pub market_ratio: MarketRatio,
    pub allowed_codes: BTreeSet<String>,
    pub target_year: String,
}

/// Multiplier from officially assessed price to estimated market price.
///
/// Held as an exact decimal (`units / 10^scale`) parsed from its textual form,
/// so `apply` is `floor(amount * ratio)` for every accepted ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketRatio {
    units: u64,
    scale: u32,
}

impl MarketRatio {
    /// Keeps `amount * units` inside `i128` for any `i64` amount.
    const MAX_DIGITS: usize = 18;

    pub fn new(ratio: f64) -> Result<Self, ConfigError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigError::InvalidMarketRatio(ratio.to_string()));
        }
        Self::parse(&ratio.to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidMarketRatio(raw.to_string());

        let text = raw.trim();
        let text = text.strip_prefix('+').unwrap_or(text);
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let fraction = fraction.trim_end_matches('0');
        let digits = format!("{whole}{fraction}");
        let significant = digits.trim_start_matches('0');
        if significant.is_empty()
            || significant.len() > Self::MAX_DIGITS
            || fraction.len() > Self::MAX_DIGITS
        {
            return Err(invalid());
        }

        let units = significant.parse::<u64>().map_err(|_| invalid())?;
        let scale = u32::try_from(fraction.len()).map_err(|_| invalid())?;
        Ok(Self { units, scale })
    }

    pub fn as_f64(self) -> f64 {
        self.units as f64 / 10f64.powi(self.scale as i32)
    }

    /// `floor(amount * ratio)` for non-negative amounts, truncated toward zero otherwise.
    pub fn apply(self, amount: i64) -> i64 {
        let scaled = i128::from(amount) * i128::from(self.units) / 10i128.pow(self.scale);
        scaled.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

impl Default for MarketRatio {
    fn default() -> Self {
        Self {
            units: 14,
            scale: 1,
        }
    }
}

impl fmt::Display for MarketRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }
        let width = self.scale as usize + 1;
        let padded = format!("{:0>width$}", self.units);
        let (whole, fraction) = padded.split_at(padded.len() - self.scale as usize);
        write!(f, "{whole}.{fraction}")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingApiKey,
    MissingAllowedCodes,
    InvalidMarketRatio(String),
    InvalidTargetYear(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingApiKey => write!(f, "VWORLD_KEY must be set to a non-empty key"),
            ConfigError::MissingAllowedCodes => {
                write!(f, "ALLOWED_CODES must list at least one jurisdiction code")
            }
            ConfigError::InvalidMarketRatio(raw) => {
                write!(
                    f,
                    "MARKET_RATIO must be a positive decimal of at most 18 digits, got '{raw}'"
                )
            }
            ConfigError::InvalidTargetYear(raw) => {
                write!(f, "PRICE_TARGET_YEAR must be a four digit year, got '{raw}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "VWORLD_KEY",
            "VWORLD_DOMAIN",
            "VWORLD_SEARCH_URL",
            "VWORLD_PRICE_URL",
            "MARKET_RATIO",
            "ALLOWED_CODES",
            "PRICE_TARGET_YEAR",
        ] {
            env::remove_var(key);
        }
    }

    fn set_required() {
        env::set_var("VWORLD_KEY", "test-key");
        env::set_var("ALLOWED_CODES", "11680, 11650,,");
    }

    #[test]
    fn load_uses_defaults_when_optional_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        set_required();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.provider.domain, DEFAULT_DOMAIN);
        assert_eq!(config.diagnosis.market_ratio, MarketRatio::default());
        assert_eq!(config.diagnosis.target_year, "2024");
        let codes: Vec<_> = config.diagnosis.allowed_codes.iter().cloned().collect();
        assert_eq!(codes, vec!["11650".to_string(), "11680".to_string()]);
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ALLOWED_CODES", "11680");
        env::set_var("VWORLD_KEY", "   ");
        assert!(matches!(AppConfig::load(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn blank_allowed_codes_are_fatal() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VWORLD_KEY", "test-key");
        env::set_var("ALLOWED_CODES", " , ,");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingAllowedCodes)
        ));
    }

    #[test]
    fn malformed_market_ratio_is_fatal() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        set_required();
        env::set_var("MARKET_RATIO", "one point four");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidMarketRatio(_))
        ));
        env::set_var("MARKET_RATIO", "-1.2");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidMarketRatio(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_target_year() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        set_required();
        env::set_var("PRICE_TARGET_YEAR", "24");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidTargetYear(_))
        ));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        set_required();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn provider_debug_redacts_key() {
        let provider = ProviderConfig {
            api_key: "secret".to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            price_url: DEFAULT_PRICE_URL.to_string(),
        };
        assert!(!format!("{provider:?}").contains("secret"));
    }

    #[test]
    fn market_ratio_truncates_the_product() {
        let ratio = MarketRatio::new(1.4).expect("valid ratio");
        assert_eq!(ratio, MarketRatio::default());
        assert_eq!(ratio.apply(500_000_000), 700_000_000);
        assert_eq!(ratio.apply(0), 0);
        assert_eq!(ratio.apply(7), 9);
        assert_eq!(MarketRatio::parse(" 1.35 ").expect("parses").apply(100), 135);
        assert!(MarketRatio::new(0.0).is_err());
        assert!(MarketRatio::new(f64::NAN).is_err());
    }

    #[test]
    fn market_ratio_keeps_every_decimal_place() {
        let ratio = MarketRatio::parse("1.23456").expect("five decimals parse");
        assert_eq!(ratio.apply(1_000_000_000), 1_234_560_000);
        assert_eq!(ratio.to_string(), "1.23456");

        let tiny = MarketRatio::parse("0.00004").expect("tiny positive ratio parses");
        assert_eq!(tiny.apply(1_000_000_000), 40_000);
        assert_eq!(tiny.apply(10_000), 0);
        assert_eq!(tiny.to_string(), "0.00004");
        assert_eq!(MarketRatio::new(0.00004).expect("valid ratio"), tiny);

        assert_eq!(MarketRatio::parse("1.40").expect("parses"), MarketRatio::default());
        assert_eq!(MarketRatio::parse("2").expect("parses").to_string(), "2");
        assert_eq!(MarketRatio::parse(".5").expect("parses").apply(9), 4);
    }

    #[test]
    fn market_ratio_rejects_what_it_cannot_hold_exactly() {
        for raw in ["0", "0.000", ".", "", "-1.4", "1.4e0", "1,4", "0.0000000000000000001"] {
            assert!(
                matches!(MarketRatio::parse(raw), Err(ConfigError::InvalidMarketRatio(_))),
                "{raw:?} should be rejected"
            );
        }
        assert!(MarketRatio::parse("1234567890.12345678").is_ok());
        assert!(MarketRatio::parse("1234567890.123456789").is_err());
    }

    #[test]
    fn load_keeps_a_fine_grained_market_ratio() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        set_required();
        env::set_var("MARKET_RATIO", "1.23456");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.diagnosis.market_ratio.apply(1_000_000_000), 1_234_560_000);
    }
}
