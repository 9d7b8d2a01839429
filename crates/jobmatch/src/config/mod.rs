use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::matching::compatibility::FeedPolicy;
use crate::matching::domain::{CriterionWeights, CRITERIA_COUNT};

const DEFAULT_MIN_SCORE: f64 = 20.0;
const DEFAULT_ENRICHMENT_ATTEMPTS: u8 = 2;
const MAX_ENRICHMENT_ATTEMPTS: u8 = 5;

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
    pub matching: MatchingConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: MatchingConfig::from_env()?,
        })
    }
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Tunables for discovery filtering, applicant enrichment, and fallback ranking weights.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    pub minimum_score: f64,
    pub enforce_travel_radius: bool,
    pub enrichment_attempts: u8,
    pub default_weights: CriterionWeights,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            minimum_score: DEFAULT_MIN_SCORE,
            enforce_travel_radius: true,
            enrichment_attempts: DEFAULT_ENRICHMENT_ATTEMPTS,
            default_weights: CriterionWeights::default(),
        }
    }
}

impl MatchingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let minimum_score = match env::var("MATCH_MIN_SCORE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or(ConfigError::InvalidMinimumScore { value: raw })?,
            Err(_) => defaults.minimum_score,
        };

        let enforce_travel_radius = match env::var("MATCH_ENFORCE_RADIUS") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "MATCH_ENFORCE_RADIUS",
                value: raw,
            })?,
            Err(_) => defaults.enforce_travel_radius,
        };

        let enrichment_attempts = match env::var("MATCH_ENRICHMENT_ATTEMPTS") {
            Ok(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|value| (1..=MAX_ENRICHMENT_ATTEMPTS).contains(value))
                .ok_or(ConfigError::InvalidEnrichmentAttempts { value: raw })?,
            Err(_) => defaults.enrichment_attempts,
        };

        let default_weights = match env::var("MATCH_DEFAULT_WEIGHTS") {
            Ok(raw) => parse_weights(&raw).ok_or(ConfigError::InvalidWeights { value: raw })?,
            Err(_) => defaults.default_weights,
        };

        Ok(Self {
            minimum_score,
            enforce_travel_radius,
            enrichment_attempts,
            default_weights,
        })
    }
}

impl From<&MatchingConfig> for FeedPolicy {
    fn from(config: &MatchingConfig) -> Self {
        FeedPolicy {
            minimum_score: config.minimum_score,
            enforce_travel_radius: config.enforce_travel_radius,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Exactly five comma-separated, finite, non-negative numbers with a positive sum.
pub fn parse_weights(raw: &str) -> Option<CriterionWeights> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    let values: [f64; CRITERIA_COUNT] = values.try_into().ok()?;

    let valid = values.iter().all(|value| value.is_finite() && *value >= 0.0);
    let weights = CriterionWeights::from_array(values);
    (valid && weights.sum() > 0.0).then_some(weights)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMinimumScore { value: String },
    InvalidFlag { name: &'static str, value: String },
    InvalidEnrichmentAttempts { value: String },
    InvalidWeights { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMinimumScore { value } => write!(
                f,
                "MATCH_MIN_SCORE must be a non-negative number, got '{}'",
                value
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false, got '{}'", name, value)
            }
            ConfigError::InvalidEnrichmentAttempts { value } => write!(
                f,
                "MATCH_ENRICHMENT_ATTEMPTS must be between 1 and {}, got '{}'",
                MAX_ENRICHMENT_ATTEMPTS, value
            ),
            ConfigError::InvalidWeights { value } => write!(
                f,
                "MATCH_DEFAULT_WEIGHTS must list {} non-negative numbers, got '{}'",
                CRITERIA_COUNT, value
            ),
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
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "MATCH_MIN_SCORE",
            "MATCH_ENFORCE_RADIUS",
            "MATCH_ENRICHMENT_ATTEMPTS",
            "MATCH_DEFAULT_WEIGHTS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.matching, MatchingConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn matching_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_MIN_SCORE", "35");
        env::set_var("MATCH_ENFORCE_RADIUS", "no");
        env::set_var("MATCH_ENRICHMENT_ATTEMPTS", "4");
        env::set_var("MATCH_DEFAULT_WEIGHTS", "1, 1, 1, 1, 1");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.matching.minimum_score, 35.0);
        assert!(!config.matching.enforce_travel_radius);
        assert_eq!(config.matching.enrichment_attempts, 4);
        assert_eq!(config.matching.default_weights.as_array(), [1.0; 5]);

        let policy = FeedPolicy::from(&config.matching);
        assert_eq!(policy.minimum_score, 35.0);
        assert!(!policy.enforce_travel_radius);
    }

    #[test]
    fn rejects_out_of_range_enrichment_attempts() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_ENRICHMENT_ATTEMPTS", "9");
        let error = AppConfig::load().expect_err("attempts above the cap are rejected");
        reset_env();

        assert!(matches!(error, ConfigError::InvalidEnrichmentAttempts { .. }));
        assert!(error.to_string().contains("MATCH_ENRICHMENT_ATTEMPTS"));
    }

    #[test]
    fn weight_lists_need_five_non_negative_values() {
        assert!(parse_weights("0.3,0.3,0.2,0.1,0.1").is_some());
        assert!(parse_weights("0.3,0.3,0.2,0.1").is_none());
        assert!(parse_weights("0.3,0.3,0.2,0.1,-0.1").is_none());
        assert!(parse_weights("0,0,0,0,0").is_none());
        assert!(parse_weights("a,b,c,d,e").is_none());
    }
}
