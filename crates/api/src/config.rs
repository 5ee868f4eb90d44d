use chrono::FixedOffset;
use domain::services::TriggerSettings;
use serde::Deserialize;
use shared::geo::Region;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    pub region: RegionConfig,
    pub triggers: TriggersConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Service area served by the trigger engine.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_region_name")]
    pub name: String,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub center_lat: f64,
    pub center_lon: f64,

    /// Offset used for calendar-day boundaries.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggersConfig {
    #[serde(default = "default_prefilter_radius_km")]
    pub prefilter_radius_km: f64,

    #[serde(default = "default_suppression_window_mins")]
    pub suppression_window_mins: i64,

    /// Half-width of the location match box used for suppression.
    #[serde(default = "default_location_tolerance_deg")]
    pub location_tolerance_deg: f64,

    #[serde(default = "default_nearby_radius_km")]
    pub default_nearby_radius_km: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_history_limit")]
    pub max_history_limit: i64,

    #[serde(default = "default_max_progress_days")]
    pub max_progress_days: u32,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_region_name() -> String {
    "Surabaya".to_string()
}
fn default_utc_offset_minutes() -> i32 {
    420
}
fn default_prefilter_radius_km() -> f64 {
    1.0
}
fn default_suppression_window_mins() -> i64 {
    30
}
fn default_location_tolerance_deg() -> f64 {
    0.002
}
fn default_nearby_radius_km() -> f64 {
    5.0
}
fn default_max_history_limit() -> i64 {
    100
}
fn default_max_progress_days() -> u32 {
    31
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with HT__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("HT").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for tests from embedded defaults plus overrides.
    ///
    /// Does not touch the file system and skips validation.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 5
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [region]
            name = "Surabaya"
            north = -7.18
            south = -7.35
            east = 112.85
            west = 112.65
            center_lat = -7.2575
            center_lon = 112.7521
            utc_offset_minutes = 420

            [triggers]
            prefilter_radius_km = 1.0
            suppression_window_mins = 30
            location_tolerance_deg = 0.002
            default_nearby_radius_km = 5.0

            [limits]
            max_history_limit = 100
            max_progress_days = 31
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "HT__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.region.south > self.region.north || self.region.west > self.region.east {
            return Err(ConfigValidationError::InvalidValue(
                "region bounds are inverted (south must be <= north, west <= east)".to_string(),
            ));
        }

        if self.utc_offset().is_none() {
            return Err(ConfigValidationError::InvalidValue(
                "region.utc_offset_minutes must be within +/- 24 hours".to_string(),
            ));
        }

        if !(self.triggers.prefilter_radius_km > 0.0) {
            return Err(ConfigValidationError::InvalidValue(
                "triggers.prefilter_radius_km must be positive".to_string(),
            ));
        }

        if self.triggers.suppression_window_mins <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "triggers.suppression_window_mins must be positive".to_string(),
            ));
        }

        if !(self.triggers.default_nearby_radius_km > 0.0) {
            return Err(ConfigValidationError::InvalidValue(
                "triggers.default_nearby_radius_km must be positive".to_string(),
            ));
        }

        if self.limits.max_history_limit < 1 || self.limits.max_progress_days < 1 {
            return Err(ConfigValidationError::InvalidValue(
                "limits must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Listen address; falls back to all interfaces if the host is not an IP.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .server
            .host
            .parse::<IpAddr>()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(ip, self.server.port)
    }

    pub fn database_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }

    pub fn service_region(&self) -> Region {
        Region {
            name: self.region.name.clone(),
            north: self.region.north,
            south: self.region.south,
            east: self.region.east,
            west: self.region.west,
            center_lat: self.region.center_lat,
            center_lon: self.region.center_lon,
        }
    }

    pub fn trigger_settings(&self) -> TriggerSettings {
        TriggerSettings {
            prefilter_radius_km: self.triggers.prefilter_radius_km,
            suppression_window_mins: self.triggers.suppression_window_mins,
            location_tolerance_deg: self.triggers.location_tolerance_deg,
        }
    }

    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.region.utc_offset_minutes.checked_mul(60)?)
    }
}
