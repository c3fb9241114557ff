//! Configuration management for the travel planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the travel planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Ticketmaster Discovery API settings
    #[serde(default = "default_events_config")]
    pub events: LiveSourceConfig,
    /// OpenWeatherMap API settings
    #[serde(default = "default_weather_config")]
    pub weather: LiveSourceConfig,
    /// Amadeus flight and hotel API settings
    #[serde(default)]
    pub amadeus: AmadeusConfig,
    /// Fan-out, scoring and cross-referencing settings
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    /// Nightly price thresholds for the hotel budget filter
    #[serde(default)]
    pub budget: BudgetThresholds,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for a data source backed by a live, key-authenticated API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveSourceConfig {
    /// API key; falls back to the provider's conventional env var
    pub api_key: Option<String>,
    /// Base URL for the API, filled by `apply_defaults` when empty
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in seconds, filled by `apply_defaults` when zero
    #[serde(default)]
    pub timeout_seconds: u32,
}

/// Amadeus OAuth2 client-credentials settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmadeusConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    #[serde(default = "default_amadeus_base_url")]
    pub base_url: String,
    #[serde(default = "default_amadeus_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed offer lookups
    #[serde(default = "default_amadeus_max_retries")]
    pub max_retries: u32,
}

/// Aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Per-source timeout for sources without their own setting
    #[serde(default = "default_source_timeout")]
    pub default_timeout_seconds: u32,
    /// Emulate provider latency in the fixed-data sources
    #[serde(default = "default_true")]
    pub synthetic_latency: bool,
    #[serde(default)]
    pub confidence: ConfidenceWeights,
    #[serde(default)]
    pub proximity: ProximityConfig,
}

/// Weighting of the confidence score. These are product tunables, not derived values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    #[serde(default = "default_diversity_weight")]
    pub diversity_weight: f64,
    #[serde(default = "default_quality_weight")]
    pub quality_weight: f64,
    /// Average quality assumed when no source succeeded
    #[serde(default = "default_zero_source_quality")]
    pub zero_source_quality: f64,
}

/// Placeholder proximity matching. Match probabilities stand in for a real distance check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProximityConfig {
    #[serde(default = "default_restaurant_probability")]
    pub restaurant_probability: f64,
    #[serde(default = "default_event_probability")]
    pub event_probability: f64,
    /// Fixed seed for reproducible matching; random per run when unset
    pub seed: Option<u64>,
}

/// Hotel budget ranges: budget `<= budget_max`, luxury `>= luxury_min`, mid-range in between
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetThresholds {
    #[serde(default = "default_budget_max")]
    pub budget_max: u32,
    #[serde(default = "default_luxury_min")]
    pub luxury_min: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_events_config() -> LiveSourceConfig {
    LiveSourceConfig {
        api_key: None,
        base_url: "https://app.ticketmaster.com/discovery/v2".to_string(),
        timeout_seconds: 30,
    }
}

fn default_weather_config() -> LiveSourceConfig {
    LiveSourceConfig {
        api_key: None,
        base_url: "https://api.openweathermap.org/data/2.5".to_string(),
        timeout_seconds: 10,
    }
}

fn default_amadeus_base_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_amadeus_timeout() -> u32 {
    45
}

fn default_amadeus_max_retries() -> u32 {
    2
}

fn default_source_timeout() -> u32 {
    15
}

fn default_true() -> bool {
    true
}

fn default_diversity_weight() -> f64 {
    0.4
}

fn default_quality_weight() -> f64 {
    0.6
}

fn default_zero_source_quality() -> f64 {
    0.5
}

fn default_restaurant_probability() -> f64 {
    0.3
}

fn default_event_probability() -> f64 {
    0.2
}

fn default_budget_max() -> u32 {
    3000
}

fn default_luxury_min() -> u32 {
    8000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            events: default_events_config(),
            weather: default_weather_config(),
            amadeus: AmadeusConfig::default(),
            aggregator: AggregatorConfig::default(),
            budget: BudgetThresholds::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: default_amadeus_base_url(),
            timeout_seconds: default_amadeus_timeout(),
            max_retries: default_amadeus_max_retries(),
        }
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            default_timeout_seconds: default_source_timeout(),
            synthetic_latency: true,
            confidence: ConfidenceWeights::default(),
            proximity: ProximityConfig::default(),
        }
    }
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            diversity_weight: default_diversity_weight(),
            quality_weight: default_quality_weight(),
            zero_source_quality: default_zero_source_quality(),
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            restaurant_probability: default_restaurant_probability(),
            event_probability: default_event_probability(),
            seed: None,
        }
    }
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            budget_max: default_budget_max(),
            luxury_min: default_luxury_min(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LiveSourceConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl AmadeusConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }
}

impl AggregatorConfig {
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_seconds.into())
    }
}

impl PlannerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVEL_PLANNER_AGGREGATOR__DEFAULT_TIMEOUT_SECONDS=20 etc.
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_PLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.apply_env_credentials();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-planner").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        let events = default_events_config();
        if self.events.base_url.is_empty() {
            self.events.base_url = events.base_url;
        }
        if self.events.timeout_seconds == 0 {
            self.events.timeout_seconds = events.timeout_seconds;
        }
        let weather = default_weather_config();
        if self.weather.base_url.is_empty() {
            self.weather.base_url = weather.base_url;
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = weather.timeout_seconds;
        }
        if self.amadeus.base_url.is_empty() {
            self.amadeus.base_url = default_amadeus_base_url();
        }
        if self.amadeus.timeout_seconds == 0 {
            self.amadeus.timeout_seconds = default_amadeus_timeout();
        }
        if self.aggregator.default_timeout_seconds == 0 {
            self.aggregator.default_timeout_seconds = default_source_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Fill credentials missing from the config file from the providers' usual env vars
    pub fn apply_env_credentials(&mut self) {
        fill_from_env(&mut self.events.api_key, "TICKETMASTER_API_KEY");
        fill_from_env(&mut self.weather.api_key, "OPENWEATHER_API_KEY");
        fill_from_env(&mut self.amadeus.api_key, "AMADEUS_API_KEY");
        fill_from_env(&mut self.amadeus.api_secret, "AMADEUS_API_SECRET");
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_weights()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("Events", self.events.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("Amadeus", self.amadeus.timeout_seconds),
            ("Default source", self.aggregator.default_timeout_seconds),
        ] {
            if timeout > 300 {
                return Err(range_error(format!(
                    "{name} timeout cannot exceed 300 seconds"
                )));
            }
        }

        if self.amadeus.max_retries > 10 {
            return Err(range_error("Amadeus max retries cannot exceed 10"));
        }

        if self.budget.budget_max >= self.budget.luxury_min {
            return Err(range_error(
                "Budget threshold must be below the luxury threshold",
            ));
        }

        Ok(())
    }

    /// Validate confidence weights and matching probabilities
    fn validate_weights(&self) -> Result<()> {
        let weights = &self.aggregator.confidence;
        if weights.diversity_weight < 0.0 || weights.quality_weight < 0.0 {
            return Err(range_error("Confidence weights cannot be negative"));
        }
        if (weights.diversity_weight + weights.quality_weight - 1.0).abs() > 1e-6 {
            return Err(range_error(
                "Confidence weights must sum to 1.0",
            ));
        }

        let unit = 0.0..=1.0;
        if !unit.contains(&weights.zero_source_quality) {
            return Err(range_error(
                "Zero-source quality must be between 0.0 and 1.0",
            ));
        }

        let proximity = &self.aggregator.proximity;
        if !unit.contains(&proximity.restaurant_probability)
            || !unit.contains(&proximity.event_probability)
        {
            return Err(range_error(
                "Proximity probabilities must be between 0.0 and 1.0",
            ));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(range_error(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(range_error(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("Events", &self.events.base_url),
            ("Weather", &self.weather.base_url),
            ("Amadeus", &self.amadeus.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(range_error(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if slot.as_deref().is_some_and(|value| !value.trim().is_empty()) {
        return;
    }
    *slot = env::var(var).ok().filter(|value| !value.trim().is_empty());
}

fn range_error<S: Into<String>>(message: S) -> anyhow::Error {
    PlannerError::config(message).into()
}
