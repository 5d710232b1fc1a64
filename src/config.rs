use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::CategoryRelations;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Shared L2 cache; the service runs with the in-process cache alone when unset
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default = "default_min_viewport_radius_km")]
    pub min_viewport_radius_km: f64,
    /// How many times `limit` candidates to fetch for the nearby search
    #[serde(default = "default_nearby_prefetch_factor")]
    pub nearby_prefetch_factor: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            min_viewport_radius_km: default_min_viewport_radius_km(),
            nearby_prefetch_factor: default_nearby_prefetch_factor(),
        }
    }
}

fn default_radius_km() -> f64 { 10.0 }
fn default_min_viewport_radius_km() -> f64 { 5.0 }
fn default_nearby_prefetch_factor() -> usize { 2 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Entries replacing or extending the built-in category relations
    #[serde(default)]
    pub category_relations: Vec<RelationOverride>,
}

/// One category relation entry
///
/// Written as a list of tables because the config loader lowercases map
/// keys, and category tags are case-sensitive.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationOverride {
    pub tag: String,
    #[serde(default)]
    pub related: Vec<String>,
}

impl ScoringSettings {
    pub fn relations(&self) -> CategoryRelations {
        CategoryRelations::default().with_overrides(
            self.category_relations
                .iter()
                .map(|entry| (entry.tag.clone(), entry.related.clone())),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_category_weight")]
    pub category: f64,
    #[serde(default = "default_amenity_weight")]
    pub amenity: f64,
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_collaborative_weight")]
    pub collaborative: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            location: default_location_weight(),
            category: default_category_weight(),
            amenity: default_amenity_weight(),
            rating: default_rating_weight(),
            collaborative: default_collaborative_weight(),
        }
    }
}

fn default_location_weight() -> f64 { 0.30 }
fn default_category_weight() -> f64 { 0.25 }
fn default_amenity_weight() -> f64 { 0.20 }
fn default_rating_weight() -> f64 { 0.15 }
fn default_collaborative_weight() -> f64 { 0.10 }

impl WeightsConfig {
    /// Convert into scoring weights, rejecting negative or all-zero weights
    pub fn to_weights(&self) -> Result<ScoringWeights, ConfigError> {
        let weights = ScoringWeights {
            location: self.location,
            category: self.category,
            amenity: self.amenity,
            rating: self.rating,
            collaborative: self.collaborative,
        };

        let values = [
            weights.location,
            weights.category,
            weights.amenity,
            weights.rating,
            weights.collaborative,
        ];
        if values.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Message(format!(
                "scoring weights must be finite and non-negative: {:?}",
                weights
            )));
        }
        if weights.location + weights.category + weights.amenity + weights.rating <= 0.0 {
            return Err(ConfigError::Message(
                "at least one implemented scoring weight must be positive".to_string(),
            ));
        }

        Ok(weights)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with WOOFS_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., WOOFS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("WOOFS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("WOOFS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.weights.to_weights()?;

        if !self.search.default_radius_km.is_finite() || self.search.default_radius_km < 0.0 {
            return Err(ConfigError::Message(format!(
                "search.default_radius_km must be non-negative, got {}",
                self.search.default_radius_km
            )));
        }
        if !self.search.min_viewport_radius_km.is_finite() || self.search.min_viewport_radius_km < 0.0 {
            return Err(ConfigError::Message(format!(
                "search.min_viewport_radius_km must be non-negative, got {}",
                self.search.min_viewport_radius_km
            )));
        }
        if self.search.nearby_prefetch_factor == 0 {
            return Err(ConfigError::Message(
                "search.nearby_prefetch_factor must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Apply the conventional `DATABASE_URL` / `REDIS_URL` variables on top of
/// the layered configuration
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    // We check DATABASE_URL first, then WOOFS__DATABASE__URL; without
    // either the configured files decide
    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("WOOFS__DATABASE__URL"))
        .ok();

    let redis_url = env::var("REDIS_URL").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = database_url {
        builder = builder.set_override("database.url", url)?;
    }

    if let Some(url) = redis_url {
        builder = builder.set_override("cache.redis_url", url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.location, 0.30);
        assert_eq!(weights.category, 0.25);
        assert_eq!(weights.amenity, 0.20);
        assert_eq!(weights.rating, 0.15);
        assert_eq!(weights.collaborative, 0.10);
        assert_eq!(weights.to_weights().unwrap(), ScoringWeights::default());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = WeightsConfig {
            rating: -0.1,
            ..WeightsConfig::default()
        };
        assert!(weights.to_weights().is_err());
    }

    #[test]
    fn test_all_zero_implemented_weights_rejected() {
        let weights = WeightsConfig {
            location: 0.0,
            category: 0.0,
            amenity: 0.0,
            rating: 0.0,
            collaborative: 1.0,
        };
        assert!(weights.to_weights().is_err());
    }

    #[test]
    fn test_default_search_settings() {
        let search = SearchSettings::default();
        assert_eq!(search.default_radius_km, 10.0);
        assert_eq!(search.min_viewport_radius_km, 5.0);
        assert_eq!(search.nearby_prefetch_factor, 2);
    }

    /// Write `contents` to a uniquely named TOML file under the temp dir
    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "woofs-places-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    const BASE_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
url = "postgres://custom-host:5432/woofs"
"#;

    #[test]
    fn test_relation_overrides_from_settings() {
        let mut scoring = ScoringSettings::default();
        scoring.category_relations.push(RelationOverride {
            tag: "Café".to_string(),
            related: vec!["Bakery".to_string()],
        });

        let relations = scoring.relations();
        assert!(relations.is_related("Café", "Bakery"));
        assert!(relations.is_related("Hotel", "Motel"));
    }

    #[test]
    fn test_relation_overrides_keep_tag_case_from_file() {
        let contents = format!(
            r#"{}
[[scoring.category_relations]]
tag = "Café"
related = ["Bakery", "Bar"]

[[scoring.category_relations]]
tag = "Bakery"
related = ["Café"]
"#,
            BASE_CONFIG
        );
        let path = write_config("relations", &contents);

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let relations = settings.scoring.relations();
        assert!(relations.is_related("Café", "Bakery"));
        assert!(relations.is_related("Bakery", "Café"));
        assert!(!relations.is_related("Café", "Restaurant"));
        assert!(relations.related("café").is_none());
    }

    #[test]
    fn test_configured_database_url_survives_env_substitution() {
        if std::env::var("DATABASE_URL").is_ok() || std::env::var("WOOFS__DATABASE__URL").is_ok() {
            return;
        }

        let path = write_config("database-url", BASE_CONFIG);
        let config = Config::builder()
            .add_source(File::from(path.as_path()))
            .build()
            .unwrap();
        std::fs::remove_file(&path).ok();

        let settings: Settings = substitute_env_vars(config)
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.database.url, "postgres://custom-host:5432/woofs");
    }

    #[test]
    fn test_negative_min_viewport_radius_rejected() {
        let contents = format!("{}\n[search]\nmin_viewport_radius_km = -1.0\n", BASE_CONFIG);
        let path = write_config("viewport-radius", &contents);

        let result = Settings::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
