//! Configuration documents and service settings
//!
//! The painpoint dictionary and lifestyle ruleset are loaded once at startup
//! and shared read-only across compose runs. Every key in either document is
//! optional; missing values fall back to defaults instead of failing.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, Level};

pub const DEFAULT_MAX_PRIORITY_CAP: f64 = 0.85;
pub const DEFAULT_PORT: u16 = 8082;

const BUNDLED_PAINPOINTS: &str = include_str!("../config/painpoints_dictionary.v1.json");
const BUNDLED_RULESET: &str = include_str!("../config/lifestyle_ruleset.v1.json");
const BUNDLED_PAINPOINTS_PATH: &str = "config/painpoints_dictionary.v1.json";
const BUNDLED_RULESET_PATH: &str = "config/lifestyle_ruleset.v1.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("COMPOSE_PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),
    #[error("COMPOSE_LOG_LEVEL must be one of trace|debug|info|warn|error, got '{0}'")]
    InvalidLogLevel(String),
}

/// Painpoint id → intent weights
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PainpointDictionary {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub painpoints: HashMap<String, PainpointEntry>,
}

impl PainpointDictionary {
    pub fn get(&self, painpoint_id: &str) -> Option<&PainpointEntry> {
        self.painpoints.get(painpoint_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PainpointEntry {
    #[serde(default = "default_max_priority_cap")]
    pub max_priority_cap: f64,
    #[serde(default, deserialize_with = "ordered_map::deserialize")]
    pub mapped_intents: Vec<(String, f64)>, // document order
}

fn default_max_priority_cap() -> f64 {
    DEFAULT_MAX_PRIORITY_CAP
}

/// Ordered lifestyle rules plus the global modifier bounds
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifestyleRuleset {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub rules: Vec<LifestyleRule>,
    #[serde(default)]
    pub global_constraints: GlobalConstraints,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LifestyleRule {
    #[serde(default = "default_rule_id")]
    pub id: String,
    #[serde(default, deserialize_with = "ordered_map::deserialize")]
    pub input_conditions: Vec<(String, Condition)>,
    #[serde(default)]
    pub effects: RuleEffects,
}

fn default_rule_id() -> String {
    "unknown".to_string()
}

/// A single field check: either a literal to match exactly, or bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Bounds(ConditionBounds),
    Literal(Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub equals: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleEffects {
    #[serde(default, deserialize_with = "ordered_map::deserialize")]
    pub intent_modifiers: Vec<(String, f64)>,
    #[serde(default)]
    pub confidence_penalty: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalConstraints {
    #[serde(default = "default_min_modifier")]
    pub min_modifier_value: f64,
    #[serde(default = "default_max_modifier")]
    pub max_modifier_value: f64,
}

fn default_min_modifier() -> f64 {
    -1.0
}

fn default_max_modifier() -> f64 {
    1.0
}

impl Default for GlobalConstraints {
    fn default() -> Self {
        Self {
            min_modifier_value: default_min_modifier(),
            max_modifier_value: default_max_modifier(),
        }
    }
}

impl GlobalConstraints {
    pub fn clamp_modifier(&self, modifier: f64) -> f64 {
        modifier
            .min(self.max_modifier_value)
            .max(self.min_modifier_value)
    }
}

/// Read-only configuration handed to the compose engine
#[derive(Debug, Clone, Default)]
pub struct ComposeConfig {
    pub painpoints: PainpointDictionary,
    pub lifestyle: LifestyleRuleset,
}

impl ComposeConfig {
    pub fn new(painpoints: PainpointDictionary, lifestyle: LifestyleRuleset) -> Self {
        Self {
            painpoints,
            lifestyle,
        }
    }

    /// Load both documents from disk
    pub fn load(
        painpoints_path: impl AsRef<Path>,
        ruleset_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let painpoints = read_document(painpoints_path.as_ref())?;
        let lifestyle = read_document(ruleset_path.as_ref())?;
        Ok(Self::new(painpoints, lifestyle))
    }

    pub fn from_json(painpoints_json: &str, ruleset_json: &str) -> Result<Self, ConfigError> {
        let painpoints = parse_document(painpoints_json, Path::new("<painpoints>"))?;
        let lifestyle = parse_document(ruleset_json, Path::new("<ruleset>"))?;
        Ok(Self::new(painpoints, lifestyle))
    }

    /// The v1 documents compiled into the binary
    pub fn bundled() -> Result<Self, ConfigError> {
        let painpoints = parse_document(BUNDLED_PAINPOINTS, Path::new(BUNDLED_PAINPOINTS_PATH))?;
        let lifestyle = parse_document(BUNDLED_RULESET, Path::new(BUNDLED_RULESET_PATH))?;
        Ok(Self::new(painpoints, lifestyle))
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&raw, path)
}

fn parse_document<T: DeserializeOwned>(raw: &str, path: &Path) -> Result<T, ConfigError> {
    serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Process settings for the HTTP server binary
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub painpoints_path: Option<PathBuf>,
    pub ruleset_path: Option<PathBuf>,
    pub log_level: Level,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("COMPOSE_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let log_level = match lookup("COMPOSE_LOG_LEVEL") {
            Some(raw) => {
                Level::from_str(raw.trim()).map_err(|_| ConfigError::InvalidLogLevel(raw.clone()))?
            }
            None => Level::INFO,
        };

        Ok(Self {
            port,
            painpoints_path: lookup("PAINPOINTS_DICTIONARY_PATH").map(PathBuf::from),
            ruleset_path: lookup("LIFESTYLE_RULESET_PATH").map(PathBuf::from),
            log_level,
        })
    }

    /// Load the compose documents, using the bundled copy for any path not set
    pub fn compose_config(&self) -> Result<ComposeConfig, ConfigError> {
        let painpoints = match &self.painpoints_path {
            Some(path) => {
                info!("Loading painpoint dictionary from {}", path.display());
                read_document(path)?
            }
            None => parse_document(BUNDLED_PAINPOINTS, Path::new(BUNDLED_PAINPOINTS_PATH))?,
        };

        let lifestyle = match &self.ruleset_path {
            Some(path) => {
                info!("Loading lifestyle ruleset from {}", path.display());
                read_document(path)?
            }
            None => parse_document(BUNDLED_RULESET, Path::new(BUNDLED_RULESET_PATH))?,
        };

        Ok(ComposeConfig::new(painpoints, lifestyle))
    }
}

/// Deserialize a JSON object into `(key, value)` pairs in document order.
mod ordered_map {
    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }

    struct OrderedVisitor<V>(PhantomData<V>);

    impl<'de, V> Visitor<'de> for OrderedVisitor<V>
    where
        V: Deserialize<'de>,
    {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a JSON object")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries: Vec<(String, V)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                // Duplicate keys: last value wins, first position is kept
                match entries.iter_mut().find(|(existing, _)| *existing == key) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
            }
            Ok(entries)
        }
    }
}
