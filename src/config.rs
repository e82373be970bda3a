//! Process settings, built once at startup and passed to whoever needs them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of every environment variable read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "FLEET_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub project_name: String,
    pub version: String,
    pub description: String,
    /// Mount point of the API routes, e.g. `/api/v1`. Empty mounts at the root.
    pub api_prefix: String,
    pub bind_addr: String,
    /// Expose internal error details in 500 responses.
    pub debug: bool,
    /// Create the demo models and trucks when the store is empty.
    pub seed_demo_data: bool,
    pub trucks_per_page: u64,
    pub models_per_page: u64,
    pub max_per_page: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "Dump truck monitoring".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Tracks haul trucks, their models and current load".to_string(),
            api_prefix: "/api/v1".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            debug: false,
            seed_demo_data: true,
            trucks_per_page: 50,
            models_per_page: 100,
            max_per_page: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    Invalid {
        key: String,
        value: String,
        reason: &'static str,
    },
    /// Values parse but contradict each other.
    Inconsistent(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "invalid value '{}' for {}: {}", value, key, reason)
            }
            ConfigError::Inconsistent(msg) => write!(f, "inconsistent settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Settings {
    /// Defaults overridden by `FLEET_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `FLEET_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };
        let mut settings = Settings::default();

        vars.string("PROJECT_NAME", &mut settings.project_name);
        vars.string("DESCRIPTION", &mut settings.description);
        vars.string("API_PREFIX", &mut settings.api_prefix);
        vars.string("BIND_ADDR", &mut settings.bind_addr);
        vars.flag("DEBUG", &mut settings.debug)?;
        vars.flag("SEED_DEMO_DATA", &mut settings.seed_demo_data)?;
        vars.count("TRUCKS_PER_PAGE", &mut settings.trucks_per_page)?;
        vars.count("MODELS_PER_PAGE", &mut settings.models_per_page)?;
        vars.count("MAX_PER_PAGE", &mut settings.max_per_page)?;

        settings.api_prefix = normalize_prefix(&settings.api_prefix);
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigError::Inconsistent(format!(
                "api prefix '{}' must start with '/'",
                self.api_prefix
            )));
        }
        for (name, value) in [
            ("trucks_per_page", self.trucks_per_page),
            ("models_per_page", self.models_per_page),
        ] {
            if value > self.max_per_page {
                return Err(ConfigError::Inconsistent(format!(
                    "{} ({}) exceeds max_per_page ({})",
                    name, value, self.max_per_page
                )));
            }
        }
        Ok(())
    }
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().trim_end_matches('/').to_string()
}

struct Vars<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, name: &str) -> Option<(String, String)> {
        let key = format!("{}{}", ENV_PREFIX, name);
        (self.lookup)(&key).map(|value| (key, value))
    }

    fn string(&self, name: &str, target: &mut String) {
        if let Some((_, value)) = self.get(name) {
            *target = value;
        }
    }

    fn flag(&self, name: &str, target: &mut bool) -> Result<(), ConfigError> {
        if let Some((key, value)) = self.get(name) {
            *target = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        key,
                        value,
                        reason: "expected a boolean",
                    })
                }
            };
        }
        Ok(())
    }

    fn count(&self, name: &str, target: &mut u64) -> Result<(), ConfigError> {
        if let Some((key, value)) = self.get(name) {
            match value.trim().parse::<u64>() {
                Ok(n) if n >= 1 => *target = n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key,
                        value,
                        reason: "expected a positive integer",
                    })
                }
            }
        }
        Ok(())
    }
}
