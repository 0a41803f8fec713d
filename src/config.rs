use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::llm::LLMConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Supabase { url: String, key: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub knowledge_base: PathBuf,
    pub store: StoreBackend,
    pub llm: LLMConfig,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// | Variable              | Default                 |
    /// |-----------------------|-------------------------|
    /// | `HOST`                | `0.0.0.0`               |
    /// | `PORT`                | `5000`                  |
    /// | `KNOWLEDGE_BASE_PATH` | `knowledge_base.json`   |
    /// | `STORE_BACKEND`       | `supabase` (or `memory`)|
    /// | `SUPABASE_URL`        | required for supabase   |
    /// | `SUPABASE_KEY`        | required for supabase   |
    /// | `GEMINI_API_KEY`      | required                |
    /// | `GEMINI_MODEL`        | `gemini-1.5-flash`      |
    /// | `GEMINI_BASE_URL`     | Google endpoint         |
    /// | `LLM_MAX_TOKENS`      | `1000`                  |
    /// | `LLM_TEMPERATURE`     | `0.7`                   |
    /// | `LLM_TOP_P`           | `0.9`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing(var));

        let store = match get("STORE_BACKEND").as_deref() {
            None | Some("supabase") => StoreBackend::Supabase {
                url: require("SUPABASE_URL")?,
                key: require("SUPABASE_KEY")?,
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "STORE_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let defaults = LLMConfig::default();
        let llm = LLMConfig {
            api_key: require("GEMINI_API_KEY")?,
            model: get("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            max_tokens: parse(&get, "LLM_MAX_TOKENS", defaults.max_tokens)?,
            temperature: parse(&get, "LLM_TEMPERATURE", defaults.temperature)?,
            top_p: parse(&get, "LLM_TOP_P", defaults.top_p)?,
        };

        Ok(Config {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse(&get, "PORT", 5000)?,
            knowledge_base: get("KNOWLEDGE_BASE_PATH")
                .unwrap_or_else(|| "knowledge_base.json".to_string())
                .into(),
            store,
            llm,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_with_supabase() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g"),
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_KEY", "k"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.knowledge_base, PathBuf::from("knowledge_base.json"));
        assert_eq!(
            config.store,
            StoreBackend::Supabase {
                url: "https://x.supabase.co".to_string(),
                key: "k".to_string()
            }
        );
        assert_eq!(config.llm.api_key, "g");
        assert_eq!(config.llm.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_missing_credentials() {
        let err = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "g")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));

        let err = Config::from_lookup(lookup(&[("STORE_BACKEND", "memory")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GEMINI_API_KEY"));
    }

    #[test]
    fn test_memory_backend_and_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("GEMINI_API_KEY", "g"),
            ("PORT", "8080"),
            ("LLM_TEMPERATURE", "0.2"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
        ]))
        .unwrap();

        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, 8080);
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.llm.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("GEMINI_API_KEY", "g"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "PORT",
                value: "eighty".to_string()
            }
        );

        let err = Config::from_lookup(lookup(&[("STORE_BACKEND", "sqlite")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STORE_BACKEND", .. }));
    }
}
