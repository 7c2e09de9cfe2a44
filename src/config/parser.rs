use crate::config::types::{Config, CrawlerConfig};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads configuration from an optional TOML file and the process environment
///
/// Without a file every field keeps its built-in default. Environment
/// variables are applied after the file. The result is not validated here:
/// callers layer their own overrides on top and then call `validate`.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the configuration file
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Applies environment overrides using the supplied lookup function
///
/// Recognised keys: `DATABASE_PATH`, `SEED_URL`, `WORKERS`, `MAX_CRAWLS`.
/// Empty values are ignored. A `WORKERS` value that is not a positive integer
/// falls back to the default worker count rather than failing.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(path) = get("DATABASE_PATH") {
        config.storage.database_path = path;
    }

    if let Some(seed) = get("SEED_URL") {
        config.crawler.seed_url = seed;
    }

    if let Some(workers) = get("WORKERS") {
        config.crawler.workers = match workers.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                tracing::warn!(
                    "Ignoring invalid WORKERS value '{}', using default",
                    workers
                );
                CrawlerConfig::default().workers
            }
        };
    }

    if let Some(max) = get("MAX_CRAWLS") {
        match max.trim().parse::<u64>() {
            Ok(n) => config.crawler.max_crawls = n,
            Err(_) => tracing::warn!("Ignoring invalid MAX_CRAWLS value '{}'", max),
        }
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is recorded with each crawl run so runs made under different
/// configurations can be told apart.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Loads a configuration and returns both the config and its hash
///
/// When no file is given the hash is that of empty content.
pub fn load_config_with_hash(path: Option<&Path>) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = match path {
        Some(path) => compute_config_hash(path)?,
        None => hash_content(""),
    };
    Ok((config, hash))
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
