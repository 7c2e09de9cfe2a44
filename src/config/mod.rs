//! Configuration module for CrawlStars
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables (`DATABASE_PATH`, `SEED_URL`, `WORKERS`,
//! `MAX_CRAWLS`). The command line may override the result once more, so
//! `validate` runs only after every layer has been applied.
//!
//! # Example
//!
//! ```no_run
//! use crawlstars::config::{load_config, validate};
//! use std::path::Path;
//!
//! let config = load_config(Some(Path::new("crawlstars.toml"))).unwrap();
//! validate(&config).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, StorageConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{apply_env_overrides, compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
