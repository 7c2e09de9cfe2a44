use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for CrawlStars
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub storage: StorageConfig,
}

/// Crawl engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    pub seed_url: String,

    /// Number of concurrent workers
    pub workers: usize,

    /// Number of fetch attempts after which the crawl stops
    pub max_crawls: u64,

    /// Maximum number of URLs waiting in the frontier
    pub frontier_capacity: usize,

    /// Maximum number of completed pages waiting for the sink
    pub result_buffer: usize,

    /// How long a worker waits on an empty frontier before quitting (milliseconds)
    pub idle_timeout_ms: u64,

    /// Per-request fetch timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: "https://en.wikipedia.org/wiki/Computer_science".to_string(),
            workers: 10,
            max_crawls: 1000,
            frontier_capacity: 1000,
            result_buffer: 100,
            idle_timeout_ms: 5_000,
            request_timeout_secs: 15,
        }
    }
}

impl CrawlerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Free-form note appended after the contact URL
    pub comment: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "CrawlStars".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://github.com/andrewzheng/CrawlStars".to_string(),
            comment: "Educational Crawler".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; Comment)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.comment
        )
    }
}

/// Page store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "crawlstars.db".to_string(),
        }
    }
}
