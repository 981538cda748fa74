use serde::Deserialize;

/// Main configuration structure for Contact-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Batching and concurrency configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Number of candidate URLs processed between checkpoints
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_workers: default_max_workers(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whether 3xx responses are followed (up to 10 hops)
    #[serde(rename = "follow-redirects", default = "default_follow_redirects")]
    pub follow_redirects: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            follow_redirects: default_follow_redirects(),
        }
    }
}

/// Input list locations
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// CSV file with a `URL` column listing the origins to probe
    #[serde(rename = "origins-path")]
    pub origins_path: String,

    /// CSV file with a `Route` column listing the subpaths to probe
    #[serde(rename = "routes-path")]
    pub routes_path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the checkpoint file, rewritten after every batch
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,

    /// Checkpoint format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Supported checkpoint formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Sqlite,
}

fn default_batch_size() -> usize {
    1000
}

fn default_max_workers() -> usize {
    80
}

fn default_request_timeout() -> u64 {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_follow_redirects() -> bool {
    true
}
