use serde::Deserialize;

use crate::services::neighbors::DEFAULT_TOP_K;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the four precomputed artifacts
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,

    /// Remote location of the anime table (anime.csv)
    #[serde(default)]
    pub anime_table_url: Option<String>,

    /// Remote location of the user-anchor table (user_anchors.csv)
    #[serde(default)]
    pub user_anchor_table_url: Option<String>,

    /// Remote location of the content similarity matrix (similarity.bin)
    #[serde(default)]
    pub similarity_url: Option<String>,

    /// Remote location of the collaborative similarity matrix (user_similarity.bin)
    #[serde(default)]
    pub user_similarity_url: Option<String>,

    /// Jikan API base URL
    #[serde(default = "default_poster_api_url")]
    pub poster_api_url: String,

    /// Image shown when no poster can be resolved
    #[serde(default = "default_placeholder_poster_url")]
    pub placeholder_poster_url: String,

    /// Number of recommendations per list
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Timeout applied to every outbound HTTP request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_artifact_dir() -> String {
    "artifacts".to_string()
}

fn default_poster_api_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_placeholder_poster_url() -> String {
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTnbhCVUg--rMQGw44l63AsHs5DndvLIctKDg&s"
        .to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Bind address for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
