use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; preferences and ratings stay in memory when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL used for the analytics cache
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Destination catalog location, either a file path or an http(s) URL
    #[serde(default = "default_catalog_source")]
    pub catalog_source: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds an analytics aggregate stays cached
    #[serde(default = "default_analytics_cache_ttl_secs")]
    pub analytics_cache_ttl_secs: u64,
}

fn default_catalog_source() -> String {
    "dataset/destinations.csv".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_analytics_cache_ttl_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
