use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Movie-metadata API bearer token
    pub movie_api_key: String,

    /// Movie-metadata API base URL
    #[serde(default = "default_movie_api_url")]
    pub movie_api_url: String,

    /// Image CDN base URL for poster and backdrop paths
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Trending document store endpoint
    #[serde(default = "default_appwrite_endpoint")]
    pub appwrite_endpoint: String,

    /// Trending document store project ID
    pub appwrite_project_id: String,

    /// Database holding the trending collection
    pub appwrite_database_id: String,

    /// Collection of per-search-term counter documents
    pub appwrite_collection_id: String,

    /// Quiet period before a search input change fires a fetch
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How many trending entries to surface
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
}

fn default_movie_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_debounce_ms() -> u64 {
    800
}

fn default_trending_limit() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
