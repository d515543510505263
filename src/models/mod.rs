use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local asset served when the metadata API has no image path for a movie
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// Builds a CDN image URL from an API-returned relative path
///
/// Falls back to the local placeholder asset when the path is absent, so
/// callers never have to special-case missing artwork.
pub fn image_url(image_base_url: &str, path: Option<&str>) -> String {
    match path {
        Some(path) => format!("{}{}", image_base_url, path),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// A movie as returned by the list endpoints (search and discover)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
}

/// Envelope around the list endpoints' paged results
#[derive(Debug, Deserialize)]
pub struct MovieListPage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

/// Full movie record from the detail endpoint
///
/// Superset of [`MovieSummary`]. `trailer` is not part of the provider
/// payload; the detail orchestrator fills it in after enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub trailer: Option<Trailer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: Option<String>,
    pub name: String,
}

/// One entry from the videos endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoEntry {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Envelope around the videos endpoint's results
#[derive(Debug, Deserialize)]
pub struct VideoListPage {
    #[serde(default)]
    pub results: Vec<VideoEntry>,
}

/// An official trailer located for a movie
///
/// Duration fields stay `None` when the embed-player lookup failed or never
/// ran; the key and watch URL are usable either way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trailer {
    pub key: String,
    pub url: String,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub duration_formatted: Option<String>,
}

/// Well-formed error payload some metadata endpoints return with a 2xx status
#[derive(Debug, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

/// A per-search-term counter record surfaced in the trending list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingEntry {
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    pub poster_url: String,
    pub recorded_at: DateTime<Utc>,
}
