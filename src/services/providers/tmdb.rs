//! TMDB-shaped metadata API client
//!
//! API flow:
//! 1. List: /search/movie (non-empty term) or /discover/movie (empty term)
//! 2. Detail: /movie/{id}
//! 3. Videos: /movie/{id}/videos, consumed by the trailer enricher
//!
//! Every request carries the bearer token. A non-2xx status maps to
//! `AppError::Transport`; a 2xx body shaped `{Response:"False", Error}` maps
//! to `AppError::Api` with the provider's message.

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{MovieDetail, MovieListPage, MovieSummary, ProviderErrorBody, VideoEntry, VideoListPage},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const DISCOVER_SORT: &str = "popularity.desc";
const SEARCH_SORT: &str = "primary_release_date.desc";
const VIDEOS_LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.movie_api_key.clone(), config.movie_api_url.clone())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "metadata API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        decode_payload(&body)
    }
}

/// Separates a provider error payload from the expected response shape
///
/// Some endpoints answer 2xx with `{Response:"False", Error:...}` instead of
/// a status code; that payload wins over any deserialization attempt.
fn decode_payload<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    if let Ok(err) = serde_json::from_str::<ProviderErrorBody>(body) {
        if err.response == "False" {
            return Err(AppError::Api(
                err.error
                    .unwrap_or_else(|| "metadata provider rejected the request".to_string()),
            ));
        }
    }

    serde_json::from_str(body)
        .map_err(|e| AppError::Api(format!("malformed metadata payload: {}", e)))
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movies(&self, term: &str) -> AppResult<Vec<MovieSummary>> {
        // An empty term is discover/popular mode; whitespace still searches,
        // matching the product's behavior.
        let page: MovieListPage = if term.is_empty() {
            self.get_json(
                format!("{}/discover/movie", self.api_url),
                &[("sort_by", DISCOVER_SORT)],
            )
            .await?
        } else {
            self.get_json(
                format!("{}/search/movie", self.api_url),
                &[("query", term), ("sort_by", SEARCH_SORT)],
            )
            .await?
        };

        tracing::info!(
            term = %term,
            results = page.results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(page.results)
    }

    async fn movie_detail(&self, movie_id: u64) -> AppResult<MovieDetail> {
        let detail: MovieDetail = self
            .get_json(format!("{}/movie/{}", self.api_url, movie_id), &[])
            .await?;

        tracing::info!(movie_id, provider = "tmdb", "Movie detail fetched");

        Ok(detail)
    }

    async fn movie_videos(&self, movie_id: u64) -> AppResult<Vec<VideoEntry>> {
        let page: VideoListPage = self
            .get_json(
                format!("{}/movie/{}/videos", self.api_url, movie_id),
                &[("language", VIDEOS_LANGUAGE)],
            )
            .await?;

        Ok(page.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> TmdbProvider {
        TmdbProvider::new("test-token".to_string(), server.uri())
    }

    fn movie_page(ids: &[u64]) -> serde_json::Value {
        json!({
            "results": ids
                .iter()
                .map(|id| json!({"id": id, "title": format!("Movie {}", id)}))
                .collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn nonempty_term_routes_to_the_search_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "batman begins"))
            .and(query_param("sort_by", "primary_release_date.desc"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(movie_page(&[272])))
            .expect(1)
            .mount(&server)
            .await;

        let movies = provider_for(&server)
            .search_movies("batman begins")
            .await
            .unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 272);
    }

    #[tokio::test]
    async fn empty_term_routes_to_the_discover_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("sort_by", "popularity.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(movie_page(&[1, 2])))
            .expect(1)
            .mount(&server)
            .await;

        let movies = provider_for(&server).search_movies("").await.unwrap();
        assert_eq!(movies.len(), 2);
    }

    #[tokio::test]
    async fn zero_search_results_is_a_valid_empty_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(movie_page(&[])))
            .mount(&server)
            .await;

        let movies = provider_for(&server)
            .search_movies("zzzzzz")
            .await
            .unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .search_movies("dune")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[tokio::test]
    async fn provider_error_payload_is_an_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": "False",
                "Error": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .search_movies("dune")
            .await
            .unwrap_err();
        match err {
            AppError::Api(message) => assert_eq!(message, "Invalid API key"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn detail_not_found_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/99999999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status_message": "The resource you requested could not be found."
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).movie_detail(99_999_999).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[tokio::test]
    async fn videos_request_pins_the_language() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/27205/videos"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "key": "YoHD9XEInc0",
                    "name": "Official Trailer",
                    "site": "YouTube",
                    "type": "Trailer"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let videos = provider_for(&server).movie_videos(27205).await.unwrap();
        assert_eq!(videos[0].key, "YoHD9XEInc0");
    }
}
