//! Trending-searches counter backed by a remote document store
//!
//! One document per distinct search term: `{searchTerm, count, movie_id,
//! poster_url}`. The increment is a read-then-write, not a transaction; two
//! concurrent writers can lose an update or create duplicate documents for
//! the same term. That race is accepted, documented behavior carried from
//! the product, not a bug to fix here.

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{image_url, MovieSummary, TrendingEntry},
};
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const PROJECT_HEADER: &str = "X-Appwrite-Project";

/// Trait for the per-search-term counter store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrendingStore: Send + Sync {
    /// Increments the counter for `term`, creating the entry on first sight.
    ///
    /// A created entry is seeded from the search's top result; its movie id
    /// and poster URL are set once and never updated afterward.
    async fn record_search(&self, term: &str, top_result: &MovieSummary) -> AppResult<()>;

    /// Returns up to `limit` entries ordered by count descending.
    ///
    /// Tie order is whatever the store returns; callers must not rely on it.
    async fn top_trending(&self, limit: usize) -> AppResult<Vec<TrendingEntry>>;
}

/// Document envelope returned by the store's list operation
#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TrendingDocument>,
}

#[derive(Debug, Deserialize)]
struct TrendingDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$createdAt")]
    created_at: DateTime<Utc>,
    #[serde(rename = "searchTerm")]
    search_term: String,
    count: u64,
    movie_id: u64,
    poster_url: String,
}

impl From<TrendingDocument> for TrendingEntry {
    fn from(doc: TrendingDocument) -> Self {
        TrendingEntry {
            search_term: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id,
            poster_url: doc.poster_url,
            recorded_at: doc.created_at,
        }
    }
}

/// Appwrite-backed implementation of [`TrendingStore`]
#[derive(Clone)]
pub struct AppwriteTrending {
    http_client: HttpClient,
    endpoint: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    image_base_url: String,
}

impl AppwriteTrending {
    pub fn new(
        endpoint: String,
        project_id: String,
        database_id: String,
        collection_id: String,
        image_base_url: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint,
            project_id,
            database_id,
            collection_id,
            image_base_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.appwrite_endpoint.clone(),
            config.appwrite_project_id.clone(),
            config.appwrite_database_id.clone(),
            config.appwrite_collection_id.clone(),
            config.image_base_url.clone(),
        )
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    async fn check(response: reqwest::Response) -> AppResult<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "trending store returned status {}: {}",
                status, body
            )));
        }
        Ok(response)
    }

    async fn list(&self, queries: &[serde_json::Value]) -> AppResult<DocumentList> {
        let params: Vec<(String, String)> = queries
            .iter()
            .map(|q| ("queries[]".to_string(), q.to_string()))
            .collect();

        let response = self
            .http_client
            .get(self.documents_url())
            .header(PROJECT_HEADER, &self.project_id)
            .query(&params)
            .send()
            .await?;

        let list = Self::check(response).await?.json::<DocumentList>().await?;
        Ok(list)
    }

    async fn create_entry(&self, term: &str, top_result: &MovieSummary) -> AppResult<()> {
        let body = json!({
            "documentId": Uuid::new_v4().simple().to_string(),
            "data": {
                "searchTerm": term,
                "count": 1,
                "movie_id": top_result.id,
                "poster_url": image_url(&self.image_base_url, top_result.poster_path.as_deref()),
            }
        });

        let response = self
            .http_client
            .post(self.documents_url())
            .header(PROJECT_HEADER, &self.project_id)
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn update_count(&self, document_id: &str, count: u64) -> AppResult<()> {
        let response = self
            .http_client
            .patch(format!("{}/{}", self.documents_url(), document_id))
            .header(PROJECT_HEADER, &self.project_id)
            .json(&json!({ "data": { "count": count } }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TrendingStore for AppwriteTrending {
    async fn record_search(&self, term: &str, top_result: &MovieSummary) -> AppResult<()> {
        let filter = json!({
            "attribute": "searchTerm",
            "method": "equal",
            "values": [term],
        });

        // Read-then-write; lost updates under concurrent writers are accepted.
        let existing = self.list(&[filter]).await?;
        match existing.documents.into_iter().next() {
            Some(doc) => self.update_count(&doc.id, doc.count + 1).await,
            None => self.create_entry(term, top_result).await,
        }
    }

    async fn top_trending(&self, limit: usize) -> AppResult<Vec<TrendingEntry>> {
        let queries = [
            json!({"attribute": "count", "method": "orderDesc"}),
            json!({"method": "limit", "values": [limit]}),
        ];

        let list = self.list(&queries).await?;
        Ok(list.documents.into_iter().map(TrendingEntry::from).collect())
    }
}

/// Fire-and-forget search recording
///
/// Spawns a detached task; failures are logged and never propagate to or
/// block the search flow that triggered them.
pub fn record_search_detached(store: Arc<dyn TrendingStore>, term: String, top_result: MovieSummary) {
    tokio::spawn(async move {
        if let Err(e) = store.record_search(&term, &top_result).await {
            tracing::warn!(term = %term, error = %e, "Failed to record search count");
        }
    });
}

/// Loads the trending list, degrading to an empty one on any store error.
pub async fn load_trending(store: &dyn TrendingStore, limit: usize) -> Vec<TrendingEntry> {
    match store.top_trending(limit).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load trending searches");
            Vec::new()
        }
    }
}

/// [`load_trending`] sized by the configured limit.
pub async fn load_top_trending(store: &dyn TrendingStore, config: &Config) -> Vec<TrendingEntry> {
    load_trending(store, config.trending_limit).await
}
