//! Movie metadata provider abstraction
//!
//! The orchestrators and the trailer enricher talk to the metadata API
//! through this trait so they can be exercised against mocks. The production
//! implementation is [`tmdb::TmdbProvider`].

use crate::{
    error::AppResult,
    models::{MovieDetail, MovieSummary, VideoEntry},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
///
/// Covers the three read paths the discovery UI needs: list queries (search
/// and discover share one operation, routed on the emptiness of the term),
/// the single-movie detail record, and the video list used to locate an
/// official trailer.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Searches for movies by term.
    ///
    /// An empty term means discover/popular mode. An empty result list is a
    /// valid outcome, not an error.
    async fn search_movies(&self, term: &str) -> AppResult<Vec<MovieSummary>>;

    /// Fetches the full record for a single movie.
    async fn movie_detail(&self, movie_id: u64) -> AppResult<MovieDetail>;

    /// Lists the videos published for a movie.
    async fn movie_videos(&self, movie_id: u64) -> AppResult<Vec<VideoEntry>>;
}
