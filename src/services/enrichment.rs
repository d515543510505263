//! Trailer enrichment for the movie detail view
//!
//! Three sequential stages per movie id: locate an official trailer in the
//! provider's video list, make sure the embed-player script is available,
//! then measure the trailer's playback duration through an off-screen
//! player. The later stages short-circuit to "no trailer" or "no duration"
//! without failing the detail fetch; only the locate stage's transport
//! failure propagates.

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Trailer, VideoEntry},
    services::{
        player::{PlayerError, PlayerRuntime},
        providers::MetadataProvider,
    },
};

const TRAILER_SITE: &str = "YouTube";
const TRAILER_KIND: &str = "Trailer";
const TRAILER_NAME: &str = "Official Trailer";
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

pub struct TrailerEnricher {
    metadata: Arc<dyn MetadataProvider>,
    runtime: Arc<dyn PlayerRuntime>,
}

impl TrailerEnricher {
    pub fn new(metadata: Arc<dyn MetadataProvider>, runtime: Arc<dyn PlayerRuntime>) -> Self {
        Self { metadata, runtime }
    }

    /// Locates the official trailer for a movie and measures its duration.
    ///
    /// Returns `Ok(None)` when the movie has no official trailer. Returns a
    /// trailer without duration fields when the player lookup fails; that is
    /// a degraded result, not an error. Only a failure to fetch the video
    /// list itself propagates.
    pub async fn enrich(&self, movie_id: u64) -> AppResult<Option<Trailer>> {
        let videos = self.metadata.movie_videos(movie_id).await?;

        let Some(video) = videos.into_iter().find(is_official_trailer) else {
            return Ok(None);
        };

        let mut trailer = Trailer {
            url: format!("{}{}", WATCH_URL_BASE, video.key),
            key: video.key,
            duration_seconds: None,
            duration_formatted: None,
        };

        match self.measure(&trailer.key).await {
            Ok(seconds) => {
                trailer.duration_seconds = Some(seconds.max(0.0).floor() as u64);
                trailer.duration_formatted = Some(format_duration(seconds));
            }
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    video_key = %trailer.key,
                    error = %e,
                    "Trailer duration unavailable"
                );
            }
        }

        Ok(Some(trailer))
    }

    async fn measure(&self, video_key: &str) -> Result<f64, PlayerError> {
        self.runtime.ensure_loaded().await?;
        let player = self.runtime.create_player(video_key).await?;
        player.duration_seconds().await
    }
}

fn is_official_trailer(video: &VideoEntry) -> bool {
    video.site == TRAILER_SITE && video.kind == TRAILER_KIND && video.name == TRAILER_NAME
}

/// Formats a duration as `H:MM:SS` at an hour or more, else `M:SS`.
pub fn format_duration(total_seconds: f64) -> String {
    let total = total_seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
