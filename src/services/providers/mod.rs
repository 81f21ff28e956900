/// Poster metadata provider abstraction
///
/// This module provides a pluggable seam for the third-party service that maps an
/// anime id to its display image. The Jikan (MyAnimeList) API is the only
/// implementation today.
use crate::{error::AppResult, models::AnimeId};

pub mod jikan;

pub use jikan::JikanProvider;

/// Outcome of a poster lookup that reached the provider and got an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterLookup {
    /// The provider returned an image URL
    Found(String),
    /// The provider knows no image for this id
    Missing,
}

/// Trait for poster providers
///
/// `Ok` distinguishes found from missing; `Err` is reserved for lookups that failed
/// (network error, unexpected status, unparseable body).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Look up the display image for one anime
    async fn lookup_poster(&self, anime_id: AnimeId) -> AppResult<PosterLookup>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
