use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod anime;
pub mod catalog;
pub mod similarity;

pub use anime::{AnimeId, Item, ItemTable};
pub use catalog::Catalog;
pub use similarity::SimilarityMatrix;

/// Which precomputed similarity the recommendation is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Item-attribute similarity (anime table + similarity matrix)
    Content,
    /// Users who liked this title also liked (user-anchor table + user similarity matrix)
    Collaborative,
}

impl Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationKind::Content => write!(f, "content"),
            RecommendationKind::Collaborative => write!(f, "collaborative"),
        }
    }
}

impl FromStr for RecommendationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(RecommendationKind::Content),
            "collaborative" => Ok(RecommendationKind::Collaborative),
            other => Err(AppError::InvalidInput(format!(
                "Unknown recommendation kind: {}",
                other
            ))),
        }
    }
}

/// The four precomputed artifacts and their fixed local file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    AnimeTable,
    UserAnchorTable,
    ItemSimilarity,
    UserSimilarity,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::AnimeTable,
        ArtifactKind::UserAnchorTable,
        ArtifactKind::ItemSimilarity,
        ArtifactKind::UserSimilarity,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::AnimeTable => "anime.csv",
            ArtifactKind::UserAnchorTable => "user_anchors.csv",
            ArtifactKind::ItemSimilarity => "similarity.bin",
            ArtifactKind::UserSimilarity => "user_similarity.bin",
        }
    }
}

/// A title ready for display: id, name and resolved poster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedTitle {
    pub anime_id: AnimeId,
    pub name: String,
    pub poster_url: String,
}

/// Both recommendation lists for a chosen title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub chosen: RecommendedTitle,
    pub similar: Vec<RecommendedTitle>,
    pub users_also_liked: Vec<RecommendedTitle>,
}

// ============================================================================
// Jikan API Types
// ============================================================================

/// Envelope of GET /anime/{id}. Every level is optional; absence anywhere means
/// the API has no poster for the id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanAnimeResponse {
    #[serde(default)]
    pub data: Option<JikanAnime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanAnime {
    #[serde(default)]
    pub images: Option<JikanImages>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
}

impl JikanAnimeResponse {
    /// `data.images.jpg.image_url`, if every level is present
    pub fn image_url(self) -> Option<String> {
        self.data?.images?.jpg?.image_url
    }
}
