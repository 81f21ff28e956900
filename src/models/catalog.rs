use std::{fs::File, io::BufReader, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{AnimeId, ArtifactKind, ItemTable, RecommendationKind, SimilarityMatrix},
};

/// Immutable recommendation context: both tables and their aligned matrices.
///
/// Built once at startup and shared behind an `Arc` by every resolver.
#[derive(Debug)]
pub struct Catalog {
    anime: ItemTable,
    user_anchors: ItemTable,
    item_similarity: SimilarityMatrix,
    user_similarity: SimilarityMatrix,
}

impl Catalog {
    /// Assembles a catalog, checking that each table is index-aligned with its matrix
    pub fn new(
        anime: ItemTable,
        user_anchors: ItemTable,
        item_similarity: SimilarityMatrix,
        user_similarity: SimilarityMatrix,
    ) -> AppResult<Self> {
        check_alignment(ArtifactKind::AnimeTable, &anime, &item_similarity)?;
        check_alignment(ArtifactKind::UserAnchorTable, &user_anchors, &user_similarity)?;

        Ok(Self {
            anime,
            user_anchors,
            item_similarity,
            user_similarity,
        })
    }

    /// Parses the four artifacts from `dir`
    pub fn load(dir: &Path) -> AppResult<Self> {
        let anime = load_table(&dir.join(ArtifactKind::AnimeTable.file_name()))?;
        let user_anchors = load_table(&dir.join(ArtifactKind::UserAnchorTable.file_name()))?;
        let item_similarity = load_matrix(&dir.join(ArtifactKind::ItemSimilarity.file_name()))?;
        let user_similarity = load_matrix(&dir.join(ArtifactKind::UserSimilarity.file_name()))?;

        let catalog = Self::new(anime, user_anchors, item_similarity, user_similarity)?;

        tracing::info!(
            anime = catalog.anime.len(),
            user_anchors = catalog.user_anchors.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// The table the selection control is populated from
    pub fn anime(&self) -> &ItemTable {
        &self.anime
    }

    pub fn user_anchors(&self) -> &ItemTable {
        &self.user_anchors
    }

    pub fn table(&self, kind: RecommendationKind) -> &ItemTable {
        match kind {
            RecommendationKind::Content => &self.anime,
            RecommendationKind::Collaborative => &self.user_anchors,
        }
    }

    pub fn matrix(&self, kind: RecommendationKind) -> &SimilarityMatrix {
        match kind {
            RecommendationKind::Content => &self.item_similarity,
            RecommendationKind::Collaborative => &self.user_similarity,
        }
    }

    /// Display name for an id: anime table first, then the user-anchor table
    pub fn display_name(&self, anime_id: AnimeId) -> String {
        self.anime
            .find_by_id(anime_id)
            .or_else(|| self.user_anchors.find_by_id(anime_id))
            .map(|item| item.name.clone())
            .unwrap_or_else(|| anime_id.to_string())
    }
}

fn check_alignment(
    kind: ArtifactKind,
    table: &ItemTable,
    matrix: &SimilarityMatrix,
) -> AppResult<()> {
    if table.len() != matrix.dim() {
        return Err(AppError::Artifact(format!(
            "{} has {} rows but its similarity matrix is {} x {}",
            kind.file_name(),
            table.len(),
            matrix.dim(),
            matrix.dim()
        )));
    }
    Ok(())
}

fn load_table(path: &Path) -> AppResult<ItemTable> {
    let file = File::open(path).map_err(|e| {
        AppError::Artifact(format!("cannot open {}: {}", path.display(), e))
    })?;
    ItemTable::from_csv(BufReader::new(file))
}

fn load_matrix(path: &Path) -> AppResult<SimilarityMatrix> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::Artifact(format!("cannot read {}: {}", path.display(), e))
    })?;
    let matrix = SimilarityMatrix::from_bytes(&bytes)?;

    tracing::debug!(path = %path.display(), dim = matrix.dim(), "Similarity matrix decoded");

    Ok(matrix)
}
