use std::sync::Arc;

use crate::{
    cache::{CacheKey, MemoCache},
    cached,
    error::{AppError, AppResult},
    models::{AnimeId, Catalog, RecommendationKind},
    services::neighbors::top_neighbors,
};

/// Resolves a chosen title into the ids of its top-K neighbors.
///
/// Results are memoized per (kind, title) for the process lifetime.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    top_k: usize,
    cache: MemoCache<CacheKey, Vec<AnimeId>>,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, top_k: usize) -> Self {
        Self {
            catalog,
            top_k,
            cache: MemoCache::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Ids similar to `title` under the given similarity kind, best first.
    ///
    /// Fails with `NotFound` when `title` is absent from the kind's table.
    pub async fn recommend(&self, kind: RecommendationKind, title: &str) -> AppResult<Vec<AnimeId>> {
        cached!(
            self.cache,
            CacheKey::Recommendations(kind, title.to_string()),
            async { self.compute(kind, title) }
        )
    }

    fn compute(&self, kind: RecommendationKind, title: &str) -> AppResult<Vec<AnimeId>> {
        let table = self.catalog.table(kind);
        let position = table.position_of(title).ok_or_else(|| {
            AppError::NotFound(format!("'{}' is not in the {} table", title, kind))
        })?;

        let row = self.catalog.matrix(kind).row(position).ok_or_else(|| {
            AppError::Internal(format!("no similarity row {} for {} table", position, kind))
        })?;

        let ids = top_neighbors(row, self.top_k)
            .iter()
            .map(|neighbor| table.id_at(neighbor.index))
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!(
            title = %title,
            kind = %kind,
            row = position,
            results = ids.len(),
            "Recommendations computed"
        );

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, ItemTable, SimilarityMatrix};

    fn create_test_recommender(top_k: usize) -> Recommender {
        let anime = ItemTable::new(vec![
            Item::new(1, "Cowboy Bebop"),
            Item::new(5, "Cowboy Bebop: Tengoku no Tobira"),
            Item::new(6, "Trigun"),
            Item::new(30, "Neon Genesis Evangelion"),
        ]);
        let item_similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.6, 0.3],
            vec![0.9, 1.0, 0.2, 0.1],
            vec![0.6, 0.2, 1.0, 0.5],
            vec![0.3, 0.1, 0.5, 1.0],
        ])
        .unwrap();

        let user_anchors = ItemTable::new(vec![
            Item::new(30, "Neon Genesis Evangelion"),
            Item::new(1, "Cowboy Bebop"),
            Item::new(6, "Trigun"),
        ]);
        let user_similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.4, 0.7],
            vec![0.4, 1.0, 0.8],
            vec![0.7, 0.8, 1.0],
        ])
        .unwrap();

        let catalog = Catalog::new(anime, user_anchors, item_similarity, user_similarity).unwrap();
        Recommender::new(Arc::new(catalog), top_k)
    }

    #[tokio::test]
    async fn test_content_recommendations() {
        let recommender = create_test_recommender(5);

        let ids = recommender
            .recommend(RecommendationKind::Content, "Cowboy Bebop")
            .await
            .unwrap();

        assert_eq!(ids, vec![AnimeId(5), AnimeId(6), AnimeId(30)]);
    }

    #[tokio::test]
    async fn test_collaborative_uses_user_anchor_table() {
        let recommender = create_test_recommender(5);

        let ids = recommender
            .recommend(RecommendationKind::Collaborative, "Cowboy Bebop")
            .await
            .unwrap();

        // Row 1 of the user matrix, ids from the user-anchor table
        assert_eq!(ids, vec![AnimeId(6), AnimeId(30)]);
    }

    #[tokio::test]
    async fn test_respects_top_k() {
        let recommender = create_test_recommender(1);

        let ids = recommender
            .recommend(RecommendationKind::Content, "Trigun")
            .await
            .unwrap();

        assert_eq!(ids, vec![AnimeId(1)]);
    }

    #[tokio::test]
    async fn test_unknown_title_is_not_found() {
        let recommender = create_test_recommender(5);

        let result = recommender
            .recommend(RecommendationKind::Content, "Naruto")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(recommender.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_title_only_in_anime_table_is_not_found_for_collaborative() {
        let recommender = create_test_recommender(5);

        let result = recommender
            .recommend(
                RecommendationKind::Collaborative,
                "Cowboy Bebop: Tengoku no Tobira",
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_idempotent_and_memoized() {
        let recommender = create_test_recommender(5);

        let first = recommender
            .recommend(RecommendationKind::Content, "Neon Genesis Evangelion")
            .await
            .unwrap();
        let second = recommender
            .recommend(RecommendationKind::Content, "Neon Genesis Evangelion")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(recommender.cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_kinds_are_cached_separately() {
        let recommender = create_test_recommender(5);

        recommender
            .recommend(RecommendationKind::Content, "Trigun")
            .await
            .unwrap();
        recommender
            .recommend(RecommendationKind::Collaborative, "Trigun")
            .await
            .unwrap();

        assert_eq!(recommender.cache.len().await, 2);
    }
}
