use crate::{
    error::{AppError, AppResult},
    models::{AnimeId, RecommendationKind, RecommendationsResponse, RecommendedTitle},
    services::{posters::PosterResolver, recommendations::Recommender},
};

/// Turns a chosen title into display-ready entries (name + poster).
///
/// Keeps HTTP routing free of lookup and fetch orchestration.
#[derive(Clone)]
pub struct Gallery {
    recommender: Recommender,
    posters: PosterResolver,
}

impl Gallery {
    pub fn new(recommender: Recommender, posters: PosterResolver) -> Self {
        Self {
            recommender,
            posters,
        }
    }

    /// Names for the selection control, in table order
    pub fn titles(&self) -> Vec<String> {
        self.recommender
            .catalog()
            .anime()
            .iter()
            .map(|item| item.name.clone())
            .collect()
    }

    /// The chosen title with its poster
    pub async fn chosen(&self, title: &str) -> AppResult<RecommendedTitle> {
        let anime_id = self.chosen_id(title)?;
        let poster_url = self.posters.resolve(anime_id).await;

        Ok(RecommendedTitle {
            anime_id,
            name: title.to_string(),
            poster_url,
        })
    }

    /// One recommendation list with posters
    pub async fn recommendations_for(
        &self,
        kind: RecommendationKind,
        title: &str,
    ) -> AppResult<Vec<RecommendedTitle>> {
        let title = validate_title(title)?;
        let ids = self.recommender.recommend(kind, title).await?;
        Ok(self.decorate(&ids).await)
    }

    /// The chosen title plus both recommendation lists.
    ///
    /// The chosen poster is looked up first, then the posters of both lists
    /// concurrently.
    pub async fn recommendations(&self, title: &str) -> AppResult<RecommendationsResponse> {
        let chosen = self.chosen(title).await?;

        let similar_ids = self
            .recommender
            .recommend(RecommendationKind::Content, &chosen.name)
            .await?;
        let liked_ids = self
            .recommender
            .recommend(RecommendationKind::Collaborative, &chosen.name)
            .await?;

        let all_ids: Vec<AnimeId> = similar_ids.iter().chain(liked_ids.iter()).copied().collect();
        let mut entries = self.decorate(&all_ids).await;
        let users_also_liked = entries.split_off(similar_ids.len());

        tracing::info!(
            title = %chosen.name,
            similar = entries.len(),
            users_also_liked = users_also_liked.len(),
            "Recommendations assembled"
        );

        Ok(RecommendationsResponse {
            chosen,
            similar: entries,
            users_also_liked,
        })
    }

    fn chosen_id(&self, title: &str) -> AppResult<AnimeId> {
        let title = validate_title(title)?;
        self.recommender
            .catalog()
            .anime()
            .find_by_name(title)
            .map(|item| item.anime_id)
            .ok_or_else(|| AppError::NotFound(format!("'{}' is not in the anime table", title)))
    }

    async fn decorate(&self, ids: &[AnimeId]) -> Vec<RecommendedTitle> {
        let catalog = self.recommender.catalog();
        let posters = self.posters.resolve_many(ids).await;

        ids.iter()
            .zip(posters)
            .map(|(&anime_id, poster_url)| RecommendedTitle {
                anime_id,
                name: catalog.display_name(anime_id),
                poster_url,
            })
            .collect()
    }
}

fn validate_title(title: &str) -> AppResult<&str> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }
    Ok(title)
}
