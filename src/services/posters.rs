use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    cache::MemoCache,
    models::AnimeId,
    services::providers::{PosterLookup, PosterProvider},
};

/// Maps anime ids to display image URLs.
///
/// Found and missing posters are memoized; a missing poster becomes the
/// placeholder. Lookup errors are logged, answered with the placeholder and left
/// uncached so a later request retries.
#[derive(Clone)]
pub struct PosterResolver {
    provider: Arc<dyn PosterProvider>,
    placeholder_url: String,
    cache: MemoCache<AnimeId, String>,
}

impl PosterResolver {
    pub fn new(provider: Arc<dyn PosterProvider>, placeholder_url: String) -> Self {
        Self {
            provider,
            placeholder_url,
            cache: MemoCache::new(),
        }
    }

    /// Poster URL for one id; never fails
    pub async fn resolve(&self, anime_id: AnimeId) -> String {
        if let Some(url) = self.cache.get(&anime_id).await {
            return url;
        }

        match self.provider.lookup_poster(anime_id).await {
            Ok(PosterLookup::Found(url)) => {
                self.cache.insert(anime_id, url.clone()).await;
                url
            }
            Ok(PosterLookup::Missing) => {
                self.cache
                    .insert(anime_id, self.placeholder_url.clone())
                    .await;
                self.placeholder_url.clone()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    anime_id = %anime_id,
                    provider = self.provider.name(),
                    "Poster lookup failed, using placeholder"
                );
                self.placeholder_url.clone()
            }
        }
    }

    /// Poster URLs for several ids, fetched concurrently, in input order.
    ///
    /// Repeated ids share one lookup.
    pub async fn resolve_many(&self, anime_ids: &[AnimeId]) -> Vec<String> {
        let mut distinct = HashSet::with_capacity(anime_ids.len());
        let mut tasks = Vec::with_capacity(anime_ids.len());

        for &anime_id in anime_ids {
            if !distinct.insert(anime_id) {
                continue;
            }
            let resolver = self.clone();
            let task = tokio::spawn(async move { resolver.resolve(anime_id).await });
            tasks.push((anime_id, task));
        }

        let mut resolved = HashMap::with_capacity(tasks.len());
        for (anime_id, task) in tasks {
            let url = match task.await {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!(error = %e, anime_id = %anime_id, "Poster task join error");
                    self.placeholder_url.clone()
                }
            };
            resolved.insert(anime_id, url);
        }

        anime_ids
            .iter()
            .map(|anime_id| {
                resolved
                    .get(anime_id)
                    .cloned()
                    .unwrap_or_else(|| self.placeholder_url.clone())
            })
            .collect()
    }
}
