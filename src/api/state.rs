use std::sync::Arc;

use reqwest::Client as HttpClient;

use crate::config::Config;
use crate::models::Catalog;
use crate::services::providers::{JikanProvider, PosterProvider};
use crate::services::{Gallery, PosterResolver, Recommender};

/// Shared application state
///
/// Everything inside is either immutable (the catalog) or internally
/// synchronized (the memo caches), so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub gallery: Gallery,
}

impl AppState {
    /// Creates the state from a loaded catalog and a poster provider
    pub fn new(
        catalog: Arc<Catalog>,
        poster_provider: Arc<dyn PosterProvider>,
        top_k: usize,
        placeholder_url: String,
    ) -> Self {
        let recommender = Recommender::new(catalog, top_k);
        let posters = PosterResolver::new(poster_provider, placeholder_url);

        Self {
            gallery: Gallery::new(recommender, posters),
        }
    }

    /// Wires the Jikan provider according to configuration
    pub fn from_config(config: &Config, catalog: Arc<Catalog>, http_client: HttpClient) -> Self {
        let provider = JikanProvider::new(http_client, config.poster_api_url.clone());

        Self::new(
            catalog,
            Arc::new(provider),
            config.top_k,
            config.placeholder_poster_url.clone(),
        )
    }
}
