/// Jikan API provider
///
/// Unofficial MyAnimeList REST API. One GET per lookup:
/// `/anime/{id}` → `data.images.jpg.image_url`.
///
/// No authentication, retry or rate-limit handling. A 404 means the id is
/// unknown and maps to `PosterLookup::Missing`.
use crate::{
    error::{AppError, AppResult},
    models::{AnimeId, JikanAnimeResponse},
    services::providers::{PosterLookup, PosterProvider},
};
use reqwest::{Client as HttpClient, StatusCode};

#[derive(Clone)]
pub struct JikanProvider {
    http_client: HttpClient,
    api_url: String,
}

impl JikanProvider {
    pub fn new(http_client: HttpClient, api_url: String) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn anime_url(&self, anime_id: AnimeId) -> String {
        format!("{}/anime/{}", self.api_url, anime_id)
    }
}

/// Extracts the poster from a Jikan response body
pub fn parse_poster_response(body: &str) -> AppResult<PosterLookup> {
    let response: JikanAnimeResponse = serde_json::from_str(body)
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse Jikan response: {}", e)))?;

    Ok(match response.image_url() {
        Some(url) => PosterLookup::Found(url),
        None => PosterLookup::Missing,
    })
}

#[async_trait::async_trait]
impl PosterProvider for JikanProvider {
    async fn lookup_poster(&self, anime_id: AnimeId) -> AppResult<PosterLookup> {
        let url = self.anime_url(anime_id);
        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(anime_id = %anime_id, provider = "jikan", "Anime unknown to provider");
            return Ok(PosterLookup::Missing);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Jikan API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let lookup = parse_poster_response(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                anime_id = %anime_id,
                response = %body,
                "Failed to deserialize Jikan response"
            );
            e
        })?;

        tracing::info!(
            anime_id = %anime_id,
            found = matches!(lookup, PosterLookup::Found(_)),
            provider = "jikan",
            "Poster looked up"
        );

        Ok(lookup)
    }

    fn name(&self) -> &'static str {
        "jikan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    fn create_test_provider() -> JikanProvider {
        JikanProvider::new(reqwest::Client::new(), "http://test.local/v4/".to_string())
    }

    #[test]
    fn test_anime_url() {
        let provider = create_test_provider();
        assert_eq!(provider.anime_url(AnimeId(5114)), "http://test.local/v4/anime/5114");
    }

    #[test]
    fn test_parse_found() {
        let body = r#"{
            "data": {
                "mal_id": 1535,
                "title": "Death Note",
                "images": {
                    "jpg": { "image_url": "https://cdn.myanimelist.net/images/anime/9/9453.jpg" },
                    "webp": { "image_url": "https://cdn.myanimelist.net/images/anime/9/9453.webp" }
                }
            }
        }"#;

        assert_eq!(
            parse_poster_response(body).unwrap(),
            PosterLookup::Found("https://cdn.myanimelist.net/images/anime/9/9453.jpg".to_string())
        );
    }

    #[test]
    fn test_parse_missing_data_key() {
        let body = r#"{
            "status": 404,
            "type": "BadResponseException",
            "message": "Resource does not exist",
            "error": "404 on https://myanimelist.net/anime/99999999/"
        }"#;

        assert_eq!(parse_poster_response(body).unwrap(), PosterLookup::Missing);
    }

    #[test]
    fn test_parse_null_image_url() {
        let body = r#"{ "data": { "images": { "jpg": { "image_url": null } } } }"#;
        assert_eq!(parse_poster_response(body).unwrap(), PosterLookup::Missing);
    }

    #[test]
    fn test_parse_malformed_body_is_error() {
        let result = parse_poster_response("<html>rate limited</html>");
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(create_test_provider().name(), "jikan");
    }

    async fn spawn_upstream() -> String {
        let router = Router::new()
            .route(
                "/v4/anime/1",
                get(|| async {
                    Json(json!({
                        "data": { "images": { "jpg": { "image_url": "https://cdn.local/1.jpg" } } }
                    }))
                }),
            )
            .route("/v4/anime/2", get(|| async { Json(json!({ "data": {} })) }))
            .route(
                "/v4/anime/500",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
            )
            .route(
                "/v4/anime/429",
                get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v4", addr)
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let provider = JikanProvider::new(reqwest::Client::new(), spawn_upstream().await);
        assert_eq!(
            provider.lookup_poster(AnimeId(1)).await.unwrap(),
            PosterLookup::Found("https://cdn.local/1.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_lookup_without_image_is_missing() {
        let provider = JikanProvider::new(reqwest::Client::new(), spawn_upstream().await);
        assert_eq!(
            provider.lookup_poster(AnimeId(2)).await.unwrap(),
            PosterLookup::Missing
        );
    }

    #[tokio::test]
    async fn test_lookup_404_is_missing() {
        let provider = JikanProvider::new(reqwest::Client::new(), spawn_upstream().await);
        assert_eq!(
            provider.lookup_poster(AnimeId(99999)).await.unwrap(),
            PosterLookup::Missing
        );
    }

    #[tokio::test]
    async fn test_lookup_other_statuses_are_errors() {
        let provider = JikanProvider::new(reqwest::Client::new(), spawn_upstream().await);

        let server_error = provider.lookup_poster(AnimeId(500)).await;
        assert!(matches!(server_error, Err(AppError::ExternalApi(_))));

        let rate_limited = provider.lookup_poster(AnimeId(429)).await;
        assert!(matches!(rate_limited, Err(AppError::ExternalApi(_))));
    }
}
