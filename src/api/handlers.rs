use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationKind, RecommendationsResponse, RecommendedTitle},
};

use super::page::{self, PageView};
use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub title: Option<String>,
    #[serde(default)]
    pub recommend: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// All selectable titles, in table order
pub async fn list_titles(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.gallery.titles())
}

/// The chosen title with its poster
pub async fn chosen_poster(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<RecommendedTitle>> {
    let chosen = state.gallery.chosen(&query.title).await?;
    Ok(Json(chosen))
}

/// Both recommendation lists for a title
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    tracing::info!(
        request_id = %request_id,
        title = %query.title,
        "Processing recommendation request"
    );

    let response = state.gallery.recommendations(&query.title).await?;
    Ok(Json(response))
}

/// A single recommendation list (`content` or `collaborative`)
pub async fn recommendations_by_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<Vec<RecommendedTitle>>> {
    let kind: RecommendationKind = kind.parse()?;
    let list = state.gallery.recommendations_for(kind, &query.title).await?;
    Ok(Json(list))
}

/// The interactive page
pub async fn index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<PageQuery>,
) -> Response {
    let titles = state.gallery.titles();

    let Some(title) = query.title.as_deref() else {
        return Html(page::render(&PageView {
            titles: &titles,
            ..Default::default()
        }))
        .into_response();
    };

    let outcome = if query.recommend {
        state
            .gallery
            .recommendations(title)
            .await
            .map(|recs| (None, Some(recs)))
    } else {
        state.gallery.chosen(title).await.map(|chosen| (Some(chosen), None))
    };

    match outcome {
        Ok((chosen, recs)) => Html(page::render(&PageView {
            titles: &titles,
            selected: Some(title),
            chosen: chosen.as_ref(),
            recommendations: recs.as_ref(),
            error: None,
        }))
        .into_response(),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, error = %e, "Page request failed");
            } else {
                tracing::info!(request_id = %request_id, title = %title, error = %e, "Page request rejected");
            }

            let message = e.client_message();
            let html = page::render(&PageView {
                titles: &titles,
                selected: Some(title),
                error: Some(&message),
                ..Default::default()
            });
            (status, Html(html)).into_response()
        }
    }
}
