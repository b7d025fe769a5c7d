//! Article endpoints
//!
//! Every successful mutation broadcasts exactly one event, after the store
//! has committed the change to disk.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::api::websocket::state::AppState;
use crate::store::{ArticlePatch, FileError, NewArticle, StoreError};
use crate::types::ArticleEvent;

use super::ApiError;

/// JSON request body for creates and updates
#[derive(Debug, Default, Deserialize)]
struct ArticleBody {
    title: Option<String>,
    content: Option<String>,
}

/// Fields accepted by both JSON and multipart payloads
#[derive(Debug, Default)]
struct ArticlePayload {
    title: Option<String>,
    content: Option<String>,
    /// Stored identifiers of files uploaded with this request
    files: Option<Vec<String>>,
}

/// GET /articles - List all articles in display order
pub async fn list_articles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.list())
}

/// GET /articles/:id - Get a single article
pub async fn get_article(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.store.get(&id) {
        Some(article) => Json(article).into_response(),
        None => store_error_response(StoreError::NotFound(id)),
    }
}

/// POST /articles - Create an article, with optional file attachments
pub async fn create_article(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let payload = match read_payload(&state, req).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let new = NewArticle {
        title: payload.title.unwrap_or_default(),
        content: payload.content.unwrap_or_default(),
        files: payload.files.unwrap_or_default(),
    };

    match state.store.create(new) {
        Ok(article) => {
            state.broadcaster.broadcast(&ArticleEvent::ArticleCreated {
                article: article.clone(),
            });
            (StatusCode::CREATED, Json(article)).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

/// PUT /articles/:id - Update an article; absent fields keep current values
pub async fn update_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    req: Request,
) -> Response {
    let payload = match read_payload(&state, req).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let patch = ArticlePatch {
        title: payload.title,
        content: payload.content,
        files: payload.files,
    };

    match state.store.update(&id, patch) {
        Ok(article) => {
            state.broadcaster.broadcast(&ArticleEvent::ArticleUpdated {
                article: article.clone(),
            });
            Json(article).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

/// DELETE /articles/:id - Delete an article
pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.delete(&id) {
        Ok(()) => {
            state
                .broadcaster
                .broadcast(&ArticleEvent::ArticleDeleted { id: id.clone() });
            Json(serde_json::json!({ "deleted": id })).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

/// Parse a JSON or multipart request into one payload shape.
///
/// Multipart file parts are validated and stored here, before the article
/// mutation runs; a rejected upload fails the request with no side effects
/// on the article collection.
async fn read_payload(state: &AppState, req: Request) -> Result<ArticlePayload, Response> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.starts_with("multipart/form-data") {
        let Json(body) = Json::<ArticleBody>::from_request(req, &())
            .await
            .map_err(|err| bad_request(err.to_string()))?;
        return Ok(ArticlePayload {
            title: body.title,
            content: body.content,
            files: None,
        });
    }

    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|err| bad_request(err.to_string()))?;

    let mut payload = ArticlePayload::default();
    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| bad_request(err.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => {
                payload.title = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| bad_request(err.to_string()))?,
                );
            }
            Some("content") => {
                payload.content = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| bad_request(err.to_string()))?,
                );
            }
            Some("files") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| bad_request(err.to_string()))?;

                match state.files.save(&file_name, &mime, &bytes) {
                    Ok(stored) => uploaded.push(stored),
                    Err(FileError::UnsupportedType(t)) => {
                        return Err(bad_request(format!("unsupported attachment type '{t}'")));
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "attachment storage failure");
                        return Err((
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(ApiError::internal("attachment storage failure")),
                        )
                            .into_response());
                    }
                }
            }
            _ => {}
        }
    }

    if !uploaded.is_empty() {
        payload.files = Some(uploaded);
    }
    Ok(payload)
}

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message))).into_response()
}

fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::not_found(format!("Article '{id}' not found"))),
        )
            .into_response(),
        StoreError::MissingFields => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request("title and content are required")),
        )
            .into_response(),
        err => {
            tracing::error!(error = %err, "article store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal("article store failure")),
            )
                .into_response()
        }
    }
}
