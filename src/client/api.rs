//! REST client for the article CRUD surface
//!
//! Mutations return the committed snapshot, which callers feed through the
//! same [`ArticleCache::apply`](super::ArticleCache::apply) rules as pushed
//! events so optimistic local application and server echoes converge.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::types::Article;

/// Client-side request errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// One attachment to upload with a create or update
#[derive(Clone, Debug)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fields to change in an update; `None` keeps the current value
#[derive(Clone, Debug, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Typed client for the article endpoints
#[derive(Clone)]
pub struct ArticleApi {
    base_url: String,
    http: reqwest::Client,
}

impl ArticleApi {
    /// Client for a server at `base_url` (e.g. `http://localhost:3000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Authoritative read of the whole collection; this is the recovery path
    /// after a connection gap.
    pub async fn list(&self) -> Result<Vec<Article>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/articles", self.base_url))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<Article, ClientError> {
        let resp = self
            .http
            .get(format!("{}/articles/{id}", self.base_url))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn create(
        &self,
        title: &str,
        content: &str,
        attachments: Vec<Attachment>,
    ) -> Result<Article, ClientError> {
        let url = format!("{}/articles", self.base_url);
        let resp = if attachments.is_empty() {
            self.http
                .post(url)
                .json(&serde_json::json!({ "title": title, "content": content }))
                .send()
                .await?
        } else {
            self.http
                .post(url)
                .multipart(Self::form(Some(title), Some(content), attachments)?)
                .send()
                .await?
        };
        Self::parse(resp).await
    }

    pub async fn update(
        &self,
        id: &str,
        changes: ArticleChanges,
        attachments: Vec<Attachment>,
    ) -> Result<Article, ClientError> {
        let url = format!("{}/articles/{id}", self.base_url);
        let resp = if attachments.is_empty() {
            let mut body = serde_json::Map::new();
            if let Some(title) = changes.title {
                body.insert("title".to_string(), title.into());
            }
            if let Some(content) = changes.content {
                body.insert("content".to_string(), content.into());
            }
            self.http.put(url).json(&body).send().await?
        } else {
            self.http
                .put(url)
                .multipart(Self::form(
                    changes.title.as_deref(),
                    changes.content.as_deref(),
                    attachments,
                )?)
                .send()
                .await?
        };
        Self::parse(resp).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(format!("{}/articles/{id}", self.base_url))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(resp).await)
        }
    }

    fn form(
        title: Option<&str>,
        content: Option<&str>,
        attachments: Vec<Attachment>,
    ) -> Result<reqwest::multipart::Form, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        if let Some(title) = title {
            form = form.text("title", title.to_string());
        }
        if let Some(content) = content {
            form = form.text("content", content.to_string());
        }
        for attachment in attachments {
            let part = reqwest::multipart::Part::bytes(attachment.bytes)
                .file_name(attachment.file_name)
                .mime_str(&attachment.content_type)?;
            form = form.part("files", part);
        }
        Ok(form)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Self::status_error(resp).await)
        }
    }

    async fn status_error(resp: reqwest::Response) -> ClientError {
        let status = resp.status();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        ClientError::Status { status, message }
    }
}
