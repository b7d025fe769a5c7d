//! CRUD operations for the article store

use chrono::Utc;
use uuid::Uuid;

use crate::types::Article;

use super::{ArticleStore, StoreError};

/// Input for a create
#[derive(Clone, Debug, Default)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub files: Vec<String>,
}

/// Input for an update; `None` keeps the current value
#[derive(Clone, Debug, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Replacement file list; `None` keeps the existing attachments
    pub files: Option<Vec<String>>,
}

/// Create a new article (holds the collection lock during the entire operation)
pub fn create(store: &ArticleStore, new: NewArticle) -> Result<Article, StoreError> {
    if new.title.trim().is_empty() || new.content.trim().is_empty() {
        return Err(StoreError::MissingFields);
    }

    let now = Utc::now().timestamp();
    let article = Article {
        id: Uuid::new_v4().to_string(),
        title: new.title,
        content: new.content,
        files: new.files,
        created_at: now,
        updated_at: now,
    };

    let mut articles = store.articles.lock();
    store.persist(&article)?;
    articles.push(article.clone());

    Ok(article)
}

/// Update an existing article (holds the collection lock during the entire operation)
pub fn update(store: &ArticleStore, id: &str, patch: ArticlePatch) -> Result<Article, StoreError> {
    if matches!(&patch.title, Some(t) if t.trim().is_empty())
        || matches!(&patch.content, Some(c) if c.trim().is_empty())
    {
        return Err(StoreError::MissingFields);
    }

    let mut articles = store.articles.lock();
    let article = articles
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    if let Some(title) = patch.title {
        article.title = title;
    }
    if let Some(content) = patch.content {
        article.content = content;
    }
    if let Some(files) = patch.files {
        article.files = files;
    }
    article.updated_at = Utc::now().timestamp();

    let snapshot = article.clone();
    store.persist(&snapshot)?;

    Ok(snapshot)
}

/// Delete an article and its document (holds the collection lock during the entire operation)
pub fn delete(store: &ArticleStore, id: &str) -> Result<(), StoreError> {
    let mut articles = store.articles.lock();
    let pos = articles
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    match std::fs::remove_file(store.document_path(id)) {
        Ok(()) => {}
        // Already gone on disk; the in-memory entry still has to go.
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    articles.remove(pos);

    Ok(())
}
