//! Article store - file-backed CRUD engine
//!
//! Articles live in an ordered in-memory collection guarded by a mutex and
//! are persisted as one JSON document per article under the data directory.
//! Display order is creation order: creations append, updates keep position,
//! deletions remove.

mod crud;
mod files;

pub use crud::{ArticlePatch, NewArticle};
pub use files::{FileError, FileStore, ALLOWED_UPLOAD_TYPES};

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::Article;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("article '{0}' not found")]
    NotFound(String),

    #[error("title and content are required")]
    MissingFields,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// File-backed article store.
///
/// All mutations hold the collection lock for the whole operation, and a
/// mutation only returns `Ok` once its document is on disk, so a caller that
/// broadcasts on `Ok` never announces an uncommitted change.
pub struct ArticleStore {
    data_dir: PathBuf,
    articles: Mutex<Vec<Article>>,
}

impl ArticleStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    /// and loading any existing article documents.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        let articles = Self::load_from_dir(&data_dir)?;
        info!(
            count = articles.len(),
            dir = %data_dir.display(),
            "article store loaded"
        );

        Ok(Self {
            data_dir,
            articles: Mutex::new(articles),
        })
    }

    /// Load every `*.json` document in the directory
    fn load_from_dir(dir: &Path) -> Result<Vec<Article>, StoreError> {
        let mut articles = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<Article>(&content) {
                Ok(article) if !article.id.is_empty() => articles.push(article),
                Ok(_) => {}
                Err(err) => {
                    warn!(
                        file = %path.display(),
                        error = %err,
                        "skipping unreadable article document"
                    );
                }
            }
        }

        // Directory iteration order is arbitrary; display order is creation order.
        articles.sort_by_key(|a| a.created_at);
        Ok(articles)
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{id}.json"))
    }

    /// Write one article document (expects caller to hold the lock)
    fn persist(&self, article: &Article) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(article)?;
        fs::write(self.document_path(&article.id), json)?;
        Ok(())
    }

    /// All articles in display order
    pub fn list(&self) -> Vec<Article> {
        self.articles.lock().clone()
    }

    /// Look up one article by id
    pub fn get(&self, id: &str) -> Option<Article> {
        self.articles.lock().iter().find(|a| a.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.articles.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.lock().is_empty()
    }
}

// Mutations live in crud.rs; re-exported here as inherent methods.
impl ArticleStore {
    pub fn create(&self, new: NewArticle) -> Result<Article, StoreError> {
        crud::create(self, new)
    }

    pub fn update(&self, id: &str, patch: ArticlePatch) -> Result<Article, StoreError> {
        crud::update(self, id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        crud::delete(self, id)
    }
}
