//! Client-side reconciliation of pushed events into cached state

use crate::types::{Article, ArticleEvent};

/// Locally cached article collection plus the "currently viewed" article.
///
/// Display order is stable: creations append, updates keep position,
/// deletions remove. Applying any event twice yields the same collection as
/// applying it once; duplicates happen when an optimistic local application
/// overlaps the server echo of the same mutation, so both writers go through
/// [`ArticleCache::apply`].
#[derive(Debug, Default)]
pub struct ArticleCache {
    articles: Vec<Article>,
    viewed: Option<String>,
}

impl ArticleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one event into the cached collection
    pub fn apply(&mut self, event: &ArticleEvent) {
        match event {
            ArticleEvent::ArticleCreated { article } => {
                if !self.contains(&article.id) {
                    self.articles.push(article.clone());
                }
            }
            ArticleEvent::ArticleUpdated { article } => {
                match self.articles.iter_mut().find(|a| a.id == article.id) {
                    Some(slot) => *slot = article.clone(),
                    // An update for an article this client never saw still
                    // materializes it; the snapshot is newer information
                    // than our silence.
                    None => self.articles.push(article.clone()),
                }
            }
            ArticleEvent::ArticleDeleted { id } => {
                self.articles.retain(|a| a.id != *id);
                if self.viewed.as_deref() == Some(id.as_str()) {
                    self.viewed = None;
                }
            }
        }
    }

    /// Replace the whole collection from an authoritative read
    pub fn reset(&mut self, articles: Vec<Article>) {
        self.articles = articles;
        if let Some(id) = self.viewed.clone() {
            if !self.contains(&id) {
                self.viewed = None;
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.articles.iter().any(|a| a.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Cached articles in display order
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Mark an article as currently viewed
    pub fn set_viewed(&mut self, id: impl Into<String>) {
        self.viewed = Some(id.into());
    }

    pub fn clear_viewed(&mut self) {
        self.viewed = None;
    }

    /// Id of the currently viewed article, if any
    pub fn viewed(&self) -> Option<&str> {
        self.viewed.as_deref()
    }
}
