//! Mutation events pushed to connected clients

use serde::{Deserialize, Serialize};

use super::Article;

/// A committed mutation, broadcast to every open connection.
///
/// Events are immutable once constructed and are only emitted after the
/// store has durably applied the mutation they describe. Creations and
/// updates carry the full resulting snapshot; deletions carry only the id.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArticleEvent {
    /// A new article was created
    ArticleCreated { article: Article },

    /// An existing article was updated
    ArticleUpdated { article: Article },

    /// An article was deleted
    ArticleDeleted { id: String },
}

impl ArticleEvent {
    /// Id of the article this event concerns
    pub fn article_id(&self) -> &str {
        match self {
            ArticleEvent::ArticleCreated { article } | ArticleEvent::ArticleUpdated { article } => {
                &article.id
            }
            ArticleEvent::ArticleDeleted { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_event_serialization() {
        let event = ArticleEvent::ArticleCreated {
            article: Article::new("42".to_string(), "Hello".to_string(), "World".to_string()),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"article_created""#));
        assert!(json.contains(r#""article""#));
        assert!(json.contains("Hello"));
    }

    #[test]
    fn test_deleted_event_carries_only_id() {
        let event = ArticleEvent::ArticleDeleted {
            id: "5".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"article_deleted","id":"5"}"#);
    }

    #[test]
    fn test_updated_event_parsing() {
        let json = r#"{"type":"article_updated","article":{"id":"5","title":"B","content":"x","files":[]}}"#;
        let event: ArticleEvent = serde_json::from_str(json).unwrap();

        assert!(matches!(
            &event,
            ArticleEvent::ArticleUpdated { article } if article.title == "B"
        ));
        assert_eq!(event.article_id(), "5");
    }
}
