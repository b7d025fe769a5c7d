//! Integration tests for the file-backed article store

use article_hub::store::{ArticlePatch, ArticleStore, NewArticle, StoreError};

fn setup_store() -> (ArticleStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let store = ArticleStore::open(tmp.path()).unwrap();
    (store, tmp)
}

fn new_article(title: &str, content: &str) -> NewArticle {
    NewArticle {
        title: title.to_string(),
        content: content.to_string(),
        files: Vec::new(),
    }
}

#[test]
fn test_create_and_list() {
    let (store, _tmp) = setup_store();

    let first = store.create(new_article("First", "one")).unwrap();
    let second = store.create(new_article("Second", "two")).unwrap();
    assert_ne!(first.id, second.id);

    let articles = store.list();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "First");
    assert_eq!(articles[1].title, "Second");
}

#[test]
fn test_create_requires_title_and_content() {
    let (store, _tmp) = setup_store();

    let err = store.create(new_article("", "content"));
    assert!(matches!(err, Err(StoreError::MissingFields)));

    let err = store.create(new_article("title", "   "));
    assert!(matches!(err, Err(StoreError::MissingFields)));

    assert!(store.is_empty());
}

#[test]
fn test_create_writes_document() {
    let (store, tmp) = setup_store();

    let article = store.create(new_article("A", "x")).unwrap();

    let doc = tmp.path().join(format!("{}.json", article.id));
    assert!(doc.exists());

    let on_disk: article_hub::Article =
        serde_json::from_str(&std::fs::read_to_string(doc).unwrap()).unwrap();
    assert_eq!(on_disk.title, "A");
}

#[test]
fn test_get_by_id() {
    let (store, _tmp) = setup_store();
    let created = store.create(new_article("A", "x")).unwrap();

    assert_eq!(store.get(&created.id).unwrap().title, "A");
    assert!(store.get("missing").is_none());
}

#[test]
fn test_partial_update_keeps_other_fields() {
    let (store, _tmp) = setup_store();
    let created = store
        .create(NewArticle {
            title: "A".to_string(),
            content: "x".to_string(),
            files: vec!["123-photo.png".to_string()],
        })
        .unwrap();

    let updated = store
        .update(
            &created.id,
            ArticlePatch {
                title: Some("B".to_string()),
                content: None,
                files: None,
            },
        )
        .unwrap();

    assert_eq!(updated.title, "B");
    assert_eq!(updated.content, "x");
    assert_eq!(updated.files, vec!["123-photo.png".to_string()]);
}

#[test]
fn test_update_replaces_files_when_given() {
    let (store, _tmp) = setup_store();
    let created = store
        .create(NewArticle {
            title: "A".to_string(),
            content: "x".to_string(),
            files: vec!["old.pdf".to_string()],
        })
        .unwrap();

    let updated = store
        .update(
            &created.id,
            ArticlePatch {
                title: None,
                content: None,
                files: Some(vec!["new.png".to_string()]),
            },
        )
        .unwrap();

    assert_eq!(updated.files, vec!["new.png".to_string()]);
}

#[test]
fn test_update_unknown_is_not_found() {
    let (store, _tmp) = setup_store();

    let err = store.update("missing", ArticlePatch::default());
    assert!(matches!(err, Err(StoreError::NotFound(_))));
}

#[test]
fn test_update_preserves_display_order() {
    let (store, _tmp) = setup_store();
    let a = store.create(new_article("A", "1")).unwrap();
    let b = store.create(new_article("B", "2")).unwrap();
    store.create(new_article("C", "3")).unwrap();

    store
        .update(
            &a.id,
            ArticlePatch {
                title: Some("A2".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let titles: Vec<String> = store.list().into_iter().map(|a| a.title).collect();
    assert_eq!(titles, vec!["A2", "B", "C"]);
    assert_eq!(store.get(&b.id).unwrap().title, "B");
}

#[test]
fn test_delete_removes_entry_and_document() {
    let (store, tmp) = setup_store();
    let created = store.create(new_article("A", "x")).unwrap();

    store.delete(&created.id).unwrap();

    assert!(store.is_empty());
    assert!(!tmp.path().join(format!("{}.json", created.id)).exists());

    let err = store.delete(&created.id);
    assert!(matches!(err, Err(StoreError::NotFound(_))));
}

#[test]
fn test_reopen_restores_collection() {
    let tmp = tempfile::tempdir().unwrap();
    let ids: Vec<String> = {
        let store = ArticleStore::open(tmp.path()).unwrap();
        ["A", "B"]
            .iter()
            .map(|t| store.create(new_article(t, "body")).unwrap().id)
            .collect()
    };

    let reopened = ArticleStore::open(tmp.path()).unwrap();
    assert_eq!(reopened.len(), 2);
    for id in ids {
        assert!(reopened.get(&id).is_some());
    }
}
