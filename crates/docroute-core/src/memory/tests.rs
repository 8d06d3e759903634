//! Tests for in-memory collaborators

use super::*;
use crate::content::ROOT_PARENT_ID;

#[tokio::test]
async fn test_root_content_ordered_by_sort_order() {
    let second = ContentNode::new(2, ROOT_PARENT_ID, "Second").with_sort_order(1);
    let first = ContentNode::new(3, ROOT_PARENT_ID, "First").with_sort_order(0);
    let child = ContentNode::new(4, 3, "Child");
    let tree = InMemoryContentTree::with_nodes([second.clone(), first.clone(), child]);

    let roots = tree.get_root_content().await.unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].key, first.key);
    assert_eq!(roots[1].key, second.key);
}

#[tokio::test]
async fn test_document_keys_skip_trashed() {
    let home = ContentNode::new(1, ROOT_PARENT_ID, "Home");
    let trashed = ContentNode::new(2, 1, "Old").trashed();
    let tree = InMemoryContentTree::with_nodes([home.clone(), trashed]);

    assert_eq!(tree.document_keys().await.unwrap(), vec![home.key]);
}

#[tokio::test]
async fn test_id_key_map_documents_only() {
    let home = ContentNode::new(1, ROOT_PARENT_ID, "Home");
    let tree = InMemoryContentTree::with_nodes([home.clone()]);

    assert_eq!(
        tree.get_key_for_id(1, ObjectType::Document).await.unwrap(),
        Some(home.key)
    );
    assert_eq!(tree.get_key_for_id(1, ObjectType::Media).await.unwrap(), None);
    assert_eq!(
        tree.get_key_for_id(ROOT_PARENT_ID, ObjectType::Document).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_structural_changes() {
    let tree = InMemoryContentTree::new();
    let home = ContentNode::new(1, ROOT_PARENT_ID, "Home");
    let about = ContentNode::new(2, 1, "About");
    tree.insert(home.clone()).await;
    tree.insert(about.clone()).await;

    tree.move_node(about.key, ROOT_PARENT_ID).await.unwrap();
    assert!(tree.get_by_key(about.key).await.unwrap().unwrap().is_root());

    tree.trash(about.key).await.unwrap();
    assert!(tree.get_by_key(about.key).await.unwrap().unwrap().trashed);

    assert!(tree.remove(home.key).await.is_some());
    assert_eq!(tree.get_key_for_id(1, ObjectType::Document).await.unwrap(), None);
    assert!(tree.move_node(home.key, 5).await.is_err());
}

#[tokio::test]
async fn test_domain_service_wildcards() {
    let key = ContentKey::new();
    let service = InMemoryDomainService::with_bindings([
        DomainBinding::new("example.com", key).with_language("en-US"),
        DomainBinding::new("*1", key).with_language("da-DK"),
    ]);

    assert_eq!(service.get_assigned_domains(key, false).await.unwrap().len(), 1);
    assert_eq!(service.get_assigned_domains(key, true).await.unwrap().len(), 2);
    assert!(
        service
            .get_assigned_domains(ContentKey::new(), true)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_url_store_roundtrip_and_delete() {
    let store = InMemoryUrlStore::new();
    let doc = ContentKey::new();
    let published = UrlEntryKey::new(doc, Some("en-US"), None, false);
    let draft = UrlEntryKey::new(doc, Some("en-US"), None, true);

    store
        .save(vec![
            UrlEntry::new(published.clone(), "home"),
            UrlEntry::new(draft.clone(), "home-draft"),
        ])
        .await
        .unwrap();

    let found = store.get(&published).await.unwrap().unwrap();
    assert_eq!(found.url_segment, "home");
    assert_eq!(store.entries_for(doc).await.unwrap().len(), 2);

    assert!(store.delete(&draft).await.unwrap());
    assert!(!store.delete(&draft).await.unwrap());
    assert_eq!(store.delete_document(doc).await.unwrap(), 1);
    assert!(store.is_empty());
}

#[test]
fn test_fixture_from_yaml() {
    let fixture = ContentFixture::from_yaml_str(
        r#"
nodes:
  - key: 6f1c1b7e-0b57-4e8e-9a57-0a3c1f1e2d11
    id: 1
    name: Home
    published: true
  - key: 0d5a8b3e-5d0e-4e0b-8f43-6a1f0a9e3c22
    id: 2
    parent_id: 1
    culture_names:
      en-us: Products
    published_cultures: [en-us]
domains:
  - domain_name: example.com
    root_content_key: 6f1c1b7e-0b57-4e8e-9a57-0a3c1f1e2d11
    language_iso_code: en-US
"#,
    )
    .unwrap();

    assert_eq!(fixture.nodes.len(), 2);
    assert!(fixture.nodes[0].is_root());
    assert!(fixture.nodes[1].is_culture_published("en-US"));
    assert_eq!(fixture.domains.len(), 1);

    let (tree, _domains) = fixture.into_collaborators();
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_fixture_invalid_yaml() {
    assert!(matches!(
        ContentFixture::from_yaml_str("nodes: [ {id: }"),
        Err(Error::Repository(_))
    ));
}
