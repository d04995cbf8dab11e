//! Discovery tests against a paged in-memory document tree

mod helpers;

use chrono::Duration;
use helpers::{block, doc, reference_now, tagged_block, FakeDocumentStore};
use srsync::models::{Block, RichText};
use srsync::workflow::discovery::{all_children, recent_documents, tagged_blocks_in};
use srsync::workflow::{discover_tagged_blocks, DiscoveryOptions};

fn options(days: i64) -> DiscoveryOptions<'static> {
    DiscoveryOptions {
        threshold: reference_now() - Duration::days(days),
        tag_marker: "srs-item",
        search_query: None,
    }
}

fn ids(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|b| b.id.as_str()).collect()
}

#[tokio::test]
async fn test_listing_stops_at_first_old_document() {
    let store = FakeDocumentStore::new().with_documents(vec![
        vec![doc("d1", 0), doc("d2", 1)],
        vec![doc("d3", 2), doc("old", 9), doc("d4", 1)],
        vec![doc("d5", 0)],
    ]);

    let documents = recent_documents(&store, &options(5)).await.unwrap();

    let found: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(found, vec!["d1", "d2", "d3"]);
    // Third page is never requested
    assert_eq!(*store.document_pages_requested.lock().unwrap(), vec![0, 1]);
}

#[tokio::test]
async fn test_document_exactly_at_threshold_is_included() {
    let store = FakeDocumentStore::new().with_documents(vec![vec![doc("edge", 5), doc("old", 6)]]);

    let documents = recent_documents(&store, &options(5)).await.unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, "edge");
}

#[tokio::test]
async fn test_old_documents_are_never_searched() {
    let store = FakeDocumentStore::new()
        .with_documents(vec![vec![doc("new", 1), doc("old", 30)]])
        .with_children("new", vec![tagged_block("a", "Fresh passage.")])
        .with_children("old", vec![tagged_block("b", "Stale passage.")]);

    let blocks = discover_tagged_blocks(&store, &options(5)).await.unwrap();

    assert_eq!(ids(&blocks), vec!["a"]);
    assert_eq!(store.listed_parents(), vec!["new"]);
}

#[tokio::test]
async fn test_children_pages_are_fully_drained() {
    let store = FakeDocumentStore::new().with_paged_children(
        "doc",
        vec![
            vec![block("p1", &["one"])],
            vec![block("p2", &["two"]), block("p3", &["three"])],
            vec![block("p4", &["four"])],
        ],
    );

    let children = all_children(&store, "doc").await.unwrap();

    assert_eq!(ids(&children), vec!["p1", "p2", "p3", "p4"]);
    assert_eq!(
        *store.children_requested.lock().unwrap(),
        vec![
            ("doc".to_string(), 0),
            ("doc".to_string(), 1),
            ("doc".to_string(), 2)
        ]
    );
}

#[tokio::test]
async fn test_walk_is_depth_first_in_document_order() {
    // doc
    // ├── a (tagged, has children)
    // │   ├── a1 (tagged)
    // │   └── a2 (has children)
    // │       └── a2x (tagged)
    // └── b (tagged)
    let store = FakeDocumentStore::new()
        .with_children(
            "doc",
            vec![
                tagged_block("a", "Parent passage.").with_children(true),
                tagged_block("b", "Sibling passage."),
            ],
        )
        .with_paged_children(
            "a",
            vec![
                vec![tagged_block("a1", "First child.")],
                vec![block("a2", &["Untagged child."]).with_children(true)],
            ],
        )
        .with_children("a2", vec![tagged_block("a2x", "Grandchild.")]);

    let blocks = tagged_blocks_in(&store, "doc", "srs-item").await.unwrap();

    assert_eq!(ids(&blocks), vec!["a", "a1", "a2x", "b"]);
}

#[tokio::test]
async fn test_opaque_blocks_are_not_scanned_or_descended() {
    let mut table = tagged_block("table", "Looks tagged.").with_children(true);
    table.block_type = "table".to_string();

    let store = FakeDocumentStore::new()
        .with_children("doc", vec![table, tagged_block("p", "Real passage.")])
        .with_children("table", vec![tagged_block("row", "Hidden.")]);

    let blocks = tagged_blocks_in(&store, "doc", "srs-item").await.unwrap();

    assert_eq!(ids(&blocks), vec!["p"]);
    assert!(!store.listed_parents().contains(&"table".to_string()));
}

#[tokio::test]
async fn test_block_with_several_tags_is_recorded_once() {
    let store = FakeDocumentStore::new().with_children(
        "doc",
        vec![block("twice", &["srs-item", "Energy is conserved.", "srs-item"])],
    );

    let blocks = tagged_blocks_in(&store, "doc", "srs-item").await.unwrap();

    assert_eq!(ids(&blocks), vec!["twice"]);
}

#[tokio::test]
async fn test_processed_tags_are_ignored() {
    let processed = Block::new(
        "done",
        srsync::models::BlockType::Paragraph,
        vec![
            RichText::plain("Already carded.").struck(),
            RichText::plain("srs-item").struck(),
        ],
    );
    let store = FakeDocumentStore::new()
        .with_children("doc", vec![processed, block("plain", &["No tag here."])]);

    let blocks = tagged_blocks_in(&store, "doc", "srs-item").await.unwrap();

    assert!(blocks.is_empty());
}

#[tokio::test]
async fn test_listing_failure_aborts_discovery() {
    let store = FakeDocumentStore {
        fail_listing: true,
        ..FakeDocumentStore::new()
    };

    let err = discover_tagged_blocks(&store, &options(5)).await.unwrap_err();

    assert_eq!(err.kind(), srsync::ErrorKind::Transport);
}
