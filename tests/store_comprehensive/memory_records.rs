//! Memory record layer end to end: store, recent, hashtag discovery,
//! id shape, and URL extraction.

use chrono::DateTime;
use serde_json::json;
use stashdb::{extract_urls, MemoryStore};

use crate::test_utils::stash;

fn memories() -> MemoryStore {
    stash().memories()
}

#[test]
fn store_then_recent_returns_the_record() {
    let memories = memories();
    let id = memories
        .store("remember X", "X is important", vec!["#note".into()], None, None)
        .unwrap();

    let recent = memories.recent(1).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, id);
    assert_eq!(recent[0].content, "remember X");
    assert_eq!(recent[0].hashtags, vec!["#note"]);
}

#[test]
fn id_matches_documented_pattern() {
    let memories = memories();
    let id = memories.store("x", "x", vec![], None, None).unwrap();

    // mem_<14-digit date-time split 8+6><underscore><6-digit micros>
    let re = regex::Regex::new(r"^mem_\d{8}_\d{6}_\d{6}$").unwrap();
    assert!(re.is_match(&id), "unexpected id: {}", id);
}

#[test]
fn created_at_is_iso8601_and_timestamp_matches() {
    let memories = memories();
    let id = memories.store("x", "x", vec![], None, None).unwrap();
    let record = memories.get(&id).unwrap().unwrap();

    let parsed = DateTime::parse_from_rfc3339(&record.created_at).unwrap();
    assert_eq!(parsed.timestamp(), record.timestamp);
}

#[test]
fn hashtag_search_is_case_and_prefix_insensitive() {
    let memories = memories();
    for (content, tag) in [
        ("a", "#python"),
        ("b", "#aws"),
        ("c", "#python"),
        ("d", "#go"),
    ] {
        memories
            .store(content, content, vec![tag.into()], None, None)
            .unwrap();
    }

    // Two #python records, matched with or without the prefix, any case
    for query in ["python", "#python", "Python"] {
        let hits = memories.search_hashtag(query).unwrap();
        assert_eq!(hits.len(), 2, "query {:?}", query);
    }
    assert_eq!(memories.search_hashtag("aws").unwrap().len(), 1);
    assert!(memories.search_hashtag("rust").unwrap().is_empty());
}

#[test]
fn source_url_and_metadata_round_trip() {
    let memories = memories();
    let id = memories
        .store(
            "page content",
            "a page",
            vec!["#web".into()],
            Some("https://example.com/article".into()),
            Some(json!({"chars": 1234})),
        )
        .unwrap();

    let record = memories.get(&id).unwrap().unwrap();
    assert_eq!(record.source_url.as_deref(), Some("https://example.com/article"));
    assert_eq!(record.metadata, Some(json!({"chars": 1234})));
}

#[test]
fn retries_mint_new_ids() {
    // Store is not idempotent: the same content stored twice is two records
    let memories = memories();
    let first = memories.store("dup", "dup", vec![], None, None).unwrap();
    let second = memories.store("dup", "dup", vec![], None, None).unwrap();
    assert_ne!(first, second);
    assert_eq!(memories.recent(10).unwrap().len(), 2);
}

#[test]
fn extract_urls_finds_absolute_http_urls_in_order() {
    let text = "Store this web page: https://example.com/a and also \
                http://other.example/b?q=1 plus https://example.com/a";
    assert_eq!(
        extract_urls(text),
        vec![
            "https://example.com/a",
            "http://other.example/b?q=1",
            "https://example.com/a"
        ]
    );
    assert!(extract_urls("nothing to see").is_empty());
}
