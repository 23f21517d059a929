//! Query behaviour of the in-memory store.

use cogmyra_memory::MemoryStore;
use cogmyra_test_utils::{seeded_store, texts};
use pretty_assertions::assert_eq;

/// Each add grows the store and shows up first in `get_last`.
#[test]
fn add_returns_entry_and_increases_count() {
    let store = MemoryStore::new();
    assert!(store.get_last(10, None).is_empty());

    let e1 = store.add("u1", "hello", None).expect("add e1");
    assert_eq!(store.get_last(10, None), vec![e1.clone()]);

    let e2 = store.add("u2", "world", None).expect("add e2");
    assert_eq!(store.get_last(10, None), vec![e2, e1]);
}

/// Recency ordering with and without a user filter.
#[test]
fn get_last_with_and_without_user_filter() {
    let store = MemoryStore::new();
    let a1 = store.add("alice", "one", None).expect("a1");
    let b1 = store.add("bob", "two", None).expect("b1");
    let a2 = store.add("alice", "three", None).expect("a2");

    assert_eq!(
        store.get_last(3, None),
        vec![a2.clone(), b1.clone(), a1.clone()]
    );
    assert_eq!(store.get_last(5, Some("alice")), vec![a2, a1]);
    assert_eq!(store.get_last(5, Some("bob")), vec![b1]);
    assert!(store.get_last(5, Some("carol")).is_empty());
}

/// `get_last(len)` is the exact reverse of insertion order.
#[test]
fn get_last_full_length_reverses_insertion() {
    let store = MemoryStore::new();
    for i in 0..25 {
        store
            .add(if i % 3 == 0 { "a" } else { "b" }, format!("m{i}"), None)
            .expect("add");
    }
    let mut expected = store.entries();
    expected.reverse();
    assert_eq!(store.get_last(store.len(), None), expected);
}

/// Truncation applies after filtering by user.
#[test]
fn get_last_truncates_after_user_filter() {
    let store = seeded_store(&[
        ("alice", "a1"),
        ("bob", "b1"),
        ("alice", "a2"),
        ("bob", "b2"),
        ("alice", "a3"),
    ]);
    assert_eq!(texts(&store.get_last(2, Some("alice"))), vec!["a3", "a2"]);
    assert_eq!(texts(&store.get_last(1, Some("bob"))), vec!["b2"]);
}

/// Case-insensitive search, most recent first, with an optional user filter.
#[test]
fn search_finds_matches_and_respects_user_filter() {
    let store = MemoryStore::new();
    let a1 = store.add("alice", "Hello world", None).expect("a1");
    store.add("alice", "no match here", None).expect("a2");
    let b1 = store.add("bob", "HELLO again", None).expect("b1");
    store.add("bob", "something else", None).expect("b2");

    let results = store.search("hello", None);
    assert_eq!(results, vec![b1, a1.clone()]);
    assert!(
        results
            .iter()
            .all(|entry| entry.text().to_lowercase().contains("hello"))
    );

    assert_eq!(store.search("hello", Some("alice")), vec![a1]);
}

/// Repeated searches over an unchanged store agree.
#[test]
fn search_is_idempotent() {
    let store = seeded_store(&[("u", "alpha beta"), ("v", "Beta gamma"), ("u", "delta")]);
    let first = store.search("BETA", None);
    let second = store.search("BETA", None);
    assert_eq!(first, second);
    assert_eq!(texts(&first), vec!["Beta gamma", "alpha beta"]);
}

/// The empty query matches every candidate.
#[test]
fn empty_query_matches_everything() {
    let store = seeded_store(&[("u", "one"), ("v", ""), ("u", "three")]);
    assert_eq!(store.search("", None).len(), 3);
    assert_eq!(texts(&store.search("", Some("u"))), vec!["three", "one"]);
}

/// Returned entries are copies; the store is unchanged by queries.
#[test]
fn queries_do_not_mutate_store() {
    let store = seeded_store(&[("u", "one"), ("u", "two")]);
    let before = store.entries();
    let _ = store.get_last(1, None);
    let _ = store.search("o", Some("u"));
    assert_eq!(store.entries(), before);
}
