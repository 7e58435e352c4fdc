use super::*;
use crate::util::memory_store::MemoryStore;

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct Draft {
    name: String,
}

#[test]
fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    assert!(store.is_empty());
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").as_deref(), Some("v"));
    store.remove("k");
    assert_eq!(store.get("k"), None);
}

#[test]
fn memory_store_clones_share_entries() {
    let store = MemoryStore::new();
    let other = store.clone();
    other.set("k", "v").unwrap();
    assert_eq!(store.get("k").as_deref(), Some("v"));
    assert_eq!(store.len(), 1);
}

#[test]
fn json_helpers_round_trip_a_value() {
    let store = MemoryStore::new();
    save_json(&store, "draft", &Draft { name: "Sahel".to_owned() }).unwrap();
    assert_eq!(load_json::<Draft>(&store, "draft"), Some(Draft { name: "Sahel".to_owned() }));
}

#[test]
fn load_json_treats_corrupt_entry_as_absent() {
    let store = MemoryStore::new();
    store.set("draft", "{not json").unwrap();
    assert_eq!(load_json::<Draft>(&store, "draft"), None);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn local_storage_is_inert_outside_browser() {
    let store = LocalStorage;
    assert_eq!(store.get("access_token"), None);
    assert_eq!(store.set("access_token", "x"), Err(StorageError::Unavailable));
}
