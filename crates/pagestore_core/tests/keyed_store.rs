use pagestore_core::{KeyedStore, StoreError};
use std::collections::BTreeSet;

fn store_with_keys(keys: &[i64]) -> KeyedStore<String> {
    let mut store = KeyedStore::new("people").unwrap();
    for key in keys {
        store.add(*key, format!("person-{key}")).unwrap();
    }
    store
}

#[test]
fn new_store_is_empty_and_keeps_its_name() {
    let store: KeyedStore<u32> = KeyedStore::new("cities").unwrap();
    assert_eq!(store.name(), "cities");
    assert_eq!(store.count(), 0);
    assert!(store.is_empty());
    assert!(store.keys().is_empty());
}

#[test]
fn empty_name_is_invalid_argument() {
    let err = KeyedStore::<u32>::new("").unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
}

#[test]
fn add_then_remove_restores_count() {
    let mut store = store_with_keys(&[1, 2]);
    let before = store.count();

    store.add(7, "person-7".to_string()).unwrap();
    assert_eq!(store.count(), before + 1);

    assert!(store.remove(7));
    assert_eq!(store.count(), before);
}

#[test]
fn remove_absent_key_returns_false_without_change() {
    let mut store = store_with_keys(&[1, 2]);
    assert!(!store.remove(42));
    assert_eq!(store.count(), 2);
}

#[test]
fn duplicate_add_fails_and_leaves_store_unchanged() {
    let mut store = store_with_keys(&[1]);

    let err = store.add(1, "intruder".to_string()).unwrap_err();
    assert_eq!(err, StoreError::DuplicateKey(1));
    assert_eq!(store.count(), 1);
    assert_eq!(store.get(1).map(String::as_str), Some("person-1"));
}

#[test]
fn insert_has_the_same_contract_as_add() {
    let mut store = store_with_keys(&[1]);

    store.insert(2, "person-2".to_string()).unwrap();
    assert_eq!(
        store.insert(2, "again".to_string()).unwrap_err(),
        StoreError::DuplicateKey(2)
    );
    assert_eq!(store.get(2).map(String::as_str), Some("person-2"));
}

#[test]
fn removing_middle_key_keeps_the_others() {
    let mut store = store_with_keys(&[1, 2, 3]);

    assert!(store.remove(2));
    assert_eq!(store.count(), 2);

    let keys: BTreeSet<i64> = store.keys().into_iter().collect();
    assert_eq!(keys, BTreeSet::from([1, 3]));
}

#[test]
fn keys_and_values_line_up_in_one_read() {
    let store = store_with_keys(&[30, 10, 20]);
    let keys = store.keys();
    let values = store.values();

    assert_eq!(keys.len(), values.len());
    for (key, value) in keys.iter().zip(values) {
        assert_eq!(value, &format!("person-{key}"));
    }
    assert_eq!(
        store.entries().first().map(|(key, _)| *key),
        Some(10),
        "entries follow ascending key order"
    );
}

#[test]
fn update_replaces_only_existing_entries() {
    let mut store = store_with_keys(&[1]);

    let previous = store.update(1, "renamed".to_string()).unwrap();
    assert_eq!(previous, "person-1");
    assert_eq!(store.get(1).map(String::as_str), Some("renamed"));

    assert_eq!(
        store.update(5, "ghost".to_string()).unwrap_err(),
        StoreError::KeyNotFound(5)
    );
    assert_eq!(store.count(), 1);
}

#[test]
fn take_hands_back_the_removed_value() {
    let mut store = store_with_keys(&[4]);
    assert_eq!(store.take(4), Some("person-4".to_string()));
    assert_eq!(store.take(4), None);
    assert!(store.is_empty());
}

#[test]
fn store_pages_in_key_order() {
    let store = store_with_keys(&[5, 3, 1, 4, 2]);
    let page = store.page(2, 2).unwrap();

    assert_eq!(page.items(), ["person-3".to_string(), "person-4".to_string()]);
    assert_eq!(page.total_count(), 5);
    assert_eq!(page.total_pages(), 3);
    assert!(page.has_previous());
    assert!(page.has_next());
}
