use config::Config;
use tempfile::tempdir;

use crate::collection::Collections;
use crate::filter::{FieldFilter, Filter};
use crate::{FieldRules, Schema, Store, TypeRule};

fn test_config() -> Config {
    Config {
        memtable_limit: 4,
        index_sample: 1,
        wal_sync: false,
    }
}

fn doc(pairs: &[(&str, crate::FieldValue)]) -> crate::Document {
    pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
}

#[test]
fn insert_then_get_round_trips_the_document() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let users = store.collection("users", None);

    let id = users
        .insert(doc(&[("name", "bob".into())]), None, None)
        .unwrap();
    let fetched = users.get(&id).unwrap().unwrap();
    assert_eq!(fetched.get("name"), Some(&"bob".into()));
}

#[test]
fn insert_honors_caller_supplied_id() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let users = store.collection("users", None);

    let id = users
        .insert(doc(&[("name", "bob".into())]), Some("bob-1".to_string()), None)
        .unwrap();
    assert_eq!(id, "bob-1");
}

#[test]
fn get_on_unknown_id_is_none_not_an_error() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let users = store.collection("users", None);
    assert!(users.get("nope").unwrap().is_none());
}

#[test]
fn update_on_missing_id_is_not_found() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let users = store.collection("users", None);
    let err = users.update("nope", doc(&[]), None).unwrap_err();
    assert!(matches!(err, crate::CollectionError::NotFound { .. }));
}

#[test]
fn update_merges_fields_over_the_current_document() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let users = store.collection("users", None);

    let id = users
        .insert(doc(&[("name", "bob".into()), ("age", 30i64.into())]), None, None)
        .unwrap();
    users.update(&id, doc(&[("age", 31i64.into())]), None).unwrap();

    let fetched = users.get(&id).unwrap().unwrap();
    assert_eq!(fetched.get("name"), Some(&"bob".into()));
    assert_eq!(fetched.get("age"), Some(&31i64.into()));
}

#[test]
fn unique_field_rejects_duplicate_across_live_documents() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let schema = Schema::new(vec![("name".to_string(), FieldRules::new().unique())]);
    let users = store.collection("users", Some(schema));

    users.insert(doc(&[("name", "bob".into())]), None, None).unwrap();
    let err = users
        .insert(doc(&[("name", "bob".into())]), None, None)
        .unwrap_err();
    assert!(matches!(err, crate::CollectionError::Validation(_)));
}

#[test]
fn update_leaving_a_unique_field_unchanged_does_not_self_clash() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let schema = Schema::new(vec![
        ("name".to_string(), FieldRules::new().unique()),
        ("age".to_string(), FieldRules::new().type_of(TypeRule::Integer)),
    ]);
    let users = store.collection("users", Some(schema));

    let id = users
        .insert(doc(&[("name", "bob".into()), ("age", 30i64.into())]), None, None)
        .unwrap();

    // Updating an unrelated field must not trip the unique-field check just
    // because the unchanged "name" value is still in the registry.
    users.update(&id, doc(&[("age", 31i64.into())]), None).unwrap();

    let fetched = users.get(&id).unwrap().unwrap();
    assert_eq!(fetched.get("name"), Some(&"bob".into()));
    assert_eq!(fetched.get("age"), Some(&31i64.into()));
}

#[test]
fn update_changing_a_unique_field_frees_its_old_value_for_reuse() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let schema = Schema::new(vec![("name".to_string(), FieldRules::new().unique())]);
    let users = store.collection("users", Some(schema));

    let id = users.insert(doc(&[("name", "bob".into())]), None, None).unwrap();
    users.update(&id, doc(&[("name", "robert".into())]), None).unwrap();

    // "bob" is free again since the only document that held it moved away
    // from that value.
    users.insert(doc(&[("name", "bob".into())]), None, None).unwrap();

    // "robert" is now taken by the updated document.
    let err = users
        .insert(doc(&[("name", "robert".into())]), None, None)
        .unwrap_err();
    assert!(matches!(err, crate::CollectionError::Validation(_)));
}

#[test]
fn numeric_bound_rejects_out_of_range_value() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let schema = Schema::new(vec![(
        "age".to_string(),
        FieldRules::new().numeric(crate::Bound {
            lte: Some(100.0),
            ..Default::default()
        }),
    )]);
    let users = store.collection("users", Some(schema));

    let err = users
        .insert(doc(&[("age", 150i64.into())]), None, None)
        .unwrap_err();
    assert!(matches!(err, crate::CollectionError::Validation(_)));
}

#[test]
fn reference_rule_accepts_an_existing_id_and_rejects_a_missing_one() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();

    let users = store.collection("users", None);
    let bob_id = users.insert(doc(&[("name", "bob".into())]), None, None).unwrap();

    let files_schema = Schema::new(vec![(
        "user_id".to_string(),
        FieldRules::new().type_of(TypeRule::String).reference("users"),
    )]);
    let files = store.collection("files", Some(files_schema));

    let lookup = Collections::new().with("users", &users);
    let ok = files.insert(
        doc(&[("user_id", bob_id.clone().into())]),
        None,
        Some(&lookup),
    );
    assert!(ok.is_ok());

    let bad = files.insert(doc(&[("user_id", "nope".into())]), None, Some(&lookup));
    assert!(matches!(bad, Err(crate::CollectionError::Validation(_))));
}

#[test]
fn find_all_surfaces_the_latest_write_not_a_stale_one() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let users = store.collection("users", None);

    let id = users.insert(doc(&[("name", "bob".into())]), None, None).unwrap();
    users.update(&id, doc(&[("name", "bob2".into())]), None).unwrap();

    let filter: Filter = vec![("name".to_string(), FieldFilter::Eq("bob2".into()))];
    let results = users.find_all(Some(&filter), None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id(), id);

    let stale_filter: Filter = vec![("name".to_string(), FieldFilter::Eq("bob".into()))];
    assert!(users.find_all(Some(&stale_filter), None).unwrap().is_empty());
}

#[test]
fn find_one_returns_first_match_or_none() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let users = store.collection("users", None);

    users.insert(doc(&[("name", "bob".into())]), None, None).unwrap();
    let found = users
        .find_one(Some(&vec![("name".to_string(), FieldFilter::Eq("bob".into()))]))
        .unwrap();
    assert!(found.is_some());

    let missing = users
        .find_one(Some(&vec![(
            "name".to_string(),
            FieldFilter::Eq("nobody".into()),
        )]))
        .unwrap();
    assert!(missing.is_none());
}

#[test]
#[should_panic(expected = "must not contain")]
fn collection_name_with_colon_panics() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    store.collection("bad:name", None);
}

#[test]
fn store_close_flushes_and_releases_the_engine() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    {
        let users = store.collection("users", None);
        users.insert(doc(&[("name", "bob".into())]), None, None).unwrap();
    }
    store.close().unwrap();

    let reopened = Store::open(dir.path(), test_config()).unwrap();
    let users = reopened.collection("users", None);
    let results = users.find_all(None, None).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn collections_lookup_reports_existing_and_missing_ids() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path(), test_config()).unwrap();
    let users = store.collection("users", None);
    let id = users.insert(doc(&[("name", "bob".into())]), None, None).unwrap();

    let lookup = Collections::new().with("users", &users);
    assert!(crate::CollectionLookup::exists(&lookup, "users", &id));
    assert!(!crate::CollectionLookup::exists(&lookup, "users", "missing"));
    assert!(!crate::CollectionLookup::exists(&lookup, "other", &id));
}
