use std::collections::HashMap;

use serde_json::json;

use propsync_shared::{OperationPayload, ReplicatedMapProperty, TargetSet};
use propsync_test::helpers::{entity, obs, prop, FixedDirectory};

fn map_property(initial: &[(&str, i64)]) -> ReplicatedMapProperty<String, i64> {
    let map: HashMap<String, i64> = initial
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect();
    ReplicatedMapProperty::standard(entity(1), prop(3), map)
}

#[test]
fn insert_emits_map_add() {
    let directory = FixedDirectory::of(&[1]);
    let mut map = map_property(&[]);

    let operation = map
        .insert(&directory, "hp".to_string(), 100)
        .unwrap()
        .expect("new key");
    assert_eq!(
        operation.payload,
        OperationPayload::MapAdd {
            key: json!("hp"),
            value: json!(100)
        }
    );
    assert_eq!(map.value().get("hp"), Some(&100));
}

#[test]
fn duplicate_insert_overwrites() {
    // Adding an existing key is not rejected: it overwrites.
    let directory = FixedDirectory::of(&[1]);
    let mut map = map_property(&[("hp", 100)]);

    let operation = map
        .insert(&directory, "hp".to_string(), 50)
        .unwrap()
        .expect("value differs");
    assert_eq!(
        operation.payload,
        OperationPayload::MapAdd {
            key: json!("hp"),
            value: json!(50)
        }
    );
    assert_eq!(map.value().get("hp"), Some(&50));

    // Equal value: no-op.
    assert!(map
        .insert(&directory, "hp".to_string(), 50)
        .unwrap()
        .is_none());
}

#[test]
fn set_key_inserts_or_overwrites() {
    let directory = FixedDirectory::of(&[1]);
    let mut map = map_property(&[]);

    let operation = map
        .set_key(&directory, "mana".to_string(), 30)
        .unwrap()
        .expect("new key");
    assert_eq!(
        operation.payload,
        OperationPayload::MapSet {
            key: json!("mana"),
            value: json!(30)
        }
    );
}

#[test]
fn remove_of_absent_key_is_a_noop() {
    let directory = FixedDirectory::of(&[1]);
    let mut map = map_property(&[("hp", 100)]);

    assert!(map.remove(&directory, &"mana".to_string()).unwrap().is_none());
    assert_eq!(map.value().len(), 1);
}

#[test]
fn remove_carries_the_removed_value() {
    let directory = FixedDirectory::of(&[1]);
    let mut map = map_property(&[("hp", 100)]);

    let operation = map
        .remove(&directory, &"hp".to_string())
        .unwrap()
        .expect("key present");
    assert_eq!(
        operation.payload,
        OperationPayload::MapRemove {
            key: json!("hp"),
            value: json!(100)
        }
    );
    assert!(map.value().is_empty());
}

#[test]
fn whole_map_equality_ignores_insertion_order() {
    let directory = FixedDirectory::of(&[1]);
    let mut map = map_property(&[("a", 1), ("b", 2)]);

    // Same pairs, different construction order: judged equal, no operation.
    let mut replacement = HashMap::new();
    replacement.insert("b".to_string(), 2);
    replacement.insert("a".to_string(), 1);
    assert!(map.set(&directory, replacement, false).unwrap().is_none());

    // A genuinely different map replaces wholesale.
    let mut different = HashMap::new();
    different.insert("a".to_string(), 9);
    assert!(map.set(&directory, different, false).unwrap().is_some());
}

#[test]
fn observer_scoped_map_ops_are_isolated_and_mutable_while_muted() {
    let mut map = map_property(&[("hp", 100)]);

    let operation = map
        .insert_for(obs(1), "mana".to_string(), 30)
        .unwrap()
        .expect("observer map changed");
    assert_eq!(operation.targets, TargetSet::only(obs(1)));
    assert!(map.has_override(obs(1)));
    assert_eq!(map.value_for(obs(1)).get("mana"), Some(&30));
    assert_eq!(map.value().get("mana"), None);

    map.desync(obs(1), false).unwrap();
    assert!(map
        .set_key_for(obs(1), "hp".to_string(), 10)
        .unwrap()
        .is_none());
    assert_eq!(map.value_for(obs(1)).get("hp"), Some(&10));

    let removed = map.remove_for(obs(1), &"mana".to_string()).unwrap();
    assert!(removed.is_none());
    assert_eq!(map.value_for(obs(1)).get("mana"), None);
}

#[test]
fn canonical_map_delta_excludes_branched_observers() {
    let directory = FixedDirectory::of(&[1, 2]);
    let mut map = map_property(&[]);

    map.insert_for(obs(1), "hp".to_string(), 1).unwrap();

    let operation = map
        .insert(&directory, "hp".to_string(), 100)
        .unwrap()
        .expect("canonical map changed");
    assert_eq!(operation.targets, TargetSet::only(obs(2)));
}
