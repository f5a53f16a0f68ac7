use serde_json::json;

use propsync_shared::{OperationPayload, ReplicatedListProperty, TargetSet};
use propsync_test::helpers::{entity, obs, prop, FixedDirectory};

fn list_property(initial: &[i64]) -> ReplicatedListProperty<i64> {
    ReplicatedListProperty::standard(entity(1), prop(2), initial.to_vec())
}

#[test]
fn push_then_remove_round_trips() {
    let directory = FixedDirectory::of(&[1]);
    let mut list = list_property(&[10, 20]);

    let added = list
        .push(&directory, 30)
        .unwrap()
        .expect("append always changes the list");
    assert_eq!(
        added.payload,
        OperationPayload::ListAdd {
            index: 2,
            value: json!(30)
        }
    );

    let removed = list
        .remove(&directory, &30)
        .unwrap()
        .expect("value is present");
    assert_eq!(
        removed.payload,
        OperationPayload::ListRemove {
            index: 2,
            value: json!(30)
        }
    );

    assert_eq!(list.value(), &vec![10, 20]);
}

#[test]
fn remove_of_absent_value_is_a_noop() {
    let directory = FixedDirectory::of(&[1]);
    let mut list = list_property(&[10, 20]);

    assert!(list.remove(&directory, &99).unwrap().is_none());
    assert_eq!(list.value(), &vec![10, 20]);
}

#[test]
fn remove_at_out_of_range_is_a_noop() {
    let directory = FixedDirectory::of(&[1]);
    let mut list = list_property(&[10]);

    assert!(list.remove_at(&directory, 5).unwrap().is_none());
    assert_eq!(list.value(), &vec![10]);
}

#[test]
fn set_at_emits_a_delta_and_skips_equal_elements() {
    let directory = FixedDirectory::of(&[1]);
    let mut list = list_property(&[10, 20]);

    let operation = list
        .set_at(&directory, 1, 25)
        .unwrap()
        .expect("element changed");
    assert_eq!(
        operation.payload,
        OperationPayload::ListSet {
            index: 1,
            value: json!(25)
        }
    );
    assert_eq!(operation.targets, TargetSet::All);

    assert!(list.set_at(&directory, 1, 25).unwrap().is_none());
    assert!(list.set_at(&directory, 9, 1).unwrap().is_none());
}

#[test]
fn observer_scoped_push_establishes_a_branch() {
    let mut list = list_property(&[10]);

    let operation = list
        .push_for(obs(1), 20)
        .unwrap()
        .expect("observer list changed");
    assert_eq!(operation.targets, TargetSet::only(obs(1)));
    assert_eq!(
        operation.payload,
        OperationPayload::ListAdd {
            index: 1,
            value: json!(20)
        }
    );

    assert!(list.has_override(obs(1)));
    assert_eq!(list.value_for(obs(1)), &vec![10, 20]);
    // The canonical list never aliases the branch.
    assert_eq!(list.value(), &vec![10]);
}

#[test]
fn observer_scoped_ops_act_on_the_branch() {
    let mut list = list_property(&[10, 20]);

    list.set_at_for(obs(1), 0, 11).unwrap();
    list.remove_for(obs(1), &20).unwrap();

    assert_eq!(list.value_for(obs(1)), &vec![11]);
    assert_eq!(list.value(), &vec![10, 20]);

    // Out-of-range on the branch is tolerated.
    assert!(list.remove_at_for(obs(1), 7).unwrap().is_none());
}

#[test]
fn muted_observer_list_ops_update_state_silently() {
    let mut list = list_property(&[10]);

    list.desync(obs(1), false).unwrap();
    assert!(list.push_for(obs(1), 20).unwrap().is_none());
    assert_eq!(list.value_for(obs(1)), &vec![10, 20]);

    // Unmuting re-delivers the whole effective list.
    let catch_up = list
        .desync(obs(1), true)
        .unwrap()
        .expect("caught up after unmute");
    assert_eq!(catch_up.payload, OperationPayload::Set(json!([10, 20])));
}

#[test]
fn canonical_delta_excludes_branched_observers() {
    let directory = FixedDirectory::of(&[1, 2]);
    let mut list = list_property(&[10]);

    list.push_for(obs(1), 99).unwrap();

    let operation = list
        .push(&directory, 20)
        .unwrap()
        .expect("canonical list changed");
    assert_eq!(operation.targets, TargetSet::only(obs(2)));
}

#[test]
fn whole_list_replacement_goes_through_the_scalar_core() {
    let directory = FixedDirectory::of(&[1]);
    let mut list = list_property(&[10, 20]);

    // Same contents: collection equality makes this a no-op.
    assert!(list.set(&directory, vec![10, 20], false).unwrap().is_none());

    let operation = list
        .set(&directory, vec![1, 2, 3], false)
        .unwrap()
        .expect("contents changed");
    assert_eq!(operation.payload, OperationPayload::Set(json!([1, 2, 3])));
}
