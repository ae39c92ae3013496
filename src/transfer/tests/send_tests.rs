//! Tests for the send-side transfer registry and ID allocation.

use std::collections::HashSet;

use proptest::prelude::*;
use rstest::rstest;

use crate::transfer::{IdAllocError, SendRegistry, TransferId, TransferKey};

type Registry = SendRegistry<u32>;

#[test]
fn allocated_transfer_starts_empty_and_unassigned() {
    let mut registry = Registry::new();
    let key = registry.allocate_transfer();

    let transfer = registry.transfer(key).expect("transfer is live");
    assert_eq!(transfer.id(), None);
    assert_eq!(transfer.total_fragments(), 0);
    assert_eq!(transfer.fragment_count(), 0);
    assert_eq!(registry.len(), 1);
}

#[test]
fn ids_are_allocated_smallest_first() {
    let mut registry = Registry::new();
    for expected in 0..4_u8 {
        let key = registry.allocate_transfer();
        let id = registry.allocate_transfer_id(key).expect("ids available");
        assert_eq!(id, TransferId::new(expected));
    }
}

#[test]
fn freed_id_is_reused_before_higher_values() {
    let mut registry = Registry::new();
    let keys: Vec<TransferKey> = (0..3).map(|_| registry.allocate_transfer()).collect();
    for &key in &keys {
        registry.allocate_transfer_id(key).expect("ids available");
    }

    registry.free_transfer(keys[1]);

    let key = registry.allocate_transfer();
    let id = registry.allocate_transfer_id(key).expect("id 1 is free");
    assert_eq!(id, TransferId::new(1));
}

#[test]
fn id_namespace_exhausts_at_257th_live_transfer() {
    let mut registry = Registry::new();
    for _ in 0..256 {
        let key = registry.allocate_transfer();
        registry.allocate_transfer_id(key).expect("namespace not yet full");
    }

    let key = registry.allocate_transfer();
    assert_eq!(
        registry.allocate_transfer_id(key),
        Err(IdAllocError::Exhausted),
    );
    let transfer = registry.transfer(key).expect("transfer stays live on failure");
    assert_eq!(transfer.id(), None, "failed allocation must leave the id unassigned");
}

#[test]
fn reallocating_an_assigned_id_is_rejected() {
    let mut registry = Registry::new();
    let key = registry.allocate_transfer();
    let id = registry.allocate_transfer_id(key).expect("first allocation");

    assert_eq!(
        registry.allocate_transfer_id(key),
        Err(IdAllocError::AlreadyAssigned { key, id }),
    );
    let transfer = registry.transfer(key).expect("transfer is live");
    assert_eq!(transfer.id(), Some(id), "id must be unchanged");
}

#[test]
fn allocating_an_id_for_a_dead_key_is_rejected() {
    let mut registry = Registry::new();
    let key = registry.allocate_transfer();
    registry.free_transfer(key);

    assert_eq!(
        registry.allocate_transfer_id(key),
        Err(IdAllocError::UnknownTransfer { key }),
    );
}

#[test]
fn removing_the_last_fragment_frees_the_transfer() {
    let mut registry = Registry::new();
    let key = registry.allocate_transfer();
    registry.add_fragment(key, 7);

    registry.remove_fragment(key, &7);

    assert!(registry.transfer(key).is_none());
    assert!(registry.is_empty());
}

#[test]
fn transfer_survives_until_all_fragments_are_removed() {
    let mut registry = Registry::new();
    let key = registry.allocate_transfer();
    registry.set_total_fragments(key, 3);
    for handle in [10, 11, 12] {
        registry.add_fragment(key, handle);
    }

    registry.remove_fragment(key, &11);
    let transfer = registry.transfer(key).expect("two fragments remain");
    assert_eq!(transfer.fragments(), &[10, 12]);
    assert_eq!(transfer.total_fragments(), 3);

    registry.remove_fragment(key, &10);
    registry.remove_fragment(key, &12);
    assert!(registry.transfer(key).is_none());
}

#[test]
fn removing_an_unknown_handle_changes_nothing() {
    let mut registry = Registry::new();
    let key = registry.allocate_transfer();
    registry.add_fragment(key, 3);

    registry.remove_fragment(key, &99);

    let transfer = registry.transfer(key).expect("transfer is live");
    assert_eq!(transfer.fragments(), &[3]);
}

#[test]
fn bookkeeping_mismatches_are_absorbed() {
    let mut registry = Registry::new();
    let live = registry.allocate_transfer();
    registry.add_fragment(live, 1);

    let dead = registry.allocate_transfer();
    registry.free_transfer(dead);

    // None of these may panic or disturb the live transfer.
    registry.free_transfer(dead);
    registry.add_fragment(dead, 2);
    registry.remove_fragment(dead, &2);
    registry.set_total_fragments(dead, 5);

    assert_eq!(registry.len(), 1);
    let transfer = registry.transfer(live).expect("live transfer untouched");
    assert_eq!(transfer.fragments(), &[1]);
}

#[rstest]
#[case::single(1)]
#[case::a_few(5)]
#[case::many(64)]
fn live_ids_are_unique(#[case] count: usize) {
    let mut registry = Registry::new();
    let mut seen = HashSet::new();
    for _ in 0..count {
        let key = registry.allocate_transfer();
        let id = registry.allocate_transfer_id(key).expect("ids available");
        assert!(seen.insert(id), "id {id} allocated twice");
    }
}

/// One step of an interleaved allocate/free schedule.
#[derive(Clone, Copy, Debug)]
enum IdChurnOp {
    Allocate,
    Free(usize),
}

fn id_churn_strategy() -> impl Strategy<Value = Vec<IdChurnOp>> {
    let op = prop_oneof![
        3 => Just(IdChurnOp::Allocate),
        1 => (0..64_usize).prop_map(IdChurnOp::Free),
    ];
    proptest::collection::vec(op, 1..200)
}

proptest! {
    /// No two live transfers ever share an assigned id, no matter how
    /// allocation and free operations interleave.
    #[test]
    fn interleaved_churn_never_duplicates_ids(ops in id_churn_strategy()) {
        let mut registry = Registry::new();
        let mut live: Vec<TransferKey> = Vec::new();

        for op in ops {
            match op {
                IdChurnOp::Allocate => {
                    let key = registry.allocate_transfer();
                    match registry.allocate_transfer_id(key) {
                        Ok(_) => live.push(key),
                        Err(IdAllocError::Exhausted) => registry.free_transfer(key),
                        Err(err) => {
                            return Err(TestCaseError::fail(format!("unexpected error: {err}")));
                        }
                    }
                }
                IdChurnOp::Free(slot) if !live.is_empty() => {
                    let key = live.swap_remove(slot % live.len());
                    registry.free_transfer(key);
                }
                IdChurnOp::Free(_) => {}
            }

            let ids: Vec<TransferId> = live
                .iter()
                .filter_map(|&key| registry.transfer(key).and_then(|t| t.id()))
                .collect();
            let unique: HashSet<TransferId> = ids.iter().copied().collect();
            prop_assert_eq!(ids.len(), unique.len(), "duplicate live transfer id");
        }
    }
}
