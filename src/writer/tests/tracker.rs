//! Identity tracker tests

use crate::runtime::value::Handle;
use crate::writer::{SharedTable, TrackState};

#[test]
fn test_unseen_is_unmarked() {
    let table = SharedTable::new();
    assert_eq!(table.probe(Handle::new(1)), TrackState::Unmarked);
    assert!(!table.is_shared(Handle::new(1)));
    assert!(table.is_empty());
}

#[test]
fn test_transitions() {
    let mut table = SharedTable::new();
    let h = Handle::new(7);

    table.mark(h);
    assert_eq!(table.probe(h), TrackState::MarkedOnce);
    assert!(!table.is_shared(h));

    table.flag_shared(h);
    assert_eq!(table.probe(h), TrackState::Shared);
    assert!(table.is_shared(h));

    assert_eq!(table.assign_index(h), 0);
    assert_eq!(table.probe(h), TrackState::Assigned(0));
    assert!(table.is_shared(h));
}

#[test]
fn test_states_never_go_back() {
    let mut table = SharedTable::new();
    let h = Handle::new(1);
    table.mark(h);
    table.flag_shared(h);
    table.assign_index(h);

    table.mark(h);
    table.flag_shared(h);
    assert_eq!(table.probe(h), TrackState::Assigned(0));
    assert_eq!(table.assign_index(h), 0);
    assert_eq!(table.labels_assigned(), 1);
}

#[test]
fn test_labels_count_up() {
    let mut table = SharedTable::new();
    let handles: Vec<Handle> = (10..14).map(Handle::new).collect();
    for h in &handles {
        table.mark(*h);
        table.flag_shared(*h);
    }
    let labels: Vec<usize> = handles.iter().rev().map(|h| table.assign_index(*h)).collect();
    assert_eq!(labels, vec![0, 1, 2, 3]);
    assert_eq!(table.shared_count(), 4);
}

#[test]
fn test_revisit() {
    let mut table = SharedTable::new();
    let h = Handle::new(3);
    assert!(!table.revisit(h));
    assert!(table.revisit(h));
    assert!(table.revisit(h));
    assert_eq!(table.probe(h), TrackState::Shared);
    assert_eq!(table.len(), 1);
}
