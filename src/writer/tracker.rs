//! Identity tracker for shared-structure detection
//!
//! Maps object identity (the heap handle) to how often the walk pass has
//! seen the object, and later to the label the emit pass gave it.

use hashbrown::HashMap;

use crate::runtime::value::Handle;

/// Sharing state of one object. Only ever moves forward:
/// `Unmarked → MarkedOnce → Shared → Assigned(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Never visited
    Unmarked,
    /// Visited once by the walk pass
    MarkedOnce,
    /// Reached more than once; needs a label, none assigned yet
    Shared,
    /// Label `#n=` already emitted
    Assigned(usize),
}

/// Identity tracker plus the label counter of one write
#[derive(Debug, Default)]
pub struct SharedTable {
    entries: HashMap<Handle, TrackState>,
    next_index: usize,
}

impl SharedTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of an object
    pub fn probe(
        &self,
        handle: Handle,
    ) -> TrackState {
        self.entries
            .get(&handle)
            .copied()
            .unwrap_or(TrackState::Unmarked)
    }

    /// Record the first visit
    pub fn mark(
        &mut self,
        handle: Handle,
    ) {
        self.entries.entry(handle).or_insert(TrackState::MarkedOnce);
    }

    /// Record a revisit
    pub fn flag_shared(
        &mut self,
        handle: Handle,
    ) {
        let state = self.entries.entry(handle).or_insert(TrackState::Unmarked);
        if matches!(*state, TrackState::Unmarked | TrackState::MarkedOnce) {
            *state = TrackState::Shared;
        }
    }

    /// Give a shared object its label. Labels count up from 0 in the order
    /// this is called. Asking again for an object returns its existing label.
    pub fn assign_index(
        &mut self,
        handle: Handle,
    ) -> usize {
        let state = self.entries.entry(handle).or_insert(TrackState::Unmarked);
        if let TrackState::Assigned(n) = *state {
            return n;
        }
        let n = self.next_index;
        self.next_index += 1;
        *state = TrackState::Assigned(n);
        n
    }

    /// Check whether an object needs labelling (shared, labelled or not)
    pub fn is_shared(
        &self,
        handle: Handle,
    ) -> bool {
        matches!(
            self.probe(handle),
            TrackState::Shared | TrackState::Assigned(_)
        )
    }

    /// Walk-pass step: marks an unseen object and returns false, or flags a
    /// seen one as shared and returns true.
    pub fn revisit(
        &mut self,
        handle: Handle,
    ) -> bool {
        match self.probe(handle) {
            TrackState::Unmarked => {
                self.mark(handle);
                false
            }
            _ => {
                self.flag_shared(handle);
                true
            }
        }
    }

    /// Number of tracked objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for an empty table
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of objects reached more than once
    pub fn shared_count(&self) -> usize {
        self.entries
            .values()
            .filter(|s| matches!(s, TrackState::Shared | TrackState::Assigned(_)))
            .count()
    }

    /// Number of labels handed out so far
    pub fn labels_assigned(&self) -> usize {
        self.next_index
    }
}
