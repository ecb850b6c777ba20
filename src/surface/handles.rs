//! Id table for hosts whose elements live outside Rust

use std::collections::HashMap;

use super::ElementId;

/// Maps [`ElementId`]s to foreign element handles.
///
/// A host stamps each handle with its id so a later sighting of the same
/// element resolves without a scan. Ids are never reused, so a forgotten id
/// can't alias a newer element.
#[derive(Debug)]
pub struct Handles<T> {
    slots: HashMap<usize, T>,
    next: usize,
}

impl<T> Default for Handles<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            next: 0,
        }
    }
}

impl<T> Handles<T> {
    /// Empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle behind `id`, unless it was forgotten
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.slots.get(&id.index())
    }

    /// Resolve a stamp read off an element.
    ///
    /// `is_same` must confirm the stored handle is that element; cloned
    /// elements carry their source's stamp.
    #[must_use]
    pub fn find(&self, stamp: Option<usize>, is_same: impl FnOnce(&T) -> bool) -> Option<ElementId> {
        let index = stamp?;
        self.slots
            .get(&index)
            .filter(|known| is_same(*known))
            .map(|_| ElementId::new(index))
    }

    /// Store a new handle under a fresh id
    pub fn insert(&mut self, handle: T) -> ElementId {
        let index = self.next;
        self.next += 1;
        self.slots.insert(index, handle);
        ElementId::new(index)
    }

    /// Drop every stamped id in `stamps`; returns how many were known
    pub fn forget(&mut self, stamps: impl IntoIterator<Item = usize>) -> usize {
        stamps
            .into_iter()
            .filter(|index| self.slots.remove(index).is_some())
            .count()
    }

    /// Handles currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no handle is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
