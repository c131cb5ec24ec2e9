//! Authoritative defender state management utilities.

use std::collections::BTreeMap;

use lane_defence_core::{CellCoord, EntityId};

use crate::entities::Defender;

/// Registry that stores placed defenders keyed by identifier.
#[derive(Debug, Default)]
pub(crate) struct DefenderRegistry {
    entries: BTreeMap<EntityId, Defender>,
}

impl DefenderRegistry {
    /// Creates an empty defender registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Defender whose origin sits exactly on the provided anchor, if any.
    pub(crate) fn occupant(&self, anchor: (i32, i32)) -> Option<&Defender> {
        self.entries.values().find(|defender| {
            let bounds = defender.entity.bounds;
            (bounds.x(), bounds.y()) == anchor
        })
    }

    /// Defender placed in the provided cell, if any.
    pub(crate) fn in_cell(&self, cell: CellCoord) -> Option<&Defender> {
        self.entries.values().find(|defender| defender.cell == cell)
    }

    pub(crate) fn insert(&mut self, defender: Defender) {
        let _ = self.entries.insert(defender.entity.id, defender);
    }

    /// Iterates defenders in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Defender> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Defender> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
