//! Pair Arena
//!
//! Implements the recommended strategy from §9: the Order Manager owns a
//! `Vec<Pair>`-backed arena; every index (owners_map, oi_pair_map,
//! io_pair_map) stores a [`PairHandle`] rather than a `Pair` value. This
//! makes invariant 1 (shared identity across three index paths)
//! mechanically true instead of something callers have to maintain by
//! convention.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use crate::order::types::Pair;

/// A handle into a [`PairArena`]. Stable across `remove`/`add` cycles
/// thanks to the generation counter: a handle into a freed-then-reused
/// slot with a stale generation is treated as absent rather than
/// silently resolving to the wrong `Pair`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairHandle {
    index: u32,
    generation: u32,
}

enum Slot {
    Occupied { generation: u32, pair: Pair },
    Free { generation: u32, next_free: Option<u32> },
}

#[derive(Default)]
pub struct PairArena {
    slots: Vec<Slot>,
    free_head: Option<u32>,
}

impl PairArena {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
        }
    }

    /// Inserts `pair`, returning a fresh handle.
    pub fn insert(&mut self, pair: Pair) -> PairHandle {
        if let Some(idx) = self.free_head {
            let slot = &mut self.slots[idx as usize];
            let generation = match slot {
                Slot::Free { generation, next_free } => {
                    self.free_head = *next_free;
                    *generation
                }
                Slot::Occupied { .. } => unreachable!("free list points at occupied slot"),
            };
            *slot = Slot::Occupied { generation, pair };
            PairHandle {
                index: idx,
                generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot::Occupied {
                generation: 0,
                pair,
            });
            PairHandle {
                index,
                generation: 0,
            }
        }
    }

    pub fn get(&self, handle: PairHandle) -> Option<&Pair> {
        match self.slots.get(handle.index as usize) {
            Some(Slot::Occupied { generation, pair }) if *generation == handle.generation => {
                Some(pair)
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: PairHandle) -> Option<&mut Pair> {
        match self.slots.get_mut(handle.index as usize) {
            Some(Slot::Occupied { generation, pair }) if *generation == handle.generation => {
                Some(pair)
            }
            _ => None,
        }
    }

    /// Removes the `Pair` at `handle`, bumping the slot's generation so any
    /// lingering stale handle resolves to `None` rather than a reused slot.
    pub fn remove(&mut self, handle: PairHandle) -> Option<Pair> {
        match self.slots.get(handle.index as usize) {
            Some(Slot::Occupied { generation, .. }) if *generation == handle.generation => {}
            _ => return None,
        }
        let next_free = self.free_head;
        let old = std::mem::replace(
            &mut self.slots[handle.index as usize],
            Slot::Free {
                generation: handle.generation.wrapping_add(1),
                next_free,
            },
        );
        self.free_head = Some(handle.index);
        match old {
            Slot::Occupied { pair, .. } => Some(pair),
            Slot::Free { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
