use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{Point, Timestamp};
use crate::placement::live::{PlacedWord, Traversal, WordId};

/// Where placed words are drawn and animated.
///
/// The owner must report each finished traversal to
/// [`StreamController::on_traversal_complete`](crate::StreamController::on_traversal_complete)
/// exactly once.
pub trait RenderSurface {
    /// Start drawing `word` and animating it along its traversal.
    fn launch(&mut self, word: &PlacedWord);

    /// Stop drawing `id`. Unknown ids are ignored.
    fn retire(&mut self, id: WordId);
}

#[derive(Clone, Copy, Debug)]
struct Flight {
    traversal: Traversal,
    launched_at: Timestamp,
}

/// Headless surface that moves words linearly and reports completed traversals.
#[derive(Clone, Debug, Default)]
pub struct SimulatedSurface {
    active: BTreeMap<WordId, Flight>,
    reported: BTreeSet<WordId>,
    launched: u64,
    retired: u64,
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids whose traversal finished by `now`; each id is returned once.
    pub fn advance(&mut self, now: Timestamp) -> Vec<WordId> {
        let done: Vec<WordId> = self
            .active
            .iter()
            .filter(|(id, f)| {
                !self.reported.contains(*id) && f.traversal.is_complete(now.since(f.launched_at))
            })
            .map(|(id, _)| *id)
            .collect();
        self.reported.extend(done.iter().copied());
        done
    }

    /// Current position of every drawn word.
    pub fn positions(&self, now: Timestamp) -> impl Iterator<Item = (WordId, Point)> + '_ {
        self.active
            .iter()
            .map(move |(id, f)| (*id, f.traversal.position_at(now.since(f.launched_at))))
    }

    pub fn is_active(&self, id: WordId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn launched(&self) -> u64 {
        self.launched
    }

    pub fn retired(&self) -> u64 {
        self.retired
    }
}

impl RenderSurface for SimulatedSurface {
    fn launch(&mut self, word: &PlacedWord) {
        self.launched += 1;
        self.active.insert(
            word.id,
            Flight {
                traversal: word.traversal,
                launched_at: word.created_at,
            },
        );
    }

    fn retire(&mut self, id: WordId) {
        if self.active.remove(&id).is_some() {
            self.retired += 1;
        }
        self.reported.remove(&id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/surface.rs"]
mod tests;
