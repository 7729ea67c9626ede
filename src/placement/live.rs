use std::collections::BTreeMap;

use crate::foundation::core::{Point, Rect, Timestamp, Vec2};
use crate::measure::service::WordMetrics;
use crate::words::factory::WordDescriptor;

/// Per-word identity from a monotonic counter; never derived from the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct WordId(pub u64);

impl std::fmt::Display for WordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Linear motion of a launched word across the extended viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Traversal {
    pub start: Point,
    /// Total displacement over the traversal.
    pub travel: Vec2,
    pub duration_ms: f64,
}

impl Traversal {
    /// Position `elapsed_ms` into the traversal, held at the end once complete.
    pub fn position_at(&self, elapsed_ms: f64) -> Point {
        if self.duration_ms <= 0.0 {
            return self.start + self.travel;
        }
        let t = (elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        self.start + self.travel * t
    }

    pub fn is_complete(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}

/// A word that has been measured, placed and handed to the surface.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PlacedWord {
    pub id: WordId,
    pub descriptor: WordDescriptor,
    pub metrics: WordMetrics,
    /// Top-left of the rotated bounding box, without margin.
    pub position: Point,
    pub created_at: Timestamp,
    pub traversal: Traversal,
}

impl PlacedWord {
    /// Bounding box at placement time.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.metrics.bounds)
    }

    pub fn age_ms(&self, now: Timestamp) -> f64 {
        now.since(self.created_at)
    }

    pub fn is_fresh(&self, now: Timestamp, freshness_ms: f64) -> bool {
        self.age_ms(now) < freshness_ms
    }
}

/// Words currently on screen, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct LiveWordSet {
    words: BTreeMap<WordId, PlacedWord>,
}

impl LiveWordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: PlacedWord) -> Option<PlacedWord> {
        self.words.insert(word.id, word)
    }

    pub fn remove(&mut self, id: WordId) -> Option<PlacedWord> {
        self.words.remove(&id)
    }

    pub fn get(&self, id: WordId) -> Option<&PlacedWord> {
        self.words.get(&id)
    }

    pub fn contains(&self, id: WordId) -> bool {
        self.words.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = WordId> + '_ {
        self.words.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedWord> {
        self.words.values()
    }

    /// Words younger than `freshness_ms`; only these take part in collision checks.
    pub fn fresh(&self, now: Timestamp, freshness_ms: f64) -> impl Iterator<Item = &PlacedWord> {
        self.words
            .values()
            .filter(move |w| w.is_fresh(now, freshness_ms))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/live.rs"]
mod tests;
