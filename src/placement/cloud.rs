use crate::foundation::core::{Point, Rect};
use crate::measure::service::WordMetrics;
use crate::placement::engine::PlacementEngine;
use crate::words::factory::WordDescriptor;

/// A word fixed in the cloud.
#[derive(Clone, Debug, serde::Serialize)]
pub struct CloudWord {
    pub descriptor: WordDescriptor,
    pub metrics: WordMetrics,
    pub position: Point,
}

impl CloudWord {
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.metrics.bounds)
    }
}

#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct CloudLayout {
    pub placed: Vec<CloudWord>,
    /// Words the placement budget could not fit.
    pub dropped: usize,
}

impl CloudLayout {
    /// Union of all placed boxes.
    pub fn bounds(&self) -> Option<Rect> {
        self.placed
            .iter()
            .map(CloudWord::rect)
            .reduce(|a, b| a.union(b))
    }
}

/// One-shot layout: largest font size first, each word avoiding every word placed before it.
pub fn layout_cloud(
    engine: &PlacementEngine,
    mut words: Vec<(WordDescriptor, WordMetrics)>,
    rng: &mut fastrand::Rng,
) -> CloudLayout {
    words.sort_by(|a, b| b.0.size_px.total_cmp(&a.0.size_px));

    let mut layout = CloudLayout::default();
    let mut obstacles: Vec<Rect> = Vec::with_capacity(words.len());
    for (descriptor, metrics) in words {
        match engine.find_position(metrics.bounds, &obstacles, rng) {
            Some(position) => {
                let word = CloudWord {
                    descriptor,
                    metrics,
                    position,
                };
                obstacles.push(word.rect());
                layout.placed.push(word);
            }
            None => layout.dropped += 1,
        }
    }

    tracing::info!(
        placed = layout.placed.len(),
        dropped = layout.dropped,
        "word cloud laid out"
    );
    layout
}

#[cfg(test)]
#[path = "../../tests/unit/placement/cloud.rs"]
mod tests;
