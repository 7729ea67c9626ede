use std::sync::Arc;

use super::*;
use crate::fonts::entry::{FaceMetrics, FontEntry};
use crate::foundation::core::Size;
use crate::measure::service::MetricsOrigin;
use crate::placement::engine::{PlacementConfig, PlacementPolicy};
use crate::words::factory::CaseVariant;

fn entry(text: &str, size_px: f32) -> (WordDescriptor, WordMetrics) {
    let d = WordDescriptor {
        text: text.to_string(),
        font: Arc::new(FontEntry::new("Cloud", FaceMetrics::default(), vec![], vec![])),
        size_px,
        case: CaseVariant::Lower,
        feature: None,
        variations: vec![],
        rotation_deg: 0.0,
    };
    let chars = text.chars().count() as f64;
    let m = WordMetrics::new(
        Size::new(0.5 * f64::from(size_px) * chars, f64::from(size_px)),
        0.0,
        MetricsOrigin::Layout,
    );
    (d, m)
}

#[test]
fn spiral_cloud_places_largest_first_without_overlap() {
    let engine = PlacementEngine::new(PlacementConfig {
        policy: PlacementPolicy::Spiral,
        ..PlacementConfig::default()
    });
    let words = vec![
        entry("small", 12.0),
        entry("huge", 96.0),
        entry("medium", 40.0),
        entry("tiny", 10.0),
        entry("large", 64.0),
    ];
    let mut rng = fastrand::Rng::with_seed(1);
    let layout = layout_cloud(&engine, words, &mut rng);

    assert_eq!(layout.dropped, 0);
    let sizes: Vec<f32> = layout.placed.iter().map(|w| w.descriptor.size_px).collect();
    assert_eq!(sizes, vec![96.0, 64.0, 40.0, 12.0, 10.0]);
    // Largest word sits on the viewport centre.
    let centre = layout.placed[0].rect().center();
    assert!((centre.x - 640.0).abs() < 1e-9 && (centre.y - 360.0).abs() < 1e-9);

    let rects: Vec<Rect> = layout.placed.iter().map(CloudWord::rect).collect();
    for (i, a) in rects.iter().enumerate() {
        assert!(!engine.collides(*a, &rects[i + 1..]));
    }
    let bounds = layout.bounds().unwrap();
    assert!(rects.iter().all(|r| bounds.union(*r) == bounds));
}

#[test]
fn oversized_words_are_dropped() {
    let engine = PlacementEngine::new(PlacementConfig {
        policy: PlacementPolicy::Spiral,
        ..PlacementConfig::default()
    });
    let words = vec![entry("enormousword", 800.0), entry("ok", 20.0)];
    let layout = layout_cloud(&engine, words, &mut fastrand::Rng::with_seed(2));
    assert_eq!(layout.dropped, 1);
    assert_eq!(layout.placed.len(), 1);
    assert_eq!(layout.placed[0].descriptor.text, "ok");
}

#[test]
fn empty_input_gives_empty_layout() {
    let layout = layout_cloud(
        &PlacementEngine::default(),
        Vec::new(),
        &mut fastrand::Rng::with_seed(0),
    );
    assert!(layout.placed.is_empty());
    assert!(layout.bounds().is_none());
}
