use std::sync::Arc;

use super::*;
use crate::fonts::entry::{FaceMetrics, FontEntry};
use crate::foundation::core::Size;
use crate::measure::service::MetricsOrigin;
use crate::words::factory::CaseVariant;

fn word(id: u64, text: &str, created_ms: f64) -> PlacedWord {
    let position = Point::new(10.0, 20.0);
    PlacedWord {
        id: WordId(id),
        descriptor: WordDescriptor {
            text: text.to_string(),
            font: Arc::new(FontEntry::new("Live", FaceMetrics::default(), vec![], vec![])),
            size_px: 12.0,
            case: CaseVariant::Lower,
            feature: None,
            variations: vec![],
            rotation_deg: 0.0,
        },
        metrics: WordMetrics::new(Size::new(30.0, 12.0), 0.0, MetricsOrigin::Layout),
        position,
        created_at: Timestamp::from_millis(created_ms),
        traversal: Traversal {
            start: position,
            travel: Vec2::new(100.0, 0.0),
            duration_ms: 1000.0,
        },
    }
}

#[test]
fn identical_texts_are_distinct_members() {
    let mut set = LiveWordSet::new();
    set.insert(word(1, "same", 0.0));
    set.insert(word(2, "same", 0.0));
    assert_eq!(set.len(), 2);
    assert!(set.remove(WordId(1)).is_some());
    assert!(set.contains(WordId(2)));
    assert!(set.remove(WordId(1)).is_none());
}

#[test]
fn fresh_filters_by_age() {
    let mut set = LiveWordSet::new();
    set.insert(word(1, "old", 0.0));
    set.insert(word(2, "new", 1500.0));
    let fresh: Vec<WordId> = set
        .fresh(Timestamp::from_millis(2500.0), 2000.0)
        .map(|w| w.id)
        .collect();
    assert_eq!(fresh, vec![WordId(2)]);
    assert_eq!(set.ids().collect::<Vec<_>>(), vec![WordId(1), WordId(2)]);
}

#[test]
fn traversal_interpolates_and_clamps() {
    let w = word(1, "move", 0.0);
    assert_eq!(w.traversal.position_at(500.0), Point::new(60.0, 20.0));
    assert_eq!(w.traversal.position_at(5000.0), Point::new(110.0, 20.0));
    assert!(!w.traversal.is_complete(999.0));
    assert!(w.traversal.is_complete(1000.0));
    assert_eq!(w.rect(), Rect::new(10.0, 20.0, 40.0, 32.0));
    assert_eq!(w.id.to_string(), "w1");
}
