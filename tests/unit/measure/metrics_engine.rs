use std::sync::Arc;

use super::*;
use crate::fonts::entry::FaceMetrics;
use crate::words::factory::{AxisValue, CaseVariant};

fn word(font: &Arc<FontEntry>, text: &str, wdth: Option<f32>) -> WordDescriptor {
    WordDescriptor {
        text: text.to_string(),
        font: Arc::clone(font),
        size_px: 20.0,
        case: CaseVariant::Lower,
        feature: None,
        variations: wdth
            .map(|value| vec![AxisValue { tag: WDTH, value }])
            .unwrap_or_default(),
        rotation_deg: 0.0,
    }
}

fn face() -> Arc<FontEntry> {
    Arc::new(FontEntry::new(
        "Metric",
        FaceMetrics {
            ascender: 0.9,
            descender: -0.3,
            line_gap: 0.1,
            avg_advance: 0.6,
        },
        vec![],
        vec![],
    ))
}

#[test]
fn extent_follows_face_metrics_and_width_axis() {
    let font = face();
    let mut engine = MetricsTextEngine::new();
    engine.register_font(&font).unwrap();

    let normal = engine.layout_extent(&word(&font, "abc", None)).unwrap();
    assert!((normal.width - 0.6 * 20.0 * 3.0).abs() < 1e-4);
    assert!((normal.height - 1.3 * 20.0).abs() < 1e-4);

    let narrow = engine.layout_extent(&word(&font, "abc", Some(80.0))).unwrap();
    assert!((narrow.width - normal.width * 0.8).abs() < 1e-4);
}

#[test]
fn unregistered_font_fails() {
    let font = face();
    let mut engine = MetricsTextEngine::new();
    assert!(!engine.is_font_ready(font.id()));
    let err = engine.layout_extent(&word(&font, "x", None)).unwrap_err();
    assert!(err.to_string().starts_with("measurement error:"));
}

#[test]
fn same_family_name_does_not_make_a_font_registered() {
    let registered = face();
    let sibling = face();
    let mut engine = MetricsTextEngine::new();
    engine.register_font(&registered).unwrap();

    assert_eq!(registered.family_name, sibling.family_name);
    assert!(engine.is_font_ready(registered.id()));
    assert!(!engine.is_font_ready(sibling.id()));
    assert!(engine.layout_extent(&word(&sibling, "x", None)).is_err());
}

#[test]
fn held_font_is_not_ready_until_released() {
    let font = face();
    let mut engine = MetricsTextEngine::new();
    engine.register_font(&font).unwrap();
    engine.hold_font(font.id());
    assert!(!engine.is_font_ready(font.id()));
    engine.release_font(font.id());
    assert!(engine.is_font_ready(font.id()));
    assert_eq!(engine.registered_fonts().collect::<Vec<_>>(), vec![font.id()]);
}
