use std::sync::Arc;

use super::*;
use crate::fonts::entry::FaceMetrics;
use crate::foundation::core::Tag;
use crate::words::factory::{AxisValue, CaseVariant};

fn flex() -> Arc<FontEntry> {
    let bytes = std::fs::read("tests/data/fonts/SuperShowFlex.ttf").unwrap();
    Arc::new(FontEntry::parse(bytes, "SuperShowFlex.ttf").unwrap())
}

fn word(font: &Arc<FontEntry>, text: &str, variations: &[(&str, f32)]) -> WordDescriptor {
    WordDescriptor {
        text: text.to_string(),
        font: Arc::clone(font),
        size_px: 40.0,
        case: CaseVariant::Lower,
        feature: None,
        variations: variations
            .iter()
            .map(|(tag, value)| AxisValue {
                tag: Tag::new(tag).unwrap(),
                value: *value,
            })
            .collect(),
        rotation_deg: 0.0,
    }
}

#[test]
fn synthetic_entries_cannot_be_registered() {
    let mut engine = ParleyTextEngine::new();
    let entry = FontEntry::new("NoBytes", FaceMetrics::default(), vec![], vec![]);
    let err = engine.register_font(&entry).unwrap_err();
    assert!(err.is_user_facing());
    assert!(!engine.is_font_ready(entry.id()));
    assert!(engine.resolved_family(entry.id()).is_none());
}

#[test]
fn layout_of_unregistered_font_fails() {
    let mut engine = ParleyTextEngine::new();
    let missing = Arc::new(FontEntry::new("Missing", FaceMetrics::default(), vec![], vec![]));
    let w = word(&missing, "hello", &[]);
    assert!(engine.layout_extent(&w).is_err());

    let bad_size = WordDescriptor { size_px: 0.0, ..w };
    assert!(engine.layout_extent(&bad_size).is_err());
}

#[test]
fn font_file_registers_and_lays_out() {
    let font = flex();
    let mut engine = ParleyTextEngine::new();
    engine.register_font(&font).unwrap();
    assert!(engine.is_font_ready(font.id()));
    assert_eq!(engine.resolved_family(font.id()), Some(font.id().alias().as_str()));

    let extent = engine.layout_extent(&word(&font, "quartz", &[])).unwrap();
    // Six 500-unit glyphs at 40px.
    assert!((extent.width - 120.0).abs() < 1.0, "{extent:?}");
    assert!(extent.height > 0.0);
}

#[test]
fn width_axis_changes_layout_width() {
    let font = flex();
    let mut engine = ParleyTextEngine::new();
    engine.register_font(&font).unwrap();

    let narrow = engine
        .layout_extent(&word(&font, "quartz", &[("wdth", 75.0)]))
        .unwrap();
    let normal = engine.layout_extent(&word(&font, "quartz", &[])).unwrap();
    let wide = engine
        .layout_extent(&word(&font, "quartz", &[("wght", 400.0), ("wdth", 125.0)]))
        .unwrap();
    assert!(narrow.width < normal.width, "{narrow:?} vs {normal:?}");
    assert!(wide.width > normal.width, "{wide:?} vs {normal:?}");
}

#[test]
fn features_are_accepted() {
    let font = flex();
    let mut engine = ParleyTextEngine::new();
    engine.register_font(&font).unwrap();

    let mut w = word(&font, "quartz", &[("wdth", 100.0)]);
    w.feature = Some(Tag::new("ss01").unwrap());
    let extent = engine.layout_extent(&w).unwrap();
    assert!(extent.width > 0.0);
}

#[test]
fn two_files_of_one_family_get_their_own_families() {
    let first = flex();
    let second = flex();
    let mut engine = ParleyTextEngine::new();
    engine.register_font(&first).unwrap();
    engine.register_font(&second).unwrap();

    assert_eq!(first.family_name, second.family_name);
    let a = engine.resolved_family(first.id()).unwrap().to_string();
    let b = engine.resolved_family(second.id()).unwrap().to_string();
    assert_ne!(a, b);
    assert!(engine.layout_extent(&word(&first, "quartz", &[])).is_ok());
    assert!(engine.layout_extent(&word(&second, "quartz", &[])).is_ok());
}
