use super::*;

fn tag(s: &str) -> Tag {
    Tag::new(s).unwrap()
}

#[test]
fn extension_classification() {
    assert_eq!(FontFormat::from_filename("A.TTF").unwrap(), FontFormat::TrueType);
    assert_eq!(FontFormat::from_filename("dir/b.otf").unwrap(), FontFormat::OpenType);
    assert_eq!(FontFormat::from_filename("c.ttc").unwrap(), FontFormat::Collection);
    for bad in ["d.woff2", "e.txt", "noext"] {
        let err = FontFormat::from_filename(bad).unwrap_err();
        assert!(err.is_user_facing(), "{bad}");
    }
}

#[test]
fn renamed_text_file_is_an_input_error() {
    let err = FontEntry::parse(b"just some words\n".to_vec(), "notes.otf").unwrap_err();
    assert!(matches!(err, SuperShowError::Input(_)));
    assert!(err.to_string().contains("notes.otf"));
}

#[test]
fn empty_file_is_an_input_error() {
    let err = FontEntry::parse(Vec::new(), "empty.ttf").unwrap_err();
    assert!(matches!(err, SuperShowError::Input(_)));
}

#[test]
fn axes_are_normalized_at_construction() {
    let inverted = VariationAxis::new(tag("wght"), 700.0, 400.0, 300.0);
    assert_eq!((inverted.min, inverted.max), (300.0, 700.0));
    assert_eq!(inverted.default, 400.0);
    assert_eq!(inverted.name, "Weight");

    let outside = VariationAxis::new(tag("XOPQ"), 10.0, 500.0, 100.0);
    assert_eq!(outside.default, 100.0);
    assert_eq!(outside.name, "XOPQ");
}

#[test]
fn stylistic_features_filter_and_dedup() {
    let entry = FontEntry::new(
        "Test Sans",
        FaceMetrics::default(),
        vec![tag("liga"), tag("smcp"), tag("ss02"), tag("smcp"), tag("kern")],
        vec![],
    );
    assert_eq!(entry.features.len(), 4);
    let styl: Vec<_> = entry.stylistic_features().collect();
    assert_eq!(styl, vec![tag("smcp"), tag("ss02")]);
    assert!(!entry.is_variable());
    assert!(entry.data().is_none());
}

#[test]
fn debug_does_not_dump_font_bytes() {
    let entry = FontEntry::new("Test Sans", FaceMetrics::default(), vec![], vec![]);
    let dbg = format!("{entry:?}");
    assert!(dbg.contains("Test Sans"));
    assert!(dbg.contains("data_len"));
}

#[test]
fn default_metrics_line_height() {
    let m = FaceMetrics::default();
    assert!((m.line_height() - 1.0).abs() < 1e-6);
}

fn flex_bytes() -> Vec<u8> {
    std::fs::read("tests/data/fonts/SuperShowFlex.ttf").unwrap()
}

#[test]
fn variable_font_file_parses_names_axes_and_features() {
    let entry = FontEntry::parse(flex_bytes(), "SuperShowFlex.ttf").unwrap();
    assert_eq!(entry.family_name, "SuperShow Flex");
    assert_eq!(entry.style_name, "Regular");
    assert_eq!(entry.full_name, "SuperShow Flex Regular");
    assert_eq!(entry.filename, "SuperShowFlex.ttf");
    assert_eq!(entry.units_per_em, 1000);
    assert_eq!(entry.glyph_count, 54);
    assert_eq!(entry.features, vec![tag("liga"), tag("smcp"), tag("ss01")]);
    assert_eq!(
        entry.stylistic_features().collect::<Vec<_>>(),
        vec![tag("smcp"), tag("ss01")]
    );

    assert!(entry.is_variable());
    let wght = entry.axis(tag("wght")).unwrap();
    assert_eq!((wght.min, wght.default, wght.max), (100.0, 400.0, 900.0));
    assert_eq!(wght.name, "Weight");
    let wdth = entry.axis(tag("wdth")).unwrap();
    assert_eq!((wdth.min, wdth.default, wdth.max), (75.0, 100.0, 125.0));
    assert_eq!(wdth.name, "Width");

    let m = entry.metrics;
    assert!((m.ascender - 0.8).abs() < 1e-6);
    assert!((m.descender + 0.2).abs() < 1e-6);
    assert!((m.line_height() - 1.0).abs() < 1e-6);
    // 52 letters at 500 units and a 250 unit space.
    let expected = (52.0 * 0.5 + 0.25) / 53.0;
    assert!((m.avg_advance - expected).abs() < 1e-5);
    assert_eq!(entry.data().map(|d| d.len()), Some(flex_bytes().len()));
}

#[test]
fn each_parse_gets_its_own_id() {
    let a = FontEntry::parse(flex_bytes(), "SuperShowFlex.ttf").unwrap();
    let b = FontEntry::parse(flex_bytes(), "SuperShowFlex-Copy.ttf").unwrap();
    assert_eq!(a.family_name, b.family_name);
    assert_ne!(a.id(), b.id());
    assert_ne!(a.id().alias(), b.id().alias());
    assert_eq!(a.clone().id(), a.id());

    let synthetic = FontEntry::new("SuperShow Flex", FaceMetrics::default(), vec![], vec![]);
    assert_ne!(synthetic.id(), a.id());
}
