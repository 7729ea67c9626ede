use super::*;
use crate::fonts::entry::{FaceMetrics, FontId};
use crate::foundation::error::SuperShowError;

#[derive(Default)]
struct RecordingRegistrar {
    families: Vec<String>,
    ids: Vec<FontId>,
    refuse: bool,
}

impl FontRegistrar for RecordingRegistrar {
    fn register_font(&mut self, entry: &FontEntry) -> SuperShowResult<()> {
        if self.refuse {
            return Err(SuperShowError::input("registration refused"));
        }
        self.families.push(entry.family_name.clone());
        self.ids.push(entry.id());
        Ok(())
    }

    fn is_font_ready(&self, font: FontId) -> bool {
        self.ids.contains(&font)
    }
}

#[test]
fn invalid_font_leaves_library_unchanged() {
    let mut lib = FontLibrary::new();
    let mut reg = RecordingRegistrar::default();
    lib.insert(
        FontEntry::new("Kept", FaceMetrics::default(), vec![], vec![]),
        &mut reg,
    )
    .unwrap();

    let err = lib
        .load(b"not a font".to_vec(), "fake.otf", &mut reg)
        .unwrap_err();
    assert!(err.is_user_facing());
    assert_eq!(lib.len(), 1);
    assert_eq!(reg.families, vec!["Kept".to_string()]);
}

#[test]
fn registration_failure_is_not_recorded() {
    let mut lib = FontLibrary::new();
    let mut reg = RecordingRegistrar {
        refuse: true,
        ..Default::default()
    };
    let res = lib.insert(
        FontEntry::new("Nope", FaceMetrics::default(), vec![], vec![]),
        &mut reg,
    );
    assert!(res.is_err());
    assert!(lib.is_empty());
}

#[test]
fn pick_is_none_when_empty_and_covers_all_fonts() {
    let mut rng = fastrand::Rng::with_seed(3);
    let mut lib = FontLibrary::new();
    assert!(lib.pick(&mut rng).is_none());

    let mut reg = RecordingRegistrar::default();
    for name in ["A", "B", "C"] {
        lib.insert(
            FontEntry::new(name, FaceMetrics::default(), vec![], vec![]),
            &mut reg,
        )
        .unwrap();
    }
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..200 {
        seen.insert(lib.pick(&mut rng).unwrap().family_name.clone());
    }
    assert_eq!(seen.len(), 3);
    assert!(lib.fonts().iter().all(|f| reg.is_font_ready(f.id())));
}
