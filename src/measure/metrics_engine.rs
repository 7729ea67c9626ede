use std::collections::BTreeSet;

use crate::fonts::entry::{FontEntry, FontId};
use crate::fonts::library::FontRegistrar;
use crate::foundation::core::{Size, Tag};
use crate::foundation::error::{SuperShowError, SuperShowResult};
use crate::measure::service::TextMeasurer;
use crate::words::factory::WordDescriptor;

const WDTH: Tag = Tag::from_bytes(*b"wdth");

/// Headless text backend that sizes words from parsed face metrics alone.
///
/// Width scales with the `wdth` axis value (percent of normal) when one is set.
#[derive(Clone, Debug, Default)]
pub struct MetricsTextEngine {
    registered: BTreeSet<FontId>,
    held: BTreeSet<FontId>,
}

impl MetricsTextEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `font` from ever reporting ready, as if it never finished loading.
    pub fn hold_font(&mut self, font: FontId) {
        self.held.insert(font);
    }

    pub fn release_font(&mut self, font: FontId) {
        self.held.remove(&font);
    }

    pub fn registered_fonts(&self) -> impl Iterator<Item = FontId> + '_ {
        self.registered.iter().copied()
    }
}

impl FontRegistrar for MetricsTextEngine {
    fn register_font(&mut self, entry: &FontEntry) -> SuperShowResult<()> {
        if entry.family_name.trim().is_empty() {
            return Err(SuperShowError::input("font has an empty family name"));
        }
        self.registered.insert(entry.id());
        Ok(())
    }

    fn is_font_ready(&self, font: FontId) -> bool {
        self.registered.contains(&font) && !self.held.contains(&font)
    }
}

impl TextMeasurer for MetricsTextEngine {
    fn layout_extent(&mut self, word: &WordDescriptor) -> SuperShowResult<Size> {
        let font = word.font.id();
        if !self.registered.contains(&font) {
            return Err(SuperShowError::measurement(format!(
                "{font} ('{}') is not registered",
                word.family()
            )));
        }
        if !word.size_px.is_finite() || word.size_px <= 0.0 {
            return Err(SuperShowError::measurement("size_px must be finite and > 0"));
        }

        let m = &word.font.metrics;
        let size = f64::from(word.size_px);
        let width_scale = word
            .variations
            .iter()
            .find(|v| v.tag == WDTH)
            .map(|v| f64::from(v.value) / 100.0)
            .unwrap_or(1.0);
        let chars = word.text.chars().count() as f64;
        Ok(Size::new(
            f64::from(m.avg_advance) * size * chars * width_scale,
            f64::from(m.line_height()) * size,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/metrics_engine.rs"]
mod tests;
