use std::borrow::Cow;
use std::collections::HashMap;

use crate::fonts::entry::{FontEntry, FontId};
use crate::fonts::library::FontRegistrar;
use crate::foundation::core::Size;
use crate::foundation::error::{SuperShowError, SuperShowResult};
use crate::measure::service::TextMeasurer;
use crate::words::factory::WordDescriptor;

/// Shaping backend built on Parley contexts.
///
/// Fonts are registered from their file bytes under a per-font alias family, so two files of
/// one family never shadow each other. Layouts apply the word's size, variation settings and
/// feature settings before measuring the single line.
pub struct ParleyTextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    /// Font id -> family name as resolved by fontique.
    families: HashMap<FontId, String>,
}

impl std::fmt::Debug for ParleyTextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyTextEngine")
            .field("families", &self.families)
            .finish_non_exhaustive()
    }
}

impl Default for ParleyTextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyTextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Family name fontique resolved for a registered font.
    pub fn resolved_family(&self, font: FontId) -> Option<&str> {
        self.families.get(&font).map(String::as_str)
    }
}

impl FontRegistrar for ParleyTextEngine {
    #[tracing::instrument(
        skip(self, entry),
        fields(font = %entry.id(), family = %entry.family_name)
    )]
    fn register_font(&mut self, entry: &FontEntry) -> SuperShowResult<()> {
        let bytes = entry.data().ok_or_else(|| {
            SuperShowError::input(format!(
                "'{}' has no font data to register",
                entry.family_name
            ))
        })?;

        let alias = entry.id().alias();
        let registered = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(bytes.as_ref().clone()),
            Some(parley::fontique::FontInfoOverride {
                family_name: Some(alias.as_str()),
                ..Default::default()
            }),
        );
        let family_id = registered.first().map(|(id, _)| *id).ok_or_else(|| {
            SuperShowError::input(format!(
                "no font families registered from '{}'",
                entry.filename
            ))
        })?;
        let resolved = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SuperShowError::input("registered font family has no name"))?
            .to_string();

        tracing::debug!(resolved = %resolved, "registered with fontique");
        self.families.insert(entry.id(), resolved);
        Ok(())
    }

    fn is_font_ready(&self, font: FontId) -> bool {
        self.families.contains_key(&font)
    }
}

impl TextMeasurer for ParleyTextEngine {
    fn layout_extent(&mut self, word: &WordDescriptor) -> SuperShowResult<Size> {
        if !word.size_px.is_finite() || word.size_px <= 0.0 {
            return Err(SuperShowError::measurement("size_px must be finite and > 0"));
        }
        let font = word.font.id();
        let family = self.families.get(&font).cloned().ok_or_else(|| {
            SuperShowError::measurement(format!(
                "{font} ('{}') is not registered",
                word.family()
            ))
        })?;

        let text = word.text.as_str();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Named(Cow::Owned(
                family,
            ))),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(word.size_px));
        if let Some(settings) = word.variation_settings() {
            builder.push_default(parley::style::StyleProperty::FontVariations(
                parley::style::FontSettings::Source(Cow::Owned(settings)),
            ));
        }
        if let Some(settings) = word.feature_settings() {
            builder.push_default(parley::style::StyleProperty::FontFeatures(
                parley::style::FontSettings::Source(Cow::Owned(settings)),
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        Ok(Size::new(
            f64::from(layout.width()),
            f64::from(layout.height()),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/parley_engine.rs"]
mod tests;
