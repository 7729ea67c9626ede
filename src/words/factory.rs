use std::collections::BTreeMap;
use std::sync::Arc;

use crate::fonts::entry::{FontEntry, VariationAxis};
use crate::fonts::library::FontLibrary;
use crate::foundation::core::Tag;
use crate::foundation::error::{SuperShowError, SuperShowResult};
use crate::foundation::math::{gaussian, round_to, uniform};
use crate::words::list::WordList;

/// Display case chosen for a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CaseVariant {
    Lower,
    Upper,
    Capitalized,
    /// Source word already had uppercase letters and was left alone.
    Preserved,
}

/// Probabilities for [`transform_case`]; the remainder is lowercase.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaseProbabilities {
    pub uppercase: f64,
    /// Checked after `uppercase`, so the capitalize band is `[uppercase, uppercase + capitalize)`.
    pub capitalize: f64,
}

impl Default for CaseProbabilities {
    fn default() -> Self {
        Self {
            uppercase: 0.10,
            capitalize: 0.20,
        }
    }
}

/// Distribution used for variable-axis values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AxisSampling {
    /// Uniform over `[min, max]`.
    Uniform,
    /// Normal around the axis default (sigma = a third of each half range), clipped.
    #[default]
    Gaussian,
}

/// Distribution used for font sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SizeDistribution {
    #[default]
    Uniform,
    /// Biased toward small sizes (`min + r² · (max − min)`).
    Squared,
}

/// Narrowing applied to an axis before sampling.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub case: CaseProbabilities,
    /// Chance of enabling one stylistic feature on a word.
    pub feature_probability: f64,
    pub axis_sampling: AxisSampling,
    pub axis_overrides: BTreeMap<Tag, AxisRange>,
    pub min_size_px: f32,
    pub max_size_px: f32,
    pub size_distribution: SizeDistribution,
    /// Words are rotated uniformly in `[-rotation_range_deg, rotation_range_deg]`.
    pub rotation_range_deg: f64,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            case: CaseProbabilities::default(),
            feature_probability: 0.30,
            axis_sampling: AxisSampling::Gaussian,
            axis_overrides: BTreeMap::new(),
            min_size_px: 14.0,
            max_size_px: 108.0,
            size_distribution: SizeDistribution::Uniform,
            rotation_range_deg: 0.0,
        }
    }
}

impl FactoryConfig {
    pub fn validate(&self) -> SuperShowResult<()> {
        let p = |v: f64| (0.0..=1.0).contains(&v);
        if !p(self.case.uppercase) || !p(self.case.capitalize) {
            return Err(SuperShowError::validation(
                "case probabilities must be within [0, 1]",
            ));
        }
        if self.case.uppercase + self.case.capitalize > 1.0 {
            return Err(SuperShowError::validation(
                "uppercase + capitalize probability must be <= 1",
            ));
        }
        if !p(self.feature_probability) {
            return Err(SuperShowError::validation(
                "feature_probability must be within [0, 1]",
            ));
        }
        if !(self.min_size_px.is_finite() && self.min_size_px > 0.0)
            || !(self.max_size_px.is_finite() && self.max_size_px >= self.min_size_px)
        {
            return Err(SuperShowError::validation(
                "font sizes must be finite, > 0 and min_size_px <= max_size_px",
            ));
        }
        if !(self.rotation_range_deg.is_finite() && (0.0..=180.0).contains(&self.rotation_range_deg))
        {
            return Err(SuperShowError::validation(
                "rotation_range_deg must be within [0, 180]",
            ));
        }
        for (tag, r) in &self.axis_overrides {
            if !(r.min.is_finite() && r.max.is_finite() && r.min <= r.max) {
                return Err(SuperShowError::validation(format!(
                    "axis override '{tag}' must have finite min <= max"
                )));
            }
        }
        Ok(())
    }
}

/// One sampled variation setting.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisValue {
    pub tag: Tag,
    pub value: f32,
}

/// Everything needed to render one stream word. Immutable once created.
#[derive(Clone, Debug, serde::Serialize)]
pub struct WordDescriptor {
    pub text: String,
    #[serde(rename = "font_family", serialize_with = "serialize_family")]
    pub font: Arc<FontEntry>,
    pub size_px: f32,
    pub case: CaseVariant,
    pub feature: Option<Tag>,
    pub variations: Vec<AxisValue>,
    pub rotation_deg: f64,
}

fn serialize_family<S: serde::Serializer>(font: &Arc<FontEntry>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&font.family_name)
}

impl WordDescriptor {
    pub fn family(&self) -> &str {
        &self.font.family_name
    }

    /// CSS `font-feature-settings` value, e.g. `"smcp" 1`.
    pub fn feature_settings(&self) -> Option<String> {
        self.feature.map(|t| format!("\"{t}\" 1"))
    }

    /// CSS `font-variation-settings` value, e.g. `"wght" 412.5, "wdth" 100`.
    pub fn variation_settings(&self) -> Option<String> {
        if self.variations.is_empty() {
            return None;
        }
        Some(
            self.variations
                .iter()
                .map(|v| format!("\"{}\" {}", v.tag, v.value))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Apply the configured case mix to a word; words that are not all lowercase pass through.
pub fn transform_case(
    word: &str,
    probs: &CaseProbabilities,
    rng: &mut fastrand::Rng,
) -> (String, CaseVariant) {
    if word != word.to_lowercase() {
        return (word.to_string(), CaseVariant::Preserved);
    }
    let r = rng.f64();
    if r < probs.uppercase {
        (word.to_uppercase(), CaseVariant::Upper)
    } else if r < probs.uppercase + probs.capitalize {
        (capitalize(word), CaseVariant::Capitalized)
    } else {
        (word.to_string(), CaseVariant::Lower)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Sample one axis value; always within `[axis.min, axis.max]`.
pub fn sample_axis(
    axis: &VariationAxis,
    range: Option<&AxisRange>,
    sampling: AxisSampling,
    rng: &mut fastrand::Rng,
) -> f32 {
    let (mut lo, mut hi) = (f64::from(axis.min), f64::from(axis.max));
    if let Some(r) = range {
        let (nlo, nhi) = (lo.max(f64::from(r.min)), hi.min(f64::from(r.max)));
        // An override disjoint from the font's own range is ignored.
        if nlo <= nhi {
            (lo, hi) = (nlo, nhi);
        }
    }
    let center = f64::from(axis.default).clamp(lo, hi);

    let v = match sampling {
        AxisSampling::Uniform => uniform(rng, lo, hi),
        AxisSampling::Gaussian => {
            let g = gaussian(rng);
            if g > 0.0 {
                center + (g / 3.0) * (hi - center)
            } else {
                center + (g / 3.0) * (center - lo)
            }
        }
    };

    (round_to(v.clamp(lo, hi), 2).clamp(lo, hi)) as f32
}

/// Produces random [`WordDescriptor`]s from the loaded words and fonts.
#[derive(Clone, Debug, Default)]
pub struct WordFactory {
    config: FactoryConfig,
    words: WordList,
}

impl WordFactory {
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            config,
            words: WordList::default(),
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn set_words(&mut self, words: WordList) {
        self.words = words;
    }

    /// `None` until at least one word and one font are loaded.
    pub fn create_word(
        &self,
        fonts: &FontLibrary,
        rng: &mut fastrand::Rng,
    ) -> Option<WordDescriptor> {
        let word = self.words.pick(rng)?;
        let font = Arc::clone(fonts.pick(rng)?);

        let (text, case) = transform_case(word, &self.config.case, rng);
        let size_px = self.sample_size(rng);
        let variations = self.sample_variations(&font, rng);
        let feature = self.pick_feature(&font, rng);
        let rotation_deg = if self.config.rotation_range_deg > 0.0 {
            uniform(
                rng,
                -self.config.rotation_range_deg,
                self.config.rotation_range_deg,
            )
        } else {
            0.0
        };

        tracing::trace!(%text, family = %font.family_name, size_px, ?feature, "created word");
        Some(WordDescriptor {
            text,
            font,
            size_px,
            case,
            feature,
            variations,
            rotation_deg,
        })
    }

    pub fn sample_size(&self, rng: &mut fastrand::Rng) -> f32 {
        let (lo, hi) = (self.config.min_size_px, self.config.max_size_px);
        let r = rng.f32();
        let t = match self.config.size_distribution {
            SizeDistribution::Uniform => r,
            SizeDistribution::Squared => r * r,
        };
        (lo + t * (hi - lo)).clamp(lo, hi)
    }

    pub fn sample_variations(&self, font: &FontEntry, rng: &mut fastrand::Rng) -> Vec<AxisValue> {
        font.axes
            .iter()
            .map(|axis| AxisValue {
                tag: axis.tag,
                value: sample_axis(
                    axis,
                    self.config.axis_overrides.get(&axis.tag),
                    self.config.axis_sampling,
                    rng,
                ),
            })
            .collect()
    }

    pub fn pick_feature(&self, font: &FontEntry, rng: &mut fastrand::Rng) -> Option<Tag> {
        let candidates: Vec<Tag> = font.stylistic_features().collect();
        if candidates.is_empty() || rng.f64() >= self.config.feature_probability {
            return None;
        }
        candidates.get(rng.usize(..candidates.len())).copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/words/factory.rs"]
mod tests;
