use std::collections::{BTreeSet, HashMap};

use crate::fonts::entry::FontId;
use crate::fonts::library::FontRegistrar;
use crate::foundation::core::{Size, Tag, Timestamp, rotated_bounds};
use crate::foundation::error::{SuperShowError, SuperShowResult};
use crate::foundation::math::Fnv1a64;
use crate::words::factory::WordDescriptor;

/// A text backend that can lay out a word once its font is registered.
pub trait TextMeasurer: FontRegistrar {
    /// Unrotated layout extent of `word` in pixels.
    fn layout_extent(&mut self, word: &WordDescriptor) -> SuperShowResult<Size>;
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Wait after a font first reports ready, before its first layout.
    pub settle_ms: f64,
    /// Requests older than this resolve to an estimate.
    pub timeout_ms: f64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            settle_ms: 50.0,
            timeout_ms: 5000.0,
        }
    }
}

impl MeasureConfig {
    pub fn validate(&self) -> SuperShowResult<()> {
        if !(self.settle_ms.is_finite() && self.settle_ms >= 0.0) {
            return Err(SuperShowError::validation("settle_ms must be finite and >= 0"));
        }
        if !(self.timeout_ms.is_finite() && self.timeout_ms > 0.0) {
            return Err(SuperShowError::validation("timeout_ms must be finite and > 0"));
        }
        Ok(())
    }
}

/// Why metrics were estimated instead of laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum EstimateReason {
    Timeout,
    LayoutFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum MetricsOrigin {
    Layout,
    Estimated(EstimateReason),
}

/// Measured size of a word. `bounds` is the axis-aligned box after rotation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct WordMetrics {
    pub width: f64,
    pub height: f64,
    pub rotation_deg: f64,
    pub bounds: Size,
    pub origin: MetricsOrigin,
}

impl WordMetrics {
    pub fn new(extent: Size, rotation_deg: f64, origin: MetricsOrigin) -> Self {
        Self {
            width: extent.width,
            height: extent.height,
            rotation_deg,
            bounds: rotated_bounds(extent, rotation_deg),
            origin,
        }
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self.origin, MetricsOrigin::Estimated(_))
    }
}

/// Cache identity of a descriptor's rendered appearance.
///
/// Holds every field that affects layout, so equal keys always mean equal appearance. The FNV
/// digest only feeds `Hash`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasureKey {
    digest: u64,
    text: String,
    font: FontId,
    size_bits: u32,
    feature: Option<Tag>,
    variations: Vec<(Tag, u32)>,
    rotation_bits: u64,
}

impl MeasureKey {
    pub fn of(word: &WordDescriptor) -> Self {
        let font = word.font.id();
        let size_bits = word.size_px.to_bits();
        let variations: Vec<(Tag, u32)> = word
            .variations
            .iter()
            .map(|v| (v.tag, v.value.to_bits()))
            .collect();
        let rotation_bits = word.rotation_deg.to_bits();

        let mut h = Fnv1a64::new_default();
        h.write_str(&word.text);
        h.write_u64(font.get());
        h.write_u32(size_bits);
        match word.feature {
            Some(t) => {
                h.write_u8(1);
                h.write_bytes(&t.to_bytes());
            }
            None => h.write_u8(0),
        }
        h.write_u64(variations.len() as u64);
        for (tag, bits) in &variations {
            h.write_bytes(&tag.to_bytes());
            h.write_u32(*bits);
        }
        h.write_u64(rotation_bits);

        Self {
            digest: h.finish(),
            text: word.text.clone(),
            font,
            size_bits,
            feature: word.feature,
            variations,
            rotation_bits,
        }
    }

    pub fn digest(&self) -> u64 {
        self.digest
    }

    pub fn font(&self) -> FontId {
        self.font
    }
}

impl std::hash::Hash for MeasureKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.digest);
    }
}

/// A measurement waiting for its font.
#[derive(Clone, Debug)]
pub struct MeasureRequest {
    pub descriptor: WordDescriptor,
    pub issued_at: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasurePoll {
    Pending,
    Ready(WordMetrics),
}

/// Cache-or-layout measurement in front of a [`TextMeasurer`].
#[derive(Debug)]
pub struct MeasurementService<B> {
    backend: B,
    config: MeasureConfig,
    cache: HashMap<MeasureKey, WordMetrics>,
    ready_since: HashMap<FontId, Timestamp>,
    settled: BTreeSet<FontId>,
    layout_passes: u64,
}

impl<B: TextMeasurer> MeasurementService<B> {
    pub fn new(backend: B, config: MeasureConfig) -> Self {
        Self {
            backend,
            config,
            cache: HashMap::new(),
            ready_since: HashMap::new(),
            settled: BTreeSet::new(),
            layout_passes: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Number of backend layouts performed so far; cache hits do not count.
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Measure immediately. Layout failures fall back to an estimate and are not cached.
    pub fn measure_word(&mut self, word: &WordDescriptor) -> WordMetrics {
        let key = MeasureKey::of(word);
        if let Some(hit) = self.cache.get(&key) {
            return *hit;
        }

        self.layout_passes += 1;
        match self.backend.layout_extent(word) {
            Ok(extent) if extent.width.is_finite() && extent.height.is_finite() => {
                let metrics = WordMetrics::new(extent, word.rotation_deg, MetricsOrigin::Layout);
                self.cache.insert(key, metrics);
                metrics
            }
            Ok(extent) => {
                tracing::warn!(text = %word.text, ?extent, "layout returned a non-finite extent");
                Self::estimate(word, EstimateReason::LayoutFailed)
            }
            Err(err) => {
                tracing::warn!(text = %word.text, family = word.family(), error = %err, "layout failed, estimating");
                Self::estimate(word, EstimateReason::LayoutFailed)
            }
        }
    }

    /// Resolve `request` if its font is ready and settled, or once it timed out.
    pub fn poll(&mut self, request: &MeasureRequest, now: Timestamp) -> MeasurePoll {
        let word = &request.descriptor;
        if let Some(hit) = self.cache.get(&MeasureKey::of(word)) {
            return MeasurePoll::Ready(*hit);
        }

        if now.since(request.issued_at) >= self.config.timeout_ms {
            tracing::warn!(
                text = %word.text,
                family = word.family(),
                waited_ms = now.since(request.issued_at),
                "font never became ready, estimating"
            );
            return MeasurePoll::Ready(Self::estimate(word, EstimateReason::Timeout));
        }

        let font = word.font.id();
        if !self.settled.contains(&font) {
            if !self.backend.is_font_ready(font) {
                return MeasurePoll::Pending;
            }
            let since = *self.ready_since.entry(font).or_insert(now);
            if now.since(since) < self.config.settle_ms {
                return MeasurePoll::Pending;
            }
            tracing::debug!(%font, family = word.family(), "font settled");
            self.ready_since.remove(&font);
            self.settled.insert(font);
        }

        MeasurePoll::Ready(self.measure_word(word))
    }

    /// Size guess from the parsed face metrics: `avg_advance · size · chars` by line height.
    pub fn estimate(word: &WordDescriptor, reason: EstimateReason) -> WordMetrics {
        let m = &word.font.metrics;
        let size = f64::from(word.size_px);
        let chars = word.text.chars().count() as f64;
        let extent = Size::new(
            f64::from(m.avg_advance) * size * chars,
            f64::from(m.line_height()) * size,
        );
        WordMetrics::new(extent, word.rotation_deg, MetricsOrigin::Estimated(reason))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/measure/service.rs"]
mod tests;
