use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::Tag;
use crate::foundation::error::{SuperShowError, SuperShowResult};

/// Font container formats accepted on drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FontFormat {
    /// TrueType outlines (`.ttf`).
    TrueType,
    /// OpenType/CFF (`.otf`).
    OpenType,
    /// TrueType/OpenType collection (`.ttc`); the first face is used.
    Collection,
}

impl FontFormat {
    /// Classify a dropped file by extension.
    pub fn from_filename(filename: &str) -> SuperShowResult<Self> {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .ok_or_else(|| {
                SuperShowError::input(format!("'{filename}' has no font file extension"))
            })?;
        match ext.as_str() {
            "ttf" => Ok(Self::TrueType),
            "otf" => Ok(Self::OpenType),
            "ttc" | "otc" => Ok(Self::Collection),
            "woff" | "woff2" => Err(SuperShowError::input(format!(
                "'{filename}': compressed web fonts are not supported, drop a .ttf or .otf"
            ))),
            _ => Err(SuperShowError::input(format!(
                "'{filename}': unsupported file extension '.{ext}'"
            ))),
        }
    }
}

/// Vertical and horizontal face metrics normalized to the em (1.0 == unitsPerEm).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaceMetrics {
    pub ascender: f32,
    /// Negative below the baseline.
    pub descender: f32,
    pub line_gap: f32,
    /// Mean advance of the printable ASCII glyphs the face maps.
    pub avg_advance: f32,
}

impl FaceMetrics {
    pub fn line_height(&self) -> f32 {
        self.ascender - self.descender + self.line_gap
    }
}

impl Default for FaceMetrics {
    fn default() -> Self {
        Self {
            ascender: 0.8,
            descender: -0.2,
            line_gap: 0.0,
            avg_advance: 0.5,
        }
    }
}

/// One `fvar` design axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariationAxis {
    pub tag: Tag,
    /// Human readable name (`Weight`, `Width`, ... or the font's own axis name).
    pub name: String,
    pub min: f32,
    pub default: f32,
    pub max: f32,
}

impl VariationAxis {
    pub fn new(tag: Tag, min: f32, default: f32, max: f32) -> Self {
        Self {
            tag,
            name: registered_axis_name(tag)
                .map(str::to_string)
                .unwrap_or_else(|| tag.to_string()),
            min,
            default,
            max,
        }
        .normalized()
    }

    /// Swap an inverted range and pull the default inside it.
    pub fn normalized(mut self) -> Self {
        if self.min > self.max {
            std::mem::swap(&mut self.min, &mut self.max);
        }
        self.default = self.default.clamp(self.min, self.max);
        self
    }

    pub fn contains(&self, v: f32) -> bool {
        self.min <= v && v <= self.max
    }
}

fn registered_axis_name(tag: Tag) -> Option<&'static str> {
    match &tag.to_bytes() {
        b"wght" => Some("Weight"),
        b"wdth" => Some("Width"),
        b"ital" => Some("Italic"),
        b"slnt" => Some("Slant"),
        b"opsz" => Some("Optical Size"),
        _ => None,
    }
}

static NEXT_FONT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one parsed font.
///
/// Files of one family (Regular, Bold, ...) share a family name, so caches and text backends
/// key on this instead. Clones of an entry keep its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct FontId(u64);

impl FontId {
    fn next() -> Self {
        Self(NEXT_FONT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Family name the font is registered under with a text backend.
    pub fn alias(self) -> String {
        format!("supershow-font-{}", self.0)
    }
}

impl std::fmt::Display for FontId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "font{}", self.0)
    }
}

/// A font parsed once at drop time. Immutable and shared for the session lifetime.
#[derive(Clone, serde::Serialize)]
pub struct FontEntry {
    id: FontId,
    pub family_name: String,
    pub style_name: String,
    pub full_name: String,
    pub filename: String,
    pub units_per_em: u16,
    pub glyph_count: u16,
    pub metrics: FaceMetrics,
    /// GSUB feature tags in table order, deduplicated.
    pub features: Vec<Tag>,
    pub axes: Vec<VariationAxis>,
    #[serde(skip)]
    data: Option<Arc<Vec<u8>>>,
}

impl std::fmt::Debug for FontEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontEntry")
            .field("id", &self.id)
            .field("family_name", &self.family_name)
            .field("style_name", &self.style_name)
            .field("features", &self.features)
            .field("axes", &self.axes)
            .field("data_len", &self.data.as_ref().map(|d| d.len()))
            .finish()
    }
}

impl FontEntry {
    /// Build an entry without font bytes (metrics-only backends, tests, previews).
    pub fn new(
        family_name: impl Into<String>,
        metrics: FaceMetrics,
        features: Vec<Tag>,
        axes: Vec<VariationAxis>,
    ) -> Self {
        let family_name = family_name.into();
        Self {
            id: FontId::next(),
            full_name: family_name.clone(),
            family_name,
            style_name: "Regular".to_string(),
            filename: String::new(),
            units_per_em: 1000,
            glyph_count: 0,
            metrics,
            features: dedup_tags(features),
            axes: axes.into_iter().map(VariationAxis::normalized).collect(),
            data: None,
        }
    }

    /// Parse raw font file bytes. Any failure is an input error for the user.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn parse(bytes: Vec<u8>, filename: &str) -> SuperShowResult<Self> {
        let format = FontFormat::from_filename(filename)?;
        let face = ttf_parser::Face::parse(&bytes, 0).map_err(|e| {
            SuperShowError::input(format!("'{filename}' is not a valid {format:?} font: {e}"))
        })?;

        let family_name = find_name(
            &face,
            &[
                ttf_parser::name_id::TYPOGRAPHIC_FAMILY,
                ttf_parser::name_id::FAMILY,
                ttf_parser::name_id::FULL_NAME,
                ttf_parser::name_id::POST_SCRIPT_NAME,
            ],
        )
        .ok_or_else(|| {
            SuperShowError::input(format!("'{filename}' has no usable family name"))
        })?;
        let style_name = find_name(
            &face,
            &[
                ttf_parser::name_id::TYPOGRAPHIC_SUBFAMILY,
                ttf_parser::name_id::SUBFAMILY,
            ],
        )
        .unwrap_or_else(|| "Regular".to_string());
        let full_name = find_name(&face, &[ttf_parser::name_id::FULL_NAME])
            .unwrap_or_else(|| format!("{family_name} {style_name}"));

        let units_per_em = face.units_per_em();
        let metrics = face_metrics(&face);
        let features = gsub_feature_tags(&face);
        let axes = variation_axes(&face);
        let glyph_count = face.number_of_glyphs();

        tracing::debug!(
            family = %family_name,
            features = features.len(),
            axes = axes.len(),
            "parsed font"
        );

        Ok(Self {
            id: FontId::next(),
            family_name,
            style_name,
            full_name,
            filename: filename.to_string(),
            units_per_em,
            glyph_count,
            metrics,
            features,
            axes,
            data: Some(Arc::new(bytes)),
        })
    }

    pub fn id(&self) -> FontId {
        self.id
    }

    /// Font file bytes, absent for entries built with [`FontEntry::new`].
    pub fn data(&self) -> Option<&Arc<Vec<u8>>> {
        self.data.as_ref()
    }

    /// Small caps and stylistic sets; the only features the word factory toggles.
    pub fn stylistic_features(&self) -> impl Iterator<Item = Tag> + '_ {
        self.features.iter().copied().filter(|t| t.is_stylistic())
    }

    pub fn axis(&self, tag: Tag) -> Option<&VariationAxis> {
        self.axes.iter().find(|a| a.tag == tag)
    }

    pub fn is_variable(&self) -> bool {
        !self.axes.is_empty()
    }
}

fn find_name(face: &ttf_parser::Face<'_>, ids: &[u16]) -> Option<String> {
    for &id in ids {
        let found = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == id)
            .find_map(|n| n.to_string())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if found.is_some() {
            return found;
        }
    }
    None
}

fn face_metrics(face: &ttf_parser::Face<'_>) -> FaceMetrics {
    let upem = f32::from(face.units_per_em().max(1));
    let mut total = 0.0f32;
    let mut count = 0u32;
    for byte in 32u8..=126 {
        let Some(gid) = face.glyph_index(char::from(byte)) else {
            continue;
        };
        if let Some(adv) = face.glyph_hor_advance(gid) {
            total += f32::from(adv) / upem;
            count += 1;
        }
    }
    let fallback = FaceMetrics::default();
    FaceMetrics {
        ascender: f32::from(face.ascender()) / upem,
        descender: f32::from(face.descender()) / upem,
        line_gap: f32::from(face.line_gap()) / upem,
        avg_advance: if count > 0 {
            total / count as f32
        } else {
            fallback.avg_advance
        },
    }
}

fn gsub_feature_tags(face: &ttf_parser::Face<'_>) -> Vec<Tag> {
    let Some(gsub) = face.tables().gsub else {
        return Vec::new();
    };
    let mut tags = Vec::new();
    for i in 0..gsub.features.len() {
        if let Some(feature) = gsub.features.get(i) {
            tags.push(Tag::from_bytes(feature.tag.to_bytes()));
        }
    }
    dedup_tags(tags)
}

fn variation_axes(face: &ttf_parser::Face<'_>) -> Vec<VariationAxis> {
    face.variation_axes()
        .into_iter()
        .filter(|a| !a.hidden)
        .map(|a| {
            let tag = Tag::from_bytes(a.tag.to_bytes());
            let name = registered_axis_name(tag)
                .map(str::to_string)
                .or_else(|| find_name(face, &[a.name_id]))
                .unwrap_or_else(|| tag.to_string());
            VariationAxis {
                tag,
                name,
                min: a.min_value,
                default: a.def_value,
                max: a.max_value,
            }
            .normalized()
        })
        .collect()
}

fn dedup_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut seen = std::collections::BTreeSet::new();
    tags.into_iter().filter(|t| seen.insert(*t)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/entry.rs"]
mod tests;
