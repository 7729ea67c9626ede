use std::sync::Arc;

use crate::fonts::entry::{FontEntry, FontId};
use crate::foundation::error::SuperShowResult;

/// Makes a parsed font usable by a text backend.
pub trait FontRegistrar {
    /// Register `entry` so later layouts select exactly this font by `entry.id()`.
    fn register_font(&mut self, entry: &FontEntry) -> SuperShowResult<()>;

    /// Whether text in `font` can be laid out yet.
    fn is_font_ready(&self, font: FontId) -> bool;
}

/// Fonts loaded during the session, in drop order.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    fonts: Vec<Arc<FontEntry>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse, register and append a dropped font file.
    ///
    /// On error the library is left unchanged; the error is meant to be shown to the user.
    pub fn load(
        &mut self,
        bytes: Vec<u8>,
        filename: &str,
        registrar: &mut dyn FontRegistrar,
    ) -> SuperShowResult<Arc<FontEntry>> {
        let entry = FontEntry::parse(bytes, filename)?;
        self.insert(entry, registrar)
    }

    /// Register and append an already parsed entry.
    pub fn insert(
        &mut self,
        entry: FontEntry,
        registrar: &mut dyn FontRegistrar,
    ) -> SuperShowResult<Arc<FontEntry>> {
        registrar.register_font(&entry)?;
        let entry = Arc::new(entry);
        self.fonts.push(Arc::clone(&entry));
        tracing::info!(
            font = %entry.id(),
            family = %entry.family_name,
            total = self.fonts.len(),
            "font loaded"
        );
        Ok(entry)
    }

    pub fn fonts(&self) -> &[Arc<FontEntry>] {
        &self.fonts
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Uniformly random font, `None` while the library is empty.
    pub fn pick(&self, rng: &mut fastrand::Rng) -> Option<&Arc<FontEntry>> {
        if self.fonts.is_empty() {
            return None;
        }
        self.fonts.get(rng.usize(..self.fonts.len()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/library.rs"]
mod tests;
