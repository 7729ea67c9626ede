use std::path::PathBuf;

use anyhow::Context as _;

/// Built-in list used whenever the word resource cannot be loaded or is empty.
pub const FALLBACK_WORDS: [&str; 4] = ["Typography", "Design", "Letters", "Words"];

/// Where the newline-delimited word resource comes from.
pub trait WordListSource {
    /// Human readable location for logs.
    fn describe(&self) -> String;

    /// Fetch the raw resource text.
    fn fetch(&self) -> anyhow::Result<String>;
}

/// Word list read from the local filesystem.
#[derive(Clone, Debug)]
pub struct FileWordSource {
    pub path: PathBuf,
}

impl FileWordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WordListSource for FileWordSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> anyhow::Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("read word list '{}'", self.path.display()))
    }
}

/// Word list fetched over HTTP(S).
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct HttpWordSource {
    pub url: String,
}

#[cfg(feature = "http")]
impl HttpWordSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(feature = "http")]
impl WordListSource for HttpWordSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> anyhow::Result<String> {
        let mut resp = ureq::get(&self.url)
            .call()
            .with_context(|| format!("GET {}", self.url))?;
        resp.body_mut()
            .read_to_string()
            .with_context(|| format!("read body of {}", self.url))
    }
}

/// How the current list was obtained.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum WordListOrigin {
    /// Nothing loaded yet.
    Unloaded,
    /// Loaded from the described source.
    Source(String),
    /// The source failed or was empty; [`FALLBACK_WORDS`] are in use.
    Fallback,
}

/// Candidate words for the stream.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct WordList {
    words: Vec<String>,
    origin: WordListOrigin,
}

impl Default for WordList {
    fn default() -> Self {
        Self {
            words: Vec::new(),
            origin: WordListOrigin::Unloaded,
        }
    }
}

impl WordList {
    pub fn fallback() -> Self {
        Self {
            words: FALLBACK_WORDS.iter().map(|w| w.to_string()).collect(),
            origin: WordListOrigin::Fallback,
        }
    }

    /// Build from explicit words, dropping blanks.
    pub fn from_words<I, S>(words: I, origin: WordListOrigin) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_string())
                .filter(|w| !w.is_empty())
                .collect(),
            origin,
        }
    }

    /// Split newline-delimited text into trimmed, non-empty words.
    pub fn parse(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Load from `source`. Never fails: errors and empty lists fall back to [`FALLBACK_WORDS`].
    pub fn load(source: &dyn WordListSource) -> Self {
        let label = source.describe();
        match source.fetch() {
            Ok(text) => {
                let words = Self::parse(&text);
                if words.is_empty() {
                    tracing::warn!(source = %label, "word list was empty, using fallback words");
                    return Self::fallback();
                }
                tracing::info!(source = %label, count = words.len(), "loaded word list");
                Self {
                    words,
                    origin: WordListOrigin::Source(label),
                }
            }
            Err(err) => {
                tracing::warn!(source = %label, error = %format!("{err:#}"), "word list load failed, using fallback words");
                Self::fallback()
            }
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn origin(&self) -> &WordListOrigin {
        &self.origin
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == WordListOrigin::Fallback
    }

    /// Uniformly random word, `None` while empty.
    pub fn pick(&self, rng: &mut fastrand::Rng) -> Option<&str> {
        if self.words.is_empty() {
            return None;
        }
        self.words.get(rng.usize(..self.words.len())).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/words/list.rs"]
mod tests;
