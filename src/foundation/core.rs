use crate::foundation::error::{SuperShowError, SuperShowResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Milliseconds on the tick clock (the time base of animation-frame callbacks).
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Timestamp(pub f64);

impl Timestamp {
    pub const ZERO: Self = Self(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Self(ms)
    }

    pub fn from_secs(secs: f64) -> Self {
        Self(secs * 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn add_millis(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }
}

/// Visible viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> SuperShowResult<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(SuperShowError::validation(
                "viewport width and height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Visible region grown by `padding` on every side; words enter and leave through it.
    pub fn extended(self, padding: f64) -> Rect {
        self.rect().inflate(padding, padding)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Four-byte OpenType tag (feature or variation axis), e.g. `smcp` or `wght`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag([u8; 4]);

impl Tag {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Parse a tag from up to four printable ASCII characters; short tags are space padded.
    pub fn new(s: &str) -> SuperShowResult<Self> {
        let raw = s.as_bytes();
        if raw.is_empty() || raw.len() > 4 {
            return Err(SuperShowError::validation(format!(
                "tag '{s}' must be 1 to 4 characters"
            )));
        }
        if !raw.iter().all(|b| (0x20..=0x7e).contains(b)) {
            return Err(SuperShowError::validation(format!(
                "tag '{s}' must be printable ASCII"
            )));
        }
        let mut bytes = [b' '; 4];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self(bytes))
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    /// Small caps or one of the stylistic sets `ss01`..`ss20`.
    pub fn is_stylistic(self) -> bool {
        if &self.0 == b"smcp" {
            return true;
        }
        if &self.0[..2] != b"ss" || !self.0[2].is_ascii_digit() || !self.0[3].is_ascii_digit() {
            return false;
        }
        let n = (self.0[2] - b'0') * 10 + (self.0[3] - b'0');
        (1..=20).contains(&n)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({})", self.as_str())
    }
}

impl std::str::FromStr for Tag {
    type Err = SuperShowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Tag {
    type Error = SuperShowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.as_str().to_string()
    }
}

/// Axis-aligned bounding box of a `size` box rotated by `rotation_deg` about its center.
pub fn rotated_bounds(size: Size, rotation_deg: f64) -> Size {
    let rad = rotation_deg.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    Size::new(
        size.width * cos + size.height * sin,
        size.width * sin + size.height * cos,
    )
}

/// Strict overlap test where touching edges count as a collision.
pub fn rects_touch(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
