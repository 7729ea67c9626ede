use crate::foundation::core::{Point, Rect, Size, Timestamp, Vec2, Viewport, rects_touch};
use crate::foundation::error::{SuperShowError, SuperShowResult};
use crate::foundation::math::uniform;
use crate::measure::service::WordMetrics;
use crate::placement::live::{LiveWordSet, Traversal};

/// Side of the extended viewport words enter from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

/// How candidate positions are generated.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Just inside the entry edge; the other coordinate is random.
    EdgeEntry { edge: Edge },
    /// Anywhere in the extended viewport.
    Scatter,
    /// Archimedean spiral out from the viewport centre.
    Spiral,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self::EdgeEntry { edge: Edge::Left }
    }
}

impl PlacementPolicy {
    /// Edge a traversal starts from; non-edge policies travel left to right.
    pub fn entry_edge(self) -> Edge {
        match self {
            Self::EdgeEntry { edge } => edge,
            Self::Scatter | Self::Spiral => Edge::Left,
        }
    }
}

/// What to do once the candidate budget is spent.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExhaustedPolicy {
    /// Give up; the word is skipped.
    #[default]
    Drop,
    /// Use a random position even if it collides.
    RandomFallback,
    /// Scan the extended viewport on a grid for any free slot.
    GridScan { step: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub viewport: Viewport,
    /// Extra room around the visible viewport that words enter and leave through.
    pub viewport_padding: f64,
    /// Clearance kept around every box.
    pub margin: f64,
    /// Live words younger than this are obstacles.
    pub freshness_ms: f64,
    pub max_attempts: u32,
    pub policy: PlacementPolicy,
    pub exhausted: ExhaustedPolicy,
    pub spiral_steps: u32,
    /// Radius and angle increment per spiral step.
    pub spiral_step: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            viewport_padding: 200.0,
            margin: 5.0,
            freshness_ms: 2000.0,
            max_attempts: 50,
            policy: PlacementPolicy::default(),
            exhausted: ExhaustedPolicy::default(),
            spiral_steps: 10_000,
            spiral_step: 0.1,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> SuperShowResult<()> {
        Viewport::new(self.viewport.width, self.viewport.height)?;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !non_negative(self.viewport_padding) || !non_negative(self.margin) {
            return Err(SuperShowError::validation(
                "viewport_padding and margin must be finite and >= 0",
            ));
        }
        if !(self.freshness_ms.is_finite() && self.freshness_ms > 0.0) {
            return Err(SuperShowError::validation("freshness_ms must be finite and > 0"));
        }
        if self.max_attempts == 0 {
            return Err(SuperShowError::validation("max_attempts must be > 0"));
        }
        if self.policy == PlacementPolicy::Spiral
            && (self.spiral_steps == 0 || !(self.spiral_step.is_finite() && self.spiral_step > 0.0))
        {
            return Err(SuperShowError::validation(
                "spiral placement needs spiral_steps > 0 and spiral_step > 0",
            ));
        }
        if let ExhaustedPolicy::GridScan { step } = self.exhausted {
            if !(step.is_finite() && step > 0.0) {
                return Err(SuperShowError::validation(
                    "grid scan step must be finite and > 0",
                ));
            }
        }
        Ok(())
    }
}

/// Bounded trial placement of word boxes against obstacles.
#[derive(Clone, Debug, Default)]
pub struct PlacementEngine {
    config: PlacementConfig,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
    }

    pub fn set_policy(&mut self, policy: PlacementPolicy) {
        self.config.policy = policy;
    }

    /// Visible viewport grown by `viewport_padding`.
    pub fn extended_region(&self) -> Rect {
        self.config.viewport.extended(self.config.viewport_padding)
    }

    /// Whether `candidate` (unpadded) clashes with any obstacle once both carry the margin.
    pub fn collides(&self, candidate: Rect, obstacles: &[Rect]) -> bool {
        let m = self.config.margin;
        let padded = candidate.inflate(m, m);
        obstacles.iter().any(|o| rects_touch(padded, o.inflate(m, m)))
    }

    /// Top-left for a box of `extent` that clears `obstacles`, or `None` if none was found.
    pub fn find_position(
        &self,
        extent: Size,
        obstacles: &[Rect],
        rng: &mut fastrand::Rng,
    ) -> Option<Point> {
        let free = |p: Point| !self.collides(Rect::from_origin_size(p, extent), obstacles);

        let found = match self.config.policy {
            PlacementPolicy::EdgeEntry { edge } => (0..self.config.max_attempts)
                .map(|_| self.edge_candidate(edge, extent, rng))
                .find(|p| free(*p)),
            PlacementPolicy::Scatter => (0..self.config.max_attempts)
                .map(|_| self.scatter_candidate(extent, rng))
                .find(|p| free(*p)),
            PlacementPolicy::Spiral => self.spiral_candidates(extent).find(|p| free(*p)),
        };
        if found.is_some() {
            return found;
        }

        match self.config.exhausted {
            ExhaustedPolicy::Drop => {
                tracing::debug!(obstacles = obstacles.len(), "no free position, dropping");
                None
            }
            ExhaustedPolicy::RandomFallback => {
                tracing::debug!(obstacles = obstacles.len(), "no free position, placing anyway");
                Some(self.scatter_candidate(extent, rng))
            }
            ExhaustedPolicy::GridScan { step } => {
                let slot = self.grid_candidates(extent, step).find(|p| free(*p));
                if slot.is_none() {
                    tracing::debug!(obstacles = obstacles.len(), "grid scan found no gap");
                }
                slot
            }
        }
    }

    /// [`Self::find_position`] against the fresh members of `live`.
    pub fn place(
        &self,
        metrics: &WordMetrics,
        live: &LiveWordSet,
        now: Timestamp,
        rng: &mut fastrand::Rng,
    ) -> Option<Point> {
        let obstacles: Vec<Rect> = live
            .fresh(now, self.config.freshness_ms)
            .map(|w| w.rect())
            .collect();
        self.find_position(metrics.bounds, &obstacles, rng)
    }

    /// Motion from `position` until the box has crossed the far side of the extended region.
    pub fn traversal(&self, position: Point, extent: Size, duration_ms: f64) -> Traversal {
        let ext = self.extended_region();
        let travel = match self.config.policy.entry_edge() {
            Edge::Left => Vec2::new(ext.x1 - position.x, 0.0),
            Edge::Right => Vec2::new(ext.x0 - (position.x + extent.width), 0.0),
            Edge::Top => Vec2::new(0.0, ext.y1 - position.y),
            Edge::Bottom => Vec2::new(0.0, ext.y0 - (position.y + extent.height)),
        };
        Traversal {
            start: position,
            travel,
            duration_ms,
        }
    }

    fn edge_candidate(&self, edge: Edge, extent: Size, rng: &mut fastrand::Rng) -> Point {
        let ext = self.extended_region();
        match edge {
            Edge::Left => Point::new(ext.x0, uniform(rng, ext.y0, ext.y1 - extent.height)),
            Edge::Right => Point::new(
                ext.x1 - extent.width,
                uniform(rng, ext.y0, ext.y1 - extent.height),
            ),
            Edge::Top => Point::new(uniform(rng, ext.x0, ext.x1 - extent.width), ext.y0),
            Edge::Bottom => Point::new(
                uniform(rng, ext.x0, ext.x1 - extent.width),
                ext.y1 - extent.height,
            ),
        }
    }

    fn scatter_candidate(&self, extent: Size, rng: &mut fastrand::Rng) -> Point {
        let ext = self.extended_region();
        Point::new(
            uniform(rng, ext.x0, ext.x1 - extent.width),
            uniform(rng, ext.y0, ext.y1 - extent.height),
        )
    }

    fn spiral_candidates(&self, extent: Size) -> impl Iterator<Item = Point> + '_ {
        let ext = self.extended_region();
        let centre = self.config.viewport.rect().center();
        let vp = self.config.viewport;
        let aspect = vp.width / vp.height;
        let step = self.config.spiral_step;
        (0..self.config.spiral_steps)
            .map(move |i| {
                let t = f64::from(i) * step;
                Point::new(
                    centre.x + aspect * t * t.cos() - extent.width / 2.0,
                    centre.y + t * t.sin() - extent.height / 2.0,
                )
            })
            .filter(move |p| {
                p.x >= ext.x0
                    && p.y >= ext.y0
                    && p.x + extent.width <= ext.x1
                    && p.y + extent.height <= ext.y1
            })
    }

    fn grid_candidates(&self, extent: Size, step: f64) -> impl Iterator<Item = Point> {
        let ext = self.extended_region();
        let cols = ((ext.width() - extent.width) / step).floor().max(-1.0) as i64 + 1;
        let rows = ((ext.height() - extent.height) / step).floor().max(-1.0) as i64 + 1;
        (0..cols).flat_map(move |c| {
            (0..rows).map(move |r| {
                Point::new(ext.x0 + c as f64 * step, ext.y0 + r as f64 * step)
            })
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/engine.rs"]
mod tests;
