//! SuperShow is the word-stream engine behind a font-preview toy.
//!
//! Dropped fonts are parsed once into [`FontEntry`] values. A [`StreamController`] then turns a
//! word list into a stream of styled words that drift across the screen without piling on top
//! of each other.
//!
//! # Pipeline overview
//!
//! 1. **Create**: [`WordFactory`] picks a word, a font, a case, an optional stylistic feature
//!    and variable-axis values, producing a [`WordDescriptor`].
//! 2. **Measure**: [`MeasurementService`] waits for the font to be ready, lays the word out
//!    with a [`TextMeasurer`] backend and caches the result.
//! 3. **Place**: [`PlacementEngine`] searches for a box that clears every fresh live word.
//! 4. **Animate**: the placed word is launched on a [`RenderSurface`]; the surface reports the
//!    end of its traversal back to the controller, which removes it.
//!
//! The same placement engine lays out the one-shot word cloud ([`layout_cloud`]).
//!
//! Everything is single-threaded and driven by [`StreamController::tick`]; asynchronous font
//! loading shows up as measurement requests that resolve on a later tick.
#![forbid(unsafe_code)]

mod config;
mod fonts;
mod foundation;
mod measure;
mod placement;
mod stream;
mod words;

pub use config::SuperShowConfig;
pub use fonts::entry::{FaceMetrics, FontEntry, FontFormat, FontId, VariationAxis};
pub use fonts::library::{FontLibrary, FontRegistrar};
pub use foundation::core::{
    Point, Rect, Size, Tag, Timestamp, Vec2, Viewport, rects_touch, rotated_bounds,
};
pub use foundation::error::{SuperShowError, SuperShowResult};
pub use measure::metrics_engine::MetricsTextEngine;
pub use measure::parley_engine::ParleyTextEngine;
pub use measure::service::{
    EstimateReason, MeasureConfig, MeasureKey, MeasurePoll, MeasureRequest, MeasurementService,
    MetricsOrigin, TextMeasurer, WordMetrics,
};
pub use placement::cloud::{CloudLayout, CloudWord, layout_cloud};
pub use placement::engine::{
    Edge, ExhaustedPolicy, PlacementConfig, PlacementEngine, PlacementPolicy,
};
pub use placement::live::{LiveWordSet, PlacedWord, Traversal, WordId};
pub use stream::controller::{
    StartOutcome, StartRefusal, StreamConfig, StreamController, StreamState, StreamStats,
};
pub use stream::surface::{RenderSurface, SimulatedSurface};
pub use stream::timing::{CreationClock, StreamTiming};
pub use words::factory::{
    AxisRange, AxisSampling, AxisValue, CaseProbabilities, CaseVariant, FactoryConfig,
    SizeDistribution, WordDescriptor, WordFactory, sample_axis, transform_case,
};
#[cfg(feature = "http")]
pub use words::list::HttpWordSource;
pub use words::list::{FALLBACK_WORDS, FileWordSource, WordList, WordListOrigin, WordListSource};
