use std::sync::Arc;

use crate::config::SuperShowConfig;
use crate::fonts::entry::FontEntry;
use crate::fonts::library::FontLibrary;
use crate::foundation::core::{Timestamp, Viewport};
use crate::foundation::error::{SuperShowError, SuperShowResult};
use crate::measure::service::{
    EstimateReason, MeasurePoll, MeasureRequest, MeasurementService, MetricsOrigin, TextMeasurer,
    WordMetrics,
};
use crate::placement::cloud::{CloudLayout, layout_cloud};
use crate::placement::engine::{PlacementEngine, PlacementPolicy};
use crate::placement::live::{LiveWordSet, PlacedWord, WordId};
use crate::stream::surface::{RenderSurface, SimulatedSurface};
use crate::stream::timing::{CreationClock, StreamTiming};
use crate::words::factory::{WordDescriptor, WordFactory};
use crate::words::list::{WordList, WordListSource};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub creation_interval_ms: f64,
    pub traversal_ms: f64,
    /// Skip words whose metrics had to be estimated.
    pub skip_estimated: bool,
    /// Upper bound on words in the live set; creation pauses while it is full.
    pub max_live: usize,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            creation_interval_ms: 300.0,
            traversal_ms: 15_000.0,
            skip_estimated: true,
            max_live: 200,
            seed: None,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> SuperShowResult<()> {
        if !(self.creation_interval_ms.is_finite() && self.creation_interval_ms > 0.0) {
            return Err(SuperShowError::validation(
                "creation_interval_ms must be finite and > 0",
            ));
        }
        if !(self.traversal_ms.is_finite() && self.traversal_ms > 0.0) {
            return Err(SuperShowError::validation("traversal_ms must be finite and > 0"));
        }
        if self.max_live == 0 {
            return Err(SuperShowError::validation("max_live must be > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum StreamState {
    Idle,
    Running,
}

/// Why [`StreamController::start`] did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum StartRefusal {
    NoFonts,
    NoWords,
}

impl std::fmt::Display for StartRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFonts => f.write_str("no fonts loaded"),
            Self::NoWords => f.write_str("no words loaded"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    Refused(StartRefusal),
}

/// Counters for a session; they survive stop/start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct StreamStats {
    pub created: u64,
    pub launched: u64,
    pub completed: u64,
    pub skipped_no_word: u64,
    pub skipped_full: u64,
    pub skipped_estimated: u64,
    pub skipped_no_space: u64,
    pub timed_out: u64,
    /// In-flight measurements thrown away by `stop`.
    pub discarded: u64,
}

#[derive(Debug)]
struct InFlight {
    id: WordId,
    epoch: u64,
    request: MeasureRequest,
}

/// The word stream session: owns fonts, words, measurement, placement and the live set.
#[derive(Debug)]
pub struct StreamController<B> {
    fonts: FontLibrary,
    factory: WordFactory,
    measure: MeasurementService<B>,
    placement: PlacementEngine,
    live: LiveWordSet,
    config: StreamConfig,
    clock: CreationClock,
    rng: fastrand::Rng,
    state: StreamState,
    epoch: u64,
    next_id: u64,
    in_flight: Vec<InFlight>,
    stats: StreamStats,
}

impl<B: TextMeasurer> StreamController<B> {
    pub fn new(config: SuperShowConfig, backend: B) -> SuperShowResult<Self> {
        config.validate()?;
        let rng = match config.stream.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Ok(Self {
            fonts: FontLibrary::new(),
            factory: WordFactory::new(config.factory),
            measure: MeasurementService::new(backend, config.measure),
            placement: PlacementEngine::new(config.placement),
            live: LiveWordSet::new(),
            clock: CreationClock::new(config.stream.creation_interval_ms),
            config: config.stream,
            rng,
            state: StreamState::Idle,
            epoch: 0,
            next_id: 0,
            in_flight: Vec::new(),
            stats: StreamStats::default(),
        })
    }

    /// Parse and register a dropped font file. On error nothing changes.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load_font(&mut self, bytes: Vec<u8>, filename: &str) -> SuperShowResult<Arc<FontEntry>> {
        self.fonts
            .load(bytes, filename, self.measure.backend_mut())
            .inspect_err(|err| tracing::warn!(error = %err, "font rejected"))
    }

    pub fn insert_font(&mut self, entry: FontEntry) -> SuperShowResult<Arc<FontEntry>> {
        self.fonts.insert(entry, self.measure.backend_mut())
    }

    /// Load the word resource; failures fall back to the built-in list.
    pub fn load_words(&mut self, source: &dyn WordListSource) -> &WordList {
        self.factory.set_words(WordList::load(source));
        self.factory.words()
    }

    pub fn set_words(&mut self, words: WordList) {
        self.factory.set_words(words);
    }

    pub fn start(&mut self) -> StartOutcome {
        if self.state == StreamState::Running {
            return StartOutcome::AlreadyRunning;
        }
        let refusal = if self.fonts.is_empty() {
            Some(StartRefusal::NoFonts)
        } else if self.factory.words().is_empty() {
            Some(StartRefusal::NoWords)
        } else {
            None
        };
        if let Some(reason) = refusal {
            tracing::info!(%reason, "stream not started");
            return StartOutcome::Refused(reason);
        }

        self.state = StreamState::Running;
        self.clock.reset();
        tracing::info!(
            fonts = self.fonts.len(),
            words = self.factory.words().len(),
            epoch = self.epoch,
            "stream started"
        );
        StartOutcome::Started
    }

    /// Halt creation, retire everything on the surface and drop in-flight measurements.
    pub fn stop(&mut self, surface: &mut dyn RenderSurface) {
        if self.state == StreamState::Idle {
            return;
        }
        self.state = StreamState::Idle;
        self.epoch += 1;
        self.stats.discarded += self.in_flight.len() as u64;
        self.in_flight.clear();
        for id in self.live.ids() {
            surface.retire(id);
        }
        let retired = self.live.len();
        self.live.clear();
        tracing::info!(retired, epoch = self.epoch, "stream stopped");
    }

    /// One animation frame: maybe create a word, then place every measurement that resolved.
    #[tracing::instrument(level = "trace", skip_all, fields(now = now.as_millis()))]
    pub fn tick(&mut self, now: Timestamp, surface: &mut dyn RenderSurface) -> usize {
        if self.state != StreamState::Running {
            return 0;
        }

        if self.clock.poll(now) {
            self.create(now);
        }

        let mut launched = 0;
        let mut waiting = Vec::with_capacity(self.in_flight.len());
        for flight in std::mem::take(&mut self.in_flight) {
            if flight.epoch != self.epoch {
                self.stats.discarded += 1;
                continue;
            }
            match self.measure.poll(&flight.request, now) {
                MeasurePoll::Pending => waiting.push(flight),
                MeasurePoll::Ready(metrics) => {
                    if self.settle(flight, metrics, now, surface) {
                        launched += 1;
                    }
                }
            }
        }
        self.in_flight = waiting;
        launched
    }

    /// Remove a word whose traversal finished. Unknown ids are ignored.
    pub fn on_traversal_complete(&mut self, id: WordId, surface: &mut dyn RenderSurface) -> bool {
        match self.live.remove(id) {
            Some(_) => {
                surface.retire(id);
                self.stats.completed += 1;
                tracing::trace!(%id, "traversal complete");
                true
            }
            None => false,
        }
    }

    /// Tick a [`SimulatedSurface`] at `fps` for `duration_ms`, routing completions back.
    ///
    /// Returns the timestamp of the last tick.
    pub fn run_simulated(
        &mut self,
        surface: &mut SimulatedSurface,
        start: Timestamp,
        duration_ms: f64,
        fps: f64,
    ) -> SuperShowResult<Timestamp> {
        if !(fps.is_finite() && fps > 0.0) || !(duration_ms.is_finite() && duration_ms >= 0.0) {
            return Err(SuperShowError::validation(
                "fps must be > 0 and duration_ms >= 0",
            ));
        }
        let frame_ms = 1000.0 / fps;
        let frames = (duration_ms / frame_ms).floor() as u64;
        let mut now = start;
        for frame in 0..=frames {
            now = start.add_millis(frame as f64 * frame_ms);
            self.tick(now, surface);
            for id in surface.advance(now) {
                self.on_traversal_complete(id, surface);
            }
        }
        Ok(now)
    }

    /// Lay out `count` fresh words as a static cloud with `policy`. Does not touch the stream.
    pub fn compose_cloud(&mut self, count: usize, policy: PlacementPolicy) -> CloudLayout {
        let mut words: Vec<(WordDescriptor, WordMetrics)> = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(descriptor) = self.factory.create_word(&self.fonts, &mut self.rng) else {
                break;
            };
            let metrics = self.measure.measure_word(&descriptor);
            if metrics.is_estimated() && self.config.skip_estimated {
                continue;
            }
            words.push((descriptor, metrics));
        }
        let mut engine = self.placement.clone();
        engine.set_policy(policy);
        layout_cloud(&engine, words, &mut self.rng)
    }

    /// Apply a speed setting: traversal duration and creation interval follow it.
    pub fn set_speed(&mut self, speed: f64) -> SuperShowResult<StreamTiming> {
        let timing = StreamTiming::for_speed(speed)?;
        self.config.traversal_ms = timing.traversal_ms;
        self.config.creation_interval_ms = timing.creation_interval_ms;
        self.clock.set_interval(timing.creation_interval_ms);
        tracing::debug!(speed, interval_ms = timing.creation_interval_ms, "speed changed");
        Ok(timing)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.placement.set_viewport(viewport);
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StreamState::Running
    }

    pub fn live(&self) -> &LiveWordSet {
        &self.live
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn words(&self) -> &WordList {
        self.factory.words()
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn measurement(&self) -> &MeasurementService<B> {
        &self.measure
    }

    pub fn placement(&self) -> &PlacementEngine {
        &self.placement
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    fn create(&mut self, now: Timestamp) {
        if self.live.len() + self.in_flight.len() >= self.config.max_live {
            self.stats.skipped_full += 1;
            tracing::debug!(live = self.live.len(), "live set full, skipping creation");
            return;
        }
        let Some(descriptor) = self.factory.create_word(&self.fonts, &mut self.rng) else {
            self.stats.skipped_no_word += 1;
            tracing::debug!("no word could be created");
            return;
        };
        let id = WordId(self.next_id);
        self.next_id += 1;
        self.stats.created += 1;
        self.in_flight.push(InFlight {
            id,
            epoch: self.epoch,
            request: MeasureRequest {
                descriptor,
                issued_at: now,
            },
        });
    }

    fn settle(
        &mut self,
        flight: InFlight,
        metrics: WordMetrics,
        now: Timestamp,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        let InFlight { id, request, .. } = flight;
        if metrics.origin == MetricsOrigin::Estimated(EstimateReason::Timeout) {
            self.stats.timed_out += 1;
        }
        if metrics.is_estimated() && self.config.skip_estimated {
            self.stats.skipped_estimated += 1;
            tracing::debug!(%id, text = %request.descriptor.text, "skipping estimated word");
            return false;
        }

        let Some(position) = self.placement.place(&metrics, &self.live, now, &mut self.rng) else {
            self.stats.skipped_no_space += 1;
            tracing::debug!(%id, text = %request.descriptor.text, "no room for word");
            return false;
        };

        let word = PlacedWord {
            id,
            traversal: self
                .placement
                .traversal(position, metrics.bounds, self.config.traversal_ms),
            descriptor: request.descriptor,
            metrics,
            position,
            created_at: now,
        };
        surface.launch(&word);
        self.live.insert(word);
        self.stats.launched += 1;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/controller.rs"]
mod tests;
