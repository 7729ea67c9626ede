use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use supershow::{
    FileWordSource, FontEntry, MetricsTextEngine, ParleyTextEngine, PlacementPolicy,
    SimulatedSurface, StartOutcome, StreamController, SuperShowConfig, TextMeasurer, Timestamp,
    Viewport, WordListSource,
};

#[derive(Parser, Debug)]
#[command(name = "supershow", version)]
struct Cli {
    /// Log level for diagnostics on stderr.
    #[arg(long, global = true, default_value = "warn")]
    log: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print what was parsed from font files.
    Inspect(InspectArgs),
    /// Run the word stream headless and print a JSON report.
    Stream(StreamArgs),
    /// Lay out a one-shot word cloud and print it as JSON.
    Cloud(CloudArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Font files (.ttf, .otf, .ttc).
    #[arg(required = true)]
    fonts: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Font files to load; may be repeated.
    #[arg(long = "font", required = true)]
    fonts: Vec<PathBuf>,

    /// Word list: a local path, or an http(s) URL.
    #[arg(long)]
    words: Option<String>,

    /// Session configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text backend used for measurement.
    #[arg(long, value_enum, default_value_t = BackendChoice::Parley)]
    backend: BackendChoice,

    /// Viewport width in pixels.
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height in pixels.
    #[arg(long)]
    height: Option<f64>,

    /// RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct StreamArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Simulated run time.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Simulated tick rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Speed setting; overrides the configured interval and traversal time.
    #[arg(long)]
    speed: Option<f64>,
}

#[derive(Parser, Debug)]
struct CloudArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Number of words to lay out.
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// Candidate generation.
    #[arg(long, value_enum, default_value_t = CloudPolicy::Spiral)]
    policy: CloudPolicy,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    /// Shape text with Parley.
    Parley,
    /// Estimate extents from font metrics only.
    Metrics,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CloudPolicy {
    Spiral,
    Scatter,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Stream(args) => match args.session.backend {
            BackendChoice::Parley => cmd_stream(args, ParleyTextEngine::new()),
            BackendChoice::Metrics => cmd_stream(args, MetricsTextEngine::new()),
        },
        Command::Cloud(args) => match args.session.backend {
            BackendChoice::Parley => cmd_cloud(args, ParleyTextEngine::new()),
            BackendChoice::Metrics => cmd_cloud(args, MetricsTextEngine::new()),
        },
    }
}

fn read_font(path: &Path) -> anyhow::Result<(Vec<u8>, String)> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("font path '{}' has no file name", path.display()))?
        .to_string();
    Ok((bytes, filename))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let mut entries: Vec<FontEntry> = Vec::with_capacity(args.fonts.len());
    for path in &args.fonts {
        let (bytes, filename) = read_font(path)?;
        let entry = FontEntry::parse(bytes, &filename)
            .with_context(|| format!("parse font '{}'", path.display()))?;
        entries.push(entry);
    }
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn word_source(location: &str) -> anyhow::Result<Box<dyn WordListSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        #[cfg(feature = "http")]
        return Ok(Box::new(supershow::HttpWordSource::new(location)));
        #[cfg(not(feature = "http"))]
        anyhow::bail!("'{location}' is a URL but this build has no http support");
    }
    Ok(Box::new(FileWordSource::new(location)))
}

fn open_session<B: TextMeasurer>(
    args: &SessionArgs,
    backend: B,
) -> anyhow::Result<StreamController<B>> {
    let mut config = match &args.config {
        Some(path) => SuperShowConfig::from_path(path)?,
        None => SuperShowConfig::default(),
    };
    if args.seed.is_some() {
        config.stream.seed = args.seed;
    }
    if args.width.is_some() || args.height.is_some() {
        let current = config.placement.viewport;
        config.placement.viewport = Viewport::new(
            args.width.unwrap_or(current.width),
            args.height.unwrap_or(current.height),
        )?;
    }

    let mut controller = StreamController::new(config, backend)?;
    for path in &args.fonts {
        let (bytes, filename) = read_font(path)?;
        controller
            .load_font(bytes, &filename)
            .with_context(|| format!("load font '{}'", path.display()))?;
    }
    match &args.words {
        Some(location) => {
            let source = word_source(location)?;
            let list = controller.load_words(source.as_ref());
            if list.is_fallback() {
                eprintln!("word list unavailable, using {} fallback words", list.len());
            }
        }
        None => controller.set_words(supershow::WordList::fallback()),
    }
    Ok(controller)
}

fn cmd_stream<B: TextMeasurer>(args: StreamArgs, backend: B) -> anyhow::Result<()> {
    let mut controller = open_session(&args.session, backend)?;
    if let Some(speed) = args.speed {
        controller.set_speed(speed)?;
    }
    if let StartOutcome::Refused(reason) = controller.start() {
        anyhow::bail!("stream refused to start: {reason}");
    }

    let mut surface = SimulatedSurface::new();
    let end = controller.run_simulated(
        &mut surface,
        Timestamp::ZERO,
        args.seconds * 1000.0,
        args.fps,
    )?;

    let live: Vec<_> = controller.live().iter().collect();
    let positions: Vec<_> = surface.positions(end).collect();
    let report = serde_json::json!({
        "elapsed_ms": end.as_millis(),
        "words_origin": controller.words().origin(),
        "stats": controller.stats(),
        "layout_passes": controller.measurement().layout_passes(),
        "live": live,
        "positions": positions,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_cloud<B: TextMeasurer>(args: CloudArgs, backend: B) -> anyhow::Result<()> {
    let mut controller = open_session(&args.session, backend)?;
    let policy = match args.policy {
        CloudPolicy::Spiral => PlacementPolicy::Spiral,
        CloudPolicy::Scatter => PlacementPolicy::Scatter,
    };
    let layout = controller.compose_cloud(args.count, policy);
    eprintln!(
        "placed {} words, dropped {}",
        layout.placed.len(),
        layout.dropped
    );
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
