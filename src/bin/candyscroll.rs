use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "candyscroll", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at a scroll progress as a PNG.
    Frame(FrameArgs),
    /// Sweep a simulated scroll through a product and print frame/overlay stats as JSON.
    Scrub(ScrubArgs),
    /// Dispatch a form submission through a dry-run transport and print the response.
    Relay(RelayArgs),
}

#[derive(Parser, Debug)]
struct CatalogueArgs {
    /// Product catalogue JSON.
    #[arg(long)]
    catalogue: PathBuf,

    /// Product id; defaults to the first product.
    #[arg(long)]
    product: Option<String>,

    /// Player config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    catalogue: CatalogueArgs,

    /// Frame asset root; defaults to the catalogue's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Scroll progress in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Surface width in CSS px.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Surface height in CSS px.
    #[arg(long, default_value_t = 360.0)]
    height: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    catalogue: CatalogueArgs,

    /// Scroll samples across the region.
    #[arg(long, default_value_t = 20)]
    steps: u32,

    /// Viewport height in CSS px.
    #[arg(long, default_value_t = 800.0)]
    viewport_height: f64,
}

#[derive(Parser, Debug)]
struct RelayArgs {
    /// Submission JSON (`{"type": ..., "data": ...}`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Also print the composed mails.
    #[arg(long)]
    show_mails: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
        Command::Relay(args) => cmd_relay(args),
    }
}

fn load_inputs(
    args: &CatalogueArgs,
) -> anyhow::Result<(candyscroll::ProductRecord, candyscroll::PlayerConfig)> {
    let catalogue = candyscroll::Catalogue::from_path(&args.catalogue)?;
    let product = match &args.product {
        Some(id) => catalogue.by_id(id)?,
        None => catalogue.get(0)?,
    }
    .clone();
    let config = match &args.config {
        Some(path) => candyscroll::PlayerConfig::from_path(path)?,
        None => candyscroll::PlayerConfig::default(),
    };
    Ok((product, config))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (product, mut config) = load_inputs(&args.catalogue)?;
    // One frame is drawn; neighbours would only cost decode time.
    config.prefetch = candyscroll::PrefetchPolicy::Window { radius: 0 };

    let root = match &args.assets {
        Some(root) => root.clone(),
        None => args
            .catalogue
            .catalogue
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let source = Arc::new(candyscroll::DirSource::new(root));

    let mut session = candyscroll::PlayerSession::start(
        &product,
        &config,
        candyscroll::Progress::new(args.progress),
        source,
        Arc::new(candyscroll::InlineScheduler),
    )?;
    let mut surface = candyscroll::Surface::new(
        candyscroll::Size::new(args.width, args.height),
        config.device_pixel_ratio,
    )?;
    let outcome = session.pump(&mut surface);
    surface.write_png(&args.out)?;

    eprintln!(
        "frame {} of '{}' ({outcome:?}), wrote {}",
        session.current_frame(),
        product.id,
        args.out.display()
    );
    session.teardown();
    Ok(())
}

#[derive(serde::Serialize)]
struct ScrubStep {
    scroll_y: f64,
    progress: f64,
    frame: u32,
    visible_sections: Vec<usize>,
}

#[derive(serde::Serialize)]
struct ScrubReport {
    product: String,
    first_frame: u32,
    last_frame: u32,
    distinct_frames: usize,
    loads_dispatched: u64,
    steps: Vec<ScrubStep>,
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    let (product, config) = load_inputs(&args.catalogue)?;
    let steps = args.steps.max(1);
    let vh = args.viewport_height;

    let region = candyscroll::RegionGeometry::viewports(0.0, vh, config.region_viewports);
    let mut tracker = candyscroll::ScrollTracker::new(config.offsets, region, vh)?;
    let timeline = candyscroll::TextTimeline::for_product(&product)?;

    // Loads are only counted, never run.
    let scheduler = candyscroll::ManualScheduler::new();
    let mut session = candyscroll::PlayerSession::start(
        &product,
        &config,
        tracker.progress(),
        Arc::new(candyscroll::MemorySource::new()),
        Arc::new(scheduler.clone()),
    )?;

    let max_scroll = (region.height - vh).max(0.0);
    let mut out = Vec::with_capacity(steps as usize + 1);
    let mut frames = std::collections::BTreeSet::new();
    for i in 0..=steps {
        let scroll_y = max_scroll * f64::from(i) / f64::from(steps);
        let p = tracker.on_scroll(scroll_y);
        let frame = session.on_progress(p);
        frames.insert(frame);
        out.push(ScrubStep {
            scroll_y,
            progress: p.get(),
            frame: frame.0,
            visible_sections: timeline.visible(p).iter().map(|s| s.index).collect(),
        });
    }

    let span = product.span()?;
    let report = ScrubReport {
        product: product.id.clone(),
        first_frame: span.first.0,
        last_frame: span.last.0,
        distinct_frames: frames.len(),
        loads_dispatched: session.stats().dispatched,
        steps: out,
    };
    session.teardown();
    scheduler.discard_pending();

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize scrub report")?
    );
    Ok(())
}

fn cmd_relay(args: RelayArgs) -> anyhow::Result<()> {
    let body = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read submission '{}'", args.in_path.display()))?;

    let relay = candyscroll::MailRelay::new(
        candyscroll::RelayConfig::from_env(),
        candyscroll::MemoryTransport::new(),
    );
    let response = relay.dispatch_json(&body);

    if args.show_mails {
        for mail in relay.transport().sent() {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&mail).context("serialize mail")?
            );
        }
    }
    println!(
        "{}",
        serde_json::to_string(&response).context("serialize relay response")?
    );
    Ok(())
}
