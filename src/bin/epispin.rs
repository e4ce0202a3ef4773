use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use epispin::{Driver, DriverConfig, FrameClock, FrameOutcome, NodeId, SvgDocument};

#[derive(Parser, Debug)]
#[command(name = "epispin", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a single still at an absolute time.
    Frame(FrameArgs),
    /// Play in real-time mode against a synthetic clock and write every frame until done.
    Frames(FramesArgs),
    /// Drive with manual steps and write each resulting frame.
    Steps(StepsArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Nesting depth.
    #[arg(long)]
    max_cusps: Option<u32>,

    /// Total animation time in milliseconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Total spin sweep in radians (random when omitted).
    #[arg(long)]
    final_angle: Option<f64>,

    /// Seed for the random spin sweep.
    #[arg(long)]
    seed: Option<u64>,

    /// Caption that fades in with progress.
    #[arg(long)]
    title: Option<String>,

    /// Per-tick diagnostics.
    #[arg(long)]
    debug: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Elapsed time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Output path; `.png` rasterizes, anything else writes SVG.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Display refresh rate of the synthetic clock.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Write PNGs instead of SVGs.
    #[arg(long)]
    png: bool,
}

#[derive(Parser, Debug)]
struct StepsArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Number of steps to take (stops early once done).
    #[arg(long)]
    count: u32,

    /// Step size in milliseconds (defaults to the configured step size).
    #[arg(long)]
    delta: Option<f64>,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Write PNGs instead of SVGs.
    #[arg(long)]
    png: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Steps(args) => cmd_steps(args),
    }
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<DriverConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            DriverConfig::from_json_str(&s)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => DriverConfig::default(),
    };
    if let Some(v) = args.max_cusps {
        cfg.max_cusps = v;
    }
    if let Some(v) = args.duration {
        cfg.duration = v;
    }
    if args.final_angle.is_some() {
        cfg.final_angle = args.final_angle;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if args.title.is_some() {
        cfg.title = args.title.clone();
    }
    cfg.debug |= args.debug;
    cfg.validate()?;
    Ok(cfg)
}

fn setup(args: &ConfigArgs) -> anyhow::Result<Driver> {
    let cfg = load_config(args)?;
    init_tracing(cfg.debug);
    let driver = Driver::new(cfg)?;
    tracing::info!(final_angle = driver.final_angle(), "driver ready");
    Ok(driver)
}

fn write_frame(doc: &SvgDocument, root: NodeId, out: &Path, png: bool) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let svg = doc.to_svg_string(root)?;
    if png {
        let frame = epispin::rasterize_svg(&svg, [255, 255, 255, 255])?;
        epispin::write_png(out, &frame)?;
    } else {
        std::fs::write(out, svg).with_context(|| format!("write svg '{}'", out.display()))?;
    }
    Ok(())
}

fn root_of(driver: &Driver) -> anyhow::Result<NodeId> {
    driver
        .root()
        .context("driver produced no scene (bug)")
}

fn frame_path(dir: &Path, index: usize, png: bool) -> PathBuf {
    dir.join(format!("frame_{index:05}.{}", if png { "png" } else { "svg" }))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut driver = setup(&args.config)?;
    let mut doc = SvgDocument::new();
    let p = driver.seek(&mut doc, args.at)?;

    let png = args
        .out
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    write_frame(&doc, root_of(&driver)?, &args.out, png)?;

    eprintln!("wrote {} (p = {p:.3})", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut driver = setup(&args.config)?;
    let mut doc = SvgDocument::new();
    let mut clock = FrameClock::new(args.fps);
    driver.run()?;

    let mut written = 0usize;
    loop {
        let outcome = driver.frame(&mut doc, clock.next_timestamp())?;
        if outcome == FrameOutcome::Idle {
            break;
        }
        write_frame(
            &doc,
            root_of(&driver)?,
            &frame_path(&args.out_dir, written, args.png),
            args.png,
        )?;
        written += 1;
        if outcome == FrameOutcome::Finished {
            break;
        }
    }

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_steps(args: StepsArgs) -> anyhow::Result<()> {
    let mut driver = setup(&args.config)?;
    let mut doc = SvgDocument::new();
    let delta = args.delta.unwrap_or(driver.config().step_size);

    let mut written = 0usize;
    for i in 0..args.count {
        driver.step_by(delta)?;
        let outcome = driver.frame(&mut doc, f64::from(i))?;
        write_frame(
            &doc,
            root_of(&driver)?,
            &frame_path(&args.out_dir, written, args.png),
            args.png,
        )?;
        written += 1;
        if outcome == FrameOutcome::Finished {
            break;
        }
    }

    eprintln!(
        "wrote {written} frames to {} (state {})",
        args.out_dir.display(),
        driver.state().name()
    );
    Ok(())
}
