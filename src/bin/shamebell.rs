use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shamebell::{
    BackgroundAxes, Compositor, FaviconAnimator, FaviconOpts, FileIconTarget, FrameIndex,
    FrameLoader, Studio, StudioConfig, load_background, output::write_atomic,
};

#[derive(Parser, Debug)]
#[command(name = "shamebell", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite the bell over a background and save the animated GIF.
    Export(ExportArgs),
    /// Write a single composited frame as a PNG.
    Frame(FrameArgs),
    /// Animate the favicon into a PNG file for a number of ticks.
    Favicon(FaviconArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with bell0.png..bell3.png replacing the bundled frames.
    #[arg(long)]
    frames_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Background image. Without one only the bell is drawn.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Directory the GIF is saved into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Use the cross-applied background width/height mapping.
    #[arg(long, default_value_t = false)]
    legacy_axes: bool,

    /// Delay between frames in milliseconds.
    #[arg(long)]
    delay_ms: Option<u32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Frame index (wraps after 3).
    #[arg(long, default_value_t = 0)]
    index: u64,

    /// Background image.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Use the cross-applied background width/height mapping.
    #[arg(long, default_value_t = false)]
    legacy_axes: bool,
}

#[derive(Parser, Debug)]
struct FaviconArgs {
    #[command(flatten)]
    cfg: ConfigArgs,

    /// Icon PNG path, rewritten on every tick.
    #[arg(long)]
    out: PathBuf,

    /// Number of icon updates before exiting.
    #[arg(long, default_value_t = 20)]
    ticks: u64,

    /// Milliseconds between updates.
    #[arg(long)]
    period_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Favicon(args) => cmd_favicon(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<StudioConfig> {
    let mut cfg = match &args.config {
        Some(p) => StudioConfig::from_path(p)?,
        None => StudioConfig::default(),
    };
    if let Some(dir) = &args.frames_dir {
        cfg.frames_dir = Some(dir.clone());
    }
    Ok(cfg)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.cfg)?;
    if args.legacy_axes {
        cfg.background_axes = BackgroundAxes::Legacy;
    }
    if let Some(ms) = args.delay_ms {
        cfg.frame_delay_ms = ms;
    }

    let mut studio = Studio::new(cfg)?;
    studio.load_frames()?;
    studio.select_background(args.background.as_deref())?;
    if !studio.can_download() {
        anyhow::bail!("no export was produced (see log for the aborted pass)");
    }
    let path = studio.download(&args.out_dir)?;

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.cfg)?;
    if args.legacy_axes {
        cfg.background_axes = BackgroundAxes::Legacy;
    }
    cfg.validate()?;

    let frames = FrameLoader::new().load(&cfg.frame_source())?;
    let background = load_background(args.background.as_deref())?;
    let mut compositor = Compositor::new(cfg.compositor_opts())?;
    let frame = compositor.render_frame(&frames, background.as_ref(), FrameIndex(args.index))?;

    let png = frame.to_png()?;
    write_atomic(&args.out, &png)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_favicon(args: FaviconArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.cfg)?;
    if let Some(ms) = args.period_ms {
        cfg.favicon_period_ms = ms;
    }
    cfg.validate()?;
    if args.ticks == 0 {
        anyhow::bail!("--ticks must be > 0");
    }

    let frames = Arc::new(FrameLoader::new().load(&cfg.frame_source())?);
    let opts = FaviconOpts {
        period: cfg.favicon_period(),
        max_ticks: Some(args.ticks),
    };
    let target = FileIconTarget::new(args.out.clone());
    let ticks = FaviconAnimator::start(frames, opts, Box::new(target))?.wait()?;

    eprintln!("wrote {} ({ticks} updates)", args.out.display());
    Ok(())
}
