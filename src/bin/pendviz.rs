use std::{
    path::{Path, PathBuf},
    process::{Command, ExitCode},
};

use anyhow::Context as _;
use clap::Parser;
use pendviz::{
    LogProgress, OutputFormat, PendvizError, RenderConfig, RenderMode, RenderRequest,
    RenderSession,
};

/// Render a double-pendulum trace as a static plot or an animation.
#[derive(Parser, Debug)]
#[command(name = "pendviz", version)]
struct Cli {
    /// Position trace (`t x1 y1 x2 y2` per line, `#` comments).
    trace: PathBuf,

    /// Output path; its extension selects the format unless `--format` is given.
    #[arg(short, long, default_value = "pendulum_plot.png")]
    output: PathBuf,

    /// Render an animation instead of a static plot.
    #[arg(short, long)]
    animate: bool,

    /// Angle trace for the phase-space panel (default: `<stem>_angles.<ext>` beside TRACE).
    #[arg(long)]
    angles: Option<PathBuf>,

    /// Keep the per-frame scratch rasters after assembling an animation.
    #[arg(long)]
    keep_frames: bool,

    /// Open the result in the platform viewer instead of writing OUTPUT.
    #[arg(long)]
    show: bool,

    /// JSON render config; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render every N-th sample.
    #[arg(long)]
    stride: Option<usize>,

    /// Playback rate of the animation.
    #[arg(long)]
    fps: Option<u32>,

    /// Trail length per mass, in frames.
    #[arg(long)]
    trail: Option<usize>,

    /// Output format (overrides the output extension).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let empty = err
                .downcast_ref::<PendvizError>()
                .is_some_and(PendvizError::is_empty_trace);
            eprintln!("error: {err:#}");
            if empty {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::WARN,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;
    let mode = if cli.animate {
        RenderMode::Animated
    } else {
        RenderMode::Static
    };

    let output = if cli.show {
        show_path(&cli.output, mode, config.format)
    } else {
        cli.output.clone()
    };
    let mut req = RenderRequest::new(&cli.trace, output, mode);
    if let Some(angles) = &cli.angles {
        req = req.with_angles(angles);
    }

    let session = RenderSession::new(config)?;
    let outcome = session.run(&req, &mut LogProgress::default())?;

    if cli.show {
        open_viewer(&outcome.output)?;
    } else {
        eprintln!("wrote {}", outcome.output.display());
    }
    if let Some(dir) = &outcome.scratch_dir {
        eprintln!("kept frames in {}", dir.display());
    }
    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    if let Some(stride) = cli.stride {
        config.stride = stride;
    }
    if let Some(fps) = cli.fps {
        config.fps = pendviz::Fps(fps);
    }
    if let Some(trail) = cli.trail {
        config.trail_capacity = trail;
    }
    if cli.format.is_some() {
        config.format = cli.format;
    }
    if cli.keep_frames {
        config.retain_frames = true;
    }
    config.validate()?;
    Ok(config)
}

fn show_path(requested: &Path, mode: RenderMode, format: Option<OutputFormat>) -> PathBuf {
    let ext = format
        .or_else(|| OutputFormat::from_extension(requested))
        .map(OutputFormat::extension)
        .unwrap_or(match mode {
            RenderMode::Static => "png",
            RenderMode::Animated => "gif",
        });
    std::env::temp_dir().join(format!("pendviz_show_{}.{ext}", std::process::id()))
}

fn open_viewer(path: &Path) -> anyhow::Result<()> {
    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path)
        .spawn()
        .with_context(|| format!("open viewer for '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "opened in viewer");
    Ok(())
}
