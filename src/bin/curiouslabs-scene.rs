use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use curiouslabs_scene::{
    ArithmeticBenchmark, CapabilityProber, FileStore, ManualScheduler, MissionTracker, Phase as _,
    PixmapSurfaceFactory, ProviderSettings, SceneConfig, SceneProvider, ScrollGate,
    render::composite::{over_in_place, unpremultiply_in_place},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

// Host frame interval used for headless runs (60 Hz).
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "curiouslabs-scene", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe device capability and print it as JSON.
    Probe(ProbeArgs),
    /// Run a scene headless and write the composited frame as a PNG.
    Frame(FrameArgs),
    /// Inspect or edit the persisted mission tracker.
    Mission(MissionArgs),
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Scene config JSON; its `environment` and `probe` sections are used.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scene config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Host frames to run before capturing.
    #[arg(long, default_value_t = 60)]
    frames: usize,

    /// Phases to advance before running frames.
    #[arg(long, default_value_t = 0)]
    advance: usize,
}

#[derive(Parser, Debug)]
struct MissionArgs {
    /// Directory holding the persisted tracker state.
    #[arg(long)]
    store: PathBuf,

    #[command(subcommand)]
    action: MissionAction,
}

#[derive(Subcommand, Debug)]
enum MissionAction {
    /// Print tasks and progress.
    List,
    /// Flip a task (and its subtasks).
    Toggle { id: String },
    /// Flip one subtask.
    ToggleSubtask { task: String, subtask: String },
    /// Restore the built-in task list.
    Reset,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("curiouslabs_scene=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Probe(args) => cmd_probe(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Mission(args) => cmd_mission(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::from_path(path)
            .with_context(|| format!("load scene config '{}'", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn prober(cfg: &SceneConfig) -> CapabilityProber {
    CapabilityProber::new(cfg.probe).with_env_overrides()
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let capability = prober(&cfg).probe(&cfg.environment, &ArithmeticBenchmark);
    let json = serde_json::to_string_pretty(&capability).context("serialize capability")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = read_config(Some(&args.config))?;
    let background = cfg.background_color()?;

    let sched = Rc::new(ManualScheduler::new());
    let provider = SceneProvider::mount(ProviderSettings {
        scheduler: sched.clone(),
        viewport: cfg.viewport,
        environment: &cfg.environment,
        benchmark: &ArithmeticBenchmark,
        prober: prober(&cfg),
        gate: ScrollGate::default(),
        seed: cfg.seed,
    });

    let mut ids = Vec::with_capacity(cfg.layers.len());
    for options in &cfg.layers {
        let id = provider
            .mount_layer(&PixmapSurfaceFactory, options)
            .with_context(|| format!("mount {} layer", options.kind.as_str()))?;
        ids.push(id);
    }

    let ctx = provider.context();
    for _ in 0..args.advance {
        if !ctx.advance_phase() {
            break;
        }
        sched.advance(ctx.phase().transition_ms() as f64);
    }
    sched.run_frames(args.frames, FRAME_MS);

    let (width, height) = provider.viewport().surface_dims();
    let mut canvas = Vec::with_capacity(width as usize * height as usize * 4);
    for _ in 0..(width as usize * height as usize) {
        canvas.extend_from_slice(&background.to_premul());
    }
    for id in ids {
        let Some(frame) = provider.renderer(id).and_then(|r| r.snapshot()) else {
            tracing::warn!(layer = id.0, "layer has no pixels; skipped");
            continue;
        };
        if (frame.width, frame.height) != (width, height) {
            anyhow::bail!(
                "layer {} is {}x{}, expected {width}x{height}",
                id.0,
                frame.width,
                frame.height
            );
        }
        over_in_place(&mut canvas, &frame.data, 1.0)?;
    }
    unpremultiply_in_place(&mut canvas);
    provider.unmount();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &canvas,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {} (phase {})", args.out.display(), ctx.phase().name());
    Ok(())
}

fn cmd_mission(args: MissionArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.store)
        .with_context(|| format!("create store dir '{}'", args.store.display()))?;
    let mut tracker = MissionTracker::load(FileStore::new(&args.store));

    match args.action {
        MissionAction::List => {}
        MissionAction::Toggle { id } => {
            if !tracker.toggle_task(&id)? {
                anyhow::bail!("unknown task '{id}'");
            }
        }
        MissionAction::ToggleSubtask { task, subtask } => {
            if !tracker.toggle_subtask(&task, &subtask)? {
                anyhow::bail!("unknown subtask '{task}/{subtask}'");
            }
        }
        MissionAction::Reset => tracker.reset()?,
    }

    for task in tracker.tasks() {
        println!("[{}] {} - {}", mark(task.completed), task.id, task.title);
        for sub in &task.subtasks {
            println!("    [{}] {} - {}", mark(sub.completed), sub.id, sub.title);
        }
    }
    let progress = tracker.progress();
    println!(
        "{}/{} tasks, {}/{} subtasks",
        progress.tasks_done, progress.tasks_total, progress.subtasks_done, progress.subtasks_total
    );
    Ok(())
}

fn mark(done: bool) -> char {
    if done { 'x' } else { ' ' }
}
