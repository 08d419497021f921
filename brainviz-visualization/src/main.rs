use anyhow::{ensure, Context};
use brainviz_algorithms::{CentroidConfig, CentroidLocalizer};
use brainviz_core::{AcquisitionStream, ZoomConfig, HEAD_RADIUS};
use brainviz_io::{epoc_layout, read_layout, read_mesh};
use brainviz_pipeline::{HeadsetConfig, Orchestrator, OrchestratorConfig, SimulatedHeadset};
use brainviz_visualization::{default_brain_mesh, ControllerConfig, Viewer, ViewerConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "brainviz",
    version,
    about = "Live 3D view of EEG electrodes and localized brain activity sources"
)]
struct Cli {
    /// Brain model (Wavefront OBJ); an ellipsoid is shown when omitted
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Electrode layout file with `label,x,y,z` lines; defaults to the EPOC montage
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Seconds between localization cycles
    #[arg(long, default_value_t = 5.0)]
    period: f64,

    /// Number of sources to localize
    #[arg(long, default_value_t = 3)]
    sources: usize,

    #[arg(long, default_value_t = 0.1)]
    zoom_min: f32,

    #[arg(long, default_value_t = 20.0)]
    zoom_max: f32,

    /// Zoom change per wheel tick
    #[arg(long, default_value_t = 0.05)]
    zoom_step: f32,

    /// Rotation per arrow-key press, in degrees
    #[arg(long, default_value_t = 2.0)]
    rotation_step_deg: f32,

    /// Rotation for a drag across the whole window, in radians
    #[arg(long, default_value_t = std::f32::consts::TAU)]
    drag_sensitivity: f32,

    /// Simulated headset sample rate in Hz
    #[arg(long, default_value_t = 128.0)]
    sample_rate: f64,

    /// Seed of the simulated headset's noise
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    ensure!(cli.period.is_finite() && cli.period > 0.0, "--period must be positive");
    ensure!(cli.sources > 0, "--sources must be at least 1");
    ensure!(
        cli.zoom_min > 0.0 && cli.zoom_min <= cli.zoom_max,
        "zoom bounds must satisfy 0 < min <= max"
    );
    ensure!(cli.zoom_step.is_finite() && cli.zoom_step > 0.0, "--zoom-step must be positive");

    let layout = match &cli.layout {
        Some(path) => read_layout(path).with_context(|| format!("Failed to read layout {}", path.display()))?,
        None => epoc_layout(),
    };

    let mesh = match &cli.mesh {
        Some(path) => read_mesh(path, Some(HEAD_RADIUS * 0.9))
            .with_context(|| format!("Failed to load mesh {}", path.display()))?,
        None => default_brain_mesh(),
    };

    let headset = Arc::new(
        SimulatedHeadset::start(
            layout,
            HeadsetConfig {
                sample_rate: cli.sample_rate,
                seed: cli.seed,
                ..HeadsetConfig::default()
            },
        )
        .context("Failed to start acquisition")?,
    );
    let layout = headset.electrode_layout();

    let engine = CentroidLocalizer::new(
        Arc::clone(&layout),
        CentroidConfig {
            source_count: cli.sources,
            ..CentroidConfig::default()
        },
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("brainviz-pipeline")
        .enable_time()
        .build()
        .context("Failed to create pipeline runtime")?;

    let orchestrator = Orchestrator::new(
        OrchestratorConfig {
            period: Duration::from_secs_f64(cli.period),
        },
        headset,
        Box::new(engine),
    );
    let snapshots = orchestrator.snapshots();
    let pipeline = orchestrator.spawn(runtime.handle());

    let zoom = ZoomConfig {
        min: cli.zoom_min,
        max: cli.zoom_max,
        step: cli.zoom_step,
        ..ZoomConfig::default()
    };
    zoom.validate().context("Invalid zoom settings")?;

    let config = ViewerConfig {
        controller: ControllerConfig {
            rotation_step: cli.rotation_step_deg.to_radians(),
            drag_sensitivity: cli.drag_sensitivity,
            zoom,
            ..ControllerConfig::default()
        },
        ..ViewerConfig::default()
    };
    let result = Viewer::new(config, layout, snapshots, mesh).run();

    pipeline.cancel();
    let stats = pipeline.stats();
    log::info!(
        "Pipeline ran {} cycles ({} failed localizations, last cycle {:?})",
        stats.cycles,
        stats.failures,
        stats.last_cycle
    );
    runtime.shutdown_background();

    result.context("Viewer failed")
}
