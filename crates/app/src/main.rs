use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use swing_metronome_core::{
    cycle_length_ms, display_text, AppConfig, MetronomeWidget, Orientation, WidgetEvent,
};
use tracing_subscriber::EnvFilter;

fn main() -> swing_metronome_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            bpm,
            seconds,
        } => run_metronome(config.as_deref(), bpm, seconds),
        Commands::Plan {
            width,
            height,
            landscape,
            bpm,
            phase,
        } => print_plan(width, height, landscape, bpm, phase),
    }
}

/// Drives the widget with real monotonic timestamps, the way a platform
/// redraw loop would: one tick plus one rendered frame per iteration.
fn run_metronome(
    config: Option<&std::path::Path>,
    bpm: Option<f32>,
    seconds: f32,
) -> swing_metronome_core::Result<()> {
    let config = match config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::live_defaults(),
    };

    let mut widget = MetronomeWidget::from_config(&config)?;
    widget.set_beat_observer(|| tracing::info!("beat"));
    widget
        .set_bpm_changed_observer(|bpm| tracing::info!(text = %display_text(bpm), "bpm changed"));

    // The --bpm flag stands in for a preference restored by a real host.
    let start_bpm = bpm.unwrap_or_else(|| widget.default_bpm());
    widget.set_bpm(start_bpm);
    tracing::info!(bpm = widget.bpm(), seconds, "starting metronome");

    let frame = Duration::from_secs_f32(1.0 / config.display.target_fps.max(1) as f32);
    let started = Instant::now();

    while started.elapsed().as_secs_f32() < seconds {
        let now_ms = started.elapsed().as_secs_f64() * 1_000.0;
        widget.handle_event(WidgetEvent::Tick { now_ms })?;
        let plan = widget.render_frame()?;
        tracing::debug!(
            rotation = plan.rotation_degrees,
            phase = widget.phase(),
            "frame"
        );
        std::thread::sleep(frame);
    }

    Ok(())
}

/// Renders a single frame at the requested phase and prints the draw plan
/// as JSON, useful for inspecting the geometry without a display.
fn print_plan(
    width: u32,
    height: u32,
    landscape: bool,
    bpm: Option<f32>,
    phase: f32,
) -> swing_metronome_core::Result<()> {
    let config = AppConfig::live_defaults();
    let mut widget = MetronomeWidget::new(config.tempo.bounds()?);

    let orientation = if landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    widget.on_resize(width, height, orientation)?;

    if let Some(bpm) = bpm {
        widget.set_bpm(bpm);
    }

    // Walk the oscillator to the requested phase deterministically.
    widget.tick(0.0);
    widget.tick(f64::from(phase.fract() * cycle_length_ms(widget.bpm())));

    let plan = widget.render_frame()?;
    println!("{}", plan.to_json_string()?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Visual metronome with a sliding tempo control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the metronome loop, logging beats and frames.
    Run {
        /// Optional JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Starting BPM, in place of a stored preference.
        #[arg(short, long)]
        bpm: Option<f32>,
        /// How long to run before exiting.
        #[arg(short, long, default_value_t = 10.0)]
        seconds: f32,
    },
    /// Print the draw plan for a single frame as JSON.
    Plan {
        /// Canvas width in pixels.
        #[arg(long, default_value_t = 1080)]
        width: u32,
        /// Canvas height in pixels.
        #[arg(long, default_value_t = 1920)]
        height: u32,
        /// Treat the canvas as landscape.
        #[arg(long)]
        landscape: bool,
        /// BPM to place the weight at.
        #[arg(short, long)]
        bpm: Option<f32>,
        /// Swing phase to render, [0, 1).
        #[arg(short, long, default_value_t = 0.0)]
        phase: f32,
    },
}
