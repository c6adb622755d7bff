//! gaze-smoother - smooth a recorded or simulated gaze stream.
//!
//! Reads tracker messages (one JSON object per line) from a file or stdin,
//! or generates them with the built-in simulator, and prints one line per
//! smoothed sample: `timestamp raw_x raw_y smoothed_x smoothed_y state`.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use gaze_smoother::message::{DeviceState, TrackerMessage};
use gaze_smoother::session::{GazeSession, SessionEvent};
use gaze_smoother::simulator::{GazeSimulator, SimulatedPath};
use gaze_smoother::source::{JsonLinesSource, MessageSource};
use gaze_smoother::SmootherConfig;

#[derive(Parser, Debug)]
#[command(name = "gaze-smoother", about = "Fixation-aware gaze smoothing")]
struct Cli {
    /// Tracker message log (JSON lines); reads stdin when omitted
    #[arg(long)]
    input: Option<String>,

    /// Run the simulator instead: fixed, ramp, or jumps
    #[arg(long)]
    simulate: Option<String>,

    /// Number of simulated samples
    #[arg(long, default_value = "300")]
    samples: u64,

    /// Starting configuration: default or screen
    #[arg(long, default_value = "default")]
    preset: String,

    /// Smoothing strength during fixations
    #[arg(long)]
    damp_fixation: Option<u32>,

    /// Smoothing strength during saccades
    #[arg(long)]
    damp_saccade: Option<u32>,

    /// Buffer time window, ms
    #[arg(long)]
    time_window: Option<u64>,

    /// Centroid distance above which gaze counts as a saccade
    #[arg(long)]
    saccade_threshold: Option<f64>,

    /// Sampling interval, ms (0 = estimate)
    #[arg(long)]
    interval: Option<u64>,

    /// Print the session status after the stream ends
    #[arg(long)]
    status: bool,
}

impl Cli {
    fn smoother_config(&self) -> anyhow::Result<SmootherConfig> {
        let mut config = match self.preset.as_str() {
            "default" => SmootherConfig::default(),
            "screen" => SmootherConfig::screen_pixels(),
            other => anyhow::bail!("unknown preset '{other}'. Use: default or screen"),
        };
        if let Some(v) = self.damp_fixation {
            config.damp_fixation = v;
        }
        if let Some(v) = self.damp_saccade {
            config.damp_saccade = v;
        }
        if let Some(v) = self.time_window {
            config.time_window = v;
        }
        if let Some(v) = self.saccade_threshold {
            config.saccade_threshold = v;
        }
        if let Some(v) = self.interval {
            config.interval = v;
        }
        Ok(config)
    }

    fn source(&self) -> anyhow::Result<Box<dyn MessageSource>> {
        if let Some(name) = &self.simulate {
            let path = SimulatedPath::from_str(name).with_context(|| {
                format!("unknown simulated path '{name}'. Use: fixed, ramp, or jumps")
            })?;
            let mut sim = GazeSimulator::new(path);
            sim.sample_limit = Some(self.samples);
            sim.initialize();
            sim.toggle_tracking();
            return Ok(Box::new(sim));
        }

        match &self.input {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
                Ok(Box::new(JsonLinesSource::new(BufReader::new(file))))
            }
            None => Ok(Box::new(JsonLinesSource::new(io::stdin().lock()))),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gaze_smoother=info".into()),
        )
        .init();

    let config = cli.smoother_config()?;
    let mut source = cli.source()?;
    let mut session = GazeSession::new(config);

    info!("gaze-smoother v{} starting", env!("CARGO_PKG_VERSION"));

    // Recorded logs may start mid-stream without a tracking notification.
    if cli.simulate.is_none() {
        session.handle(TrackerMessage::State {
            value: DeviceState(DeviceState::TRACKING),
        });
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut smoothed_count = 0u64;
    let mut errors = 0u64;

    while let Some(message) = source.next_message() {
        let message = match message {
            Ok(m) => m,
            Err(e) => {
                warn!("skipping message: {e}");
                errors += 1;
                continue;
            }
        };
        if let SessionEvent::Sample {
            raw,
            smoothed,
            gaze_state,
        } = session.handle(message)
        {
            writeln!(
                out,
                "{} {:.2} {:.2} {:.2} {:.2} {}",
                raw.ts,
                raw.x,
                raw.y,
                smoothed.x,
                smoothed.y,
                gaze_state.as_str()
            )
            .context("failed to write output")?;
            smoothed_count += 1;
        }
    }

    if cli.status {
        writeln!(out, "{}", session.status_sexp()).context("failed to write status")?;
    }
    out.flush().context("failed to flush output")?;

    info!("{} samples smoothed, {} messages skipped", smoothed_count, errors);
    Ok(())
}
