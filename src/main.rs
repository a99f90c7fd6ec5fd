//! DOL starter host runner.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  JsonConfigFile   LogEventSink   HostClock / ManualClock │
//! │  (ConfigPort)     (EventSink)    (ClockPort)             │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │           MotorStarter (pure logic)                │  │
//! │  │  reducer · simulation driver · overload relay      │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Plays an operator script against a starter session, either as fast as
//! possible in virtual time or paced by the wall clock, and prints the
//! final snapshot as JSON.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use dolstarter::adapters::{HostClock, JsonConfigFile, LogEventSink, ManualClock};
use dolstarter::app::commands::{ScriptStep, parse_script};
use dolstarter::app::ports::{ClockPort, ConfigPort};
use dolstarter::app::service::MotorStarter;
use dolstarter::config::StarterConfig;

/// Start, run for a few seconds, stop.
const DEMO_SCRIPT: &str = "0:press-start,150:release-start,5000:press-stop,5150:release-stop";

/// Extra time simulated after the last script step when no duration is given.
const SETTLE_MS: u64 = 3_000;

/// Longest single sleep in real-time mode.
const MAX_SLEEP_MS: u64 = 50;

#[derive(Parser, Debug)]
#[command(name = "dolstarter", version, about = "Direct-On-Line motor starter simulator")]
struct Cli {
    /// JSON configuration file; defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Operator script: "<ms>:<command>,…" (e.g. "0:press-start,4000:press-stop")
    #[arg(long)]
    script: Option<String>,

    /// Total simulated time; defaults to the last step plus settling time
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Pace the simulation with the wall clock instead of fast-forwarding
    #[arg(long)]
    realtime: bool,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

/// How virtual time is moved forward.
enum Pace {
    FastForward(ManualClock),
    Realtime(HostClock),
}

impl Pace {
    /// Bring `starter` to `target_ms`, firing timers on the way.
    fn run_until(&self, starter: &mut MotorStarter<LogEventSink>, target_ms: u64) {
        match self {
            Self::FastForward(clock) => {
                clock.set(target_ms);
                starter.advance_to(clock.now_ms());
            }
            Self::Realtime(clock) => loop {
                let now = clock.now_ms().min(target_ms);
                starter.advance_to(now);
                if now >= target_ms {
                    break;
                }
                let next = starter.next_due_ms().unwrap_or(target_ms).min(target_ms);
                let wait = next.saturating_sub(clock.now_ms()).clamp(1, MAX_SLEEP_MS);
                thread::sleep(Duration::from_millis(wait));
            },
        }
    }
}

/// Simulated end time: the explicit duration, or the last step plus settling.
fn end_time_ms(steps: &[ScriptStep], duration_ms: Option<u64>) -> u64 {
    duration_ms.unwrap_or_else(|| {
        steps
            .last()
            .map_or(0, |step| step.at_ms)
            .saturating_add(SETTLE_MS)
    })
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    info!("DOL starter v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let sink = LogEventSink::new();
    let mut starter = match &cli.config {
        Some(path) => {
            let port = JsonConfigFile::new(path);
            MotorStarter::from_port(&port, sink)
                .with_context(|| format!("loading config from {}", path.display()))?
        }
        None => MotorStarter::new(StarterConfig::default(), sink),
    };

    if let Some(path) = &cli.write_config {
        JsonConfigFile::new(path)
            .save(starter.config())
            .with_context(|| format!("writing config to {}", path.display()))?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    // ── 3. Script ─────────────────────────────────────────────
    let script = cli.script.as_deref().unwrap_or(DEMO_SCRIPT);
    let steps: Vec<ScriptStep> = parse_script(script).context("parsing --script")?;
    let end_ms = end_time_ms(&steps, cli.duration_ms);
    info!("Running {} step(s) over {} ms", steps.len(), end_ms);

    // ── 4. Run ────────────────────────────────────────────────
    let pace = if cli.realtime {
        Pace::Realtime(HostClock::new())
    } else {
        Pace::FastForward(ManualClock::new())
    };

    for step in steps.iter().filter(|step| step.at_ms <= end_ms) {
        pace.run_until(&mut starter, step.at_ms);
        info!("t={} ms: {:?}", step.at_ms, step.command);
        starter.handle_command(step.command);
    }
    pace.run_until(&mut starter, end_ms);
    let emitted = starter.sink().emitted();
    let snap = starter.shutdown();

    // ── 5. Report ─────────────────────────────────────────────
    info!(
        "Final: {} at {} RPM, run time {}, {} events",
        snap.motor_state,
        snap.motor_rpm,
        snap.formatted_runtime(),
        emitted
    );
    println!("{}", serde_json::to_string_pretty(&snap)?);

    Ok(())
}
