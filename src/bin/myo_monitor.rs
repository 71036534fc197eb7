//! Myo Monitor entry point
//!
//! Runs the poll loop against the simulated armband, logs a status line
//! periodically and saves the session when interrupted or when the run
//! duration ends.

use clap::Parser;
use myo_monitor::config::{ConfigLoader, MonitorConfig};
use myo_monitor::hal::simulator::SimulatedHub;
use myo_monitor::monitor::{LogRenderer, Monitor, Renderer};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "myo-monitor", version, about = "Live Myo armband monitor")]
struct Args {
    /// Configuration file; the standard search paths are used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file written on exit
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop after this many seconds
    #[arg(short, long)]
    duration_secs: Option<u64>,

    /// Exit without saving the session
    #[arg(long)]
    no_save: bool,
}

fn load_config(args: &Args) -> myo_monitor::Result<MonitorConfig> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_file(path)?,
        None => ConfigLoader::new().load()?,
    };
    Ok(config)
}

async fn run_until_deadline(duration: Option<Duration>) {
    match duration {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> myo_monitor::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("myo_monitor=info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let target = if args.no_save {
        None
    } else {
        Some(args.output.clone().unwrap_or_else(|| config.export.default_path()))
    };

    let hub = SimulatedHub::start(config.simulator.clone())?;
    let mut renderer = LogRenderer::new(config.display.status_every_ticks);
    let mut interval = tokio::time::interval(config.display.poll_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut monitor = Monitor::new(hub, config)?;

    info!(version = myo_monitor::VERSION, "myo monitor started");

    let deadline = run_until_deadline(args.duration_secs.map(Duration::from_secs));
    tokio::pin!(deadline);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupt received, closing");
                break;
            }
            _ = &mut deadline => {
                info!("run duration elapsed, closing");
                break;
            }
            _ = interval.tick() => {
                // Pumping blocks for up to the pump timeout
                match tokio::task::block_in_place(|| monitor.tick()) {
                    Ok(frame) => renderer.render(&frame),
                    Err(e) => {
                        error!("Poll loop stopped: {}", e);
                        break;
                    }
                }
            }
        }
    }

    if let Some(summary) = monitor.close(target.as_deref())? {
        info!(path = %summary.path.display(), rows = summary.rows, "session saved");
    }
    Ok(())
}
