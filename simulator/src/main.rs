use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use generator::profile::{build_session, resolve_seed};
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use log::info;
use radarcore::Command;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::events::EventSink;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Simulated sweep radar driver")]
struct Args {
    /// Run one sweep session on simulated time and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 30_000)]
    duration_ms: u64,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 500.0)]
    max_range: f32,
    /// Write captured snapshots (PNG + JSON) here after an offline run
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Serve a live session to the visualizer until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.max_range, args.seed, args.duration_ms)
    };
    let seed = resolve_seed(args.seed.or(workflow_config.seed));

    if args.offline {
        let runner = Runner::new(workflow_config.clone());
        let result = runner.execute(seed, Utc::now(), args.export_dir.as_deref())?;
        let snapshot = &result.snapshot;

        println!(
            "Offline run (seed {}) -> readings {}, objects {}, announcements {}, captures {}, beeps {}/{}/{}",
            result.seed,
            snapshot.readings.len(),
            snapshot.objects.len(),
            result.announcements.len(),
            result.captures.len(),
            snapshot.metrics.scan_beeps,
            snapshot.metrics.detection_beeps,
            snapshot.metrics.alert_beeps
        );
        for path in &result.exported {
            println!("  exported {}", path.display());
        }

        let report = format!(
            "seed={} scan_ticks={} detections={} objects={} closest={:?} mean={:?} captures={}\n",
            result.seed,
            snapshot.metrics.scan_ticks,
            snapshot.metrics.detections,
            snapshot.objects.len(),
            snapshot.closest_cm,
            snapshot.mean_cm,
            result.captures.len()
        );
        let report_path = PathBuf::from("tools/data/offline_scan.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        file.write_all(report.as_bytes())?;
    }

    if args.serve {
        let mut session = build_session(&workflow_config, seed, Utc::now())?;
        if workflow_config.autostart {
            session.command(Command::Start, 0);
        }
        info!("serving session with seed {}", seed);
        let gui_bridge = GuiBridge::new(session, EventSink::new(workflow_config.sample_rate));
        gui_bridge.spawn(gui_bind_address());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
