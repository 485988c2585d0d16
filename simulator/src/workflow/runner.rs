use crate::generator::profile::build_session;
use crate::workflow::config::WorkflowConfig;
use crate::workflow::events::EventSink;
use anyhow::Context;
use chrono::{DateTime, Utc};
use radarcore::capture::CaptureSummary;
use radarcore::{Command, SessionEvent, SessionSnapshot};
use std::path::{Path, PathBuf};

pub struct WorkflowResult {
    pub seed: u64,
    pub snapshot: SessionSnapshot,
    pub announcements: Vec<String>,
    pub captures: Vec<CaptureSummary>,
    pub exported: Vec<PathBuf>,
}

/// Offline driver: runs a session on simulated time from start to `duration_ms`.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(
        &self,
        seed: u64,
        epoch: DateTime<Utc>,
        export_dir: Option<&Path>,
    ) -> anyhow::Result<WorkflowResult> {
        let mut session = build_session(&self.config, seed, epoch)?;
        let sink = EventSink::new(self.config.sample_rate);
        let mut events = Vec::new();

        if self.config.autostart {
            events.extend(session.command(Command::Start, 0));
        }
        // One step per scan period keeps log output in tick order.
        let step = self.config.radar.scan_period_ms.max(1);
        let mut now = 0;
        while now < self.config.duration_ms {
            now = (now + step).min(self.config.duration_ms);
            let batch = session.advance(now);
            sink.handle(&batch);
            events.extend(batch);
        }

        let announcements = events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::Announced(text) => Some(text.clone()),
                _ => None,
            })
            .collect();
        let captures = events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::Captured(summary) => Some(summary.clone()),
                _ => None,
            })
            .collect();

        let mut exported = Vec::new();
        if let Some(dir) = export_dir {
            for image in session.captures().images() {
                let path = image
                    .export(dir)
                    .with_context(|| format!("exporting capture {}", image.name))?;
                exported.push(path);
            }
        }

        Ok(WorkflowResult {
            seed,
            snapshot: session.snapshot(),
            announcements,
            captures,
            exported,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorkflowConfig {
        WorkflowConfig::from_args(500.0, Some(11), 12_000)
    }

    #[test]
    fn runner_executes_workflow() {
        let runner = Runner::new(config());
        let result = runner.execute(11, Utc::now(), None).unwrap();
        assert_eq!(result.snapshot.metrics.scan_ticks, 240);
        assert_eq!(result.snapshot.metrics.cleanup_passes, 6);
        assert!(result.snapshot.readings.len() <= 500);
        assert!(result.snapshot.objects.len() <= 30);
        assert!(!result.announcements.is_empty());
        assert!(result.exported.is_empty());
    }

    #[test]
    fn runner_without_autostart_stays_idle() {
        let mut cfg = config();
        cfg.autostart = false;
        let result = Runner::new(cfg).execute(11, Utc::now(), None).unwrap();
        assert_eq!(result.snapshot.metrics.scan_ticks, 0);
        assert!(result.snapshot.readings.is_empty());
    }

    #[test]
    fn runner_exports_captures() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(config());
        let result = runner.execute(11, Utc::now(), Some(dir.path())).unwrap();
        assert!(!result.captures.is_empty());
        assert_eq!(result.exported.len(), result.snapshot.captures.len());
        assert!(result.exported.iter().all(|path| path.exists()));
    }
}
