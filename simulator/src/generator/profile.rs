use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use chrono::{DateTime, Utc};
use radarcore::Session;

/// Seed actually used for a run, so a random run can be replayed.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

pub fn build_session(
    config: &WorkflowConfig,
    seed: u64,
    epoch: DateTime<Utc>,
) -> anyhow::Result<Session> {
    Session::seeded(config.radar.clone(), config.sampler.clone(), seed, epoch)
        .context("building radar session")
}
