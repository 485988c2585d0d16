use anyhow::Context;
use radarcore::scan::SamplerConfig;
use radarcore::RadarConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub radar: RadarConfig,
    pub sampler: SamplerConfig,
    /// Fixed seed for reproducible runs; a random one is drawn when absent.
    pub seed: Option<u64>,
    pub duration_ms: u64,
    pub autostart: bool,
    pub sample_rate: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            radar: RadarConfig::default(),
            sampler: SamplerConfig::default(),
            seed: None,
            duration_ms: 30_000,
            autostart: true,
            sample_rate: 22_050,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .radar
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(max_range: f32, seed: Option<u64>, duration_ms: u64) -> Self {
        Self {
            radar: RadarConfig {
                max_range,
                ..Default::default()
            },
            seed,
            duration_ms,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_sets_range_and_seed() {
        let cfg = WorkflowConfig::from_args(400.0, Some(9), 10_000);
        assert_eq!(cfg.radar.max_range, 400.0);
        assert_eq!(cfg.radar.scan_period_ms, 50);
        assert_eq!(cfg.seed, Some(9));
    }

    #[test]
    fn config_load_reads_partial_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"seed: 7\nduration_ms: 5000\nradar:\n  max_range: 300\n  beep_enabled: false\nsampler:\n  far_blip_probability: 0.0\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.radar.max_range, 300.0);
        assert!(!cfg.radar.beep_enabled);
        assert_eq!(cfg.radar.object_cap, 30);
        assert_eq!(cfg.sampler.zones.len(), 5);
        assert_eq!(cfg.sampler.far_blip_probability, 0.0);
    }

    #[test]
    fn config_load_rejects_invalid_radar() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"radar:\n  scan_period_ms: 0\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
