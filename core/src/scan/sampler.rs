use crate::scan::MIN_DISTANCE_CM;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Angular window where the simulated room returns a fixed echo band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EchoZone {
    pub center_deg: f32,
    pub half_width_deg: f32,
    pub base_cm: f32,
    pub spread_cm: f32,
}

impl EchoZone {
    pub const fn new(center_deg: f32, half_width_deg: f32, base_cm: f32, spread_cm: f32) -> Self {
        Self {
            center_deg,
            half_width_deg,
            base_cm,
            spread_cm,
        }
    }

    pub fn contains(&self, angle_deg: f32) -> bool {
        (angle_deg - self.center_deg).abs() < self.half_width_deg
    }
}

/// Configuration for generating synthetic distance readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub zones: Vec<EchoZone>,
    pub far_blip_probability: f64,
    pub far_blip_base_cm: f32,
    pub far_blip_spread_cm: f32,
    /// Peak-to-peak width of the uniform noise added to every sample.
    pub noise_cm: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            zones: vec![
                EchoZone::new(30.0, 4.0, 120.0, 20.0),
                EchoZone::new(60.0, 3.0, 80.0, 15.0),
                EchoZone::new(90.0, 5.0, 200.0, 30.0),
                EchoZone::new(120.0, 6.0, 300.0, 40.0),
                EchoZone::new(150.0, 4.0, 150.0, 25.0),
            ],
            far_blip_probability: 0.05,
            far_blip_base_cm: 350.0,
            far_blip_spread_cm: 100.0,
            noise_cm: 15.0,
        }
    }
}

/// Raw and clamped distance produced for one sweep step.
///
/// Detection compares against `raw_cm`; only `distance_cm` is ever stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub raw_cm: f32,
    pub distance_cm: f32,
}

pub struct SampleGenerator {
    config: SamplerConfig,
    max_range: f32,
}

impl SampleGenerator {
    pub fn new(config: SamplerConfig, max_range: f32) -> Self {
        Self { config, max_range }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    pub fn sample<R: Rng + ?Sized>(&self, angle_deg: f32, rng: &mut R) -> RawSample {
        let mut distance = self.max_range;

        // Later zones win when windows overlap.
        for zone in self.config.zones.iter().filter(|zone| zone.contains(angle_deg)) {
            distance = zone.base_cm + spread(rng, zone.spread_cm);
        }

        if rng.gen::<f64>() < self.config.far_blip_probability {
            distance = self.config.far_blip_base_cm + spread(rng, self.config.far_blip_spread_cm);
        }

        distance += (rng.gen::<f32>() - 0.5) * self.config.noise_cm;

        RawSample {
            raw_cm: distance,
            distance_cm: distance.min(self.max_range).max(MIN_DISTANCE_CM),
        }
    }
}

fn spread<R: Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    rng.gen::<f32>() * width
}
