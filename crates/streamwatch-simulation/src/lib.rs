//! # streamwatch-simulation
//!
//! Synthetic producer for exercising the detector: a repeating linear ramp
//! (the "seasonal" component) plus uniform noise, with a few values
//! overwritten by fixed spikes.
//!
//! ```text
//!   value(i) = amplitude · (i mod period) / period + U(-noise, noise)
//!   value(i) = spike.value                  if i is a spike index
//! ```
//!
//! A seeded source always produces the same stream.

#![deny(unsafe_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use streamwatch_detector::Sample;
use thiserror::Error;
use tracing::debug;

/// Default stream length.
pub const DEFAULT_STREAM_LENGTH: u64 = 1000;

/// Default ramp period in samples.
pub const DEFAULT_SEASONAL_PERIOD: u64 = 100;

/// Default ramp height.
pub const DEFAULT_SEASONAL_AMPLITUDE: f64 = 10.0;

/// Default half-width of the uniform noise.
pub const DEFAULT_NOISE_AMPLITUDE: f64 = 5.0;

// ── Errors ──────────────────────────────────────────────────────────────

/// Errors from simulation setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid simulation config: {field} {reason}")]
    InvalidConfig { field: String, reason: String },
}

pub type SimulationResult<T> = Result<T, SimulationError>;

fn invalid(field: &str, reason: &str) -> SimulationError {
    SimulationError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// ── Configuration ───────────────────────────────────────────────────────

/// A value forced at a fixed stream position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub index: u64,
    pub value: f64,
}

/// Parameters of the synthetic stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of samples to produce.
    pub length: u64,
    /// Ramp period in samples.
    pub seasonal_period: u64,
    /// Ramp height reached just before each period ends.
    pub seasonal_amplitude: f64,
    /// Noise is drawn uniformly from `[-noise_amplitude, noise_amplitude)`.
    pub noise_amplitude: f64,
    /// RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Positions overwritten with fixed values.
    pub spikes: Vec<Spike>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_STREAM_LENGTH,
            seasonal_period: DEFAULT_SEASONAL_PERIOD,
            seasonal_amplitude: DEFAULT_SEASONAL_AMPLITUDE,
            noise_amplitude: DEFAULT_NOISE_AMPLITUDE,
            seed: None,
            spikes: vec![
                Spike {
                    index: 200,
                    value: 20.0,
                },
                Spike {
                    index: 600,
                    value: -20.0,
                },
            ],
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> SimulationResult<()> {
        if self.seasonal_period == 0 {
            return Err(invalid("seasonal_period", "must be greater than zero"));
        }
        if !self.seasonal_amplitude.is_finite() || self.seasonal_amplitude < 0.0 {
            return Err(invalid(
                "seasonal_amplitude",
                "must be a finite non-negative number",
            ));
        }
        if !self.noise_amplitude.is_finite() || self.noise_amplitude < 0.0 {
            return Err(invalid(
                "noise_amplitude",
                "must be a finite non-negative number",
            ));
        }
        if self.spikes.iter().any(|s| !s.value.is_finite()) {
            return Err(invalid("spikes", "values must be finite"));
        }
        Ok(())
    }
}

// ── Source ──────────────────────────────────────────────────────────────

/// Iterator producing the configured synthetic stream.
pub struct SeasonalNoiseSource {
    config: SimulationConfig,
    rng: StdRng,
    next_index: u64,
}

impl SeasonalNoiseSource {
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(
            length = config.length,
            period = config.seasonal_period,
            seeded = config.seed.is_some(),
            "synthetic source created"
        );
        Ok(Self {
            config,
            rng,
            next_index: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Ramp component at `index`, without noise.
    pub fn seasonal_value(&self, index: u64) -> f64 {
        let period = self.config.seasonal_period;
        self.config.seasonal_amplitude * (index % period) as f64 / period as f64
    }

    fn spike_at(&self, index: u64) -> Option<f64> {
        self.config
            .spikes
            .iter()
            .rev()
            .find(|s| s.index == index)
            .map(|s| s.value)
    }
}

impl Iterator for SeasonalNoiseSource {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.next_index >= self.config.length {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;

        // Draw noise even for spikes so the rest of the stream does not
        // depend on where the spikes sit.
        let noise = if self.config.noise_amplitude > 0.0 {
            let a = self.config.noise_amplitude;
            self.rng.gen_range(-a..a)
        } else {
            0.0
        };
        let value = match self.spike_at(index) {
            Some(spike) => spike,
            None => self.seasonal_value(index) + noise,
        };
        Some(Sample::new(index, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.config.length - self.next_index) as usize;
        (remaining, Some(remaining))
    }
}

/// Produce the whole configured stream.
pub fn generate(config: &SimulationConfig) -> SimulationResult<Vec<Sample>> {
    Ok(SeasonalNoiseSource::new(config.clone())?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed: Some(seed),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn default_stream_shape() {
        let samples = generate(&seeded(7)).unwrap();
        assert_eq!(samples.len(), 1000);
        assert_eq!(samples[0].index, 0);
        assert_eq!(samples[999].index, 999);
        assert_eq!(samples[200].value, 20.0);
        assert_eq!(samples[600].value, -20.0);
    }

    #[test]
    fn values_stay_within_ramp_plus_noise() {
        let samples = generate(&seeded(11)).unwrap();
        for s in samples.iter().filter(|s| s.index != 200 && s.index != 600) {
            assert!(s.value >= -5.0 && s.value < 15.0, "value {} out of range", s.value);
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let a = generate(&seeded(42)).unwrap();
        let b = generate(&seeded(42)).unwrap();
        assert_eq!(a, b);

        let c = generate(&seeded(43)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn noiseless_stream_is_pure_ramp() {
        let config = SimulationConfig {
            length: 250,
            noise_amplitude: 0.0,
            spikes: vec![],
            seed: Some(1),
            ..SimulationConfig::default()
        };
        let source = SeasonalNoiseSource::new(config).unwrap();
        assert_eq!(source.seasonal_value(150), 5.0);
        let samples: Vec<Sample> = source.collect();
        assert_eq!(samples[0].value, 0.0);
        assert_eq!(samples[50].value, 5.0);
        assert_eq!(samples[100].value, 0.0);
    }

    #[test]
    fn spikes_beyond_length_ignored() {
        let config = SimulationConfig {
            length: 100,
            seed: Some(3),
            ..SimulationConfig::default()
        };
        let samples = generate(&config).unwrap();
        assert_eq!(samples.len(), 100);
        assert!(samples.iter().all(|s| s.value.abs() < 20.0));
    }

    #[test]
    fn size_hint_counts_down() {
        let mut source = SeasonalNoiseSource::new(SimulationConfig {
            length: 3,
            seed: Some(0),
            ..SimulationConfig::default()
        })
        .unwrap();
        assert_eq!(source.size_hint(), (3, Some(3)));
        source.next();
        assert_eq!(source.size_hint(), (2, Some(2)));
    }

    #[test]
    fn invalid_configs_rejected() {
        let zero_period = SimulationConfig {
            seasonal_period: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            SeasonalNoiseSource::new(zero_period),
            Err(SimulationError::InvalidConfig { ref field, .. }) if field == "seasonal_period"
        ));

        let negative_noise = SimulationConfig {
            noise_amplitude: -1.0,
            ..SimulationConfig::default()
        };
        assert!(negative_noise.validate().is_err());

        let nan_spike = SimulationConfig {
            spikes: vec![Spike {
                index: 1,
                value: f64::NAN,
            }],
            ..SimulationConfig::default()
        };
        assert!(nan_spike.validate().is_err());
    }

    #[test]
    fn config_from_toml_fills_defaults() {
        let config: SimulationConfig = toml::from_str("length = 300\nseed = 9\n").unwrap();
        assert_eq!(config.length, 300);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.seasonal_period, DEFAULT_SEASONAL_PERIOD);
        assert_eq!(config.spikes.len(), 2);
    }
}
