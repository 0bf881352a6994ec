//! Session and analysis configuration

use eeg_core::{ensure_positive, BrainRegion, EegError, EegResult, FRONTAL, TEMPORAL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Highest sampling rate that still yields a timer period of at least 1ms
pub const MAX_SAMPLING_RATE_HZ: f64 = 1000.0;

/// Largest sliding window accepted, in samples
pub const MAX_WINDOW_SAMPLES: usize = 1_000_000;

/// Stress level above which the high-stress alert is raised
pub const STRESS_THRESHOLD: f64 = 70.0;

/// Validate a sampling rate for generation and for the live timer
pub fn validate_sampling_rate(rate: f64) -> EegResult<()> {
    ensure_positive("sampling_rate_hz", rate)?;
    if rate > MAX_SAMPLING_RATE_HZ {
        return Err(EegError::InvalidParameter {
            name: "sampling_rate_hz",
            value: rate,
            reason: "must not exceed 1000Hz",
        });
    }
    Ok(())
}

/// Reject windows too large to allocate
pub fn validate_window(duration_secs: f64, sampling_rate_hz: f64) -> EegResult<()> {
    if duration_secs * sampling_rate_hz > MAX_WINDOW_SAMPLES as f64 {
        return Err(EegError::InvalidParameter {
            name: "duration_secs",
            value: duration_secs,
            reason: "window must not exceed 1000000 samples",
        });
    }
    Ok(())
}

/// Number of samples held by a window of `duration_secs` at `sampling_rate_hz`
pub fn window_len(duration_secs: f64, sampling_rate_hz: f64) -> usize {
    // Absorb representation error such as 0.29 * 100 = 28.999999999999996
    (duration_secs * sampling_rate_hz + 1e-9).floor() as usize
}

/// Which channels feed the stress metric and where the alert fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub threshold: f64,
    /// Channel whose previous value gates the alert
    pub primary_channel: String,
    pub secondary_channel: String,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threshold: STRESS_THRESHOLD,
            primary_channel: FRONTAL.to_string(),
            secondary_channel: TEMPORAL.to_string(),
        }
    }
}

impl StressConfig {
    pub fn validate(&self) -> EegResult<()> {
        if !self.threshold.is_finite() {
            return Err(EegError::InvalidParameter {
                name: "stress.threshold",
                value: self.threshold,
                reason: "must be finite",
            });
        }
        for channel in [&self.primary_channel, &self.secondary_channel] {
            if BrainRegion::by_id(channel).is_none() {
                return Err(EegError::InvalidChannelSet {
                    reason: format!("unknown stress channel '{}'", channel),
                });
            }
        }
        Ok(())
    }
}

/// Configuration of one live test session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Window length in seconds
    pub duration_secs: f64,
    /// Samples per second, also the tick rate of the live loop
    pub sampling_rate_hz: f64,
    pub stress: StressConfig,
    /// Fixed seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30.0,
            sampling_rate_hz: 10.0,
            stress: StressConfig::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> EegResult<()> {
        ensure_positive("duration_secs", self.duration_secs)?;
        validate_sampling_rate(self.sampling_rate_hz)?;
        validate_window(self.duration_secs, self.sampling_rate_hz)?;
        if self.capacity() == 0 {
            return Err(EegError::InvalidParameter {
                name: "duration_secs",
                value: self.duration_secs,
                reason: "window must hold at least one sample",
            });
        }
        self.stress.validate()
    }

    /// Maximum number of samples in the sliding window
    pub fn capacity(&self) -> usize {
        window_len(self.duration_secs, self.sampling_rate_hz)
    }

    /// Exact spacing between samples in milliseconds
    pub fn period_ms(&self) -> f64 {
        1000.0 / self.sampling_rate_hz
    }

    /// Timestamp increment applied by each live tick
    pub fn step_ms(&self) -> u64 {
        self.period_ms().round().max(1.0) as u64
    }

    /// Timer period of the live loop
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.sampling_rate_hz)
    }
}

/// Pacing of the simulated emotion analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub step_interval_ms: u64,
    /// Percentage points added per step
    pub progress_step: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: 200,
            progress_step: 2,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> EegResult<()> {
        if self.step_interval_ms == 0 {
            return Err(EegError::InvalidParameter {
                name: "analysis.step_interval_ms",
                value: 0.0,
                reason: "must be greater than zero",
            });
        }
        if self.progress_step == 0 || self.progress_step > 100 {
            return Err(EegError::InvalidParameter {
                name: "analysis.progress_step",
                value: f64::from(self.progress_step),
                reason: "must be between 1 and 100",
            });
        }
        Ok(())
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}
