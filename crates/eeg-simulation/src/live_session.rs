//! Per-test session state advanced one tick at a time

use crate::config::{validate_sampling_rate, SessionConfig};
use crate::random::RandomSource;
use crate::signal_buffer::SignalBuffer;
use crate::signal_generator::{generate_eeg_data, NOISE_AMPLITUDE};
use crate::stress::StressDetector;
use eeg_core::{now_millis, BrainRegion, EegResult, Sample};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Read-only view of a session published after every tick
///
/// Cloning shares the window rather than copying it.
#[derive(Debug, Clone, Serialize)]
pub struct LiveSnapshot {
    pub session_id: Uuid,
    /// Ticks applied since the window was (re)generated
    pub tick: u64,
    pub samples: Arc<[Arc<Sample>]>,
    pub stress: f64,
    pub threshold: f64,
    pub sampling_rate_hz: f64,
}

impl LiveSnapshot {
    pub fn is_high_stress(&self) -> bool {
        self.stress > self.threshold
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last().map(Arc::as_ref)
    }

    /// `[seconds since first sample, amplitude]` points for one channel
    pub fn channel_series(&self, channel_id: &str) -> Vec<[f64; 2]> {
        let origin = match self.samples.first() {
            Some(first) => first.timestamp,
            None => return Vec::new(),
        };
        self.samples
            .iter()
            .map(|s| {
                let seconds = s.timestamp.saturating_sub(origin) as f64 / 1000.0;
                [seconds, s.value(channel_id)]
            })
            .collect()
    }
}

/// Result of applying one tick
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub sample: Sample,
    pub stress: f64,
    /// Upward threshold crossing on this tick
    pub alert: bool,
}

/// Sliding window, stress state and random source of one live test
pub struct LiveSession<R> {
    id: Uuid,
    config: SessionConfig,
    channel_ids: Vec<String>,
    buffer: SignalBuffer,
    detector: StressDetector,
    stress: f64,
    ticks: u64,
    rng: R,
}

impl<R: RandomSource> LiveSession<R> {
    /// Validate `config` and fill the window with freshly generated data
    pub fn new(config: SessionConfig, mut rng: R) -> EegResult<Self> {
        config.validate()?;
        let channel_ids: Vec<String> = BrainRegion::channel_ids()
            .into_iter()
            .map(String::from)
            .collect();
        let initial = generate_eeg_data(
            config.duration_secs,
            config.sampling_rate_hz,
            &channel_ids,
            now_millis(),
            &mut rng,
        )?;
        Self::from_samples(config, channel_ids, initial, rng)
    }

    /// Start from existing samples instead of generated ones
    pub fn from_samples(
        config: SessionConfig,
        channel_ids: Vec<String>,
        samples: Vec<Sample>,
        rng: R,
    ) -> EegResult<Self> {
        config.validate()?;
        crate::signal_generator::validate_channel_ids(&channel_ids)?;

        let buffer = SignalBuffer::from_samples(samples, config.capacity())?;
        let detector = StressDetector::new(config.stress.clone());
        let stress = buffer.latest().map(|s| detector.stress_level(s)).unwrap_or(0.0);
        let id = Uuid::new_v4();

        info!(
            session = %id,
            capacity = buffer.capacity(),
            rate_hz = config.sampling_rate_hz,
            "live session created"
        );

        Ok(Self {
            id,
            config,
            channel_ids,
            buffer,
            detector,
            stress,
            ticks: 0,
            rng,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn channel_ids(&self) -> &[String] {
        &self.channel_ids
    }

    pub fn buffer(&self) -> &SignalBuffer {
        &self.buffer
    }

    pub fn stress(&self) -> f64 {
        self.stress
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Apply one tick: random-walk every channel, update stress, slide the window
    pub fn tick(&mut self) -> TickOutcome {
        let previous = self.buffer.latest();
        let last_timestamp = previous.map(|s| s.timestamp).unwrap_or_else(now_millis);

        let mut sample = Sample::new(last_timestamp + self.config.step_ms());
        for id in &self.channel_ids {
            let prev_value = previous.map(|s| s.value(id)).unwrap_or(0.0);
            let step = self.rng.uniform(-NOISE_AMPLITUDE, NOISE_AMPLITUDE);
            sample.set(id.as_str(), prev_value + step);
        }

        let (stress, alert) = self.detector.evaluate(previous, &sample);
        if alert {
            debug!(session = %self.id, stress, "stress threshold crossed");
        }

        self.stress = stress;
        self.buffer.push(sample.clone());
        self.ticks += 1;

        TickOutcome { sample, stress, alert }
    }

    /// Switch to a new rate and regenerate the window at the new capacity
    pub fn set_sampling_rate(&mut self, sampling_rate_hz: f64) -> EegResult<()> {
        validate_sampling_rate(sampling_rate_hz)?;
        let config = SessionConfig {
            sampling_rate_hz,
            ..self.config.clone()
        };
        config.validate()?;

        let samples = generate_eeg_data(
            config.duration_secs,
            config.sampling_rate_hz,
            &self.channel_ids,
            now_millis(),
            &mut self.rng,
        )?;
        self.buffer = SignalBuffer::from_samples(samples, config.capacity())?;
        self.stress = self
            .buffer
            .latest()
            .map(|s| self.detector.stress_level(s))
            .unwrap_or(0.0);
        self.ticks = 0;
        self.config = config;

        info!(
            session = %self.id,
            rate_hz = sampling_rate_hz,
            capacity = self.buffer.capacity(),
            "sampling rate changed"
        );
        Ok(())
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        LiveSnapshot {
            session_id: self.id,
            tick: self.ticks,
            samples: self.buffer.shared(),
            stress: self.stress,
            threshold: self.detector.threshold(),
            sampling_rate_hz: self.config.sampling_rate_hz,
        }
    }
}
