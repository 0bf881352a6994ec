//! Synthetic multi-channel EEG generator
//!
//! Each channel is a sinusoid with its own amplitude and frequency, drawn
//! once per call, plus uniform noise on every sample.

use crate::config::{validate_sampling_rate, validate_window, window_len};
use crate::random::RandomSource;
use eeg_core::{ensure_positive, EegError, EegResult, Sample};
use std::collections::HashSet;
use std::f64::consts::PI;

/// Range of per-channel amplitudes in µV
pub const AMPLITUDE_RANGE: (f64, f64) = (50.0, 80.0);
/// Range of per-channel oscillation frequencies in Hz
pub const FREQUENCY_RANGE: (f64, f64) = (0.1, 0.4);
/// Half-width of the additive noise in µV
pub const NOISE_AMPLITUDE: f64 = 10.0;

/// Oscillation parameters of one channel for one generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelProfile {
    pub amplitude: f64,
    pub frequency: f64,
}

impl ChannelProfile {
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let amplitude = rng.uniform(AMPLITUDE_RANGE.0, AMPLITUDE_RANGE.1);
        let frequency = rng.uniform(FREQUENCY_RANGE.0, FREQUENCY_RANGE.1);
        Self { amplitude, frequency }
    }

    /// Noise-free value at `time` seconds
    pub fn value_at(&self, time: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency * time).sin()
    }
}

/// Reject empty channel lists and duplicate ids
pub fn validate_channel_ids<S: AsRef<str>>(channel_ids: &[S]) -> EegResult<()> {
    if channel_ids.is_empty() {
        return Err(EegError::InvalidChannelSet {
            reason: "at least one channel is required".to_string(),
        });
    }

    let mut seen = HashSet::with_capacity(channel_ids.len());
    for id in channel_ids {
        if !seen.insert(id.as_ref()) {
            return Err(EegError::InvalidChannelSet {
                reason: format!("duplicate channel '{}'", id.as_ref()),
            });
        }
    }
    Ok(())
}

/// Generate `floor(duration_secs * sampling_rate_hz)` samples starting at `start_ms`
///
/// Sample `i` is stamped `start_ms + round(i * 1000 / sampling_rate_hz)`, so
/// spacing is exact whenever the rate divides 1000.
pub fn generate_eeg_data<S, R>(
    duration_secs: f64,
    sampling_rate_hz: f64,
    channel_ids: &[S],
    start_ms: u64,
    rng: &mut R,
) -> EegResult<Vec<Sample>>
where
    S: AsRef<str>,
    R: RandomSource + ?Sized,
{
    ensure_positive("duration_secs", duration_secs)?;
    validate_sampling_rate(sampling_rate_hz)?;
    validate_window(duration_secs, sampling_rate_hz)?;
    validate_channel_ids(channel_ids)?;

    let sample_count = window_len(duration_secs, sampling_rate_hz);
    let period_ms = 1000.0 / sampling_rate_hz;

    let profiles: Vec<ChannelProfile> = channel_ids
        .iter()
        .map(|_| ChannelProfile::random(rng))
        .collect();

    let mut data = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let timestamp = start_ms + (i as f64 * period_ms).round() as u64;
        let time = i as f64 / sampling_rate_hz;
        let mut sample = Sample::new(timestamp);

        for (id, profile) in channel_ids.iter().zip(&profiles) {
            let noise = rng.uniform(-NOISE_AMPLITUDE, NOISE_AMPLITUDE);
            sample.set(id.as_ref(), profile.value_at(time) + noise);
        }

        data.push(sample);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SequenceSource};
    use eeg_core::BrainRegion;

    #[test]
    fn test_sample_count_and_spacing() {
        let ids = BrainRegion::channel_ids();
        let mut rng = RngSource::seeded(42);

        for (duration, rate) in [(30.0, 10.0), (1.0, 250.0), (2.0, 4.0), (0.5, 1000.0)] {
            let data = generate_eeg_data(duration, rate, &ids, 1_000_000, &mut rng).unwrap();
            assert_eq!(data.len(), (duration * rate) as usize);
            assert_eq!(data[0].timestamp, 1_000_000);

            let step = (1000.0 / rate) as u64;
            for pair in data.windows(2) {
                assert_eq!(pair[1].timestamp - pair[0].timestamp, step);
            }
        }
    }

    #[test]
    fn test_every_sample_covers_every_channel() {
        let ids = BrainRegion::channel_ids();
        let mut rng = RngSource::seeded(3);
        let data = generate_eeg_data(5.0, 10.0, &ids, 0, &mut rng).unwrap();

        for sample in &data {
            assert!(sample.covers(&ids));
            for id in &ids {
                let value = sample.value(id);
                assert!(value.is_finite());
                // |amplitude| < 80 plus |noise| <= 10
                assert!(value.abs() <= 90.0);
            }
        }
    }

    #[test]
    fn test_non_integral_period_stays_strictly_increasing() {
        let mut rng = RngSource::seeded(11);
        let data = generate_eeg_data(3.0, 3.0, &["frontal"], 0, &mut rng).unwrap();
        assert_eq!(data.len(), 9);
        let stamps: Vec<u64> = data.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![0, 333, 667, 1000, 1333, 1667, 2000, 2333, 2667]);
    }

    #[test]
    fn test_profiles_fixed_per_call() {
        // amplitude draw 0.5 -> 65µV, frequency draw 0.5 -> 0.25Hz, noise draw 0.5 -> 0
        let mut rng = SequenceSource::constant(0.5);
        let data = generate_eeg_data(4.0, 1.0, &["frontal"], 0, &mut rng).unwrap();

        let values: Vec<f64> = data.iter().map(|s| s.value("frontal")).collect();
        let expected = [0.0, 65.0, 0.0, -65.0];
        for (value, expected) in values.iter().zip(expected) {
            assert!((value - expected).abs() < 1e-9, "{} != {}", value, expected);
        }
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut rng = RngSource::seeded(0);
        assert!(generate_eeg_data(0.0, 10.0, &["frontal"], 0, &mut rng).is_err());
        assert!(generate_eeg_data(10.0, -1.0, &["frontal"], 0, &mut rng).is_err());
        assert!(matches!(
            generate_eeg_data(1e18, 1000.0, &["frontal"], 0, &mut rng),
            Err(EegError::InvalidParameter { name: "duration_secs", .. })
        ));
        assert!(generate_eeg_data::<&str, _>(10.0, 10.0, &[], 0, &mut rng).is_err());
        assert!(matches!(
            generate_eeg_data(10.0, 10.0, &["frontal", "frontal"], 0, &mut rng),
            Err(EegError::InvalidChannelSet { .. })
        ));
    }
}
