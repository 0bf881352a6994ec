//! Stress metric and edge-triggered high-stress alert

use crate::config::StressConfig;
use eeg_core::Sample;
use serde::Serialize;

/// Fire-and-forget notification raised on an upward threshold crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StressAlert;

impl StressAlert {
    pub const TITLE: &'static str = "High Stress Detected";
    pub const DESCRIPTION: &'static str = "Patient is showing signs of elevated stress levels.";
}

/// Computes the stress metric and decides when the alert fires
#[derive(Debug, Clone)]
pub struct StressDetector {
    config: StressConfig,
}

impl StressDetector {
    pub fn new(config: StressConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    pub fn primary_channel(&self) -> &str {
        &self.config.primary_channel
    }

    /// Mean magnitude of the two stress channels
    pub fn stress_level(&self, sample: &Sample) -> f64 {
        let primary = sample.value(&self.config.primary_channel).abs();
        let secondary = sample.value(&self.config.secondary_channel).abs();
        (primary + secondary) / 2.0
    }

    /// True when `stress` is above the threshold while the previous raw
    /// primary-channel value was at or below it
    ///
    /// The gate compares the previous *channel value*, not the previous
    /// stress level; a missing previous sample counts as zero.
    pub fn is_crossing(&self, stress: f64, previous_primary: f64) -> bool {
        stress > self.config.threshold && previous_primary <= self.config.threshold
    }

    /// Evaluate a new sample against the one before it
    pub fn evaluate(&self, previous: Option<&Sample>, current: &Sample) -> (f64, bool) {
        let stress = self.stress_level(current);
        let previous_primary = previous
            .map(|s| s.value(&self.config.primary_channel))
            .unwrap_or(0.0);
        (stress, self.is_crossing(stress, previous_primary))
    }
}

impl Default for StressDetector {
    fn default() -> Self {
        Self::new(StressConfig::default())
    }
}

/// Text of the stress indicator banner, shown only above the threshold
pub fn stress_indicator_text(stress: f64, threshold: f64) -> Option<String> {
    if stress > threshold {
        Some(format!(
            "High stress levels detected! Current level: {:.2}",
            stress
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::{FRONTAL, TEMPORAL};

    fn sample(frontal: f64, temporal: f64) -> Sample {
        let mut s = Sample::new(0);
        s.set(FRONTAL, frontal);
        s.set(TEMPORAL, temporal);
        s
    }

    /// Indices at which the alert fires for a frontal==temporal sequence
    fn firing_indices(values: &[f64]) -> Vec<usize> {
        let detector = StressDetector::default();
        let samples: Vec<Sample> = values.iter().map(|&v| sample(v, v)).collect();

        let mut fired = Vec::new();
        let mut previous: Option<&Sample> = None;
        for (i, current) in samples.iter().enumerate() {
            let (_, alert) = detector.evaluate(previous, current);
            if alert {
                fired.push(i);
            }
            previous = Some(current);
        }
        fired
    }

    #[test]
    fn test_stress_level_uses_magnitudes() {
        let detector = StressDetector::default();
        assert_eq!(detector.stress_level(&sample(-60.0, 90.0)), 75.0);
        assert_eq!(detector.stress_level(&Sample::new(0)), 0.0);
    }

    #[test]
    fn test_fires_once_per_upward_crossing() {
        assert_eq!(firing_indices(&[50.0, 65.0, 75.0, 80.0, 72.0, 60.0]), vec![2]);
    }

    #[test]
    fn test_fires_again_after_dropping_below() {
        assert_eq!(
            firing_indices(&[60.0, 75.0, 80.0, 65.0, 71.0, 90.0]),
            vec![1, 4]
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(firing_indices(&[60.0, 70.0, 70.0]).is_empty());
    }

    #[test]
    fn test_gate_uses_previous_primary_value_not_stress() {
        let detector = StressDetector::default();
        // previous stress was (10 + 200) / 2 = 105, but frontal alone was 10
        let previous = sample(10.0, 200.0);
        let current = sample(80.0, 80.0);
        let (stress, alert) = detector.evaluate(Some(&previous), &current);
        assert_eq!(stress, 80.0);
        assert!(alert);
    }

    #[test]
    fn test_missing_previous_counts_as_zero() {
        let detector = StressDetector::default();
        let (_, alert) = detector.evaluate(None, &sample(90.0, 90.0));
        assert!(alert);
    }

    #[test]
    fn test_indicator_text() {
        assert_eq!(stress_indicator_text(70.0, 70.0), None);
        assert_eq!(
            stress_indicator_text(72.456, 70.0).as_deref(),
            Some("High stress levels detected! Current level: 72.46")
        );
    }
}
