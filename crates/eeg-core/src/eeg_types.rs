//! EEG-specific signal types and brain region catalogue

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Channel id of the frontal lobe
pub const FRONTAL: &str = "frontal";
/// Channel id of the temporal lobe
pub const TEMPORAL: &str = "temporal";
/// Channel id of the parietal lobe
pub const PARIETAL: &str = "parietal";
/// Channel id of the occipital lobe
pub const OCCIPITAL: &str = "occipital";
/// Channel id of the limbic system
pub const LIMBIC: &str = "limbic";

/// Static descriptor of one synthetic EEG channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrainRegion {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// The fixed set of brain regions shown by the dashboard
pub const BRAIN_REGIONS: [BrainRegion; 5] = [
    BrainRegion {
        id: FRONTAL,
        name: "Frontal Lobe",
        description: "Controls cognitive functions, decision making, emotional regulation",
    },
    BrainRegion {
        id: TEMPORAL,
        name: "Temporal Lobe",
        description: "Processes auditory information, memory formation, language comprehension",
    },
    BrainRegion {
        id: PARIETAL,
        name: "Parietal Lobe",
        description: "Handles sensory information, spatial awareness, attention",
    },
    BrainRegion {
        id: OCCIPITAL,
        name: "Occipital Lobe",
        description: "Responsible for visual processing",
    },
    BrainRegion {
        id: LIMBIC,
        name: "Limbic System",
        description: "Controls emotions, memory, and stimulation",
    },
];

impl BrainRegion {
    /// Look up a region by its channel id
    pub fn by_id(id: &str) -> Option<&'static BrainRegion> {
        BRAIN_REGIONS.iter().find(|r| r.id == id)
    }

    /// Ids of every region, in display order
    pub fn channel_ids() -> Vec<&'static str> {
        BRAIN_REGIONS.iter().map(|r| r.id).collect()
    }
}

impl std::fmt::Display for BrainRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One timestamped reading across all channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since Unix epoch
    pub timestamp: u64,
    /// Amplitude in µV keyed by channel id
    pub values: BTreeMap<String, f64>,
}

impl Sample {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// Amplitude of a channel; absent channels read as zero
    pub fn value(&self, channel_id: &str) -> f64 {
        self.values.get(channel_id).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, channel_id: impl Into<String>, value: f64) {
        self.values.insert(channel_id.into(), value);
    }

    /// Check that every listed channel has an entry
    pub fn covers<S: AsRef<str>>(&self, channel_ids: &[S]) -> bool {
        channel_ids
            .iter()
            .all(|id| self.values.contains_key(id.as_ref()))
    }
}

/// One row of the mock emotion classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub emotion: String,
    /// Confidence in 0.0..=1.0
    pub confidence: f64,
}

impl EmotionResult {
    /// Confidence as a whole percentage for display
    pub fn percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Connection state of the (simulated) acquisition device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    Connected,
    Disconnected,
    Connecting,
}

impl DeviceStatus {
    pub fn message(&self) -> &'static str {
        match self {
            DeviceStatus::Connected => "Device connected and transmitting data",
            DeviceStatus::Disconnected => "Device disconnected",
            DeviceStatus::Connecting => "Connecting to device...",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DeviceStatus::Disconnected)
    }
}

/// Current wall-clock time in milliseconds since Unix epoch
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_catalogue() {
        assert_eq!(BRAIN_REGIONS.len(), 5);
        let ids = BrainRegion::channel_ids();
        assert_eq!(ids, vec![FRONTAL, TEMPORAL, PARIETAL, OCCIPITAL, LIMBIC]);
        assert_eq!(BrainRegion::by_id(LIMBIC).map(|r| r.name), Some("Limbic System"));
        assert!(BrainRegion::by_id("cerebellum").is_none());
    }

    #[test]
    fn test_missing_channel_reads_zero() {
        let mut sample = Sample::new(1_000);
        sample.set(FRONTAL, 12.5);
        assert_eq!(sample.value(FRONTAL), 12.5);
        assert_eq!(sample.value(TEMPORAL), 0.0);
        assert!(sample.covers(&[FRONTAL]));
        assert!(!sample.covers(&[FRONTAL, TEMPORAL]));
    }

    #[test]
    fn test_sample_serializes_values_by_channel() {
        let mut sample = Sample::new(42);
        sample.set(FRONTAL, 1.0);
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"timestamp":42,"values":{"frontal":1.0}}"#);
    }

    #[test]
    fn test_device_status_messages() {
        assert_eq!(DeviceStatus::Connecting.message(), "Connecting to device...");
        assert!(DeviceStatus::Disconnected.is_error());
        assert!(!DeviceStatus::Connected.is_error());
    }
}
