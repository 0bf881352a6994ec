//! Mock emotion classification with a simulated analysis delay

use crate::config::AnalysisConfig;
use crate::random::RandomSource;
use eeg_core::{EegResult, EmotionResult};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

/// Emotions reported by the mock classifier
pub const EMOTIONS: [&str; 6] = ["Happy", "Sad", "Neutral", "Anxious", "Relaxed", "Excited"];

/// Inclusive confidence bounds of generated results
pub const CONFIDENCE_RANGE: (f64, f64) = (0.1, 0.9);

/// One confidence per emotion, rounded to two decimals, highest first
pub fn generate_emotion_results<R: RandomSource + ?Sized>(rng: &mut R) -> Vec<EmotionResult> {
    let mut results: Vec<EmotionResult> = EMOTIONS
        .iter()
        .map(|emotion| {
            let raw = rng.uniform(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1);
            EmotionResult {
                emotion: emotion.to_string(),
                confidence: (raw * 100.0).round() / 100.0,
            }
        })
        .collect();

    results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    results
}

/// Progress and, once finished, the results of an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisStatus {
    /// Percent complete, 0..=100
    pub progress: u8,
    pub results: Option<Vec<EmotionResult>>,
}

impl AnalysisStatus {
    pub fn is_complete(&self) -> bool {
        self.results.is_some()
    }

    /// Highest-confidence emotion
    pub fn predominant(&self) -> Option<&EmotionResult> {
        self.results.as_ref().and_then(|r| r.first())
    }
}

/// Step-wise analysis: progress climbs to 100, the following step produces results
#[derive(Debug, Clone)]
pub struct EmotionAnalyzer {
    config: AnalysisConfig,
    status: AnalysisStatus,
}

impl EmotionAnalyzer {
    pub fn new(config: AnalysisConfig) -> EegResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            status: AnalysisStatus::default(),
        })
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Advance one step; returns true on the step that completes the analysis
    pub fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.status.is_complete() {
            return false;
        }
        if self.status.progress >= 100 {
            self.status.results = Some(generate_emotion_results(rng));
            return true;
        }
        self.status.progress = self
            .status
            .progress
            .saturating_add(self.config.progress_step)
            .min(100);
        false
    }

    pub fn reset(&mut self) {
        self.status = AnalysisStatus::default();
    }
}

/// Handle to a running analysis; dropping it cancels the task
pub struct AnalysisHandle {
    status: watch::Receiver<AnalysisStatus>,
    task: Option<JoinHandle<()>>,
}

impl AnalysisHandle {
    pub fn status(&self) -> AnalysisStatus {
        self.status.borrow().clone()
    }

    /// Wait until results are available
    pub async fn finished(&mut self) -> Option<Vec<EmotionResult>> {
        loop {
            if let Some(results) = self.status.borrow_and_update().results.clone() {
                return Some(results);
            }
            if self.status.changed().await.is_err() {
                return self.status.borrow().results.clone();
            }
        }
    }
}

impl Drop for AnalysisHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Run the analysis on a timer, publishing status after every step
///
/// Must be called from within a tokio runtime.
pub fn start_emotion_analysis<R>(config: AnalysisConfig, mut rng: R) -> EegResult<AnalysisHandle>
where
    R: RandomSource + 'static,
{
    let mut analyzer = EmotionAnalyzer::new(config)?;
    let (status_tx, status) = watch::channel(analyzer.status().clone());
    let period = analyzer.config().step_interval();

    let task = tokio::spawn(async move {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;
            let done = analyzer.step(&mut rng);
            status_tx.send_replace(analyzer.status().clone());
            if done {
                if let Some(top) = analyzer.status().predominant() {
                    info!(emotion = %top.emotion, confidence = top.confidence, "emotion analysis complete");
                }
                break;
            }
        }
    });

    Ok(AnalysisHandle {
        status,
        task: Some(task),
    })
}
