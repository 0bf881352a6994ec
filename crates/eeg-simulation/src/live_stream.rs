//! Real-time EEG streaming for live visualization
//!
//! One task per test session drives [`LiveSession::tick`] from a timer and
//! publishes a [`LiveSnapshot`] after every tick.

use crate::config::SessionConfig;
use crate::live_session::{LiveSession, LiveSnapshot};
use crate::random::{RandomSource, RngSource};
use crate::stress::StressAlert;
use eeg_core::{EegError, EegResult};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Commands for controlling the stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamCommand {
    Pause,
    Resume,
    /// Restart the timer and the window at a new rate
    SetSamplingRate(f64),
    Stop,
}

fn tick_timer(period: Duration) -> Interval {
    // First tick fires one period after start, like a browser interval
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Timer loop owning the session; the sole writer of its window
struct LiveStream<R> {
    session: LiveSession<R>,
    snapshot_tx: watch::Sender<LiveSnapshot>,
    alert_tx: broadcast::Sender<StressAlert>,
    control_rx: mpsc::Receiver<StreamCommand>,
    paused: bool,
}

impl<R: RandomSource> LiveStream<R> {
    async fn run(mut self) -> EegResult<()> {
        let session_id = self.session.id();
        let mut timer = tick_timer(self.session.config().tick_period());

        info!(
            session = %session_id,
            rate_hz = self.session.config().sampling_rate_hz,
            "EEG stream started"
        );

        loop {
            tokio::select! {
                // Commands win over a simultaneously ready tick so that no
                // tick runs once Stop has been received
                biased;

                command = self.control_rx.recv() => {
                    match command {
                        Some(StreamCommand::Pause) => {
                            self.paused = true;
                            debug!(session = %session_id, "EEG stream paused");
                        }
                        Some(StreamCommand::Resume) => {
                            self.paused = false;
                            debug!(session = %session_id, "EEG stream resumed");
                        }
                        Some(StreamCommand::SetSamplingRate(rate)) => {
                            match self.session.set_sampling_rate(rate) {
                                Ok(()) => {
                                    timer = tick_timer(self.session.config().tick_period());
                                    self.snapshot_tx.send_replace(self.session.snapshot());
                                }
                                Err(e) => warn!(session = %session_id, "rejected sampling rate: {}", e),
                            }
                        }
                        Some(StreamCommand::Stop) | None => break,
                    }
                }

                _ = timer.tick() => {
                    if !self.paused {
                        let outcome = self.session.tick();
                        if outcome.alert {
                            warn!(session = %session_id, stress = outcome.stress, "{}", StressAlert::TITLE);
                            // Best effort: nobody listening is fine
                            let _ = self.alert_tx.send(StressAlert);
                        }
                        self.snapshot_tx.send_replace(self.session.snapshot());
                    }
                }
            }
        }

        info!(session = %session_id, ticks = self.session.ticks(), "EEG stream stopped");
        Ok(())
    }
}

/// Owned handle to a running stream; dropping it cancels the timer task
pub struct StreamHandle {
    session_id: Uuid,
    /// Config the task was started with; only the rate changes afterwards
    config: SessionConfig,
    control: mpsc::Sender<StreamCommand>,
    snapshots: watch::Receiver<LiveSnapshot>,
    alerts: broadcast::Sender<StressAlert>,
    task: Option<JoinHandle<EegResult<()>>>,
}

impl StreamHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Receiver that observes every published snapshot
    pub fn snapshots(&self) -> watch::Receiver<LiveSnapshot> {
        self.snapshots.clone()
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> LiveSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<StressAlert> {
        self.alerts.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |t| !t.is_finished())
    }

    /// Queue a command without waiting; usable from a UI thread
    pub fn try_send(&self, command: StreamCommand) -> EegResult<()> {
        self.control
            .try_send(command)
            .map_err(|_| EegError::StreamClosed)
    }

    pub async fn send(&self, command: StreamCommand) -> EegResult<()> {
        self.control
            .send(command)
            .await
            .map_err(|_| EegError::StreamClosed)
    }

    /// Validate the session at `rate` and request the change
    ///
    /// Rejects rates the task would refuse, such as one that leaves the
    /// window empty.
    pub fn set_sampling_rate(&mut self, rate: f64) -> EegResult<()> {
        let candidate = SessionConfig {
            sampling_rate_hz: rate,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.try_send(StreamCommand::SetSamplingRate(rate))?;
        self.config = candidate;
        Ok(())
    }

    /// Stop the loop and wait for the task to finish
    pub async fn stop(mut self) -> EegResult<()> {
        let _ = self.control.send(StreamCommand::Stop).await;
        match self.task.take() {
            Some(task) => match task.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => Ok(()),
                Err(e) => {
                    warn!(session = %self.session_id, "EEG stream task failed: {}", e);
                    Err(EegError::StreamClosed)
                }
            },
            None => Ok(()),
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start a stream with the configured (or entropy) seed
///
/// Must be called from within a tokio runtime.
pub fn start_live_stream(config: SessionConfig) -> EegResult<StreamHandle> {
    let rng = RngSource::new(config.seed);
    start_live_stream_with(config, rng)
}

/// Start a stream drawing from an injected random source
pub fn start_live_stream_with<R>(config: SessionConfig, rng: R) -> EegResult<StreamHandle>
where
    R: RandomSource + 'static,
{
    let session = LiveSession::new(config, rng)?;
    spawn_session(session)
}

/// Run an already constructed session on a timer
pub fn spawn_session<R>(session: LiveSession<R>) -> EegResult<StreamHandle>
where
    R: RandomSource + 'static,
{
    let session_id = session.id();
    let config = session.config().clone();
    let (snapshot_tx, snapshots) = watch::channel(session.snapshot());
    let (alerts, _) = broadcast::channel(16);
    let (control, control_rx) = mpsc::channel(32);

    let stream = LiveStream {
        session,
        snapshot_tx,
        alert_tx: alerts.clone(),
        control_rx,
        paused: false,
    };

    let task = tokio::spawn(async move {
        let result = stream.run().await;
        if let Err(ref e) = result {
            warn!(session = %session_id, "EEG stream error: {}", e);
        }
        result
    });

    Ok(StreamHandle {
        session_id,
        config,
        control,
        snapshots,
        alerts,
        task: Some(task),
    })
}
