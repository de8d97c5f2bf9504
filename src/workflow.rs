//! Conversion workflow state machine
//!
//! One controller per session owns the single active conversion job:
//! `Idle -> Submitting -> Succeeded | Failed`. Observers mirror the job
//! through a watch channel instead of touching controller state.
//!
//! While a submission is in flight an advisory progress value climbs on a
//! fixed cadence toward a ceiling below 100, snapping to 100 only once the
//! service actually returns; a short settling delay follows before the
//! artifact becomes visible.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::api::{AudioPayload, VoiceService};
use crate::config::ProgressPolicy;
use crate::{Error, Result};

/// Lifecycle state of the conversion job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    /// No submission active; initial state
    #[default]
    Idle,
    /// A submission is in flight
    Submitting,
    /// The service returned an artifact reference
    Succeeded,
    /// The submission failed; retry is user-initiated
    Failed,
}

/// Point-in-time view of the job, published to observers
#[derive(Debug, Clone, Default)]
pub struct JobSnapshot {
    /// Current lifecycle state
    pub state: JobState,
    /// Advisory progress, 0-100
    pub progress: u8,
    /// Selected celebrity identifier
    pub target: Option<String>,
    /// Artifact URL from the last successful conversion
    pub artifact: Option<String>,
    /// Error message from the last failed conversion
    pub error: Option<String>,
}

struct Inner {
    snapshot: JobSnapshot,
    /// Submission sequence number; completions carrying a stale sequence
    /// are discarded so a superseded job never overwrites newer state
    seq: u64,
}

/// Owns the conversion job and enforces the one-job-at-a-time invariant
pub struct ConversionController {
    service: Arc<dyn VoiceService>,
    base_url: String,
    policy: ProgressPolicy,
    inner: Arc<Mutex<Inner>>,
    tx: watch::Sender<JobSnapshot>,
}

impl ConversionController {
    /// Create a controller submitting to `service`, building artifact URLs
    /// against `base_url`
    #[must_use]
    pub fn new(service: Arc<dyn VoiceService>, base_url: &str, policy: ProgressPolicy) -> Self {
        let snapshot = JobSnapshot::default();
        let (tx, _) = watch::channel(snapshot.clone());
        Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
            inner: Arc::new(Mutex::new(Inner { snapshot, seq: 0 })),
            tx,
        }
    }

    /// Subscribe to job snapshots
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.tx.subscribe()
    }

    /// Current job snapshot
    #[must_use]
    pub fn snapshot(&self) -> JobSnapshot {
        self.lock().snapshot.clone()
    }

    /// Currently selected celebrity identifier
    #[must_use]
    pub fn selected_target(&self) -> Option<String> {
        self.lock().snapshot.target.clone()
    }

    /// Select the conversion target
    ///
    /// Changing the target clears any stored artifact — a stale result must
    /// never be attributed to a new target — and invalidates an in-flight
    /// submission, whose eventual response will be discarded.
    pub fn select_target(&self, id: &str) {
        let mut inner = self.lock();
        if inner.snapshot.target.as_deref() == Some(id) {
            return;
        }

        tracing::debug!(celebrity = id, "target selected");
        inner.seq += 1;
        inner.snapshot.target = Some(id.to_string());
        inner.snapshot.artifact = None;
        inner.snapshot.error = None;
        inner.snapshot.progress = 0;
        inner.snapshot.state = JobState::Idle;
        self.publish(&inner);
    }

    /// Reset to `Idle`, discarding any result and invalidating an
    /// in-flight submission; keeps the selected target
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.seq += 1;
        inner.snapshot.artifact = None;
        inner.snapshot.error = None;
        inner.snapshot.progress = 0;
        inner.snapshot.state = JobState::Idle;
        self.publish(&inner);
    }

    /// Submit a finished audio payload against the selected target
    ///
    /// Returns the artifact URL (`{base}/results/{filename}`) on success.
    ///
    /// # Errors
    ///
    /// - [`Error::NoTargetSelected`] if no celebrity is selected; no
    ///   network call is made.
    /// - [`Error::ConversionInProgress`] if a submission is already in
    ///   flight; exactly one job may be active.
    /// - [`Error::Conversion`] if the service call fails or the job was
    ///   superseded before it completed.
    pub async fn submit(&self, audio: &AudioPayload) -> Result<String> {
        let (target, seq) = {
            let mut inner = self.lock();

            let Some(target) = inner.snapshot.target.clone() else {
                return Err(Error::NoTargetSelected);
            };
            if inner.snapshot.state == JobState::Submitting {
                return Err(Error::ConversionInProgress);
            }

            inner.seq += 1;
            inner.snapshot.state = JobState::Submitting;
            inner.snapshot.progress = 0;
            inner.snapshot.artifact = None;
            inner.snapshot.error = None;
            self.publish(&inner);
            (target, inner.seq)
        };

        tracing::info!(celebrity = %target, bytes = audio.bytes.len(), "submitting conversion");
        let ticker = self.spawn_progress_ticker(seq);

        let result = self.service.convert(&target, audio).await;
        ticker.abort();

        match result {
            Ok(filename) => {
                {
                    let mut inner = self.lock();
                    if inner.seq != seq {
                        tracing::debug!(celebrity = %target, "discarding superseded conversion result");
                        return Err(Error::Conversion("job superseded".to_string()));
                    }
                    inner.snapshot.progress = 100;
                    self.publish(&inner);
                }

                // Settle at 100% briefly so the result doesn't pop in
                // mid-animation.
                tokio::time::sleep(self.policy.settle).await;

                let artifact = format!("{}/results/{}", self.base_url, filename);
                let mut inner = self.lock();
                if inner.seq != seq {
                    tracing::debug!(celebrity = %target, "discarding superseded conversion result");
                    return Err(Error::Conversion("job superseded".to_string()));
                }
                inner.snapshot.state = JobState::Succeeded;
                inner.snapshot.progress = 0;
                inner.snapshot.artifact = Some(artifact.clone());
                self.publish(&inner);

                tracing::info!(artifact = %artifact, "conversion succeeded");
                Ok(artifact)
            }
            Err(e) => {
                let mut inner = self.lock();
                if inner.seq == seq {
                    inner.snapshot.state = JobState::Failed;
                    inner.snapshot.progress = 0;
                    inner.snapshot.error = Some(e.to_string());
                    self.publish(&inner);
                }
                tracing::warn!(celebrity = %target, error = %e, "conversion failed");
                Err(e)
            }
        }
    }

    /// Spawn the advisory progress task for submission `seq`
    ///
    /// The task stops on its own when the job leaves `Submitting` or is
    /// superseded; the submitter also aborts it once the service returns.
    fn spawn_progress_ticker(&self, seq: u64) -> tokio::task::JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let tx = self.tx.clone();
        let policy = self.policy;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(policy.tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; skip it so progress
            // starts at zero.
            interval.tick().await;

            loop {
                interval.tick().await;

                let Ok(mut guard) = inner.lock() else {
                    return;
                };
                if guard.seq != seq || guard.snapshot.state != JobState::Submitting {
                    return;
                }
                if guard.snapshot.progress < policy.ceiling {
                    guard.snapshot.progress = guard
                        .snapshot
                        .progress
                        .saturating_add(policy.step)
                        .min(policy.ceiling);
                    tx.send_replace(guard.snapshot.clone());
                }
            }
        })
    }

    fn publish(&self, inner: &MutexGuard<'_, Inner>) {
        self.tx.send_replace(inner.snapshot.clone());
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
