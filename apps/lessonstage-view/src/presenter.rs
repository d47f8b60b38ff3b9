//! # Presenter
//!
//! Drives one presentation surface through staged reveals. Each reveal runs
//! on its own tokio task that sleeps between transitions; starting a new run
//! aborts the previous task, so stale transitions never reach the surface.
//!
//! The surface sits behind a `std::sync::Mutex`. It is locked only for the
//! duration of a single sink call and never across an `.await`. Each reveal
//! also carries the epoch it was started in and checks it under that lock,
//! so a task that is still running when it gets aborted cannot touch the
//! surface after the next reset.

use crate::client::{ClientError, PipelineSource};
use lessonstage_core::{
    AssessmentRequest, LessonError, PipelineResult, Reveal, RevealTiming, StageSink,
    primitives::BACKEND_UNREACHABLE_ALERT,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task::JoinHandle;

/// Why a run could not be presented.
#[derive(Debug, Error)]
pub enum PresentError {
    #[error(transparent)]
    Fetch(#[from] ClientError),

    #[error(transparent)]
    Lesson(#[from] LessonError),
}

fn with_sink<S, R>(sink: &Mutex<S>, f: impl FnOnce(&mut S) -> R) -> R {
    let mut guard = sink.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut guard)
}

/// Staged-result presenter over a single surface.
pub struct Presenter<S> {
    sink: Arc<Mutex<S>>,
    timing: RevealTiming,
    task: Option<JoinHandle<()>>,
    epoch: Arc<AtomicU64>,
}

impl<S: StageSink + Send + 'static> Presenter<S> {
    pub fn new(sink: S, timing: RevealTiming) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            timing,
            task: None,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Abort the pending transitions of the current reveal, if any.
    pub fn cancel(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                tracing::debug!("Cancelling previous reveal");
            }
            task.abort();
        }
    }

    /// Cancel any running reveal and put the surface into its pre-run state.
    pub fn reset(&mut self) {
        self.cancel();
        with_sink(&self.sink, |sink| sink.reset());
    }

    /// Start revealing `result`. Returns as soon as the reveal is scheduled.
    ///
    /// Fails with [`LessonError::MissingStep`] before touching the surface when
    /// a stage the reveal needs is absent.
    pub fn present(&mut self, result: PipelineResult) -> Result<(), LessonError> {
        let reveal = Reveal::new(result, self.timing)?;
        self.cancel();
        let epoch = Epoch {
            current: Arc::clone(&self.epoch),
            started: self.epoch.load(Ordering::SeqCst),
        };
        self.task = Some(tokio::spawn(drive(reveal, Arc::clone(&self.sink), epoch)));
        Ok(())
    }

    /// Reset the surface and present an already fetched result.
    ///
    /// A result that cannot be revealed raises exactly one alert and leaves
    /// the surface as reset.
    pub fn show(&mut self, result: PipelineResult) -> Result<(), LessonError> {
        self.reset();
        self.present_or_alert(result)
    }

    /// Reset the surface, fetch a result for `request` and present it.
    ///
    /// A failed fetch raises exactly one alert and leaves the surface as
    /// reset; nothing is retried.
    pub async fn run<P: PipelineSource>(
        &mut self,
        source: &P,
        request: &AssessmentRequest,
    ) -> Result<(), PresentError> {
        self.reset();

        let result = match source.fetch(request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(grade = request.grade, topic = %request.topic, "Pipeline request failed: {}", e);
                with_sink(&self.sink, |sink| sink.alert(BACKEND_UNREACHABLE_ALERT));
                return Err(e.into());
            }
        };

        self.present_or_alert(result)?;
        Ok(())
    }

    fn present_or_alert(&mut self, result: PipelineResult) -> Result<(), LessonError> {
        self.present(result).inspect_err(|e| {
            tracing::error!("Cannot present pipeline result: {}", e);
            with_sink(&self.sink, |sink| sink.alert(&e.to_string()));
        })
    }

    /// Wait until the current reveal has finished or was cancelled.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::debug!("Reveal task ended early: {}", e);
            }
        }
    }

    #[cfg(test)]
    pub fn sink(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.sink)
    }
}

impl<S> Drop for Presenter<S> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// The presenter epoch a reveal was started in.
struct Epoch {
    current: Arc<AtomicU64>,
    started: u64,
}

impl Epoch {
    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.started
    }
}

async fn drive<S: StageSink>(mut reveal: Reveal, sink: Arc<Mutex<S>>, epoch: Epoch) {
    loop {
        let next = with_sink(&sink, |s| {
            if epoch.is_current() {
                reveal.advance(s)
            } else {
                None
            }
        });
        let Some(delay) = next else { break };
        // A zero sleep may complete without yielding.
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
    if epoch.is_current() {
        tracing::info!(refined = reveal.result().refined, "Reveal finished");
    } else {
        tracing::debug!("Reveal superseded");
    }
}

// =============================================================================
// TESTS
// =============================================================================
