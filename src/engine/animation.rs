//! Timed playback of a command sequence
//!
//! The animator resets the surface, then dispatches commands one at a time
//! with a fixed pause between consecutive draws. Pauses go through a
//! [`Pacer`], so playback yields to the runtime instead of blocking it and
//! tests can observe the pacing without sleeping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::{debug, warn};

use super::renderer::render_command;
use crate::canvas::DrawingSurface;
use crate::command::Command;

/// Pause between commands when none is configured
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Suspends playback between two draws
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Real-time pacing on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Records every requested pause and returns immediately
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(delay);
        }
        tokio::task::yield_now().await;
    }
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cooperative cancellation flag shared between a playback and its owner.
///
/// Clones share state. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        loop {
            let notified = self.state.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent cancel is not missed
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Outcome of one playback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    pub drawn: usize,
    pub skipped: usize,
    /// Playback stopped before the last command
    pub cancelled: bool,
}

/// Plays commands back with a pause between draws
#[derive(Clone)]
pub struct Animator {
    pacer: Arc<dyn Pacer>,
    delay: Duration,
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Animator {
    pub fn new(delay: Duration) -> Self {
        Self::with_pacer(Arc::new(TokioPacer), delay)
    }

    pub fn with_pacer(pacer: Arc<dyn Pacer>, delay: Duration) -> Self {
        Self { pacer, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Reset the surface and play every command
    pub async fn play<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        commands: &[Command],
    ) -> PlaybackReport {
        self.play_with_cancel(surface, commands, &CancelToken::new())
            .await
    }

    /// Like [`play`](Self::play) but stops as soon as `token` is cancelled.
    ///
    /// A pending pause is abandoned on cancellation; the command after it is
    /// never drawn. A token cancelled up front leaves the surface untouched.
    pub async fn play_with_cancel<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        commands: &[Command],
        token: &CancelToken,
    ) -> PlaybackReport {
        let mut report = PlaybackReport::default();
        if token.is_cancelled() {
            report.cancelled = true;
            return report;
        }

        debug!(
            commands = commands.len(),
            delay_ms = self.delay.as_millis() as u64,
            "Starting playback"
        );
        surface.reset();
        surface.set_live(true);

        for (index, command) in commands.iter().enumerate() {
            match render_command(surface, command) {
                Ok(()) => report.drawn += 1,
                Err(e) => {
                    warn!("Skipping command #{} ({}): {}", index, command.kind(), e);
                    report.skipped += 1;
                }
            }

            if index + 1 == commands.len() {
                break;
            }

            tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(drawn = report.drawn, "Playback cancelled");
                    report.cancelled = true;
                    break;
                }
                () = self.pacer.pause(self.delay) => {}
            }
        }

        surface.set_live(false);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingSurface;

    fn dots(n: usize) -> Vec<Command> {
        (0..n)
            .map(|i| Command::circle(i as f64 * 10.0, 5.0, 2.0, "black"))
            .collect()
    }

    #[tokio::test]
    async fn test_pauses_only_between_commands() {
        let pacer = Arc::new(RecordingPacer::new());
        let animator = Animator::with_pacer(pacer.clone(), Duration::from_millis(50));
        let mut surface = RecordingSurface::new(100, 100);

        let report = animator.play(&mut surface, &dots(3)).await;

        assert_eq!(report.drawn, 3);
        assert!(!report.cancelled);
        assert_eq!(pacer.pauses(), vec![Duration::from_millis(50); 2]);
        assert_eq!(surface.reset_count(), 1);
        assert_eq!(surface.calls()[0], crate::canvas::SurfaceCall::Reset);
    }

    #[tokio::test]
    async fn test_empty_sequence_still_resets() {
        let pacer = Arc::new(RecordingPacer::new());
        let animator = Animator::with_pacer(pacer.clone(), Duration::from_millis(10));
        let mut surface = RecordingSurface::new(10, 10);

        let report = animator.play(&mut surface, &[]).await;
        assert_eq!(report, PlaybackReport::default());
        assert!(pacer.pauses().is_empty());
        assert_eq!(surface.reset_count(), 1);
    }

    #[tokio::test]
    async fn test_precancelled_token_draws_nothing() {
        let animator = Animator::with_pacer(Arc::new(RecordingPacer::new()), Duration::ZERO);
        let mut surface = RecordingSurface::new(10, 10);
        let token = CancelToken::new();
        token.cancel();

        let report = animator.play_with_cancel(&mut surface, &dots(2), &token).await;
        assert!(report.cancelled);
        assert!(surface.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        tokio::task::yield_now().await;
        token.cancel();
        handle.await.unwrap();
        assert!(token.is_cancelled());
    }
}
