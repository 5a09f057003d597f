//! # Runner
//!
//! Drives a page holding one particle container, frame by frame.
//!
//! ## Architecture
//!
//! ```text
//!   Runner thread ──> page.advance_to(now) ──┬──> [bounded channel] ──> RunnerReport
//!   (owns the page)                          └──> [mutex] ──> latest container HTML
//! ```
//!
//! The page never leaves the runner thread. Outside code sees reports,
//! snapshots, and a cancellation token.

use backdrop_core::{Clock, ManualClock, MonotonicClock, SimInstant};
use backdrop_field::{CancellationToken, ContainerId, FieldConfig, FieldStats, Page};
use crossbeam_channel::{bounded, Receiver, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::RunnerConfig;
use crate::error::{AppError, AppResult};
use crate::pacer::{FramePacer, FrameStats};

/// Reports buffered before new ones are dropped.
const REPORT_CHANNEL_CAPACITY: usize = 64;

/// Periodic progress from a running field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunnerReport {
    /// Frames run so far.
    pub frame: u64,
    /// Simulated instant of the field.
    pub now: SimInstant,
    /// Live particles.
    pub live: usize,
    /// Respawns since the previous report.
    pub respawns: u64,
    /// Field statistics.
    pub stats: FieldStats,
}

/// Outcome of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames run.
    pub frames: u64,
    /// Simulated instant reached.
    pub elapsed: SimInstant,
    /// Respawns over the whole run.
    pub respawns: u64,
    /// Final field statistics.
    pub stats: FieldStats,
    /// Frame timing.
    pub frame_stats: FrameStats,
    /// True if the run stopped through the token.
    pub cancelled: bool,
}

/// A page with one attached particle container and its pacing.
#[derive(Debug)]
pub struct Runner {
    config: RunnerConfig,
    page: Page,
    container: ContainerId,
    token: CancellationToken,
}

impl Runner {
    /// Attaches a field built from `field` to a fresh page.
    ///
    /// # Errors
    ///
    /// Returns runner and field validation errors.
    pub fn new(config: RunnerConfig, field: FieldConfig) -> AppResult<Self> {
        config.validate()?;

        let mut page: Page = Page::new();
        let container = page.attach_config(field)?;
        let token = page
            .field(container)
            .map(backdrop_field::ParticleField::cancel_token)
            .ok_or_else(|| AppError::InvalidRunner("container vanished".to_string()))?;

        Ok(Self {
            config,
            page,
            container,
            token,
        })
    }

    /// Token that stops the run after the current frame.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// The page being driven.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// The container this runner attached.
    #[must_use]
    pub fn container(&self) -> ContainerId {
        self.container
    }

    fn field_stats(&self) -> FieldStats {
        self.page
            .field(self.container)
            .map(backdrop_field::ParticleField::stats)
            .unwrap_or_default()
    }

    /// Runs until the configured duration elapses or the token is cancelled.
    ///
    /// `on_report` is called every `report_every` frames and once at the end.
    pub fn run<F>(&mut self, mut on_report: F) -> RunSummary
    where
        F: FnMut(&RunnerReport, &Page),
    {
        let frame = self.config.frame_duration();
        let limit = self.config.duration().map(|d| SimInstant::ZERO + d);
        let wall = MonotonicClock::start();
        let mut simulated = ManualClock::new();
        let mut pacer = FramePacer::new(self.config.tick_rate);

        let mut now;
        let mut respawns = 0u64;
        let mut since_report = 0u64;
        let mut cancelled = false;

        tracing::info!(
            tick_rate = self.config.tick_rate,
            simulated = self.config.simulated,
            duration = ?self.config.duration(),
            "runner started"
        );

        loop {
            now = if self.config.simulated {
                simulated.advance(frame)
            } else {
                pacer.wait();
                wall.now()
            };

            if let Some(limit) = limit {
                now = now.min(limit);
            }

            let page = &mut self.page;
            let stepped = pacer.measure(|| page.advance_to(now)) as u64;

            respawns += stepped;
            since_report += stepped;

            if self.token.is_cancelled() {
                // Lets the field drop its timers if it has not yet
                self.page.advance_to(now);
                cancelled = true;
            }
            let finished = cancelled || limit.is_some_and(|limit| now >= limit);

            if finished || pacer.frames() % self.config.report_every == 0 {
                let report = RunnerReport {
                    frame: pacer.frames(),
                    now,
                    live: self.page.live_count(),
                    respawns: since_report,
                    stats: self.field_stats(),
                };
                on_report(&report, &self.page);
                since_report = 0;
            }

            if finished {
                break;
            }
        }

        let summary = RunSummary {
            frames: pacer.frames(),
            elapsed: now,
            respawns,
            stats: self.field_stats(),
            frame_stats: *pacer.stats(),
            cancelled,
        };
        tracing::info!(
            frames = summary.frames,
            elapsed = %summary.elapsed,
            respawns = summary.respawns,
            cancelled,
            "runner finished"
        );
        summary
    }
}

/// A runner on its own thread.
#[derive(Debug)]
pub struct RunnerHandle {
    reports: Receiver<RunnerReport>,
    snapshot: Arc<Mutex<String>>,
    token: CancellationToken,
    thread: JoinHandle<RunSummary>,
}

impl RunnerHandle {
    /// Progress reports. Disconnects when the runner finishes.
    #[must_use]
    pub fn reports(&self) -> &Receiver<RunnerReport> {
        &self.reports
    }

    /// Container HTML as of the last report.
    #[must_use]
    pub fn latest_html(&self) -> String {
        self.snapshot.lock().clone()
    }

    /// Stops the runner after its current frame.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits for the runner to finish.
    ///
    /// # Errors
    ///
    /// [`AppError::RunnerPanicked`] if the runner thread panicked.
    pub fn join(self) -> AppResult<RunSummary> {
        self.thread.join().map_err(|_| AppError::RunnerPanicked)
    }
}

/// Moves `runner` onto a new thread.
///
/// Reports go through a bounded channel; when the consumer falls behind,
/// newer reports are dropped rather than stalling the frame loop.
#[must_use]
pub fn spawn_runner(mut runner: Runner) -> RunnerHandle {
    let (sender, reports) = bounded(REPORT_CHANNEL_CAPACITY);
    let snapshot = Arc::new(Mutex::new(runner.page().render_html()));
    let token = runner.cancel_token();

    let shared = Arc::clone(&snapshot);
    let thread = std::thread::spawn(move || {
        runner.run(|report, page| {
            *shared.lock() = page.render_html();
            match sender.try_send(*report) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::trace!(frame = report.frame, "report channel full, dropping report");
                }
            }
        })
    });

    RunnerHandle {
        reports,
        snapshot,
        token,
        thread,
    }
}

/// Runs a simulated field for `secs` seconds on the current thread.
///
/// # Errors
///
/// Returns field validation errors.
pub fn simulate(field: FieldConfig, secs: u64) -> AppResult<RunSummary> {
    let mut runner = Runner::new(RunnerConfig::simulated_for(secs), field)?;
    Ok(runner.run(|_, _| {}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::SimDuration;

    fn field(target_count: usize) -> FieldConfig {
        FieldConfig::default()
            .with_target_count(target_count)
            .with_seed(17)
    }

    #[test]
    fn test_simulated_run_reaches_duration() {
        let summary = simulate(field(50), 120).unwrap();

        assert_eq!(summary.elapsed, SimInstant::ZERO + SimDuration::from_secs(120));
        assert_eq!(summary.stats.live, 50);
        assert!(summary.respawns >= 50);
        assert!(!summary.cancelled);
        assert_eq!(summary.frames, summary.frame_stats.frames);
    }

    #[test]
    fn test_reports_follow_cadence() {
        let config = RunnerConfig {
            report_every: 30,
            ..RunnerConfig::simulated_for(10)
        };
        let mut runner = Runner::new(config, field(5)).unwrap();
        let mut reports = Vec::new();
        let summary = runner.run(|report, page| {
            assert_eq!(page.live_count(), 5);
            reports.push(*report);
        });

        // 10 s at 60 Hz is 601 frames of 16 666 µs, reported every 30
        assert!(reports.len() >= 20);
        assert_eq!(reports.last().unwrap().frame, summary.frames);
        let reported: u64 = reports.iter().map(|r| r.respawns).sum();
        assert_eq!(reported, summary.respawns);
    }

    #[test]
    fn test_wall_clock_run_reaches_duration() {
        let config = RunnerConfig {
            tick_rate: 200,
            duration_secs: Some(1),
            simulated: false,
            report_every: 50,
        };
        let mut runner = Runner::new(config, field(5)).unwrap();
        let started = std::time::Instant::now();
        let mut reports = 0;
        let summary = runner.run(|report, _| {
            assert_eq!(report.live, 5);
            reports += 1;
        });

        assert!(started.elapsed() >= std::time::Duration::from_secs(1));
        assert_eq!(summary.elapsed, SimInstant::ZERO + SimDuration::from_secs(1));
        assert!(!summary.cancelled);
        assert_eq!(summary.stats.live, 5);
        // Paced, not fast-forwarded: 200 Hz for one second
        assert!(summary.frames >= 20);
        assert!(summary.frames <= 202 + summary.frame_stats.skipped_frames);
        assert!(reports >= 1);
    }

    #[test]
    fn test_cancel_stops_background_runner() {
        let config = RunnerConfig {
            simulated: true,
            duration_secs: None,
            report_every: 1,
            ..RunnerConfig::default()
        };
        let handle = spawn_runner(Runner::new(config, field(8)).unwrap());

        let first = handle.reports().recv().unwrap();
        assert_eq!(first.live, 8);
        assert!(handle.latest_html().contains("class=\"particle\""));

        handle.cancel();
        let summary = handle.join().unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.stats.live, 0);
        assert_eq!(summary.stats.discarded_timers, 8);
    }

    #[test]
    fn test_invalid_runner_rejected() {
        let config = RunnerConfig {
            report_every: 0,
            ..RunnerConfig::default()
        };
        assert!(matches!(
            Runner::new(config, field(1)),
            Err(AppError::InvalidRunner(_))
        ));
    }
}
