//! # Frame Pacing
//!
//! Keeps a wall-clock runner at its frame rate.
//!
//! Frames are due on a grid of deadlines one frame apart. `wait` sleeps most
//! of the way to the next deadline and spins the rest. A runner that stalls
//! for more than a frame does not replay the missed deadlines back to back:
//! they are counted as skipped and the grid restarts from now. The field
//! catches up on its own, since one dispatch runs every timer that fell due.

use std::time::{Duration, Instant};

/// Below this, `wait` spins instead of sleeping.
const SPIN_WINDOW: Duration = Duration::from_micros(500);

/// Frame work statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames run.
    pub frames: u64,
    /// Frames whose work took longer than one frame.
    pub late_frames: u64,
    /// Deadlines passed over after a stall.
    pub skipped_frames: u64,
    /// Sum of all frame work, µs.
    pub total_work_us: u64,
    /// Longest frame work, µs.
    pub slowest_work_us: u64,
}

impl FrameStats {
    /// Mean frame work, µs. Zero before the first frame.
    #[must_use]
    pub fn mean_work_us(&self) -> u64 {
        self.total_work_us.checked_div(self.frames).unwrap_or(0)
    }

    fn record(&mut self, work: Duration, budget: Duration) {
        let work_us = micros(work);
        self.frames += 1;
        self.total_work_us = self.total_work_us.saturating_add(work_us);
        self.slowest_work_us = self.slowest_work_us.max(work_us);
        if work > budget {
            self.late_frames += 1;
        }
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Deadline-grid frame pacer.
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    next_deadline: Instant,
    stats: FrameStats,
}

impl FramePacer {
    /// Creates a pacer for `frame_rate` frames per second. The first frame
    /// is due immediately.
    ///
    /// A rate of zero is treated as one.
    #[must_use]
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame: Duration::from_micros(1_000_000 / u64::from(frame_rate.max(1))),
            next_deadline: Instant::now(),
            stats: FrameStats::default(),
        }
    }

    /// Blocks until the next frame is due.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next_deadline {
            sleep_until(self.next_deadline);
        } else {
            let behind = now - self.next_deadline;
            if behind >= self.frame {
                self.stats.skipped_frames += micros(behind) / micros(self.frame).max(1);
                self.next_deadline = now;
            }
        }
        self.next_deadline += self.frame;
    }

    /// Runs one frame's work and records how long it took.
    pub fn measure<T>(&mut self, work: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let output = work();
        self.stats.record(start.elapsed(), self.frame);
        output
    }

    /// Frames run so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.stats.frames
    }

    /// Work statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Target frame length.
    #[must_use]
    pub const fn frame_duration(&self) -> Duration {
        self.frame
    }
}

fn sleep_until(deadline: Instant) {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining > SPIN_WINDOW {
        std::thread::sleep(remaining - SPIN_WINDOW);
    }
    while Instant::now() < deadline {
        std::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_sets_frame_length() {
        assert_eq!(FramePacer::new(60).frame_duration(), Duration::from_micros(16_666));
        assert_eq!(FramePacer::new(0).frame_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_wait_holds_the_rate() {
        let mut pacer = FramePacer::new(200);
        let start = Instant::now();

        // First frame is due at once, the other nine 5 ms apart
        for _ in 0..10 {
            pacer.wait();
        }

        assert!(start.elapsed() >= Duration::from_millis(45));
        assert_eq!(pacer.stats().skipped_frames, 0);
    }

    #[test]
    fn test_stall_skips_missed_deadlines() {
        let mut pacer = FramePacer::new(1_000);
        pacer.wait();
        std::thread::sleep(Duration::from_millis(20));

        let resumed = Instant::now();
        pacer.wait();
        assert!(pacer.stats().skipped_frames >= 10);
        // No back-to-back replay: the next deadline is a full frame away
        pacer.wait();
        assert!(resumed.elapsed() >= Duration::from_micros(900));
    }

    #[test]
    fn test_measure_records_work() {
        let mut pacer = FramePacer::new(1_000);

        let quick = pacer.measure(|| 7);
        pacer.measure(|| std::thread::sleep(Duration::from_millis(3)));

        let stats = pacer.stats();
        assert_eq!(quick, 7);
        assert_eq!(pacer.frames(), 2);
        assert_eq!(stats.late_frames, 1);
        assert!(stats.slowest_work_us >= 3_000);
        assert!(stats.mean_work_us() >= 1_500);
    }
}
