//! Frame pacing and frame-time metrics for the macroquad loop.

use std::{
    collections::VecDeque,
    thread,
    time::{Duration, Instant},
};

/// Simulation and presentation rate of the frame loop.
pub(crate) const TARGET_FPS: u32 = 60;

/// Time slice one frame is allowed to take at the provided rate.
pub(crate) fn frame_budget(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// Time left to sleep once `elapsed` of the frame budget has been spent.
pub(crate) fn remaining_budget(elapsed: Duration, budget: Duration) -> Option<Duration> {
    budget
        .checked_sub(elapsed)
        .filter(|remaining| !remaining.is_zero())
}

/// Caps the frame loop at a fixed rate by sleeping off unused budget.
#[derive(Debug)]
pub(crate) struct FramePacer {
    budget: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub(crate) fn new(fps: u32) -> Self {
        Self {
            budget: frame_budget(fps),
            frame_start: Instant::now(),
        }
    }

    /// Sleeps until the current frame has used its budget and returns the
    /// wall time the whole frame took.
    pub(crate) fn wait(&mut self) -> Duration {
        if let Some(remaining) = remaining_budget(self.frame_start.elapsed(), self.budget) {
            thread::sleep(remaining);
        }
        let now = Instant::now();
        let frame = now.saturating_duration_since(self.frame_start);
        self.frame_start = now;
        frame
    }
}

/// Timing of one frame split into its phases.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FrameBreakdown {
    pub(crate) frame: Duration,
    pub(crate) simulation: Duration,
    pub(crate) render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
pub(crate) struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct FpsMetrics {
    pub(crate) per_second: f32,
    pub(crate) trailing_ten_seconds: f32,
    pub(crate) avg_simulation: Duration,
    pub(crate) avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    pub(crate) fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hertz_budget_is_a_sixtieth_of_a_second() {
        assert_eq!(frame_budget(60), Duration::from_nanos(16_666_666));
        assert_eq!(frame_budget(0), Duration::from_secs(1));
    }

    #[test]
    fn remaining_budget_is_absent_once_spent() {
        let budget = Duration::from_millis(16);

        assert_eq!(
            remaining_budget(Duration::from_millis(10), budget),
            Some(Duration::from_millis(6))
        );
        assert_eq!(remaining_budget(budget, budget), None);
        assert_eq!(remaining_budget(Duration::from_millis(40), budget), None);
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            simulation: Duration::from_millis(2),
            render: Duration::from_millis(4),
        };
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert_eq!(metrics.avg_simulation, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(4));
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_tracks_trailing_ten_second_average() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };

        for _ in 0..10 {
            for sample in 0..5 {
                let metrics = counter.record_frame(frame(200));
                if sample == 4 {
                    let metrics = metrics.expect("should report every second");
                    assert!((metrics.per_second - 5.0).abs() <= 1e-3);
                } else {
                    assert!(metrics.is_none());
                }
            }
        }

        for sample in 0..10 {
            let metrics = counter.record_frame(frame(100));
            if sample == 9 {
                let metrics = metrics.expect("should report every second");
                assert!((metrics.per_second - 10.0).abs() <= 1e-3);
                assert!((metrics.trailing_ten_seconds - 5.5).abs() <= 1e-3);
            } else {
                assert!(metrics.is_none());
            }
        }
    }
}
