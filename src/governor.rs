//! Frame-rate governor.
//!
//! Counts frames and, once per measurement window, estimates the achieved rate.
//! A low estimate asks the engine to thin the ambient effects. Thinning hides a
//! fixed stride of each pool, so applying it twice hides nothing new, and nothing
//! is ever shown again once hidden. A single gap longer than the window (the
//! page was hidden) is not a slow frame; it just opens a fresh window.

use crate::config::GovernorConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub fps: f64,
    pub low: bool,
}

pub struct FrameRateGovernor {
    window_ms: f64,
    threshold: f64,
    window_start: Option<f64>,
    last_frame: Option<f64>,
    frames: u32,
    fps: Option<f64>,
    degraded: bool,
}

impl FrameRateGovernor {
    pub fn new(config: &GovernorConfig) -> Self {
        Self {
            window_ms: config.window_ms.max(1.0),
            threshold: config.fps_threshold,
            window_start: None,
            last_frame: None,
            frames: 0,
            fps: None,
            degraded: false,
        }
    }

    /// Open the first measurement window at `now` without counting a frame.
    pub fn start(&mut self, now: f64) {
        self.window_start = Some(now);
        self.last_frame = Some(now);
        self.frames = 0;
    }

    /// Record one rendered frame. Returns a report when a window closes.
    pub fn frame(&mut self, now: f64) -> Option<FrameReport> {
        let stalled = self.last_frame.is_some_and(|last| now - last > self.window_ms);
        self.last_frame = Some(now);
        if stalled {
            self.window_start = Some(now);
            self.frames = 0;
            return None;
        }
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now - start;
        if elapsed < self.window_ms {
            return None;
        }
        let fps = (self.frames as f64 * 1_000.0 / elapsed).round();
        self.frames = 0;
        self.window_start = Some(now);
        self.fps = Some(fps);
        let low = fps < self.threshold;
        if low {
            self.degraded = true;
        }
        Some(FrameReport { fps, low })
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    /// Whether any window so far came in under the threshold.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Indices hidden by a thinning pass over a pool of `len` elements.
pub fn thinned(len: usize, stride: usize) -> impl Iterator<Item = usize> {
    (0..len).step_by(stride.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_window(gov: &mut FrameRateGovernor, from: f64, frames: u32, span: f64) -> Option<FrameReport> {
        let mut last = None;
        for i in 1..=frames {
            last = gov.frame(from + span * i as f64 / frames as f64);
        }
        last
    }

    #[test]
    fn reports_once_per_window() {
        let mut gov = FrameRateGovernor::new(&GovernorConfig::default());
        gov.start(0.0);
        let report = run_window(&mut gov, 0.0, 20, 1_000.0).unwrap();
        assert_eq!(report, FrameReport { fps: 20.0, low: true });
        assert!(gov.is_degraded());

        let report = run_window(&mut gov, 1_000.0, 60, 1_000.0).unwrap();
        assert_eq!(report, FrameReport { fps: 60.0, low: false });
        assert!(gov.is_degraded(), "degradation never recovers");
    }

    #[test]
    fn no_report_inside_a_window() {
        let mut gov = FrameRateGovernor::new(&GovernorConfig::default());
        gov.start(0.0);
        for t in 1..60 {
            assert_eq!(gov.frame(t as f64 * 16.0), None);
        }
        assert_eq!(gov.fps(), None);
    }

    #[test]
    fn stalled_frame_opens_a_new_window_instead_of_reporting() {
        let mut gov = FrameRateGovernor::new(&GovernorConfig::default());
        gov.start(0.0);
        assert_eq!(gov.frame(16.0), None);
        assert_eq!(gov.frame(600_000.0), None);
        assert!(!gov.is_degraded());
        let report = run_window(&mut gov, 600_000.0, 60, 1_000.0).unwrap();
        assert_eq!(report, FrameReport { fps: 60.0, low: false });
    }

    #[test]
    fn thinned_strides() {
        assert_eq!(thinned(7, 2).collect::<Vec<_>>(), vec![0, 2, 4, 6]);
        assert_eq!(thinned(7, 3).collect::<Vec<_>>(), vec![0, 3, 6]);
        assert_eq!(thinned(0, 3).count(), 0);
    }
}
