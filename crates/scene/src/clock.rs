use std::time::{Duration, Instant};

const MAX_DT: Duration = Duration::from_millis(100);

/// Timing values for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Seconds since the clock started. Drives light animation.
    pub elapsed: f32,
    pub frame_index: u64,
}

/// Per-loop frame clock.
///
/// Delta time is clamped so a stall (window drag, debugger) does not fling the
/// camera across the scene on the next frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            frame_index: 0,
        }
    }

    /// Restart delta timing without touching elapsed time.
    pub fn reset_delta(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).min(MAX_DT);
        self.last = now;

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_reports_delta_and_elapsed() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let t0 = clock.tick_at(start + Duration::from_millis(16));
        assert!((t0.dt - 0.016).abs() < 1e-6);
        assert!((t0.elapsed - 0.016).abs() < 1e-6);
        assert_eq!(t0.frame_index, 0);

        let t1 = clock.tick_at(start + Duration::from_millis(48));
        assert!((t1.dt - 0.032).abs() < 1e-6);
        assert!((t1.elapsed - 0.048).abs() < 1e-6);
        assert_eq!(t1.frame_index, 1);
    }

    #[test]
    fn delta_is_clamped_but_elapsed_is_not() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let t = clock.tick_at(start + Duration::from_secs(5));
        assert!((t.dt - 0.1).abs() < 1e-6);
        assert!((t.elapsed - 5.0).abs() < 1e-6);
    }

    #[test]
    fn time_going_backwards_is_zero_delta() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(start);
        let t = clock.tick_at(start - Duration::from_millis(10));
        assert_eq!(t.dt, 0.0);
        assert_eq!(t.elapsed, 0.0);
    }
}
