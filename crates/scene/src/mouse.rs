use glam::Vec2;

/// Turns raw mouse input into look offsets for [`crate::FlyCamera`].
///
/// The first sample after construction or [`MouseLook::reset`] only records a
/// baseline, so capturing the cursor never produces a jump. Offsets have y
/// reversed: window y grows downward, pitch grows upward.
#[derive(Debug, Clone, Default)]
pub struct MouseLook {
    last: Option<Vec2>,
    primed: bool,
}

impl MouseLook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the baseline, e.g. after the cursor is captured again.
    pub fn reset(&mut self) {
        self.last = None;
        self.primed = false;
    }

    /// Offset from an absolute cursor position in window pixels.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Vec2 {
        let pos = Vec2::new(x as f32, y as f32);
        let last = self.last.replace(pos).unwrap_or(pos);
        Vec2::new(pos.x - last.x, last.y - pos.y)
    }

    /// Offset from a relative motion delta (raw device motion).
    pub fn motion(&mut self, dx: f64, dy: f64) -> Vec2 {
        if !self.primed {
            self.primed = true;
            return Vec2::ZERO;
        }
        Vec2::new(dx as f32, -(dy as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_cursor_sample_is_baseline() {
        let mut look = MouseLook::new();
        assert_eq!(look.cursor_moved(400.0, 300.0), Vec2::ZERO);
        assert_eq!(look.cursor_moved(410.0, 295.0), Vec2::new(10.0, 5.0));
        assert_eq!(look.cursor_moved(405.0, 305.0), Vec2::new(-5.0, -10.0));
    }

    #[test]
    fn first_motion_sample_is_discarded() {
        let mut look = MouseLook::new();
        assert_eq!(look.motion(50.0, 50.0), Vec2::ZERO);
        assert_eq!(look.motion(3.0, -4.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn reset_rearms_baseline() {
        let mut look = MouseLook::new();
        look.cursor_moved(0.0, 0.0);
        look.motion(1.0, 1.0);
        look.reset();
        assert_eq!(look.cursor_moved(100.0, 100.0), Vec2::ZERO);
        assert_eq!(look.motion(7.0, 7.0), Vec2::ZERO);
    }
}
