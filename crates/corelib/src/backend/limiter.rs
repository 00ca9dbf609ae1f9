use spin_sleep_util::Interval;
use std::time::Duration;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitMode {
    Target(Duration),
    #[default]
    Disabled,
}

impl LimitMode {
    #[inline]
    pub fn from_fps(fps: f64) -> Self {
        if fps <= 0.0 {
            return LimitMode::Disabled;
        }

        LimitMode::Target(Duration::from_secs_f64(1.0 / fps))
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, LimitMode::Disabled)
    }
}

impl From<Option<u8>> for LimitMode {
    fn from(fps: Option<u8>) -> Self {
        fps.map_or(LimitMode::Disabled, |fps| LimitMode::from_fps(fps as f64))
    }
}

/// Keeps the loop from running faster than the target frame time
pub struct FpsLimiter {
    mode: LimitMode,
    interval: Interval,
}

impl FpsLimiter {
    #[inline]
    pub fn new(mode: LimitMode) -> Self {
        let dt = match mode {
            LimitMode::Disabled => Duration::from_secs_f64(1.0 / 60.0),
            _ => duration_from_mode(mode),
        };

        if mode.is_enabled() {
            log::debug!("FPSLimiter enabled with mode={mode:?}");
        }

        FpsLimiter {
            mode,
            interval: spin_sleep_util::interval(dt),
        }
    }

    #[inline]
    pub fn mode(&self) -> LimitMode {
        self.mode
    }

    /// Blocks until the frame interval elapsed, does nothing when disabled
    #[inline(always)]
    pub fn tick(&mut self) {
        let is_enabled = self.mode.is_enabled();
        if !is_enabled {
            return;
        }

        self.interval.tick();
    }
}

#[inline(always)]
fn duration_from_mode(mode: LimitMode) -> Duration {
    match mode {
        LimitMode::Target(dt) => dt,
        LimitMode::Disabled => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    const EPS: f64 = 1e-9;

    #[test]
    fn limit_mode_is_enabled() {
        assert!(LimitMode::Target(Duration::from_secs(1)).is_enabled());
        assert!(!LimitMode::Disabled.is_enabled());
    }

    #[test]
    fn from_framerate_computes_inverse() {
        let fps = 30.0;
        let dt = LimitMode::from_fps(fps);
        assert!(matches!(dt, LimitMode::Target(_)));

        if let LimitMode::Target(d) = dt {
            let expected = 1.0 / fps;
            let actual = d.as_secs_f64();
            assert!(
                (actual - expected).abs() < EPS,
                "got {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn from_optional_fps() {
        assert_eq!(LimitMode::from(None), LimitMode::Disabled);
        assert_eq!(LimitMode::from(Some(0)), LimitMode::Disabled);
        assert!(LimitMode::from(Some(60)).is_enabled());
    }

    #[test]
    fn duration_from_mode_off_is_zero() {
        let off = duration_from_mode(LimitMode::Disabled);
        assert_eq!(off, Duration::ZERO);
    }

    #[test]
    fn tick_does_not_block_when_off() {
        let mut limiter = FpsLimiter::new(LimitMode::Disabled);
        let now = Instant::now();
        for _ in 0..100 {
            limiter.tick();
        }
        assert!(now.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn tick_waits_for_target() {
        let mut limiter = FpsLimiter::new(LimitMode::Target(Duration::from_millis(10)));
        let now = Instant::now();
        for _ in 0..4 {
            limiter.tick();
        }
        // the first tick returns right away
        assert!(now.elapsed() >= Duration::from_millis(25));
    }
}
