//! Animation primitives
//!
//! Handles the timing side of every animation in the gallery:
//! - Easing curves, including the damped spring used by the zoom transition
//! - Interpolation of frames, points and alpha values
//! - Frame-clock driven tweens (`Tween`) that controllers advance by `dt`
//!
//! Tweens never read the wall clock. The host advances them with the frame
//! delta, which keeps transition runs deterministic and lets the curve
//! engine be swapped without touching the transition logic.

use std::time::Duration;

use egui::{Pos2, Rect, Vec2};

/// Natural log of the settle ratio. The spring envelope decays to ~0.1% of
/// its amplitude by the end of the tween.
const SPRING_SETTLE_LOG: f32 = 6.9;

/// Easing function type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Linear interpolation
    Linear,
    /// Smooth ease-out (deceleration)
    EaseOut,
    /// Smooth ease-in-out
    EaseInOut,
    /// Damped spring with zero initial velocity, settling within the duration.
    /// `damping` < 1.0 overshoots slightly; >= 1.0 is critically damped.
    Spring { damping: f32 },
}

impl EasingFunction {
    /// Apply the easing function to a value t in [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,

            EasingFunction::EaseOut => {
                // Cubic ease-out: 1 - (1 - t)^3
                1.0 - (1.0 - t).powi(3)
            }

            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            EasingFunction::Spring { damping } => spring_response(t, *damping),
        }
    }
}

/// Step response of a damped harmonic oscillator, normalized to t in [0, 1].
fn spring_response(t: f32, damping: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }

    let zeta = if damping.is_finite() { damping.max(0.05) } else { 1.0 };

    if zeta >= 1.0 {
        // x(t) = 1 - e^(-wt) (1 + wt)
        let omega = SPRING_SETTLE_LOG;
        return 1.0 - (-omega * t).exp() * (1.0 + omega * t);
    }

    // Underdamped: envelope e^(-zeta * w * t) reaches the settle ratio at t = 1.
    let omega = SPRING_SETTLE_LOG / zeta;
    let decay = zeta * omega;
    let omega_d = omega * (1.0 - zeta * zeta).sqrt();
    let envelope = (-decay * t).exp();

    1.0 - envelope * ((omega_d * t).cos() + (decay / omega_d) * (omega_d * t).sin())
}

/// Types that can be interpolated by a tween.
///
/// t = 0.0 returns `from`, t = 1.0 returns `to`. Spring curves may push t
/// slightly past 1.0.
pub trait Interpolate: Clone {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Interpolate for Vec2 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        *from + (*to - *from) * t
    }
}

impl Interpolate for Pos2 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        *from + (*to - *from) * t
    }
}

impl Interpolate for Rect {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Rect::from_min_max(
            <Pos2 as Interpolate>::lerp(&from.min, &to.min, t),
            <Pos2 as Interpolate>::lerp(&from.max, &to.max, t),
        )
    }
}

/// A single animation from one value to another, advanced by the frame clock.
#[derive(Debug, Clone)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFunction,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Advance the tween by one frame.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Linear progress in [0, 1]. A zero-length tween is always complete.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Get the current animated value
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to.clone();
        }
        T::lerp(&self.from, &self.to, self.easing.apply(self.progress()))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Jump straight to the end value.
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }

    pub fn to(&self) -> &T {
        &self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
