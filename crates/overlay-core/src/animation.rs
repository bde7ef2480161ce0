use std::sync::Arc;

use parking_lot::Mutex;
use web_time::{Duration, Instant};

use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Damped spring normalised to settle by the end of the animation.
    /// `damping` is the damping ratio (1.0 = no overshoot), `velocity` the
    /// initial velocity in units of the full travel distance.
    Spring { damping: f32, velocity: f32 },
}

impl Easing {
    /// Envelope decay reached at `t = 1` (about 1% of the travel remains).
    const SPRING_SETTLE: f32 = 4.6;

    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::Spring { damping, velocity } => {
                let zeta = damping.max(0.05);
                if zeta < 1.0 {
                    // Underdamped
                    let omega = Self::SPRING_SETTLE / zeta;
                    let omega_d = omega * (1.0 - zeta * zeta).sqrt();
                    let b = (zeta * omega - velocity) / omega_d;
                    let envelope = (-zeta * omega * t).exp();
                    1.0 - envelope * ((omega_d * t).cos() + b * (omega_d * t).sin())
                } else {
                    // Critically damped or heavier
                    let omega = Self::SPRING_SETTLE;
                    1.0 - (-omega * t).exp() * (1.0 + (omega - velocity) * t)
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            easing: Easing::EaseOut,
            delay: Duration::ZERO,
        }
    }
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    /// Spring used for bounced presentation.
    pub fn spring(duration: Duration) -> Self {
        Self {
            duration,
            easing: Easing::Spring {
                damping: 0.6,
                velocity: 0.25,
            },
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Quick settle used when a drag rolls back.
    pub fn snap_back() -> Self {
        Self::tween(Duration::from_millis(100), Easing::EaseOut)
    }

    /// Total time from start until the value lands on its target.
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Vec2 {
            x: self.x.interpolate(&other.x, t),
            y: self.y.interpolate(&other.y, t),
        }
    }
}

// Animation clock
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you drive by hand. Clones share the same time.
#[derive(Clone)]
pub struct ManualClock {
    t: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            t: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut t = self.t.lock();
        *t += by;
    }

}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.t.lock()
    }
}

/// Value that transitions smoothly toward a target, sampled with explicit timestamps.
#[derive(Clone, Debug)]
pub struct AnimatedValue<T: Interpolate + Clone> {
    current: T,
    target: T,
    start: T,
    spec: AnimationSpec,
    start_time: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial.clone(),
            target: initial.clone(),
            start: initial,
            spec: AnimationSpec::default(),
            start_time: None,
        }
    }

    /// Jump to `value`, dropping any running animation.
    pub fn snap(&mut self, value: T) {
        self.current = value.clone();
        self.start = value.clone();
        self.target = value;
        self.start_time = None;
    }

    /// Start animating from the current value to `target`.
    pub fn animate_to(&mut self, target: T, spec: AnimationSpec, now: Instant) {
        self.start = self.current.clone();
        self.target = target;
        self.spec = spec;
        self.start_time = Some(now);
    }

    /// Sample at `now`. Returns true while the animation is still running.
    pub fn update(&mut self, now: Instant) -> bool {
        if let Some(start) = self.start_time {
            let elapsed = now.saturating_duration_since(start);

            if elapsed < self.spec.delay {
                return true; // Still waiting for delay
            }

            let animation_time = elapsed - self.spec.delay;

            if animation_time >= self.spec.duration {
                self.current = self.target.clone();
                self.start_time = None;
                return false;
            }

            let t = animation_time.as_secs_f32() / self.spec.duration.as_secs_f32();
            let eased_t = self.spec.easing.interpolate(t);
            self.current = self.start.interpolate(&self.target, eased_t);

            true
        } else {
            false
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.start_time.is_some()
    }
}
