//! # Overlay core
//!
//! Small, platform-neutral building blocks the overlay engine is written
//! against:
//!
//! - geometry (`Vec2`, `Size`, `Rect`, `Transform`) and `Color`;
//! - an explicit-timestamp animation model (`AnimatedValue`, `Easing`,
//!   `AnimationSpec`) driven by a `Clock`;
//! - a polled one-shot `Timer`;
//! - `Notifier<T>` for platform broadcasts and `Dispose` guards;
//! - input payloads for pan gestures and keyboard notifications.
//!
//! Nothing here touches a real window system. The embedding platform feeds
//! events in and samples state out once per frame:
//!
//! ```rust
//! use overlay_core::*;
//! use web_time::Duration;
//!
//! let clock = ManualClock::default();
//! let mut alpha = AnimatedValue::new(0.0f32);
//! let spec = AnimationSpec::tween(Duration::from_millis(100), Easing::Linear);
//! alpha.animate_to(1.0, spec, clock.now());
//!
//! clock.advance(Duration::from_millis(50));
//! assert!(alpha.update(clock.now()));
//! assert!((*alpha.get() - 0.5).abs() < 0.01);
//! ```

pub mod animation;
pub mod color;
pub mod effects;
pub mod geometry;
pub mod input;
pub mod notifier;
pub mod timer;

pub use animation::*;
pub use color::*;
pub use effects::*;
pub use geometry::*;
pub use input::*;
pub use notifier::*;
pub use timer::*;
