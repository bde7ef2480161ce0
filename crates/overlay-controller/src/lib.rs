//! # Overlays
//!
//! Presents auxiliary content (share sheets, pickers, sidebars, toasts)
//! above a host surface with a backdrop mask.
//!
//! - [`OverlayController`]: one overlay with its configuration, lifecycle
//!   callbacks and the present/dismiss state machine.
//! - [`OverlayHost`]: registry of host surfaces and the overlays stacked on
//!   each, ordered by [`WindowLevel`].
//! - [`position`]: where content rests and where it enters/leaves from.
//! - [`drag`]: drag-to-dismiss.
//! - [`keyboard`]: moving content out of the keyboard's way.
//!
//! The platform drives everything from one thread: it calls
//! [`OverlayHost::tick`] every frame and forwards pan gestures, mask taps
//! and keyboard notifications.
//!
//! ```rust
//! use overlay_controller::*;
//! use overlay_core::{ManualClock, Rect, Size};
//! use web_time::Duration;
//!
//! struct Toast;
//! impl OverlayContent for Toast {
//!     fn size(&self) -> Size {
//!         Size::new(280.0, 64.0)
//!     }
//! }
//!
//! let clock = ManualClock::default();
//! let host = OverlayHost::new(clock.clone());
//! let window = host.add_surface(SurfaceKind::Window, Rect::new(0.0, 0.0, 390.0, 844.0));
//!
//! let toast = OverlayController::new(Toast, Size::ZERO).with_config(
//!     OverlayConfig::default()
//!         .with_layout_position(LayoutPosition::Top)
//!         .with_presentation_style(SlideStyle::FromTop)
//!         .with_mask_style(MaskStyle::Clear),
//! );
//! host.attach(&toast, window, PresentOptions::default()).unwrap();
//!
//! clock.advance(Duration::from_millis(250));
//! host.tick();
//! assert_eq!(toast.phase(), Phase::Presented);
//! assert_eq!(toast.content_frame(), Rect::new(55.0, 0.0, 280.0, 64.0));
//! ```

pub mod controller;
pub mod drag;
pub mod error;
pub mod host;
pub mod keyboard;
pub mod position;
pub mod style;
mod tests;

pub use controller::{
    Callback, Completion, ControllerId, MaskSnapshot, OverlayContent, OverlayController, Phase,
};
pub use error::OverlayError;
pub use host::{Layer, LayerKind, OverlayHost, SurfaceId, SurfaceInfo, SurfaceKind};
pub use style::*;
