//! Per-surface overlay stacking.
//!
//! [`OverlayHost`] is the application's single registry of host surfaces
//! (windows or views) and of the overlays currently attached to each.
//!
//! # Invariants
//!
//! - An overlay is in at most one surface's active set at a time.
//! - A surface's active set exists only while it is non-empty; the entry is
//!   released as soon as its last overlay finishes dismissing.
//! - Layers are ordered bottom to top by window level, then by attach order
//!   for equal levels. Each overlay contributes its mask directly followed
//!   by its content.
//!
//! # Example
//!
//! ```ignore
//! let host = OverlayHost::new(SystemClock);
//! let window = host.add_surface(SurfaceKind::Window, Rect::new(0.0, 0.0, 390.0, 844.0));
//!
//! let sheet = OverlayController::new(share_sheet, Size::ZERO);
//! host.attach(&sheet, window, PresentOptions::default())?;
//!
//! // once per frame
//! host.tick();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use overlay_core::{Clock, KeyboardNotification, Notifier, Rect, SystemClock, Vec2};
use slotmap::SlotMap;
use smallvec::SmallVec;
use web_time::Instant;

use crate::controller::{Completion, ControllerId, OverlayController, Phase};
use crate::error::OverlayError;
use crate::style::{DismissOptions, DismissWhich, PresentOptions, WindowLevel};

slotmap::new_key_type! {
    /// Handle to a host surface registered with an [`OverlayHost`].
    pub struct SurfaceId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    Window,
    View,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Mask,
    Content,
}

/// One entry of a surface's z-order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layer {
    pub controller: ControllerId,
    pub kind: LayerKind,
}

impl Layer {
    pub fn mask(controller: ControllerId) -> Self {
        Self {
            controller,
            kind: LayerKind::Mask,
        }
    }

    pub fn content(controller: ControllerId) -> Self {
        Self {
            controller,
            kind: LayerKind::Content,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceInfo {
    pub kind: SurfaceKind,
    /// Frame in screen coordinates.
    pub frame: Rect,
}

struct Surface {
    info: SurfaceInfo,
    layers: Vec<Layer>,
}

#[derive(Default)]
struct HostState {
    surfaces: SlotMap<SurfaceId, Surface>,
    /// Active overlays per surface, in attach order.
    stacks: BTreeMap<SurfaceId, Vec<OverlayController>>,
}

pub(crate) struct HostInner {
    state: RefCell<HostState>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) keyboard: Notifier<KeyboardNotification>,
}

/// Stacking coordinator for every host surface of an application.
#[derive(Clone)]
pub struct OverlayHost {
    inner: Rc<HostInner>,
}

impl Default for OverlayHost {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl OverlayHost {
    pub fn new(clock: impl Clock) -> Self {
        Self::with_clock(Arc::new(clock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(HostInner {
                state: RefCell::new(HostState::default()),
                clock,
                keyboard: Notifier::new(),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<HostInner>) -> Self {
        Self { inner }
    }

    pub fn now(&self) -> Instant {
        self.inner.clock.now()
    }

    // Surfaces

    pub fn add_surface(&self, kind: SurfaceKind, frame: Rect) -> SurfaceId {
        let id = self.inner.state.borrow_mut().surfaces.insert(Surface {
            info: SurfaceInfo { kind, frame },
            layers: Vec::new(),
        });
        log::debug!("host: added {kind:?} surface {id:?} at {frame:?}");
        id
    }

    /// Forget a surface. Overlays still on it drop to idle without animating.
    pub fn remove_surface(&self, id: SurfaceId) -> bool {
        let (removed, orphans) = {
            let mut state = self.inner.state.borrow_mut();
            (state.surfaces.remove(id), state.stacks.remove(&id))
        };
        for c in orphans.into_iter().flatten() {
            log::warn!("host: surface {id:?} removed under overlay {:?}", c.id());
            c.tear_down();
        }
        removed.is_some()
    }

    pub fn set_surface_frame(&self, id: SurfaceId, frame: Rect) -> Result<(), OverlayError> {
        let now = self.now();
        let attached = {
            let mut state = self.inner.state.borrow_mut();
            let surface = state
                .surfaces
                .get_mut(id)
                .ok_or(OverlayError::SurfaceNotFound(id))?;
            surface.info.frame = frame;
            state.stacks.get(&id).cloned().unwrap_or_default()
        };
        for c in attached {
            c.surface_resized(frame, now);
        }
        Ok(())
    }

    pub fn surface(&self, id: SurfaceId) -> Option<SurfaceInfo> {
        self.inner.state.borrow().surfaces.get(id).map(|s| s.info)
    }

    /// Z-order of the surface's overlay layers, bottom to top.
    pub fn layers(&self, id: SurfaceId) -> Vec<Layer> {
        self.inner
            .state
            .borrow()
            .surfaces
            .get(id)
            .map(|s| s.layers.clone())
            .unwrap_or_default()
    }

    /// Overlays on the surface, bottom to top.
    pub fn z_order(&self, id: SurfaceId) -> Vec<ControllerId> {
        self.layers(id)
            .into_iter()
            .filter(|l| l.kind == LayerKind::Mask)
            .map(|l| l.controller)
            .collect()
    }

    /// Active overlays on the surface in attach order.
    pub fn overlays(&self, id: SurfaceId) -> Vec<OverlayController> {
        self.inner
            .state
            .borrow()
            .stacks
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the surface currently holds an active set.
    pub fn has_overlays(&self, id: SurfaceId) -> bool {
        self.inner.state.borrow().stacks.contains_key(&id)
    }

    /// Topmost overlay whose mask covers `point` (surface coordinates),
    /// whatever its phase. Taps are routed here; a mask that is still
    /// animating swallows the tap instead of passing it further down.
    pub fn hit_test(&self, id: SurfaceId, point: Vec2) -> Option<OverlayController> {
        let overlays = self.overlays(id);
        self.z_order(id).into_iter().rev().find_map(|cid| {
            overlays
                .iter()
                .find(|c| c.id() == cid)
                .filter(|c| c.mask().is_some_and(|m| m.frame.contains(point)))
                .cloned()
        })
    }

    // Attach / detach

    pub fn attach(
        &self,
        controller: &OverlayController,
        surface: SurfaceId,
        options: PresentOptions,
    ) -> Result<(), OverlayError> {
        self.attach_with(controller, surface, options, None)
    }

    /// Stack `controller` on `surface` by window level and present it.
    /// `on_complete` runs once the entrance animation finishes.
    pub fn attach_with(
        &self,
        controller: &OverlayController,
        surface: SurfaceId,
        options: PresentOptions,
        on_complete: Option<Completion>,
    ) -> Result<(), OverlayError> {
        if let Some((host, current)) = controller.active_attachment() {
            if Weak::ptr_eq(&host, &Rc::downgrade(&self.inner)) && current == surface {
                log::trace!("host: {:?} already attached to {surface:?}", controller.id());
                return Ok(());
            }
            return Err(OverlayError::AttachedElsewhere {
                controller: controller.id(),
                surface: current,
            });
        }

        let frame = {
            let mut guard = self.inner.state.borrow_mut();
            let state = &mut *guard;
            let Some(entry) = state.surfaces.get_mut(surface) else {
                log::warn!("host: attach to unknown surface {surface:?}");
                return Err(OverlayError::SurfaceNotFound(surface));
            };
            let stack = state.stacks.entry(surface).or_default();
            insert_layers(&mut entry.layers, stack, controller);
            stack.push(controller.clone());
            entry.info.frame
        };
        log::debug!(
            "host: attached {:?} at {:?} to {surface:?}",
            controller.id(),
            controller.window_level()
        );

        controller.attach_to(&self.inner, surface, frame);
        controller.present_inner(options, on_complete);
        Ok(())
    }

    pub fn detach(&self, controller: &OverlayController, options: DismissOptions) {
        self.detach_with(controller, options, None)
    }

    /// Dismiss `controller` and drop it from its surface's active set once
    /// the exit animation finishes. `on_complete` runs after that.
    pub fn detach_with(
        &self,
        controller: &OverlayController,
        options: DismissOptions,
        on_complete: Option<Completion>,
    ) {
        let surface = match controller.active_attachment() {
            Some((host, surface)) if Weak::ptr_eq(&host, &Rc::downgrade(&self.inner)) => surface,
            _ => {
                log::trace!("host: detach of unattached {:?} ignored", controller.id());
                return;
            }
        };
        if !self.has_overlays(surface) {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let id = controller.id();
        controller.dismiss_inner(
            options,
            Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    OverlayHost::from_inner(inner).release(surface, id);
                }
                if let Some(f) = on_complete {
                    f();
                }
            })),
        );
    }

    /// Dismiss the first-attached, last-attached or every presented overlay
    /// on `surface`. `on_complete` runs once, after the last of them is gone.
    /// Returns how many overlays started dismissing.
    pub fn detach_which(
        &self,
        surface: SurfaceId,
        which: DismissWhich,
        options: DismissOptions,
        on_complete: Option<Completion>,
    ) -> usize {
        let presented: Vec<OverlayController> = self
            .overlays(surface)
            .into_iter()
            .filter(|c| c.phase() == Phase::Presented)
            .collect();
        let targets: Vec<OverlayController> = match which {
            DismissWhich::First => presented.first().cloned().into_iter().collect(),
            DismissWhich::Last => presented.last().cloned().into_iter().collect(),
            DismissWhich::All => presented,
        };
        if targets.is_empty() {
            return 0;
        }

        let remaining = Rc::new(Cell::new(targets.len()));
        let done = Rc::new(RefCell::new(on_complete));
        for c in &targets {
            let remaining = remaining.clone();
            let done = done.clone();
            self.detach_with(
                c,
                options,
                Some(Box::new(move || {
                    remaining.set(remaining.get() - 1);
                    if remaining.get() == 0 {
                        let f = done.borrow_mut().take();
                        if let Some(f) = f {
                            f();
                        }
                    }
                })),
            );
        }
        targets.len()
    }

    pub(crate) fn remove_layers(&self, surface: SurfaceId, id: ControllerId) {
        if let Some(s) = self.inner.state.borrow_mut().surfaces.get_mut(surface) {
            s.layers.retain(|l| l.controller != id);
        }
    }

    fn release(&self, surface: SurfaceId, id: ControllerId) {
        let removed = {
            let mut state = self.inner.state.borrow_mut();
            let Some(stack) = state.stacks.get_mut(&surface) else {
                return;
            };
            let removed = stack
                .iter()
                .position(|c| c.id() == id)
                .map(|i| stack.remove(i));
            if stack.is_empty() {
                state.stacks.remove(&surface);
                log::debug!("host: released overlay registry of {surface:?}");
            }
            removed
        };
        if let Some(c) = removed {
            c.mark_detached();
        }
    }

    // Frame loop and platform input

    /// Advance every attached overlay to the clock's current time.
    pub fn tick(&self) {
        let now = self.now();
        let attached: SmallVec<[OverlayController; 8]> = self
            .inner
            .state
            .borrow()
            .stacks
            .values()
            .flatten()
            .cloned()
            .collect();
        for c in attached {
            c.tick(now);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.inner
            .state
            .borrow()
            .stacks
            .values()
            .flatten()
            .any(|c| c.is_animating())
    }

    /// Deliver a keyboard notification to every overlay following the keyboard.
    pub fn post_keyboard(&self, note: &KeyboardNotification) {
        self.inner.keyboard.post(note);
    }

    pub fn keyboard_notifier(&self) -> Notifier<KeyboardNotification> {
        self.inner.keyboard.clone()
    }
}

/// Place `new`'s mask and content in `layers` according to its window level.
fn insert_layers(layers: &mut Vec<Layer>, stack: &[OverlayController], new: &OverlayController) {
    let id = new.id();
    let level = new.window_level();

    let mut sorted: SmallVec<[(WindowLevel, ControllerId); 8]> =
        stack.iter().map(|c| (c.window_level(), c.id())).collect();
    // Stable: equal levels keep attach order.
    sorted.sort_by_key(|(l, _)| *l);

    let below = match sorted.last() {
        Some((top, _)) if level < *top => sorted
            .iter()
            .find(|(l, _)| level < *l)
            .and_then(|(_, above)| layers.iter().position(|l| *l == Layer::mask(*above))),
        _ => None,
    };

    match below {
        Some(idx) => {
            layers.insert(idx, Layer::content(id));
            layers.insert(idx, Layer::mask(id));
        }
        None => layers.extend([Layer::mask(id), Layer::content(id)]),
    }
}
