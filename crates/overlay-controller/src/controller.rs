//! The overlay state machine.
//!
//! An [`OverlayController`] owns the placement and animation state of one
//! content view plus its generated mask:
//!
//! ```text
//! Idle -> Presenting -> Presented -> Dismissing -> Idle
//! ```
//!
//! `present` only acts in `Idle` and `dismiss` only in `Presented`; every
//! other call is dropped. Transitions complete from [`OverlayHost::tick`],
//! which is also where the auto-dismiss timer fires.
//!
//! Callbacks are invoked with no internal borrow held, so they may call
//! back into the controller or its host.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use overlay_core::{
    AnimatedValue, AnimationSpec, Easing, GesturePhase, KeyboardEventKind, KeyboardNotification,
    PanEvent, Rect, Size, Timer, Transform, Vec2,
};
use web_time::{Duration, Instant};

use crate::drag::{DragFrame, DragOutcome, DragSession};
use crate::error::OverlayError;
use crate::host::{HostInner, OverlayHost, SurfaceId};
use crate::keyboard::KeyboardTracker;
use crate::position::{Appearance, hidden_appearance, offscreen_center, resting_center};
use crate::style::{
    Backdrop, DismissOptions, KeyboardFollow, LayoutPosition, MaskStyle, OverlayConfig,
    PresentOptions, SlideStyle, WindowLevel,
};

/// Global counter for unique controller IDs.
static CONTROLLER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an overlay controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

impl ControllerId {
    fn new() -> Self {
        Self(CONTROLLER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Content hosted by an overlay. The engine only needs its size; drawing
/// and input inside the content stay with the caller.
pub trait OverlayContent: 'static {
    fn size(&self) -> Size;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Presenting,
    Presented,
    Dismissing,
}

pub type Callback = Rc<dyn Fn(&OverlayController)>;
pub type Completion = Box<dyn FnOnce()>;

#[derive(Clone, Default)]
struct Callbacks {
    will_present: Option<Callback>,
    did_present: Option<Callback>,
    will_dismiss: Option<Callback>,
    did_dismiss: Option<Callback>,
    default_dismiss: Option<Callback>,
}

/// The host surface a controller was last given to.
pub(crate) struct Attachment {
    host: Weak<HostInner>,
    surface: SurfaceId,
    surface_frame: Rect,
    /// Still in the host's active set.
    active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransitionKind {
    Present,
    Dismiss,
}

struct Transition {
    kind: TransitionKind,
    ends_at: Instant,
    on_complete: Option<Completion>,
}

struct MaskView {
    frame: Rect,
    style: MaskStyle,
    alpha: AnimatedValue<f32>,
}

/// What a renderer needs to draw the mask this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskSnapshot {
    pub frame: Rect,
    pub backdrop: Backdrop,
    pub alpha: f32,
}

struct Inner {
    id: ControllerId,
    content: Rc<dyn OverlayContent>,
    size: Size,
    config: OverlayConfig,
    phase: Phase,
    center: AnimatedValue<Vec2>,
    alpha: AnimatedValue<f32>,
    scale: AnimatedValue<f32>,
    mask: Option<MaskView>,
    attachment: Option<Attachment>,
    transition: Option<Transition>,
    auto_dismiss: Timer,
    keyboard: KeyboardTracker,
    drag: Option<DragSession>,
    callbacks: Callbacks,
}

impl Inner {
    fn host_size(&self) -> Option<Size> {
        self.attachment.as_ref().map(|a| a.surface_frame.size())
    }

    fn resting_center(&self) -> Option<Vec2> {
        let host = self.host_size()?;
        Some(resting_center(
            self.config.layout_position,
            self.config.layout_offset,
            host,
            self.size,
        ))
    }

    fn drag_frame(&self) -> Option<DragFrame> {
        Some(DragFrame {
            position: self.config.layout_position,
            offset: self.config.layout_offset,
            host: self.host_size()?,
            content: self.size,
        })
    }

    fn host(&self) -> Option<Rc<HostInner>> {
        self.attachment.as_ref().and_then(|a| a.host.upgrade())
    }

    fn snap_appearance(&mut self, a: Appearance) {
        self.alpha.snap(a.alpha);
        self.scale.snap(a.scale);
    }

    fn animate_appearance(&mut self, a: Appearance, spec: AnimationSpec, now: Instant) {
        self.alpha.animate_to(a.alpha, spec, now);
        self.scale.animate_to(a.scale, spec, now);
    }
}

/// Handle to one presentable overlay. Clones share the same overlay.
#[derive(Clone)]
pub struct OverlayController(Rc<RefCell<Inner>>);

impl std::fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("OverlayController")
            .field("id", &inner.id)
            .field("phase", &inner.phase)
            .field("window_level", &inner.config.window_level)
            .finish()
    }
}

impl PartialEq for OverlayController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl OverlayController {
    /// Wrap `content`. A zero `size` falls back to the content's own size.
    pub fn new(content: impl OverlayContent, size: Size) -> Self {
        Self::from_rc(Rc::new(content), size)
    }

    pub fn from_rc(content: Rc<dyn OverlayContent>, size: Size) -> Self {
        let size = if size == Size::ZERO { content.size() } else { size };
        Self(Rc::new(RefCell::new(Inner {
            id: ControllerId::new(),
            content,
            size,
            config: OverlayConfig::default(),
            phase: Phase::Idle,
            center: AnimatedValue::new(Vec2::ZERO),
            alpha: AnimatedValue::new(1.0),
            scale: AnimatedValue::new(1.0),
            mask: None,
            attachment: None,
            transition: None,
            auto_dismiss: Timer::default(),
            keyboard: KeyboardTracker::default(),
            drag: None,
            callbacks: Callbacks::default(),
        })))
    }

    pub fn with_config(self, config: OverlayConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn id(&self) -> ControllerId {
        self.0.borrow().id
    }

    pub fn content(&self) -> Rc<dyn OverlayContent> {
        self.0.borrow().content.clone()
    }

    pub fn size(&self) -> Size {
        self.0.borrow().size
    }

    pub fn phase(&self) -> Phase {
        self.0.borrow().phase
    }

    /// True from the end of the entrance animation until the end of the exit animation.
    pub fn is_presenting(&self) -> bool {
        matches!(self.phase(), Phase::Presented | Phase::Dismissing)
    }

    pub fn config(&self) -> OverlayConfig {
        self.0.borrow().config.clone()
    }

    pub fn window_level(&self) -> WindowLevel {
        self.0.borrow().config.window_level
    }

    /// Surface this controller is currently stacked on.
    pub fn host_surface(&self) -> Option<SurfaceId> {
        let inner = self.0.borrow();
        inner
            .attachment
            .as_ref()
            .filter(|a| a.active)
            .map(|a| a.surface)
    }

    pub fn is_attached(&self) -> bool {
        self.host_surface().is_some()
    }

    pub fn content_center(&self) -> Vec2 {
        *self.0.borrow().center.get()
    }

    /// Layout frame of the content in surface coordinates, ignoring scale.
    pub fn content_frame(&self) -> Rect {
        let inner = self.0.borrow();
        Rect::from_center(*inner.center.get(), inner.size)
    }

    /// Frame as drawn, with the current scale applied about the center.
    pub fn visual_frame(&self) -> Rect {
        let scale = self.content_scale();
        Transform::scale(scale).apply_to_rect(self.content_frame())
    }

    pub fn content_alpha(&self) -> f32 {
        *self.0.borrow().alpha.get()
    }

    pub fn content_scale(&self) -> f32 {
        *self.0.borrow().scale.get()
    }

    pub fn mask(&self) -> Option<MaskSnapshot> {
        let inner = self.0.borrow();
        inner.mask.as_ref().map(|m| MaskSnapshot {
            frame: m.frame,
            backdrop: m.style.backdrop(),
            alpha: *m.alpha.get(),
        })
    }

    pub fn mask_alpha(&self) -> f32 {
        self.mask().map(|m| m.alpha).unwrap_or(0.0)
    }

    /// Where the content rests on its current surface.
    pub fn resting_center(&self) -> Option<Vec2> {
        self.0.borrow().resting_center()
    }

    pub fn is_keyboard_visible(&self) -> bool {
        self.0.borrow().keyboard.is_visible()
    }

    pub fn is_dragging(&self) -> bool {
        self.0.borrow().drag.is_some()
    }

    pub fn is_animating(&self) -> bool {
        let inner = self.0.borrow();
        inner.transition.is_some()
            || inner.center.is_animating()
            || inner.alpha.is_animating()
            || inner.scale.is_animating()
            || inner.mask.as_ref().is_some_and(|m| m.alpha.is_animating())
    }

    pub fn is_auto_dismiss_pending(&self) -> bool {
        self.0.borrow().auto_dismiss.is_armed()
    }

    // Configuration

    pub fn set_config(&self, config: OverlayConfig) {
        let follow = config.keyboard_follow;
        {
            let mut inner = self.0.borrow_mut();
            if let Some(mask) = inner.mask.as_mut() {
                mask.style = config.mask_style;
            }
            inner.config = config;
        }
        self.set_keyboard_follow(follow);
    }

    pub fn set_mask_style(&self, style: MaskStyle) {
        let mut inner = self.0.borrow_mut();
        inner.config.mask_style = style;
        if let Some(mask) = inner.mask.as_mut() {
            mask.style = style;
        }
    }

    pub fn set_layout_position(&self, position: LayoutPosition) {
        self.0.borrow_mut().config.layout_position = position;
    }

    pub fn set_presentation_style(&self, style: SlideStyle) {
        self.0.borrow_mut().config.presentation_style = style;
    }

    pub fn set_dismissal_style(&self, style: Option<SlideStyle>) {
        self.0.borrow_mut().config.dismissal_style = style;
    }

    /// Takes effect the next time the overlay is attached.
    pub fn set_window_level(&self, level: WindowLevel) {
        self.0.borrow_mut().config.window_level = level;
    }

    pub fn set_dismiss_after_delay(&self, delay: Duration) {
        self.0.borrow_mut().config.dismiss_after_delay = delay;
    }

    pub fn set_dismiss_on_mask_touched(&self, enabled: bool) {
        self.0.borrow_mut().config.dismiss_on_mask_touched = enabled;
    }

    pub fn set_pan_gesture_enabled(&self, enabled: bool) {
        let mut inner = self.0.borrow_mut();
        inner.config.pan_gesture_enabled = enabled;
        if !enabled {
            inner.drag = None;
        }
    }

    pub fn set_pan_dismiss_ratio(&self, ratio: f32) {
        self.0.borrow_mut().config.pan_dismiss_ratio = ratio.clamp(0.0, 1.0);
    }

    pub fn set_layout_offset(&self, offset: f32) {
        self.0.borrow_mut().config.layout_offset = offset;
    }

    pub fn set_keyboard_offset(&self, offset: f32) {
        self.0.borrow_mut().config.keyboard_offset = offset;
    }

    /// Keyboard notifications are observed only while `FOLLOW` is set.
    pub fn set_keyboard_follow(&self, follow: KeyboardFollow) {
        let mut inner = self.0.borrow_mut();
        inner.config.keyboard_follow = follow;
        if !follow.is_followed() {
            inner.keyboard.unbind();
            return;
        }
        if inner.keyboard.is_bound() {
            return;
        }
        if let Some(host) = inner.host() {
            let weak = Rc::downgrade(&self.0);
            inner.keyboard.bind(&host.keyboard, move |note| {
                if let Some(rc) = weak.upgrade() {
                    OverlayController(rc).on_keyboard(note);
                }
            });
        }
    }

    // Callbacks

    pub fn on_will_present(&self, f: impl Fn(&OverlayController) + 'static) {
        self.0.borrow_mut().callbacks.will_present = Some(Rc::new(f));
    }

    pub fn on_did_present(&self, f: impl Fn(&OverlayController) + 'static) {
        self.0.borrow_mut().callbacks.did_present = Some(Rc::new(f));
    }

    pub fn on_will_dismiss(&self, f: impl Fn(&OverlayController) + 'static) {
        self.0.borrow_mut().callbacks.will_dismiss = Some(Rc::new(f));
    }

    pub fn on_did_dismiss(&self, f: impl Fn(&OverlayController) + 'static) {
        self.0.borrow_mut().callbacks.did_dismiss = Some(Rc::new(f));
    }

    /// Replace what mask taps, committed drags and the auto-dismiss timer do.
    /// By default they detach the overlay from its host.
    pub fn set_default_dismiss(&self, f: impl Fn(&OverlayController) + 'static) {
        self.0.borrow_mut().callbacks.default_dismiss = Some(Rc::new(f));
    }

    fn emit(&self, pick: impl FnOnce(&Callbacks) -> Option<Callback>) {
        let cb = pick(&self.0.borrow().callbacks);
        if let Some(cb) = cb {
            cb(self);
        }
    }

    // Host-bound convenience

    /// Present again on the surface this controller was last attached to.
    pub fn present(&self, options: PresentOptions) -> Result<(), OverlayError> {
        self.present_with(options, None)
    }

    pub fn present_with(
        &self,
        options: PresentOptions,
        on_complete: Option<Completion>,
    ) -> Result<(), OverlayError> {
        let (host, surface) = {
            let inner = self.0.borrow();
            let Some((host, surface)) = inner
                .attachment
                .as_ref()
                .and_then(|a| Some((a.host.upgrade()?, a.surface)))
            else {
                return Err(OverlayError::NoHostSurface(inner.id));
            };
            (host, surface)
        };
        OverlayHost::from_inner(host).attach_with(self, surface, options, on_complete)
    }

    /// Dismiss through the host so the overlay leaves its active set.
    pub fn dismiss(&self, options: DismissOptions) {
        self.dismiss_with(options, None)
    }

    pub fn dismiss_with(&self, options: DismissOptions, on_complete: Option<Completion>) {
        let host = self.0.borrow().host();
        match host {
            Some(host) => OverlayHost::from_inner(host).detach_with(self, options, on_complete),
            None => log::trace!("overlay {:?}: dismiss without a host ignored", self.id()),
        }
    }

    /// Run the configured default dismiss action.
    pub fn run_default_dismiss(&self) {
        let custom = self.0.borrow().callbacks.default_dismiss.clone();
        match custom {
            Some(cb) => cb(self),
            None => self.dismiss(DismissOptions::default()),
        }
    }

    // Input

    /// Tap on the mask at `point` (surface coordinates).
    pub fn handle_mask_tap(&self, point: Vec2) {
        let dismiss = {
            let inner = self.0.borrow();
            inner.phase == Phase::Presented
                && inner.config.dismiss_on_mask_touched
                && !Rect::from_center(*inner.center.get(), inner.size).contains(point)
        };
        if dismiss {
            log::debug!("overlay {:?}: mask tapped", self.id());
            self.run_default_dismiss();
        }
    }

    /// Feed one pan sample recognised on the content.
    pub fn handle_pan(&self, event: PanEvent) {
        let Some(now) = self.now() else { return };

        let commit = {
            let mut guard = self.0.borrow_mut();
            let inner = &mut *guard;

            let inert = !inner.config.pan_gesture_enabled
                || inner.phase != Phase::Presented
                || inner.keyboard.is_visible();
            if inert {
                if event.phase.is_terminal() {
                    inner.drag = None;
                }
                return;
            }
            let Some(frame) = inner.drag_frame() else { return };

            match event.phase {
                GesturePhase::Began => {
                    inner.drag = Some(DragSession::new());
                    false
                }
                GesturePhase::Changed => {
                    let center = *inner.center.get();
                    let session = inner.drag.get_or_insert_with(DragSession::new);
                    let step = session.update(&frame, center, event.translation);
                    inner.center.snap(step.center);
                    if let Some(mask) = inner.mask.as_mut() {
                        mask.alpha.snap(step.mask_alpha);
                    }
                    false
                }
                GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed => {
                    let Some(session) = inner.drag.take() else { return };
                    let center = *inner.center.get();
                    match session.finish(&frame, center, inner.config.pan_dismiss_ratio) {
                        DragOutcome::Commit { toward } => {
                            if !inner.config.effective_dismissal_style().is_directional() {
                                inner.config.dismissal_style = Some(toward);
                            }
                            true
                        }
                        DragOutcome::Rollback => {
                            let spec = AnimationSpec::snap_back();
                            inner.center.animate_to(frame.resting_center(), spec, now);
                            if let Some(mask) = inner.mask.as_mut() {
                                mask.alpha.animate_to(1.0, spec, now);
                            }
                            false
                        }
                    }
                }
            }
        };

        if commit {
            log::debug!("overlay {:?}: drag committed", self.id());
            self.run_default_dismiss();
        }
    }

    fn on_keyboard(&self, note: &KeyboardNotification) {
        let Some(now) = self.now() else { return };
        let mut guard = self.0.borrow_mut();
        let inner = &mut *guard;

        if !inner.config.keyboard_follow.is_followed() {
            return;
        }
        let Some(surface_frame) = inner
            .attachment
            .as_ref()
            .filter(|a| a.active)
            .map(|a| a.surface_frame)
        else {
            return;
        };
        let Some(rest) = inner.resting_center() else { return };
        let showing = matches!(inner.phase, Phase::Presenting | Phase::Presented);

        let mv = match note.kind {
            KeyboardEventKind::WillChangeFrame if showing => inner.keyboard.frame_changed(
                note,
                surface_frame,
                rest,
                inner.size,
                inner.config.keyboard_offset,
            ),
            KeyboardEventKind::WillChangeFrame => None,
            KeyboardEventKind::WillHide => {
                let mv = inner.keyboard.will_hide(note, rest);
                showing.then_some(mv)
            }
        };

        if let Some(mv) = mv {
            if inner.keyboard.is_visible() {
                inner.drag = None;
            }
            inner.center.animate_to(mv.center, mv.spec, now);
        }
    }

    // Host-side plumbing

    fn now(&self) -> Option<Instant> {
        self.0.borrow().host().map(|h| h.clock.now())
    }

    pub(crate) fn active_attachment(&self) -> Option<(Weak<HostInner>, SurfaceId)> {
        let inner = self.0.borrow();
        inner
            .attachment
            .as_ref()
            .filter(|a| a.active)
            .map(|a| (a.host.clone(), a.surface))
    }

    pub(crate) fn attach_to(&self, host: &Rc<HostInner>, surface: SurfaceId, frame: Rect) {
        {
            let mut inner = self.0.borrow_mut();
            let rebinding = inner
                .attachment
                .as_ref()
                .is_some_and(|a| !Weak::ptr_eq(&a.host, &Rc::downgrade(host)));
            if rebinding {
                inner.keyboard.unbind();
            }
            inner.attachment = Some(Attachment {
                host: Rc::downgrade(host),
                surface,
                surface_frame: frame,
                active: true,
            });
            let style = inner.config.mask_style;
            let bounds = Rect::new(0.0, 0.0, frame.w, frame.h);
            let mask = inner.mask.get_or_insert_with(|| MaskView {
                frame: bounds,
                style,
                alpha: AnimatedValue::new(0.0),
            });
            mask.frame = bounds;
        }
        let follow = self.0.borrow().config.keyboard_follow;
        self.set_keyboard_follow(follow);
    }

    pub(crate) fn mark_detached(&self) {
        if let Some(a) = self.0.borrow_mut().attachment.as_mut() {
            a.active = false;
        }
    }

    /// Follow a host surface resize. Settled content snaps to the new
    /// resting center; an entrance in flight is re-aimed at it and still
    /// lands when the transition ends.
    pub(crate) fn surface_resized(&self, frame: Rect, now: Instant) {
        let mut guard = self.0.borrow_mut();
        let inner = &mut *guard;
        if let Some(a) = inner.attachment.as_mut() {
            a.surface_frame = frame;
        }
        if let Some(mask) = inner.mask.as_mut() {
            mask.frame = Rect::new(0.0, 0.0, frame.w, frame.h);
        }
        if inner.drag.is_some() || inner.keyboard.is_visible() {
            return;
        }
        let Some(rest) = inner.resting_center() else { return };

        match inner.phase {
            Phase::Presented => inner.center.snap(rest),
            Phase::Presenting => {
                let remaining = inner
                    .transition
                    .as_ref()
                    .map(|t| t.ends_at.saturating_duration_since(now))
                    .unwrap_or_default();
                if remaining.is_zero() || !inner.center.is_animating() {
                    inner.center.snap(rest);
                } else {
                    let spec = AnimationSpec::tween(remaining, Easing::EaseOut);
                    inner.center.animate_to(rest, spec, now);
                }
            }
            Phase::Idle | Phase::Dismissing => {}
        }
    }

    /// Drop straight to `Idle` without animating or notifying; used when the
    /// surface itself goes away.
    pub(crate) fn tear_down(&self) {
        let mut inner = self.0.borrow_mut();
        inner.transition = None;
        inner.auto_dismiss.cancel();
        inner.drag = None;
        inner.keyboard.unbind();
        inner.phase = Phase::Idle;
        inner.snap_appearance(Appearance::IDENTITY);
        if let Some(mask) = inner.mask.as_mut() {
            mask.alpha.snap(0.0);
        }
        if let Some(a) = inner.attachment.as_mut() {
            a.active = false;
        }
    }

    pub(crate) fn present_inner(&self, options: PresentOptions, on_complete: Option<Completion>) {
        let Some(now) = self.now() else { return };

        let synchronized = {
            let mut inner = self.0.borrow_mut();
            if inner.phase != Phase::Idle {
                log::trace!("overlay {:?}: present ignored in {:?}", inner.id, inner.phase);
                return;
            }
            let (Some(host), Some(rest)) = (inner.host_size(), inner.resting_center()) else {
                return;
            };
            inner.phase = Phase::Presenting;

            let style = inner.config.presentation_style;
            let synchronized = inner.config.keyboard_follow.is_synchronized();
            let start = if synchronized {
                rest
            } else {
                offscreen_center(style, rest, host, inner.size)
            };
            inner.center.snap(start);
            inner.snap_appearance(hidden_appearance(style));
            if let Some(mask) = inner.mask.as_mut() {
                mask.alpha.snap(0.0);
            }
            synchronized
        };

        self.emit(|c| c.will_present.clone());

        let mut inner = self.0.borrow_mut();
        if inner.phase != Phase::Presenting {
            return;
        }
        let tween =
            AnimationSpec::tween(options.duration, options.easing).with_delay(options.delay);
        let bounced = options.bounced && !synchronized;
        let (content_spec, mask_spec) = if bounced {
            (
                AnimationSpec::spring(options.duration).with_delay(options.delay),
                AnimationSpec::tween(options.duration.mul_f32(0.25), options.easing)
                    .with_delay(options.delay),
            )
        } else {
            (tween, tween)
        };

        if let Some(mask) = inner.mask.as_mut() {
            mask.alpha.animate_to(1.0, mask_spec, now);
        }
        inner.animate_appearance(Appearance::IDENTITY, content_spec, now);
        if !synchronized && let Some(rest) = inner.resting_center() {
            inner.center.animate_to(rest, content_spec, now);
        }
        inner.transition = Some(Transition {
            kind: TransitionKind::Present,
            ends_at: now + content_spec.total(),
            on_complete,
        });
        log::debug!(
            "overlay {:?}: presenting ({:?}, bounced: {bounced})",
            inner.id,
            inner.config.presentation_style
        );
    }

    pub(crate) fn dismiss_inner(&self, options: DismissOptions, on_complete: Option<Completion>) {
        let Some(now) = self.now() else { return };

        {
            let mut inner = self.0.borrow_mut();
            if inner.phase != Phase::Presented {
                log::trace!("overlay {:?}: dismiss ignored in {:?}", inner.id, inner.phase);
                return;
            }
            inner.phase = Phase::Dismissing;
            inner.auto_dismiss.cancel();
            inner.drag = None;
        }

        self.emit(|c| c.will_dismiss.clone());

        let mut inner = self.0.borrow_mut();
        let spec = AnimationSpec::tween(options.duration, options.easing).with_delay(options.delay);
        let style = inner.config.effective_dismissal_style();
        if let (Some(host), Some(rest)) = (inner.host_size(), inner.resting_center()) {
            let target = offscreen_center(style, rest, host, inner.size);
            inner.center.animate_to(target, spec, now);
        }
        inner.animate_appearance(hidden_appearance(style), spec, now);
        if let Some(mask) = inner.mask.as_mut() {
            mask.alpha.animate_to(0.0, spec, now);
        }
        inner.transition = Some(Transition {
            kind: TransitionKind::Dismiss,
            ends_at: now + spec.total(),
            on_complete,
        });
        log::debug!("overlay {:?}: dismissing ({style:?})", inner.id);
    }

    /// Advance animations to `now` and run whatever completed.
    pub(crate) fn tick(&self, now: Instant) {
        let finished = {
            let mut guard = self.0.borrow_mut();
            let inner = &mut *guard;
            inner.center.update(now);
            inner.alpha.update(now);
            inner.scale.update(now);
            if let Some(mask) = inner.mask.as_mut() {
                mask.alpha.update(now);
            }
            match inner.transition.as_ref() {
                Some(t) if now >= t.ends_at => inner.transition.take(),
                _ => None,
            }
        };

        if let Some(t) = finished {
            match t.kind {
                TransitionKind::Present => self.finish_present(t),
                TransitionKind::Dismiss => self.finish_dismiss(t),
            }
        }

        let fire = self.0.borrow_mut().auto_dismiss.poll(now);
        if fire {
            log::debug!("overlay {:?}: auto-dismiss timer fired", self.id());
            self.run_default_dismiss();
        }
    }

    fn finish_present(&self, t: Transition) {
        self.0.borrow_mut().phase = Phase::Presented;
        log::debug!("overlay {:?}: presented", self.id());

        self.emit(|c| c.did_present.clone());

        {
            let mut inner = self.0.borrow_mut();
            let delay = inner.config.dismiss_after_delay;
            if inner.phase == Phase::Presented && delay > Duration::ZERO {
                inner.auto_dismiss.arm(t.ends_at, delay);
            }
        }

        if let Some(f) = t.on_complete {
            f();
        }
    }

    fn finish_dismiss(&self, t: Transition) {
        self.0.borrow_mut().snap_appearance(Appearance::IDENTITY);

        self.emit(|c| c.did_dismiss.clone());

        let (host, surface, id) = {
            let mut inner = self.0.borrow_mut();
            inner.auto_dismiss.cancel();
            inner.drag = None;
            inner.phase = Phase::Idle;
            let surface = inner.attachment.as_ref().map(|a| a.surface);
            (inner.host(), surface, inner.id)
        };
        if let (Some(host), Some(surface)) = (host, surface) {
            OverlayHost::from_inner(host).remove_layers(surface, id);
        }
        log::debug!("overlay {id:?}: dismissed");

        if let Some(f) = t.on_complete {
            f();
        }
    }
}
