//! Keeps overlay content clear of the on-screen keyboard.

use overlay_core::{AnimationSpec, Dispose, KeyboardNotification, Notifier, Rect, Size, Vec2};

/// Where the content should move in response to a keyboard notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardMove {
    pub center: Vec2,
    pub spec: AnimationSpec,
}

/// Per-controller keyboard state: the live subscription and whether the
/// content is currently shifted for a visible keyboard.
#[derive(Default)]
pub struct KeyboardTracker {
    visible: bool,
    subscription: Option<Dispose>,
}

impl KeyboardTracker {
    pub fn bind(
        &mut self,
        notifier: &Notifier<KeyboardNotification>,
        f: impl Fn(&KeyboardNotification) + 'static,
    ) {
        self.unbind();
        self.subscription = Some(notifier.subscribe_guarded(f));
    }

    pub fn unbind(&mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.run();
        }
        self.visible = false;
    }

    pub fn is_bound(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Handle a will-change-frame notification.
    ///
    /// `surface` is the host surface frame in screen coordinates and `rest`
    /// the content's resting center in surface coordinates. The raise is
    /// measured from the resting position, so repeated frame changes do not
    /// accumulate.
    pub fn frame_changed(
        &mut self,
        note: &KeyboardNotification,
        surface: Rect,
        rest: Vec2,
        content: Size,
        keyboard_offset: f32,
    ) -> Option<KeyboardMove> {
        if note.is_degenerate() {
            log::trace!("keyboard: ignoring degenerate frame change {:?}", note.frame_end);
            return None;
        }

        let keyboard = surface.to_local(note.frame_end);
        if surface.h - keyboard.y <= 0.0 {
            return None;
        }
        self.visible = true;

        let spec = AnimationSpec::tween(note.duration, note.curve.into());
        let overlap = Rect::from_center(rest, content).max_y() - keyboard.y;
        let center = if overlap > 0.0 {
            Vec2::new(rest.x, rest.y - overlap - keyboard_offset)
        } else {
            rest
        };
        Some(KeyboardMove { center, spec })
    }

    /// Handle a will-hide notification: back to the resting center.
    pub fn will_hide(&mut self, note: &KeyboardNotification, rest: Vec2) -> KeyboardMove {
        self.visible = false;
        KeyboardMove {
            center: rest,
            spec: AnimationSpec::tween(note.duration, note.curve.into()),
        }
    }
}

impl Drop for KeyboardTracker {
    fn drop(&mut self) {
        self.unbind();
    }
}
