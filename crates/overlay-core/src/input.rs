use web_time::Duration;

use crate::{Easing, Rect, Vec2};

/// Phase of a continuous gesture as reported by the platform recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl GesturePhase {
    /// Ended, cancelled and failed all close the gesture.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed
        )
    }
}

/// One pan sample. `translation` is the delta since the previous sample;
/// recognizers reset their translation after every delivery.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanEvent {
    pub phase: GesturePhase,
    pub translation: Vec2,
}

impl PanEvent {
    pub fn began() -> Self {
        Self {
            phase: GesturePhase::Began,
            translation: Vec2::ZERO,
        }
    }

    pub fn changed(dx: f32, dy: f32) -> Self {
        Self {
            phase: GesturePhase::Changed,
            translation: Vec2::new(dx, dy),
        }
    }

    pub fn ended() -> Self {
        Self {
            phase: GesturePhase::Ended,
            translation: Vec2::ZERO,
        }
    }
}

/// Animation curve the platform attaches to keyboard notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyboardCurve {
    #[default]
    EaseInOut,
    EaseIn,
    EaseOut,
    Linear,
}

impl From<KeyboardCurve> for Easing {
    fn from(c: KeyboardCurve) -> Self {
        match c {
            KeyboardCurve::EaseInOut => Easing::EaseInOut,
            KeyboardCurve::EaseIn => Easing::EaseIn,
            KeyboardCurve::EaseOut => Easing::EaseOut,
            KeyboardCurve::Linear => Easing::Linear,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyboardEventKind {
    WillChangeFrame,
    WillHide,
}

/// Keyboard notification payload. Frames are in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardNotification {
    pub kind: KeyboardEventKind,
    pub frame_begin: Rect,
    pub frame_end: Rect,
    pub duration: Duration,
    pub curve: KeyboardCurve,
}

impl KeyboardNotification {
    pub fn will_change_frame(frame_begin: Rect, frame_end: Rect) -> Self {
        Self {
            kind: KeyboardEventKind::WillChangeFrame,
            frame_begin,
            frame_end,
            duration: Duration::from_millis(250),
            curve: KeyboardCurve::default(),
        }
    }

    pub fn will_hide(frame_begin: Rect, frame_end: Rect) -> Self {
        Self {
            kind: KeyboardEventKind::WillHide,
            ..Self::will_change_frame(frame_begin, frame_end)
        }
    }

    /// Zero-height or stationary frame changes carry no information.
    pub fn is_degenerate(&self) -> bool {
        self.frame_begin.h <= 0.0 || self.frame_begin.y == self.frame_end.y
    }
}
