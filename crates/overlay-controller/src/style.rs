//! Overlay appearance and behaviour options.

use bitflags::bitflags;
use overlay_core::Color;
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Backdrop drawn behind the overlay content.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskStyle {
    DarkBlur,
    LightBlur,
    ExtraLightBlur,
    White,
    Clear,
    Black { opacity: f32 },
}

impl Default for MaskStyle {
    fn default() -> Self {
        MaskStyle::Black { opacity: 0.5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurStyle {
    Dark,
    Light,
    ExtraLight,
}

/// What the renderer has to draw for a mask.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Backdrop {
    Blur(BlurStyle),
    Solid(Color),
}

impl MaskStyle {
    pub fn backdrop(&self) -> Backdrop {
        match *self {
            MaskStyle::DarkBlur => Backdrop::Blur(BlurStyle::Dark),
            MaskStyle::LightBlur => Backdrop::Blur(BlurStyle::Light),
            MaskStyle::ExtraLightBlur => Backdrop::Blur(BlurStyle::ExtraLight),
            MaskStyle::White => Backdrop::Solid(Color::WHITE),
            MaskStyle::Clear => Backdrop::Solid(Color::TRANSPARENT),
            MaskStyle::Black { opacity } => Backdrop::Solid(Color::BLACK.with_opacity(opacity)),
        }
    }
}

/// How content enters and leaves the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideStyle {
    FromTop,
    FromLeft,
    FromBottom,
    FromRight,
    Scale { factor: f32 },
    #[default]
    Fade,
}

impl SlideStyle {
    /// Edge slides move the content; scale and fade only change its appearance.
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            SlideStyle::FromTop
                | SlideStyle::FromLeft
                | SlideStyle::FromBottom
                | SlideStyle::FromRight
        )
    }
}

/// Where the content rests once presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPosition {
    Top,
    Left,
    Bottom,
    Right,
    #[default]
    Center,
}

/// Stacking priority among overlays sharing a surface. Higher levels draw above lower ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLevel {
    VeryLow,
    Low,
    #[default]
    Normal,
    High,
    VeryHigh,
}

bitflags! {
    /// Keyboard coordination flags.
    ///
    /// `FOLLOW` moves the content out of the keyboard's way. `FIRST_RESPONDER`
    /// says the content takes input focus from its will-present callback, so
    /// presentation starts at the resting position instead of sliding in.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct KeyboardFollow: u8 {
        const FOLLOW = 1 << 0;
        const FIRST_RESPONDER = 1 << 1;
    }
}

impl KeyboardFollow {
    pub fn is_followed(&self) -> bool {
        self.contains(KeyboardFollow::FOLLOW)
    }

    pub fn is_synchronized(&self) -> bool {
        self.contains(KeyboardFollow::FOLLOW | KeyboardFollow::FIRST_RESPONDER)
    }
}

/// Every tunable of an overlay. Apps can keep presets as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub mask_style: MaskStyle,
    pub layout_position: LayoutPosition,
    pub presentation_style: SlideStyle,
    /// Falls back to `presentation_style` when unset.
    pub dismissal_style: Option<SlideStyle>,
    pub window_level: WindowLevel,
    /// Zero never auto-dismisses.
    pub dismiss_after_delay: Duration,
    pub dismiss_on_mask_touched: bool,
    pub pan_gesture_enabled: bool,
    /// Share of the host dimension a drag has to cross before it dismisses.
    pub pan_dismiss_ratio: f32,
    pub layout_offset: f32,
    pub keyboard_offset: f32,
    pub keyboard_follow: KeyboardFollow,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            mask_style: MaskStyle::default(),
            layout_position: LayoutPosition::default(),
            presentation_style: SlideStyle::default(),
            dismissal_style: None,
            window_level: WindowLevel::default(),
            dismiss_after_delay: Duration::ZERO,
            dismiss_on_mask_touched: true,
            pan_gesture_enabled: false,
            pan_dismiss_ratio: 0.5,
            layout_offset: 0.0,
            keyboard_offset: 0.0,
            keyboard_follow: KeyboardFollow::empty(),
        }
    }
}

impl OverlayConfig {
    pub fn effective_dismissal_style(&self) -> SlideStyle {
        self.dismissal_style.unwrap_or(self.presentation_style)
    }

    pub fn with_mask_style(mut self, style: MaskStyle) -> Self {
        self.mask_style = style;
        self
    }

    pub fn with_layout_position(mut self, position: LayoutPosition) -> Self {
        self.layout_position = position;
        self
    }

    pub fn with_presentation_style(mut self, style: SlideStyle) -> Self {
        self.presentation_style = style;
        self
    }

    pub fn with_dismissal_style(mut self, style: SlideStyle) -> Self {
        self.dismissal_style = Some(style);
        self
    }

    pub fn with_window_level(mut self, level: WindowLevel) -> Self {
        self.window_level = level;
        self
    }

    pub fn with_dismiss_after_delay(mut self, delay: Duration) -> Self {
        self.dismiss_after_delay = delay;
        self
    }

    pub fn with_pan_gesture(mut self, enabled: bool, dismiss_ratio: f32) -> Self {
        self.pan_gesture_enabled = enabled;
        self.pan_dismiss_ratio = dismiss_ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_layout_offset(mut self, offset: f32) -> Self {
        self.layout_offset = offset;
        self
    }

    pub fn with_keyboard_follow(mut self, follow: KeyboardFollow, offset: f32) -> Self {
        self.keyboard_follow = follow;
        self.keyboard_offset = offset;
        self
    }
}

/// Per-call presentation options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentOptions {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: overlay_core::Easing,
    pub bounced: bool,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            delay: Duration::ZERO,
            easing: overlay_core::Easing::EaseOut,
            bounced: false,
        }
    }
}

impl PresentOptions {
    pub fn bounced(mut self) -> Self {
        self.bounced = true;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Per-call dismissal options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DismissOptions {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: overlay_core::Easing,
}

impl Default for DismissOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            delay: Duration::ZERO,
            easing: overlay_core::Easing::EaseOut,
        }
    }
}

impl DismissOptions {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Which of a surface's overlays `OverlayHost::detach_which` dismisses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissWhich {
    /// The earliest attached overlay.
    First,
    /// The most recently attached overlay.
    Last,
    All,
}
