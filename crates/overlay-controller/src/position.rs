//! Resting and off-screen placement of overlay content.
//!
//! All functions are pure and work in host-local coordinates: the host's
//! top-left corner is the origin and `y` grows downwards.

use overlay_core::{Size, Vec2};

use crate::style::{LayoutPosition, SlideStyle};

/// Center of the content once presented.
///
/// `offset` pushes the content away from its anchor edge; for
/// [`LayoutPosition::Center`] it only shifts the vertical axis.
pub fn resting_center(position: LayoutPosition, offset: f32, host: Size, content: Size) -> Vec2 {
    match position {
        LayoutPosition::Top => Vec2::new(host.width / 2.0, content.height / 2.0 + offset),
        LayoutPosition::Left => Vec2::new(content.width / 2.0 + offset, host.height / 2.0),
        LayoutPosition::Bottom => Vec2::new(
            host.width / 2.0,
            host.height - content.height / 2.0 - offset,
        ),
        LayoutPosition::Right => Vec2::new(
            host.width - content.width / 2.0 - offset,
            host.height / 2.0,
        ),
        LayoutPosition::Center => Vec2::new(host.width / 2.0, host.height / 2.0 + offset),
    }
}

/// Center the content enters from (or leaves to) for `slide`.
pub fn offscreen_center(slide: SlideStyle, resting: Vec2, host: Size, content: Size) -> Vec2 {
    match slide {
        SlideStyle::FromTop => Vec2::new(resting.x, -content.height / 2.0),
        SlideStyle::FromLeft => Vec2::new(-content.width / 2.0, resting.y),
        SlideStyle::FromBottom => Vec2::new(resting.x, host.height + content.height / 2.0),
        SlideStyle::FromRight => Vec2::new(host.width + content.width / 2.0, resting.y),
        SlideStyle::Scale { .. } | SlideStyle::Fade => resting,
    }
}

/// Opacity and uniform scale of the content layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub alpha: f32,
    pub scale: f32,
}

impl Appearance {
    pub const IDENTITY: Appearance = Appearance {
        alpha: 1.0,
        scale: 1.0,
    };
}

impl Default for Appearance {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Appearance of the content while it is off screen for `slide`.
pub fn hidden_appearance(slide: SlideStyle) -> Appearance {
    match slide {
        SlideStyle::Scale { factor } => Appearance {
            alpha: 0.0,
            scale: factor,
        },
        SlideStyle::Fade => Appearance {
            alpha: 0.0,
            scale: 1.0,
        },
        SlideStyle::FromTop
        | SlideStyle::FromLeft
        | SlideStyle::FromBottom
        | SlideStyle::FromRight => Appearance::IDENTITY,
    }
}
