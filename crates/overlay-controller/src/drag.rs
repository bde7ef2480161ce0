//! Interactive drag-to-dismiss.
//!
//! A [`DragSession`] lives for one pan gesture. Each `Changed` sample moves
//! the content and yields a mask alpha; the terminal sample decides whether
//! the overlay dismisses or springs back.

use overlay_core::{Rect, Size, Vec2};

use crate::position::resting_center;
use crate::style::{LayoutPosition, SlideStyle};

/// Movement below this (in points) does not lock a center drag to an axis.
const AXIS_LOCK_SLOP: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Layout inputs a drag is evaluated against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragFrame {
    pub position: LayoutPosition,
    pub offset: f32,
    pub host: Size,
    pub content: Size,
}

impl DragFrame {
    pub fn resting_center(&self) -> Vec2 {
        resting_center(self.position, self.offset, self.host, self.content)
    }

    fn resting_frame(&self) -> Rect {
        Rect::from_center(self.resting_center(), self.content)
    }
}

/// Result of one `Changed` sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStep {
    pub center: Vec2,
    pub mask_alpha: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragOutcome {
    /// Dismiss, leaving towards `toward`.
    Commit { toward: SlideStyle },
    Rollback,
}

#[derive(Clone, Debug)]
pub struct DragSession {
    translation: Vec2,
    axis: Option<Axis>,
    mask_alpha: f32,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DragSession {
    pub fn new() -> Self {
        Self {
            translation: Vec2::ZERO,
            axis: None,
            mask_alpha: 1.0,
        }
    }

    /// Total movement applied so far.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn locked_axis(&self) -> Option<Axis> {
        self.axis
    }

    pub fn mask_alpha(&self) -> f32 {
        self.mask_alpha
    }

    /// Apply one translation delta to the content currently centered at `center`.
    pub fn update(&mut self, frame: &DragFrame, center: Vec2, delta: Vec2) -> DragStep {
        let current = Rect::from_center(center, frame.content);
        let rest = frame.resting_frame();
        let host = frame.host;

        let (center, alpha) = match frame.position {
            LayoutPosition::Top => {
                let boundary = frame.content.height + frame.offset;
                let center = if current.max_y() + delta.y < boundary {
                    Vec2::new(center.x, center.y + delta.y)
                } else {
                    rest.center()
                };
                let max_y = center.y + frame.content.height / 2.0;
                (center, ratio(max_y, boundary))
            }
            LayoutPosition::Left => {
                let boundary = frame.content.width + frame.offset;
                let center = if current.max_x() + delta.x < boundary {
                    Vec2::new(center.x + delta.x, center.y)
                } else {
                    rest.center()
                };
                let max_x = center.x + frame.content.width / 2.0;
                (center, ratio(max_x, boundary))
            }
            LayoutPosition::Bottom => {
                let boundary = rest.y;
                let center = if current.y + delta.y > boundary {
                    Vec2::new(center.x, center.y + delta.y)
                } else {
                    rest.center()
                };
                let min_y = center.y - frame.content.height / 2.0;
                (center, 1.0 - ratio(min_y - boundary, host.height - boundary))
            }
            LayoutPosition::Right => {
                let boundary = rest.x;
                let center = if current.x + delta.x > boundary {
                    Vec2::new(center.x + delta.x, center.y)
                } else {
                    rest.center()
                };
                let min_x = center.x - frame.content.width / 2.0;
                (center, 1.0 - ratio(min_x - boundary, host.width - boundary))
            }
            LayoutPosition::Center => {
                if self.axis.is_none() && delta.x.abs().max(delta.y.abs()) > AXIS_LOCK_SLOP {
                    self.axis = Some(if delta.x.abs() < delta.y.abs() {
                        Axis::Vertical
                    } else {
                        Axis::Horizontal
                    });
                }
                let center = match self.axis {
                    Some(Axis::Vertical) => Vec2::new(center.x, center.y + delta.y),
                    Some(Axis::Horizontal) => Vec2::new(center.x + delta.x, center.y),
                    None => center,
                };
                let boundary = rest.y;
                let min_y = center.y - frame.content.height / 2.0;
                (center, 1.0 - ratio(min_y - boundary, host.height - boundary))
            }
        };

        self.translation = self.translation + (center - current.center());
        self.mask_alpha = alpha.clamp(0.0, 1.0);
        DragStep {
            center,
            mask_alpha: self.mask_alpha,
        }
    }

    /// Decide what happens when the gesture ends with the content at `center`.
    pub fn finish(&self, frame: &DragFrame, center: Vec2, dismiss_ratio: f32) -> DragOutcome {
        let r = dismiss_ratio;
        let f = Rect::from_center(center, frame.content);
        let (w, h) = (frame.host.width, frame.host.height);

        let toward = match frame.position {
            LayoutPosition::Top => (f.max_y() < h * r).then_some(SlideStyle::FromTop),
            LayoutPosition::Left => (f.max_x() < w * r).then_some(SlideStyle::FromLeft),
            LayoutPosition::Bottom => (f.y > h * r).then_some(SlideStyle::FromBottom),
            LayoutPosition::Right => (f.x > w * r).then_some(SlideStyle::FromRight),
            LayoutPosition::Center => match self.axis {
                Some(Axis::Vertical) => {
                    if f.y > h * r {
                        Some(SlideStyle::FromBottom)
                    } else if f.max_y() < h * (1.0 - r) {
                        Some(SlideStyle::FromTop)
                    } else {
                        None
                    }
                }
                Some(Axis::Horizontal) => {
                    if f.x > w * r {
                        Some(SlideStyle::FromRight)
                    } else if f.max_x() < w * (1.0 - r) {
                        Some(SlideStyle::FromLeft)
                    } else {
                        None
                    }
                }
                None => None,
            },
        };

        match toward {
            Some(toward) => DragOutcome::Commit { toward },
            None => DragOutcome::Rollback,
        }
    }
}

fn ratio(value: f32, over: f32) -> f32 {
    if over.abs() <= f32::EPSILON {
        1.0
    } else {
        value / over
    }
}
