//! Geometric primitives for layout analysis.
//!
//! OCR engines report positions in page pixel space with the origin at the
//! top-left corner, `x` growing to the right and `y` growing downwards.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in page pixel space.
///
/// Invariant: `x1 >= x0` and `y1 >= y0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its two corners.
    ///
    /// Corners given in the wrong order are swapped so the invariant holds.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(110.0, 70.0, 10.0, 20.0);
    /// assert_eq!(bbox.x0, 10.0);
    /// assert_eq!(bbox.width(), 100.0);
    /// assert_eq!(bbox.height(), 50.0);
    /// ```
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Horizontal midpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(100.0, 0.0, 300.0, 20.0);
    /// assert_eq!(bbox.center_x(), 200.0);
    /// ```
    pub fn center_x(&self) -> f32 {
        self.x0 + self.width() / 2.0
    }

    /// Whether all four coordinates are finite numbers.
    ///
    /// Lines whose box fails this check are left out of page metrics.
    pub fn is_usable(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Compute the smallest box containing both boxes.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::geometry::BoundingBox;
    ///
    /// let a = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
    /// let b = BoundingBox::new(25.0, 25.0, 75.0, 75.0);
    /// let union = a.union(&b);
    /// assert_eq!(union, BoundingBox::new(0.0, 0.0, 75.0, 75.0));
    /// ```
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Horizontal extent of a page, used for centering checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpan {
    /// Leftmost x coordinate
    pub left: f32,
    /// Rightmost x coordinate
    pub right: f32,
}

impl PageSpan {
    /// Span covering a full page image of the given width.
    pub fn from_width(width: f32) -> Self {
        Self {
            left: 0.0,
            right: width,
        }
    }

    /// Span covering the union of the given boxes, if any are usable.
    pub fn from_boxes<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<Self> {
        boxes
            .into_iter()
            .filter(|b| b.is_usable())
            .copied()
            .reduce(|acc, b| acc.union(&b))
            .map(|b| Self {
                left: b.x0,
                right: b.x1,
            })
    }

    /// Horizontal center of the page.
    pub fn center(&self) -> f32 {
        (self.left + self.right) / 2.0
    }
}
