/// Orientation of a ruling line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Constant y, varying x.
    Horizontal,
    /// Constant x, varying y.
    Vertical,
    /// Neither axis is constant.
    Diagonal,
}

/// Bounding box with top-left origin coordinate system.
///
/// Coordinates follow the page convention:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
///
/// The `(y0, x0, y1, x1)` tuple order used by training data maps to
/// `(top, x0, bottom, x1)`; see [`BBox::from_yx`] and [`BBox::to_yx`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Build a box from `(y0, x0, y1, x1)`, swapping coordinates if needed
    /// so that `top <= bottom` and `x0 <= x1`.
    pub fn from_yx(y0: f64, x0: f64, y1: f64, x1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            top: y0.min(y1),
            x1: x0.max(x1),
            bottom: y0.max(y1),
        }
    }

    /// The box as a `(y0, x0, y1, x1)` tuple.
    pub fn to_yx(&self) -> (f64, f64, f64, f64) {
        (self.top, self.x0, self.bottom, self.x1)
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area of the box, zero for degenerate or inverted boxes.
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Overlapping region of two boxes, or `None` when they do not overlap
    /// with positive area.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        let x1 = self.x1.min(other.x1);
        let bottom = self.bottom.min(other.bottom);
        if x1 > x0 && bottom > top {
            Some(BBox::new(x0, top, x1, bottom))
        } else {
            None
        }
    }

    /// Intersection-over-Union of two boxes.
    ///
    /// Returns 0.0 when the boxes do not overlap or when either box has
    /// zero area.
    pub fn iou(&self, other: &BBox) -> f64 {
        let a = self.area();
        let b = other.area();
        if a <= 0.0 || b <= 0.0 {
            return 0.0;
        }
        let inter = match self.intersection(other) {
            Some(i) => i.area(),
            None => return 0.0,
        };
        inter / (a + b - inter)
    }

    /// Scale x coordinates by `x_ratio` and y coordinates by `y_ratio`.
    pub fn scaled(&self, x_ratio: f64, y_ratio: f64) -> BBox {
        BBox {
            x0: self.x0 * x_ratio,
            top: self.top * y_ratio,
            x1: self.x1 * x_ratio,
            bottom: self.bottom * y_ratio,
        }
    }

    /// Whether the point lies inside the box (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.top && y <= self.bottom
    }

    /// Center point of the box.
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

/// Free-function form of [`BBox::iou`].
pub fn compute_iou(a: &BBox, b: &BBox) -> f64 {
    a.iou(b)
}
