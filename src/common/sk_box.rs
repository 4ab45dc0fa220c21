use serde::{Deserialize, Serialize};

/// Axis-aligned box, top-left anchored, in whichever pixel space the owner states.
///
/// Serializes as `[x, y, width, height]`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct SkBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl From<[f32; 4]> for SkBox {
    fn from([x, y, w, h]: [f32; 4]) -> Self {
        Self { x, y, w, h }
    }
}

impl From<SkBox> for [f32; 4] {
    fn from(b: SkBox) -> Self {
        [b.x, b.y, b.w, b.h]
    }
}

impl SkBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a box from center coordinates and size.
    ///
    /// The top-left corner is clamped at zero; width and height are kept as given.
    pub fn from_cxcy_wh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: (cx - w / 2.).max(0.),
            y: (cy - h / 2.).max(0.),
            w,
            h,
        }
    }

    pub fn x_max(&self) -> f32 {
        self.x + self.w
    }

    pub fn y_max(&self) -> f32 {
        self.y + self.h
    }

    pub fn cx(&self) -> f32 {
        self.x + self.w / 2.
    }

    pub fn cy(&self) -> f32 {
        self.y + self.h / 2.
    }

    /// Returns the box as `(x, y, w, h)`.
    pub fn xy_wh(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.w, self.h)
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Computes the intersection area between this box and another.
    pub fn intersect(&self, other: &SkBox) -> f32 {
        let left = self.x.max(other.x);
        let right = self.x_max().min(other.x_max());
        let top = self.y.max(other.y);
        let bottom = self.y_max().min(other.y_max());
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Computes the union area between this box and another.
    pub fn union(&self, other: &SkBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Intersection over union. Boxes without a positive overlap score 0,
    /// which also covers pairs of degenerate zero-area boxes.
    pub fn iou(&self, other: &SkBox) -> f32 {
        let inter = self.intersect(other);
        if inter <= 0. {
            return 0.;
        }
        inter / self.union(other)
    }

    /// Scales position and size per axis, then clamps the corner at zero.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            x: (self.x * sx).max(0.),
            y: (self.y * sy).max(0.),
            w: self.w * sx,
            h: self.h * sy,
        }
    }

    pub fn as_xy_wh_i32(&self) -> (i32, i32, i32, i32) {
        (self.x.round() as i32,
         self.y.round() as i32,
         self.w.round() as i32,
         self.h.round() as i32)
    }
}
