use serde::ser::{Serialize, SerializeStruct, Serializer};
use usvg::tiny_skia_path::Point;

/// Axis-aligned rectangle spanned by every point an extraction touched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Option<Self> {
        let finite = [left, top, right, bottom].iter().all(|v| v.is_finite());
        if finite && left <= right && top <= bottom {
            Some(Bounds {
                min_x: left,
                min_y: top,
                max_x: right,
                max_y: bottom,
            })
        } else {
            None
        }
    }

    pub fn to_ltrb(&self) -> [f32; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.min_y + self.max_y) / 2.0
    }

    pub fn mid_point(&self) -> [f32; 2] {
        [self.center_x(), self.center_y()]
    }
}

impl Serialize for Bounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Bounds", 8)?;
        s.serialize_field("min_x", &self.min_x)?;
        s.serialize_field("min_y", &self.min_y)?;
        s.serialize_field("max_x", &self.max_x)?;
        s.serialize_field("max_y", &self.max_y)?;
        s.serialize_field("width", &self.width())?;
        s.serialize_field("height", &self.height())?;
        s.serialize_field("center_x", &self.center_x())?;
        s.serialize_field("center_y", &self.center_y())?;
        s.end()
    }
}

/// Running min/max over every point fed to it.
///
/// Starts out at the `+inf`/`-inf` sentinels and only ever grows. Points with
/// a non-finite coordinate are ignored.
#[derive(Debug, Clone)]
pub struct BoundsAccumulator {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Default for BoundsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, p: Point) {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return;
        }
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = Point>) {
        for p in points {
            self.add(p);
        }
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &BoundsAccumulator) {
        if other.is_empty() {
            return;
        }
        self.add(Point::from_xy(other.min_x, other.min_y));
        self.add(Point::from_xy(other.max_x, other.max_y));
    }

    pub fn is_empty(&self) -> bool {
        !(self.min_x.is_finite() && self.max_x.is_finite())
    }

    /// The rectangle seen so far, if any point was recorded.
    ///
    /// Only finite points are ever recorded, so a non-empty accumulator always
    /// yields a rectangle even when its span overflows `f32`.
    pub fn current(&self) -> Option<Bounds> {
        if self.is_empty() {
            return None;
        }
        Some(Bounds {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        })
    }

    /// Close the pass, falling back to `(0, 0)-(width, height)` when nothing
    /// was ever recorded.
    pub fn finish(&self, width: f32, height: f32) -> Bounds {
        self.current().unwrap_or(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: width,
            max_y: height,
        })
    }
}
