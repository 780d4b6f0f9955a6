use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use usvg::tiny_skia_path::Point;

/// Lowest number of parametric steps a curve is ever sampled with.
pub const MIN_CURVE_SAMPLES: usize = 10;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Move {
        #[serde(serialize_with = "serialize_point")]
        to: Point,
    },
    Line {
        #[serde(serialize_with = "serialize_point")]
        to: Point,
    },
    Cubic {
        #[serde(serialize_with = "serialize_point")]
        ctrl1: Point,
        #[serde(serialize_with = "serialize_point")]
        ctrl2: Point,
        #[serde(serialize_with = "serialize_point")]
        to: Point,
    },
    Quadratic {
        #[serde(serialize_with = "serialize_point")]
        ctrl: Point,
        #[serde(serialize_with = "serialize_point")]
        to: Point,
    },
    Close,
}

impl Segment {
    /// End point of the segment. `Close` has none of its own.
    pub fn end(&self) -> Option<Point> {
        match *self {
            Segment::Move { to }
            | Segment::Line { to }
            | Segment::Cubic { to, .. }
            | Segment::Quadratic { to, .. } => Some(to),
            Segment::Close => None,
        }
    }

    /// Points along the segment when drawn from `from`, excluding `from`.
    ///
    /// Lines and moves give their end point; curves give `steps` evenly
    /// spaced parametric samples ending at the end point.
    pub fn sample(&self, from: Point, steps: usize) -> Vec<Point> {
        let steps = steps.max(MIN_CURVE_SAMPLES);
        match *self {
            Segment::Move { to } | Segment::Line { to } => vec![to],
            Segment::Cubic { ctrl1, ctrl2, to } => (1..=steps)
                .map(|i| cubic_at(from, ctrl1, ctrl2, to, i as f32 / steps as f32))
                .collect(),
            Segment::Quadratic { ctrl, to } => (1..=steps)
                .map(|i| quadratic_at(from, ctrl, to, i as f32 / steps as f32))
                .collect(),
            Segment::Close => Vec::new(),
        }
    }
}

fn lerp(a: Point, b: Point, t: f32) -> Point {
    Point::from_xy(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Point on a cubic Bézier at `t`, by de Casteljau subdivision.
pub fn cubic_at(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    if t <= 0.0 {
        return p0;
    }
    if t >= 1.0 {
        return p3;
    }
    let (a, b, c) = (lerp(p0, p1, t), lerp(p1, p2, t), lerp(p2, p3, t));
    let (d, e) = (lerp(a, b, t), lerp(b, c, t));
    lerp(d, e, t)
}

pub fn quadratic_at(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    if t <= 0.0 {
        return p0;
    }
    if t >= 1.0 {
        return p2;
    }
    lerp(lerp(p0, p1, t), lerp(p1, p2, t), t)
}

/// One continuous pen-down run, always opened by a `Move`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    segments: Vec<Segment>,
}

impl Subpath {
    pub(crate) fn new(start: Point) -> Self {
        Self {
            segments: vec![Segment::Move { to: start }],
        }
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn start(&self) -> Point {
        match self.segments.first() {
            Some(Segment::Move { to }) => *to,
            _ => Point::from_xy(0.0, 0.0),
        }
    }

    /// Last explicit point reached, ignoring a trailing `Close`.
    pub fn last_point(&self) -> Point {
        self.segments
            .iter()
            .rev()
            .find_map(Segment::end)
            .unwrap_or_else(|| self.start())
    }

    pub fn is_closed(&self) -> bool {
        if matches!(self.segments.last(), Some(Segment::Close)) {
            return true;
        }
        self.segments.len() > 1 && self.last_point() == self.start()
    }

    /// The subpath as a polyline, curves sampled with `steps` steps each.
    ///
    /// A closed subpath does not repeat its start point at the end.
    pub fn flatten(&self, steps: usize) -> Vec<Point> {
        let mut points = vec![self.start()];
        let mut cursor = self.start();
        for seg in &self.segments[1..] {
            for p in seg.sample(cursor, steps) {
                points.push(p);
            }
            if let Some(end) = seg.end() {
                cursor = end;
            }
        }
        if self.is_closed() && points.len() > 1 && points.last() == points.first() {
            points.pop();
        }
        points
    }
}

impl Serialize for Subpath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Subpath", 2)?;
        s.serialize_field("closed", &self.is_closed())?;
        s.serialize_field("segments", &self.segments)?;
        s.end()
    }
}

fn serialize_point<S: Serializer>(p: &Point, serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(2))?;
    seq.serialize_element(&p.x)?;
    seq.serialize_element(&p.y)?;
    seq.end()
}
