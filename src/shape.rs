use crate::color::ColorSource;
use crate::segment::{Segment, Subpath};
use serde::Serialize;
use usvg::tiny_skia_path::{Path, PathBuilder, Point};

/// Geometry and fill of one rendered `path` element.
#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    /// Position of the element among all `path` elements of the document.
    pub source_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    pub color: String,
    pub color_source: ColorSource,
    pub subpaths: Vec<Subpath>,
}

impl Shape {
    /// Each subpath flattened to a polygon outline.
    pub fn polygons(&self, steps: usize) -> Vec<Vec<Point>> {
        self.subpaths.iter().map(|sp| sp.flatten(steps)).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.subpaths.iter().all(Subpath::is_closed)
    }

    /// The shape as a tiny-skia path, for rasterizers and mesh builders on
    /// that stack. `None` when the geometry is empty or degenerate.
    pub fn to_tiny_skia_path(&self) -> Option<Path> {
        let mut pb = PathBuilder::new();
        for sp in &self.subpaths {
            for seg in sp.segments() {
                match *seg {
                    Segment::Move { to } => pb.move_to(to.x, to.y),
                    Segment::Line { to } => pb.line_to(to.x, to.y),
                    Segment::Cubic { ctrl1, ctrl2, to } => {
                        pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y)
                    }
                    Segment::Quadratic { ctrl, to } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
                    Segment::Close => pb.close(),
                }
            }
        }
        pb.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Shape {
        let mut sp = Subpath::new(Point::from_xy(0.0, 0.0));
        sp.push(Segment::Line {
            to: Point::from_xy(4.0, 0.0),
        });
        sp.push(Segment::Quadratic {
            ctrl: Point::from_xy(6.0, 2.0),
            to: Point::from_xy(4.0, 4.0),
        });
        sp.push(Segment::Line {
            to: Point::from_xy(0.0, 4.0),
        });
        sp.push(Segment::Line {
            to: Point::from_xy(0.0, 0.0),
        });
        sp.push(Segment::Close);
        Shape {
            source_index: 0,
            element_id: None,
            color: "#000000".into(),
            color_source: ColorSource::Default,
            subpaths: vec![sp],
        }
    }

    #[test]
    fn polygons_sample_curves() {
        let shape = square();
        let polys = shape.polygons(10);
        assert_eq!(polys.len(), 1);
        // start, line end, ten curve samples, two line ends, minus repeated start
        assert_eq!(polys[0].len(), 1 + 1 + 10 + 2 - 1);
        assert!(shape.is_closed());
    }

    #[test]
    fn converts_to_tiny_skia_path() {
        let path = square().to_tiny_skia_path().unwrap();
        let b = path.bounds();
        assert_eq!((b.left(), b.top(), b.right(), b.bottom()), (0.0, 0.0, 6.0, 4.0));
    }

    #[test]
    fn empty_shape_has_no_path() {
        let mut shape = square();
        shape.subpaths.clear();
        assert!(shape.to_tiny_skia_path().is_none());
    }
}
