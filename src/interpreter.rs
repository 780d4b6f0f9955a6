//! Turns tokenized path commands into subpaths.
//!
//! A [`CursorState`] is threaded through each coordinate group: every step
//! takes the previous state by value and returns the next one together with
//! the segment it drew. The [`Emitter`] owns the output and the running bounds
//! for one path element.

use crate::error::PathCommandError;
use crate::geometry::bounds::BoundsAccumulator;
use crate::segment::{Segment, Subpath};
use crate::tokenizer::{CommandKind, PathCommand};
use usvg::tiny_skia_path::Point;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CursorState {
    pub current: Point,
    pub subpath_start: Point,
    /// Trailing control point of the last curve, used by smooth commands.
    pub last_control: Point,
    pub last_kind: Option<CommandKind>,
}

impl Default for CursorState {
    fn default() -> Self {
        let origin = Point::from_xy(0.0, 0.0);
        Self {
            current: origin,
            subpath_start: origin,
            last_control: origin,
            last_kind: None,
        }
    }
}

impl CursorState {
    fn resolve(&self, relative: bool, x: f32, y: f32) -> Point {
        if relative {
            Point::from_xy(self.current.x + x, self.current.y + y)
        } else {
            Point::from_xy(x, y)
        }
    }

    /// Reflection of the last control point about the cursor, or the cursor
    /// itself when the previous command was not of the same curve family.
    fn reflected_control(&self, family_matches: bool) -> Point {
        if family_matches {
            Point::from_xy(
                2.0 * self.current.x - self.last_control.x,
                2.0 * self.current.y - self.last_control.y,
            )
        } else {
            self.current
        }
    }

    fn moved_to(self, to: Point, kind: CommandKind) -> Self {
        Self {
            current: to,
            last_control: to,
            last_kind: Some(kind),
            ..self
        }
    }

    fn curved_to(self, control: Point, to: Point, kind: CommandKind) -> Self {
        Self {
            current: to,
            last_control: control,
            last_kind: Some(kind),
            ..self
        }
    }
}

/// Apply one argument group of `cmd`.
///
/// `first_group` tells `MoveTo` whether this pair opens the subpath or is one
/// of the implicit line-tos that follow it.
pub fn step(
    state: CursorState,
    cmd: &PathCommand,
    group: &[f32],
    first_group: bool,
) -> (CursorState, Segment) {
    let rel = cmd.relative;
    match cmd.kind {
        CommandKind::MoveTo if first_group => {
            let to = state.resolve(rel, group[0], group[1]);
            let next = CursorState {
                subpath_start: to,
                ..state.moved_to(to, CommandKind::MoveTo)
            };
            (next, Segment::Move { to })
        }
        CommandKind::MoveTo | CommandKind::LineTo => {
            let to = state.resolve(rel, group[0], group[1]);
            (state.moved_to(to, CommandKind::LineTo), Segment::Line { to })
        }
        CommandKind::HorizontalLineTo => {
            let x = if rel { state.current.x + group[0] } else { group[0] };
            let to = Point::from_xy(x, state.current.y);
            (state.moved_to(to, cmd.kind), Segment::Line { to })
        }
        CommandKind::VerticalLineTo => {
            let y = if rel { state.current.y + group[0] } else { group[0] };
            let to = Point::from_xy(state.current.x, y);
            (state.moved_to(to, cmd.kind), Segment::Line { to })
        }
        CommandKind::CubicTo => {
            let ctrl1 = state.resolve(rel, group[0], group[1]);
            let ctrl2 = state.resolve(rel, group[2], group[3]);
            let to = state.resolve(rel, group[4], group[5]);
            (
                state.curved_to(ctrl2, to, cmd.kind),
                Segment::Cubic { ctrl1, ctrl2, to },
            )
        }
        CommandKind::SmoothCubicTo => {
            let ctrl1 = state.reflected_control(state.last_kind.is_some_and(|k| k.is_cubic()));
            let ctrl2 = state.resolve(rel, group[0], group[1]);
            let to = state.resolve(rel, group[2], group[3]);
            (
                state.curved_to(ctrl2, to, cmd.kind),
                Segment::Cubic { ctrl1, ctrl2, to },
            )
        }
        CommandKind::QuadraticTo => {
            let ctrl = state.resolve(rel, group[0], group[1]);
            let to = state.resolve(rel, group[2], group[3]);
            (
                state.curved_to(ctrl, to, cmd.kind),
                Segment::Quadratic { ctrl, to },
            )
        }
        CommandKind::SmoothQuadraticTo => {
            let ctrl =
                state.reflected_control(state.last_kind.is_some_and(|k| k.is_quadratic()));
            let to = state.resolve(rel, group[0], group[1]);
            (
                state.curved_to(ctrl, to, cmd.kind),
                Segment::Quadratic { ctrl, to },
            )
        }
        CommandKind::ArcTo => {
            // Chord to the end point; radii, rotation and flags are ignored.
            let to = state.resolve(rel, group[5], group[6]);
            (state.moved_to(to, cmd.kind), Segment::Line { to })
        }
        CommandKind::ClosePath => {
            let to = state.subpath_start;
            (state.moved_to(to, cmd.kind), Segment::Close)
        }
    }
}

/// Collects the segments of one path element and the points they touch.
#[derive(Debug)]
pub struct Emitter {
    subpaths: Vec<Subpath>,
    bounds: BoundsAccumulator,
    samples: usize,
    emitted: usize,
    limit: Option<usize>,
}

impl Emitter {
    pub fn new(samples: usize, limit: Option<usize>) -> Self {
        Self {
            subpaths: Vec::new(),
            bounds: BoundsAccumulator::new(),
            samples,
            emitted: 0,
            limit,
        }
    }

    /// Record `segment`, drawn from `before.current`.
    fn emit(&mut self, before: &CursorState, segment: Segment) -> Result<(), PathCommandError> {
        self.emitted += 1;
        if let Some(limit) = self.limit {
            if self.emitted > limit {
                return Err(PathCommandError::TooManySegments { limit });
            }
        }

        match segment {
            Segment::Move { to } => {
                self.bounds.add(to);
                self.subpaths.push(Subpath::new(to));
                return Ok(());
            }
            Segment::Close => {
                let start = before.subpath_start;
                if before.current != start {
                    self.emit(before, Segment::Line { to: start })?;
                }
                self.open_subpath(start).push(Segment::Close);
                return Ok(());
            }
            _ => {}
        }

        self.bounds.extend(segment.sample(before.current, self.samples));
        self.open_subpath(before.current).push(segment);
        Ok(())
    }

    /// The subpath drawing continues in. Drawing after a close starts a new
    /// subpath at the closed one's start point.
    fn open_subpath(&mut self, at: Point) -> &mut Subpath {
        let needs_new = match self.subpaths.last() {
            None => true,
            Some(sp) => matches!(sp.segments().last(), Some(Segment::Close)),
        };
        if needs_new {
            self.bounds.add(at);
            self.subpaths.push(Subpath::new(at));
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    pub fn finish(self) -> (Vec<Subpath>, BoundsAccumulator) {
        (self.subpaths, self.bounds)
    }
}

/// Interpret a whole command stream for a single path element.
pub fn interpret(
    commands: &[PathCommand],
    emitter: &mut Emitter,
) -> Result<CursorState, PathCommandError> {
    if let Some(first) = commands.first() {
        if first.kind != CommandKind::MoveTo {
            return Err(PathCommandError::MissingMoveTo { found: first.kind });
        }
    }

    let mut state = CursorState::default();
    for cmd in commands {
        cmd.check_arity()?;
        if cmd.kind == CommandKind::ClosePath {
            let (next, segment) = step(state, cmd, &[], true);
            emitter.emit(&state, segment)?;
            state = next;
            continue;
        }
        for (i, group) in cmd.groups().enumerate() {
            let (next, segment) = step(state, cmd, group, i == 0);
            emitter.emit(&state, segment)?;
            state = next;
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn pt(x: f32, y: f32) -> Point {
        Point::from_xy(x, y)
    }

    fn run(d: &str) -> (Vec<Subpath>, BoundsAccumulator) {
        let mut emitter = Emitter::new(16, None);
        interpret(&tokenize(d).unwrap(), &mut emitter).unwrap();
        emitter.finish()
    }

    fn points(subpaths: &[Subpath]) -> Vec<Point> {
        subpaths.iter().flat_map(|sp| sp.flatten(16)).collect()
    }

    fn assert_close(a: &[Point], b: &[Point]) {
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(b) {
            assert!(
                (p.x - q.x).abs() < 1e-4 && (p.y - q.y).abs() < 1e-4,
                "{p:?} != {q:?}"
            );
        }
    }

    #[test]
    fn move_with_extra_pairs_draws_lines() {
        let (subpaths, _) = run("M 0 0 10 0 10 10");
        assert_eq!(subpaths.len(), 1);
        assert_eq!(
            subpaths[0].segments(),
            &[
                Segment::Move { to: pt(0.0, 0.0) },
                Segment::Line { to: pt(10.0, 0.0) },
                Segment::Line { to: pt(10.0, 10.0) },
            ]
        );
    }

    #[test]
    fn horizontal_and_vertical_keep_other_axis() {
        let (subpaths, _) = run("M 2 3 H 8 V 9 h -1 v -2");
        let ends: Vec<_> = subpaths[0].segments().iter().filter_map(Segment::end).collect();
        assert_eq!(
            ends,
            vec![pt(2.0, 3.0), pt(8.0, 3.0), pt(8.0, 9.0), pt(7.0, 9.0), pt(7.0, 7.0)]
        );
    }

    #[test]
    fn relative_matches_absolute() {
        let abs = run("M 10 10 L 20 10 C 25 10 30 15 30 20 Q 30 30 20 30 T 10 20 H 5 V 10 Z");
        let rel = run("m 10 10 l 10 0 c 5 0 10 5 10 10 q 0 10 -10 10 t -10 -10 h -5 v -10 z");
        assert_close(&points(&abs.0), &points(&rel.0));
    }

    #[test]
    fn relative_cubic_groups_chain_from_previous_end() {
        let (subpaths, _) = run("M 0 0 c 1 1 2 1 3 0 1 1 2 1 3 0");
        assert_eq!(
            subpaths[0].segments()[2],
            Segment::Cubic {
                ctrl1: pt(4.0, 1.0),
                ctrl2: pt(5.0, 1.0),
                to: pt(6.0, 0.0),
            }
        );
    }

    #[test]
    fn smooth_cubic_after_line_collapses_handle() {
        let (subpaths, _) = run("M 0 0 L 10 0 S 20 10 30 0");
        match subpaths[0].segments()[2] {
            Segment::Cubic { ctrl1, .. } => assert_eq!(ctrl1, pt(10.0, 0.0)),
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let (subpaths, _) = run("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0");
        match subpaths[0].segments()[2] {
            Segment::Cubic { ctrl1, .. } => assert_eq!(ctrl1, pt(10.0, -10.0)),
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn smooth_quadratic_chain() {
        let (subpaths, _) = run("M 0 0 T 10 0 Q 15 10 20 0 T 30 0");
        let segs = subpaths[0].segments();
        assert_eq!(
            segs[1],
            Segment::Quadratic {
                ctrl: pt(0.0, 0.0),
                to: pt(10.0, 0.0)
            }
        );
        assert_eq!(
            segs[3],
            Segment::Quadratic {
                ctrl: pt(25.0, -10.0),
                to: pt(30.0, 0.0)
            }
        );
    }

    #[test]
    fn smooth_cubic_does_not_reflect_quadratic_control() {
        let (subpaths, _) = run("M 0 0 Q 5 5 10 0 S 15 5 20 0");
        match subpaths[0].segments()[2] {
            Segment::Cubic { ctrl1, .. } => assert_eq!(ctrl1, pt(10.0, 0.0)),
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn arc_is_a_chord() {
        let (subpaths, bounds) = run("M 0 0 A 5 5 0 0 1 10 0 a 5 5 0 1 0 0 10");
        let segs = subpaths[0].segments();
        assert_eq!(segs[1], Segment::Line { to: pt(10.0, 0.0) });
        assert_eq!(segs[2], Segment::Line { to: pt(10.0, 10.0) });
        assert_eq!(bounds.current().unwrap().to_ltrb(), [0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn close_adds_line_back_to_start() {
        let (subpaths, _) = run("M 0 0 L 5 0 L 5 5 Z");
        let segs = subpaths[0].segments();
        assert_eq!(segs[3], Segment::Line { to: pt(0.0, 0.0) });
        assert_eq!(segs[4], Segment::Close);
        assert!(subpaths[0].is_closed());
    }

    #[test]
    fn close_at_start_adds_no_line() {
        let (subpaths, _) = run("M 0 0 L 5 0 L 0 0 Z");
        assert_eq!(subpaths[0].segments().len(), 4);
    }

    #[test]
    fn relative_move_after_close_uses_subpath_start() {
        let (subpaths, _) = run("M 10 10 l 5 0 l 0 5 z m 1 1 l 1 0");
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[1].start(), pt(11.0, 11.0));
    }

    #[test]
    fn drawing_after_close_opens_new_subpath() {
        let (subpaths, _) = run("M 0 0 L 4 0 L 4 4 Z L 0 8");
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[1].start(), pt(0.0, 0.0));
        assert!(!subpaths[1].is_closed());
    }

    #[test]
    fn curve_bounds_include_bulge() {
        let (_, bounds) = run("M 0 0 Q 5 10 10 0");
        let b = bounds.current().unwrap();
        assert!((b.max_y() - 5.0).abs() < 1e-4);
        assert_eq!(b.max_x(), 10.0);
    }

    #[test]
    fn first_command_must_move() {
        let mut emitter = Emitter::new(16, None);
        let err = interpret(&tokenize("L 0 0 10 10").unwrap(), &mut emitter).unwrap_err();
        assert_eq!(
            err,
            PathCommandError::MissingMoveTo {
                found: CommandKind::LineTo
            }
        );
    }

    #[test]
    fn wrong_arity_fails() {
        let mut emitter = Emitter::new(16, None);
        let err = interpret(&tokenize("M 0 0 C 1 2 3").unwrap(), &mut emitter).unwrap_err();
        assert!(matches!(err, PathCommandError::BadArity { .. }));
    }

    #[test]
    fn segment_limit() {
        let mut emitter = Emitter::new(16, Some(3));
        let err = interpret(&tokenize("M 0 0 1 0 2 0 3 0 4 0").unwrap(), &mut emitter).unwrap_err();
        assert_eq!(err, PathCommandError::TooManySegments { limit: 3 });
    }

    #[test]
    fn state_is_threaded_by_value() {
        let cmd = &tokenize("l 3 4").unwrap()[0];
        let before = CursorState::default();
        let (after, seg) = step(before, cmd, &cmd.args, true);
        assert_eq!(before.current, pt(0.0, 0.0));
        assert_eq!(after.current, pt(3.0, 4.0));
        assert_eq!(seg, Segment::Line { to: pt(3.0, 4.0) });
    }
}
