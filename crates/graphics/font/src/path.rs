//! Turns the points of a glyph into drawing operations.

use math::Vec2D;

use crate::ttf_tables::glyf::{Glyph, GlyphPoint};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operation {
    MoveTo(Vec2D),
    LineTo(Vec2D),

    /// A quadratic bezier curve with a control point and an end point
    QuadBezTo(Vec2D, Vec2D),
}

impl Operation {
    /// Apply a function to every point in the operation
    #[must_use]
    pub fn map<F: Fn(Vec2D) -> Vec2D>(self, f: F) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(f(p)),
            Self::LineTo(p) => Self::LineTo(f(p)),
            Self::QuadBezTo(p1, p2) => Self::QuadBezTo(f(p1), f(p2)),
        }
    }
}

/// Something that can draw paths, like a rasterizer or an svg writer
pub trait PathConsumer {
    fn move_to(&mut self, p: Vec2D);
    fn line_to(&mut self, p: Vec2D);
    fn quad_bez_to(&mut self, p1: Vec2D, p2: Vec2D);

    fn consume(&mut self, operation: Operation) {
        match operation {
            Operation::MoveTo(p) => self.move_to(p),
            Operation::LineTo(p) => self.line_to(p),
            Operation::QuadBezTo(p1, p2) => self.quad_bez_to(p1, p2),
        }
    }
}

/// Iterates over the path operations of a glyph, one contour after another.
///
/// Every contour starts with a [Operation::MoveTo]. Contours are not explicitly closed
/// with a line back to their first point, but a pending curve at the end of a contour is
/// finished by curving back to the start.
#[derive(Clone, Debug)]
pub struct PathReader<'a> {
    contours: Vec<&'a [GlyphPoint]>,
    current_contour: Option<ContourReader<'a>>,
}

impl<'a> PathReader<'a> {
    #[must_use]
    pub fn new(glyph: &'a Glyph) -> Self {
        let mut contours: Vec<&'a [GlyphPoint]> = glyph.contours().collect();
        contours.reverse();

        Self {
            contours,
            current_contour: None,
        }
    }
}

impl<'a> Iterator for PathReader<'a> {
    type Item = Operation;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(operation) = self.current_contour.as_mut().and_then(Iterator::next) {
                return Some(operation);
            }

            // The current contour is exhausted, move on to the next one
            let points = self.contours.pop()?;
            self.current_contour = Some(ContourReader::new(points));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContourState {
    /// Nothing was emitted yet
    Start,

    /// Consuming the points of the contour
    Points,

    /// All points were consumed, the contour might still have to be closed
    End,
}

#[derive(Clone, Debug)]
struct ContourReader<'a> {
    points: &'a [GlyphPoint],
    next_index: usize,
    state: ContourState,

    /// The control point of a quadratic curve that still needs an end point
    pending_control_point: Option<Vec2D>,
}

impl<'a> ContourReader<'a> {
    fn new(points: &'a [GlyphPoint]) -> Self {
        Self {
            points,
            next_index: 0,
            state: ContourState::Start,
            pending_control_point: None,
        }
    }

    fn visit(&mut self, point: GlyphPoint) -> Option<Operation> {
        match (self.pending_control_point, point.is_on_curve) {
            (None, true) => Some(Operation::LineTo(point.coordinates)),
            (None, false) => {
                self.pending_control_point = Some(point.coordinates);
                None
            },
            (Some(control_point), true) => {
                self.pending_control_point = None;
                Some(Operation::QuadBezTo(control_point, point.coordinates))
            },
            (Some(control_point), false) => {
                // Two consecutive off-curve points imply an on-curve point halfway between them
                self.pending_control_point = Some(point.coordinates);
                Some(Operation::QuadBezTo(
                    control_point,
                    control_point.midpoint(point.coordinates),
                ))
            },
        }
    }
}

impl<'a> Iterator for ContourReader<'a> {
    type Item = Operation;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                ContourState::Start => {
                    let first_point = self.points.first()?;
                    self.next_index = 1;
                    self.state = ContourState::Points;
                    return Some(Operation::MoveTo(first_point.coordinates));
                },
                ContourState::Points => {
                    let Some(&point) = self.points.get(self.next_index) else {
                        self.state = ContourState::End;
                        continue;
                    };
                    self.next_index += 1;

                    if let Some(operation) = self.visit(point) {
                        return Some(operation);
                    }
                },
                ContourState::End => {
                    let control_point = self.pending_control_point.take()?;
                    let first_point = self.points.first()?;

                    let end_point = if first_point.is_on_curve {
                        first_point.coordinates
                    } else {
                        control_point.midpoint(first_point.coordinates)
                    };

                    return Some(Operation::QuadBezTo(control_point, end_point));
                },
            }
        }
    }
}
