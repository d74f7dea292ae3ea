//! Positioned glyphs, ready to be drawn.
//!
//! ## Coordinate spaces
//! Glyph outlines are stored in font design units, where the y axis points up.
//! Device space (pixels) has its y axis pointing down. A point `p` of a glyph drawn at
//! `position` ends up at
//!
//! ```text
//! device = position + (p.x * scale, -p.y * scale)
//! ```
//!
//! where `scale = font_size / units_per_em`. Draw positions and the pen are in device space,
//! the pen sits on the baseline.

use math::{AffineTransform, Rectangle, Vec2D};

use crate::{
    path::{Operation, PathConsumer},
    ttf_tables::cmap::GlyphID,
};

/// A single glyph placed on the baseline
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutGlyph {
    pub glyph_id: GlyphID,

    /// Where the glyph origin is drawn, in device space
    pub position: Vec2D,

    /// The glyph outline in font design units
    pub outline: Vec<Operation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    glyphs: Vec<LayoutGlyph>,
    pen: Vec2D,
    scale: f32,
}

impl TextLayout {
    #[must_use]
    pub(crate) fn new(start: Vec2D, scale: f32) -> Self {
        Self {
            glyphs: vec![],
            pen: start,
            scale,
        }
    }

    /// Place a glyph at the pen, shifted by `offset` (in font units, y pointing up)
    pub(crate) fn push_glyph(&mut self, glyph_id: GlyphID, offset: Vec2D, outline: Vec<Operation>) {
        let position = self.pen + Vec2D::new(offset.x * self.scale, -offset.y * self.scale);

        log::trace!("Placing glyph {glyph_id} at {position:?}");

        self.glyphs.push(LayoutGlyph {
            glyph_id,
            position,
            outline,
        });
    }

    /// Move the pen along the baseline by `advance` font units
    pub(crate) fn advance(&mut self, advance: f32) {
        self.pen.x += advance * self.scale;
    }

    #[inline]
    #[must_use]
    pub fn glyphs(&self) -> &[LayoutGlyph] {
        &self.glyphs
    }

    /// The position of the pen after the last glyph, in device space
    #[inline]
    #[must_use]
    pub fn pen(&self) -> Vec2D {
        self.pen
    }

    /// Device pixels per font design unit
    #[inline]
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The transform from a glyph's design space into device space
    #[must_use]
    pub fn glyph_transform(&self, glyph: &LayoutGlyph) -> AffineTransform {
        AffineTransform {
            e: glyph.position.x,
            f: glyph.position.y,
            ..AffineTransform::scale(self.scale, -self.scale)
        }
    }

    /// The device space outline of a glyph
    pub fn device_outline<'a>(
        &'a self,
        glyph: &'a LayoutGlyph,
    ) -> impl Iterator<Item = Operation> + 'a {
        let transform = self.glyph_transform(glyph);
        glyph
            .outline
            .iter()
            .map(move |operation| operation.map(|point| transform.apply(point)))
    }

    /// Draw every glyph, in device space
    pub fn render<P: PathConsumer>(&self, consumer: &mut P) {
        for glyph in &self.glyphs {
            for operation in self.device_outline(glyph) {
                consumer.consume(operation);
            }
        }
    }

    /// The smallest rectangle (in device space) containing all points of all glyphs,
    /// including control points.
    ///
    /// Returns `None` if no glyph has an outline.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rectangle> {
        let mut points = self
            .glyphs
            .iter()
            .flat_map(|glyph| self.device_outline(glyph))
            .flat_map(|operation| match operation {
                Operation::MoveTo(p) | Operation::LineTo(p) => [Some(p), None],
                Operation::QuadBezTo(p1, p2) => [Some(p1), Some(p2)],
            })
            .flatten();

        let first = points.next()?;
        let mut bounding_box = Rectangle::from_corners(first, first);
        for point in points {
            bounding_box.grow_to_contain_point(point);
        }

        Some(bounding_box)
    }
}
