//! [Glyph](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6glyf.html) table implementation
//!
//! Glyphs are decoded from the font data on every lookup, nothing is cached.
//! Compound glyphs are flattened: the points and contours of every component are
//! transformed and appended to the compound glyph, so callers never need to
//! distinguish between the two kinds.

use std::{fmt, iter};

use math::{AffineTransform, Rectangle, Vec2D};

use super::{cmap::GlyphID, loca::LocaTable, offset::TableEntry};
use crate::{
    stream::{F2Dot14, FWord, Stream},
    ttf::TTFParseError,
};

/// The maximum nesting depth of compound glyphs.
///
/// Deeper nesting is treated as a cycle between components.
pub const MAX_COMPONENT_DEPTH: usize = 16;

#[derive(Clone, Copy, Debug)]
pub struct GlyphOutlineTable {
    loca_table: LocaTable,
    glyf_entry: TableEntry,
}

impl GlyphOutlineTable {
    #[must_use]
    pub fn new(loca_table: LocaTable, glyf_entry: TableEntry) -> Self {
        Self {
            loca_table,
            glyf_entry,
        }
    }

    /// Decode the outline of a glyph.
    ///
    /// Returns `None` if the glyph has no outline or the `loca` table points
    /// outside of the `glyf` table.
    pub fn get_glyph(&self, data: &[u8], glyph_id: GlyphID) -> Result<Option<Glyph>, TTFParseError> {
        self.read_glyph(data, glyph_id, 0)
    }

    fn read_glyph(
        &self,
        data: &[u8],
        glyph_id: GlyphID,
        depth: usize,
    ) -> Result<Option<Glyph>, TTFParseError> {
        if depth > MAX_COMPONENT_DEPTH {
            log::warn!("Compound glyphs are nested too deeply, giving up at glyph {glyph_id}");
            return Err(TTFParseError::MalformedGlyph(glyph_id));
        }

        let Some(location) = self.loca_table.get_glyph_location(data, glyph_id)? else {
            return Ok(None);
        };

        let offset = self.glyf_entry.offset() + location.offset as usize;
        if !self.glyf_entry.contains(offset) {
            log::debug!("Glyph {glyph_id} starts outside of the glyf table, ignoring it");
            return Ok(None);
        }

        // Memory map is like this (same for simple & compound glyphs):
        // num contours          : i16
        // min x                 : i16
        // min y                 : i16
        // max x                 : i16
        // max y                 : i16
        let mut stream = Stream::new_at(data, offset)?;
        let number_of_contours = stream.read::<i16>()?;
        if number_of_contours < -1 {
            return Err(TTFParseError::MalformedGlyph(glyph_id));
        }

        let min_x = stream.read::<FWord>()?;
        let min_y = stream.read::<FWord>()?;
        let max_x = stream.read::<FWord>()?;
        let max_y = stream.read::<FWord>()?;

        let mut glyph = Glyph {
            number_of_contours,
            metrics: Rectangle::from_corners(Vec2D::new(min_x, min_y), Vec2D::new(max_x, max_y)),
            contour_ends: vec![],
            points: vec![],
        };

        if number_of_contours == -1 {
            self.read_compound_glyph(data, &mut stream, &mut glyph, glyph_id, depth)?;
        } else {
            read_simple_glyph(&mut stream, &mut glyph, glyph_id)?;
        }

        Ok(Some(glyph))
    }

    fn read_compound_glyph(
        &self,
        data: &[u8],
        stream: &mut Stream<'_>,
        glyph: &mut Glyph,
        glyph_id: GlyphID,
        depth: usize,
    ) -> Result<(), TTFParseError> {
        // Memory map for compound glyphs looks like this:
        //
        // component flag: u16                       \
        // glyph index: u16                           |
        // X offset, type depends on component flags  | Repeated any number
        // Y offset, type depends on component flags  | of times
        // Transformation options                    /
        let last_flag = loop {
            let component = CompoundGlyphComponent::read(stream)?;
            log::debug!(
                "Component glyph {} with transform {:?}",
                component.glyph_id,
                component.transform
            );

            if let Some(referenced_glyph) = self.read_glyph(data, component.glyph_id, depth + 1)? {
                glyph.append_component(&referenced_glyph, component.transform);
            }

            if component.flag.is_last_component() {
                break component.flag;
            }
        };

        if last_flag.has_instructions() {
            let instruction_length = stream.read::<u16>()?;
            stream.skip_bytes(instruction_length as usize)?;
        }

        glyph.number_of_contours = glyph
            .contour_ends
            .len()
            .try_into()
            .map_err(|_| TTFParseError::MalformedGlyph(glyph_id))?;
        Ok(())
    }
}

fn read_simple_glyph(
    stream: &mut Stream<'_>,
    glyph: &mut Glyph,
    glyph_id: GlyphID,
) -> Result<(), TTFParseError> {
    // Simple glyphs are structured as follows:
    //
    // end points of contours: [u16; num contours]
    // instruction length    : u16
    // instructions          : [u8; instruction length]
    // flags                 : [u8; unknown]
    // x coords              : [u8 or i16; last value in "end points of contours" + 1]
    // y coords              : [u8 or i16; last value in "end points of contours" + 1]
    for _ in 0..glyph.number_of_contours {
        let contour_end = stream.read::<u16>()? as usize;

        if glyph
            .contour_ends
            .last()
            .is_some_and(|&previous| contour_end <= previous)
        {
            log::warn!("Contours of glyph {glyph_id} are not in increasing order");
            return Err(TTFParseError::MalformedGlyph(glyph_id));
        }
        glyph.contour_ends.push(contour_end);
    }

    let instruction_length = stream.read::<u16>()?;
    stream.skip_bytes(instruction_length as usize)?;

    let Some(&last_contour_end) = glyph.contour_ends.last() else {
        return Ok(());
    };
    let num_points = last_contour_end + 1;

    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = GlyphFlag(stream.read::<u8>()?);
        flags.push(flag);

        if flag.repeat() {
            // The number of additional times the flag should be used
            let repeat_for = stream.read::<u8>()?;
            flags.extend(iter::repeat(flag).take(repeat_for as usize));
        }
    }

    if flags.len() != num_points {
        log::warn!("Flags of glyph {glyph_id} repeat past the last point");
        return Err(TTFParseError::MalformedGlyph(glyph_id));
    }

    let x_coordinates = read_coordinates(stream, &flags, GlyphFlag::coordinate_type_x)?;
    let y_coordinates = read_coordinates(stream, &flags, GlyphFlag::coordinate_type_y)?;

    glyph.points = flags
        .iter()
        .zip(x_coordinates.into_iter().zip(y_coordinates))
        .map(|(flag, (x, y))| GlyphPoint {
            coordinates: Vec2D::new(x as f32, y as f32),
            is_on_curve: flag.is_on_curve(),
        })
        .collect();

    Ok(())
}

/// Read the (delta encoded) coordinates of all points along one axis
fn read_coordinates<F>(
    stream: &mut Stream<'_>,
    flags: &[GlyphFlag],
    coordinate_type: F,
) -> Result<Vec<i32>, TTFParseError>
where
    F: Fn(&GlyphFlag) -> GlyphCoordinateType,
{
    let mut value: i32 = 0;
    let mut coordinates = Vec::with_capacity(flags.len());

    for flag in flags {
        let delta = match coordinate_type(flag) {
            GlyphCoordinateType::Word => stream.read::<i16>()? as i32,
            GlyphCoordinateType::Same => 0,
            GlyphCoordinateType::NegativeByte => -(stream.read::<u8>()? as i32),
            GlyphCoordinateType::PositiveByte => stream.read::<u8>()? as i32,
        };

        value += delta;
        coordinates.push(value);
    }

    Ok(coordinates)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    number_of_contours: i16,
    metrics: Rectangle<FWord>,
    contour_ends: Vec<usize>,
    points: Vec<GlyphPoint>,
}

impl Glyph {
    /// The number of contours in the glyph.
    ///
    /// For compound glyphs this is the total number of contours of all components.
    #[inline]
    #[must_use]
    pub fn number_of_contours(&self) -> i16 {
        self.number_of_contours
    }

    /// The bounding box of the glyph, as stored in the font
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> Rectangle<FWord> {
        self.metrics
    }

    /// Indices of the last point of every contour
    #[inline]
    #[must_use]
    pub fn contour_ends(&self) -> &[usize] {
        &self.contour_ends
    }

    #[inline]
    #[must_use]
    pub fn points(&self) -> &[GlyphPoint] {
        &self.points
    }

    /// Iterate over the points of each contour
    pub fn contours(&self) -> impl Iterator<Item = &[GlyphPoint]> + '_ {
        let starts = iter::once(0).chain(self.contour_ends.iter().map(|end| end + 1));

        starts
            .zip(self.contour_ends.iter())
            .filter_map(|(start, &end)| self.points.get(start..=end))
    }

    fn append_component(&mut self, component: &Self, transform: AffineTransform) {
        let point_offset = self.points.len();

        self.contour_ends
            .extend(component.contour_ends.iter().map(|end| end + point_offset));
        self.points
            .extend(component.points.iter().map(|point| GlyphPoint {
                coordinates: transform.apply(point.coordinates),
                is_on_curve: point.is_on_curve,
            }));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPoint {
    /// The position of the point in font design units
    pub coordinates: Vec2D<f32>,
    pub is_on_curve: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct GlyphFlag(u8);

impl GlyphFlag {
    const POINT_ON_CURVE: u8 = 1;
    const X_SHORT_VECTOR: u8 = 2;
    const Y_SHORT_VECTOR: u8 = 4;
    const REPEAT: u8 = 8;
    const X_IS_SAME_OR_POSITIVE: u8 = 16;
    const Y_IS_SAME_OR_POSITIVE: u8 = 32;

    pub fn is_on_curve(&self) -> bool {
        self.0 & Self::POINT_ON_CURVE != 0
    }

    pub fn repeat(&self) -> bool {
        self.0 & Self::REPEAT != 0
    }

    pub fn coordinate_type_x(&self) -> GlyphCoordinateType {
        GlyphCoordinateType::new(
            self.0 & Self::X_SHORT_VECTOR != 0,
            self.0 & Self::X_IS_SAME_OR_POSITIVE != 0,
        )
    }

    pub fn coordinate_type_y(&self) -> GlyphCoordinateType {
        GlyphCoordinateType::new(
            self.0 & Self::Y_SHORT_VECTOR != 0,
            self.0 & Self::Y_IS_SAME_OR_POSITIVE != 0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphCoordinateType {
    /// The delta is a signed 16 bit value
    Word,
    /// The coordinate has the same value as the previous one.
    Same,
    /// The delta is an 8 bit value and negative
    NegativeByte,
    /// The delta is an 8 bit value and positive
    PositiveByte,
}

impl GlyphCoordinateType {
    /// The "short vector" bit chooses between one and two byte deltas,
    /// the "same or positive" bit is reused as the sign for one byte deltas
    fn new(is_short: bool, is_same_or_positive: bool) -> Self {
        match (is_short, is_same_or_positive) {
            (false, false) => Self::Word,
            (false, true) => Self::Same,
            (true, false) => Self::NegativeByte,
            (true, true) => Self::PositiveByte,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CompoundGlyphFlag(u16);

impl CompoundGlyphFlag {
    const ARG_1_AND_2_ARE_WORDS: u16 = 1 << 0;
    const ARGS_ARE_XY_VALUES: u16 = 1 << 1;
    const ROUND_XY_TO_GRID: u16 = 1 << 2;
    const WE_HAVE_A_SCALE: u16 = 1 << 3;
    const MORE_COMPONENTS: u16 = 1 << 5;
    const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 1 << 6;
    const WE_HAVE_A_TWO_BY_TWO: u16 = 1 << 7;
    const WE_HAVE_INSTRUCTIONS: u16 = 1 << 8;
    const USE_MY_METRICS: u16 = 1 << 9;
    const OVERLAP_COMPOUND: u16 = 1 << 10;

    pub fn arg_1_and_2_are_words(&self) -> bool {
        self.0 & Self::ARG_1_AND_2_ARE_WORDS != 0
    }

    pub fn args_are_xy_values(&self) -> bool {
        self.0 & Self::ARGS_ARE_XY_VALUES != 0
    }

    pub fn round_xy_to_grid(&self) -> bool {
        self.0 & Self::ROUND_XY_TO_GRID != 0
    }

    pub fn has_scale(&self) -> bool {
        self.0 & Self::WE_HAVE_A_SCALE != 0
    }

    pub fn is_last_component(&self) -> bool {
        self.0 & Self::MORE_COMPONENTS == 0
    }

    pub fn has_xy_scale(&self) -> bool {
        self.0 & Self::WE_HAVE_AN_X_AND_Y_SCALE != 0
    }

    pub fn has_two_by_two(&self) -> bool {
        self.0 & Self::WE_HAVE_A_TWO_BY_TWO != 0
    }

    pub fn has_instructions(&self) -> bool {
        self.0 & Self::WE_HAVE_INSTRUCTIONS != 0
    }

    pub fn use_my_metrics(&self) -> bool {
        self.0 & Self::USE_MY_METRICS != 0
    }

    pub fn overlap_compound(&self) -> bool {
        self.0 & Self::OVERLAP_COMPOUND != 0
    }
}

impl fmt::Debug for CompoundGlyphFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compound Glyph Flag")
            .field("arg 1 and 2 are words", &self.arg_1_and_2_are_words())
            .field("args are xy values", &self.args_are_xy_values())
            .field("round xy to grid", &self.round_xy_to_grid())
            .field("has scale", &self.has_scale())
            .field("is last component", &self.is_last_component())
            .field("has xy scale", &self.has_xy_scale())
            .field("has two by two", &self.has_two_by_two())
            .field("has instructions", &self.has_instructions())
            .field("use my metrics", &self.use_my_metrics())
            .field("overlap compound", &self.overlap_compound())
            .finish()
    }
}

/// A reference from a compound glyph to one of its parts
#[derive(Clone, Copy, Debug)]
pub struct CompoundGlyphComponent {
    pub flag: CompoundGlyphFlag,
    pub glyph_id: GlyphID,
    pub transform: AffineTransform,

    /// Point in the compound glyph that should be aligned with `source_point`.
    ///
    /// Only meaningful if the arguments are not xy values. Point matching is not
    /// supported, such components are placed without an offset.
    pub destination_point: u16,

    /// Point in the component glyph that should be aligned with `destination_point`
    pub source_point: u16,
}

impl CompoundGlyphComponent {
    fn read(stream: &mut Stream<'_>) -> Result<Self, TTFParseError> {
        let flag = CompoundGlyphFlag(stream.read::<u16>()?);
        let glyph_id = GlyphID::new(stream.read::<u16>()?);

        let mut transform = AffineTransform::IDENTITY;
        let mut destination_point = 0;
        let mut source_point = 0;

        match (flag.arg_1_and_2_are_words(), flag.args_are_xy_values()) {
            (true, true) => {
                transform.e = stream.read::<i16>()? as f32;
                transform.f = stream.read::<i16>()? as f32;
            },
            (false, true) => {
                transform.e = stream.read::<u8>()? as f32;
                transform.f = stream.read::<u8>()? as f32;
            },
            (true, false) => {
                destination_point = stream.read::<u16>()?;
                source_point = stream.read::<u16>()?;
            },
            (false, false) => {
                destination_point = stream.read::<u8>()? as u16;
                source_point = stream.read::<u8>()? as u16;
            },
        }

        if !flag.args_are_xy_values() {
            log::debug!(
                "Component glyph {glyph_id} uses point matching ({destination_point} <- {source_point}), which is not supported"
            );
        }

        if flag.has_scale() {
            let scale = stream.read::<F2Dot14>()?.to_f32();
            transform.a = scale;
            transform.d = scale;
        } else if flag.has_xy_scale() {
            transform.a = stream.read::<F2Dot14>()?.to_f32();
            transform.d = stream.read::<F2Dot14>()?.to_f32();
        } else if flag.has_two_by_two() {
            transform.a = stream.read::<F2Dot14>()?.to_f32();
            transform.b = stream.read::<F2Dot14>()?.to_f32();
            transform.c = stream.read::<F2Dot14>()?.to_f32();
            transform.d = stream.read::<F2Dot14>()?.to_f32();
        }

        Ok(Self {
            flag,
            glyph_id,
            transform,
            destination_point,
            source_point,
        })
    }
}
