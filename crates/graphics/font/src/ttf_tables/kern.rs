//! [Kern](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kern.html) table implementation
//!
//! Only the (windows-style) version 0 table header and format 0 subtables are supported.

use std::collections::HashMap;

use math::Vec2D;

use crate::{
    stream::{FWord, Stream},
    ttf::TTFParseError,
};

use super::cmap::GlyphID;

#[derive(Clone, Copy, Debug)]
struct Coverage(u16);

impl Coverage {
    const HORIZONTAL: u16 = 1 << 0;
    const CROSS_STREAM: u16 = 1 << 2;

    fn is_vertical(&self) -> bool {
        self.0 & Self::HORIZONTAL == 0
    }

    fn is_cross_stream(&self) -> bool {
        self.0 & Self::CROSS_STREAM != 0
    }

    fn format(&self) -> u8 {
        (self.0 >> 8) as u8
    }
}

/// Read all format 0 subtables from the `kern` table at `offset`
pub fn read_kern_table(data: &[u8], offset: usize) -> Result<Vec<KernSubtable>, TTFParseError> {
    let mut stream = Stream::new_at(data, offset)?;

    let version = stream.read::<u16>()?;
    let num_subtables = stream.read::<u16>()?;
    log::debug!("Kern table version {version} with {num_subtables} subtables");

    let mut subtables = Vec::with_capacity(num_subtables as usize);
    for _ in 0..num_subtables {
        let subtable_start = stream.tell();
        let _version = stream.read::<u16>()?;
        let length = stream.read::<u16>()? as usize;
        let coverage = Coverage(stream.read::<u16>()?);

        if coverage.format() == 0 {
            subtables.push(KernSubtable::new(&mut stream, coverage)?);
        } else {
            log::debug!(
                "Skipping kern subtable with unsupported format {}",
                coverage.format()
            );
            stream.seek(subtable_start + length)?;
        }
    }

    Ok(subtables)
}

/// Pairwise kerning adjustments from a format 0 subtable.
///
/// Lookups are stateful: every call to [get](Self::get) kerns the given glyph against
/// the glyph from the previous call. Call [reset](Self::reset) before each run of text.
#[derive(Clone, Debug)]
pub struct KernSubtable {
    /// Maps `(left << 16) | right` to an adjustment
    pairs: HashMap<u32, FWord>,

    /// Whether the adjustments apply to the y axis instead of the x axis
    swap: bool,

    previous_glyph: Option<GlyphID>,
}

impl KernSubtable {
    fn new(stream: &mut Stream<'_>, coverage: Coverage) -> Result<Self, TTFParseError> {
        let num_pairs = stream.read::<u16>()?;
        let _search_range = stream.read::<u16>()?;
        let _entry_selector = stream.read::<u16>()?;
        let _range_shift = stream.read::<u16>()?;

        let mut pairs = HashMap::with_capacity(num_pairs as usize);
        for _ in 0..num_pairs {
            let left = stream.read::<u16>()?;
            let right = stream.read::<u16>()?;
            let value = stream.read::<FWord>()?;
            pairs.insert(pair_key(GlyphID::new(left), GlyphID::new(right)), value);
        }

        Ok(Self::from_pairs(
            pairs,
            coverage.is_vertical() != coverage.is_cross_stream(),
        ))
    }

    #[must_use]
    pub fn from_pairs(pairs: HashMap<u32, FWord>, swap: bool) -> Self {
        Self {
            pairs,
            swap,
            previous_glyph: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_swapped(&self) -> bool {
        self.swap
    }

    #[inline]
    #[must_use]
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }

    /// Forget the previous glyph, so the next lookup starts a new run
    pub fn reset(&mut self) {
        self.previous_glyph = None;
    }

    /// Kern `glyph_id` against the previously seen glyph
    pub fn get(&mut self, glyph_id: GlyphID) -> Vec2D<i32> {
        let adjustment = self
            .previous_glyph
            .and_then(|previous| self.pairs.get(&pair_key(previous, glyph_id)).copied())
            .unwrap_or_default() as i32;

        self.previous_glyph = Some(glyph_id);

        if self.swap {
            Vec2D::new(0, adjustment)
        } else {
            Vec2D::new(adjustment, 0)
        }
    }
}

/// Packs a pair of glyphs into the key used by [KernSubtable]
#[inline]
#[must_use]
pub fn pair_key(left: GlyphID, right: GlyphID) -> u32 {
    ((left.numeric() as u32) << 16) | right.numeric() as u32
}
