//! [TrueType](https://developer.apple.com/fonts/TrueType-Reference-Manual) font parser
//!
//! ## Reference Material:
//! * <https://learn.microsoft.com/en-us/typography/opentype/spec/otff>
//! * <https://formats.kaitai.io/ttf/index.html>
//! * <https://handmade.network/forums/articles/t/7330-implementing_a_font_reader_and_rasterizer_from_scratch%252C_part_1__ttf_font_reader>

use std::fmt;

use math::Vec2D;
use thiserror::Error;

use crate::{
    layout::TextLayout,
    path::{Operation, PathReader},
    ttf_tables::{
        cmap::{self, CMap, GlyphID},
        glyf::{self, Glyph},
        head, hhea,
        hmtx::{self, LongHorMetric},
        kern::{self, KernSubtable},
        loca, maxp, name,
        offset::{OffsetTable, Tag},
    },
};

/// Scaler type of fonts with TrueType outlines
const SCALER_TYPE_TRUETYPE: u32 = 0x00010000;

/// Scaler type used by some (old) Apple fonts
const SCALER_TYPE_TRUE: u32 = u32::from_be_bytes(*b"true");

/// Scaler type of OpenType fonts with CFF outlines
const SCALER_TYPE_OPENTYPE: u32 = u32::from_be_bytes(*b"OTTO");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TTFParseError {
    #[error("Unexpected end of font data")]
    OutOfBounds,
    #[error("Offset {0} is outside of the font data")]
    InvalidOffset(usize),
    #[error("Invalid magic number {0:#010x} in head table")]
    BadMagic(u32),
    #[error("Missing required table {0}")]
    MissingTable(Tag),
    #[error("Glyph {0} is malformed")]
    MalformedGlyph(GlyphID),
    #[error("Index {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("Checksum of table {tag} is {computed:#010x}, expected {expected:#010x}")]
    ChecksumMismatch {
        tag: Tag,
        expected: u32,
        computed: u32,
    },
    #[error("Unsupported font format")]
    UnsupportedFormat,
}

/// A TrueType font, backed by the raw font data
pub struct Font<'a> {
    data: &'a [u8],
    offset_table: OffsetTable,
    head_table: head::HeadTable,
    hhea_table: hhea::HHEATable,
    maxp_table: maxp::MaxPTable,
    name_table: name::NameTable,
    hmtx_table: hmtx::HMTXTable,
    glyph_table: glyf::GlyphOutlineTable,
    cmaps: Vec<CMap<'a>>,
    kern_subtables: Vec<KernSubtable>,
}

impl<'a> Font<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, TTFParseError> {
        let offset_table = OffsetTable::new(data)?;
        match offset_table.scaler_type() {
            SCALER_TYPE_TRUETYPE | SCALER_TYPE_TRUE => {},
            SCALER_TYPE_OPENTYPE => {
                log::warn!("Fonts with CFF outlines are not supported");
                return Err(TTFParseError::UnsupportedFormat);
            },
            other => log::warn!("Unknown scaler type {other:#010x}, assuming TrueType outlines"),
        }

        let head_entry = offset_table.require_table(Tag::HEAD)?;
        let head_table = head::HeadTable::new(data, head_entry.offset())?;

        let hhea_entry = offset_table.require_table(Tag::HHEA)?;
        let hhea_table = hhea::HHEATable::new(data, hhea_entry.offset())?;

        let maxp_entry = offset_table.require_table(Tag::MAXP)?;
        let maxp_table = maxp::MaxPTable::new(data, maxp_entry.offset())?;

        let hmtx_entry = offset_table.require_table(Tag::HMTX)?;
        let hmtx_table = hmtx::HMTXTable::new(
            hmtx_entry.offset(),
            hhea_table.num_of_long_hor_metrics,
            maxp_table.num_glyphs(),
        );

        let loca_entry = offset_table.require_table(Tag::LOCA)?;
        let loca_table = loca::LocaTable::new(loca_entry.offset(), head_table.loca_table_format());

        let glyf_entry = offset_table.require_table(Tag::GLYF)?;
        let glyph_table = glyf::GlyphOutlineTable::new(loca_table, glyf_entry);

        let cmap_entry = offset_table.require_table(Tag::CMAP)?;
        let cmaps = cmap::read_cmap_table(data, cmap_entry.offset())?;
        if cmaps.is_empty() {
            log::warn!("Font has no supported character map, every character maps to the replacement glyph");
        }

        let name_entry = offset_table.require_table(Tag::NAME)?;
        let name_table = name::NameTable::new(data, name_entry.offset())?;

        let kern_subtables = match offset_table.get_table(Tag::KERN) {
            Some(kern_entry) => kern::read_kern_table(data, kern_entry.offset())?,
            None => vec![],
        };

        log::info!(
            "Loaded font {:?} ({} tables, {} glyphs)",
            name_table.full_name().unwrap_or("<Unnamed Font>"),
            offset_table.num_tables(),
            maxp_table.num_glyphs()
        );

        Ok(Self {
            data,
            offset_table,
            head_table,
            hhea_table,
            maxp_table,
            name_table,
            hmtx_table,
            glyph_table,
            cmaps,
            kern_subtables,
        })
    }

    /// The raw font data
    #[inline]
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Get the total number of glyphs defined in the font
    #[inline]
    #[must_use]
    pub fn num_glyphs(&self) -> u16 {
        self.maxp_table.num_glyphs()
    }

    /// Get the full name of the font, if specified.
    /// Fonts will usually specify their own name, though it is not required.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name_table.full_name()
    }

    #[inline]
    #[must_use]
    pub fn family_name(&self) -> Option<&str> {
        self.name_table.font_family()
    }

    #[inline]
    #[must_use]
    pub fn sub_family_name(&self) -> Option<&str> {
        self.name_table.font_sub_family()
    }

    #[inline]
    #[must_use]
    pub fn postscript_name(&self) -> Option<&str> {
        self.name_table.postscript_name()
    }

    /// Return the number of coordinate points per font size unit.
    /// This value is used to scale fonts, ie. when you render a font with
    /// size `17px`, one `em` equals `17px`.
    ///
    /// Note that this value does not constrain the size of individual glyphs.
    /// A glyph may have a size larger than `1em`.
    #[inline]
    #[must_use]
    pub fn units_per_em(&self) -> u16 {
        self.head_table.units_per_em()
    }

    /// Distance from the baseline to the highest ascender, in font units
    #[inline]
    #[must_use]
    pub fn ascent(&self) -> i16 {
        self.hhea_table.ascent
    }

    /// Distance from the baseline to the lowest descender, in font units.
    ///
    /// This is usually negative.
    #[inline]
    #[must_use]
    pub fn descent(&self) -> i16 {
        self.hhea_table.descent
    }

    #[inline]
    #[must_use]
    pub fn line_gap(&self) -> i16 {
        self.hhea_table.line_gap
    }

    #[inline]
    #[must_use]
    pub fn head(&self) -> &head::HeadTable {
        &self.head_table
    }

    #[inline]
    #[must_use]
    pub fn hhea(&self) -> &hhea::HHEATable {
        &self.hhea_table
    }

    #[inline]
    #[must_use]
    pub fn offset_table(&self) -> &OffsetTable {
        &self.offset_table
    }

    /// All supported character maps, in the order they appear in the font
    #[inline]
    #[must_use]
    pub fn cmaps(&self) -> &[CMap<'a>] {
        &self.cmaps
    }

    #[inline]
    #[must_use]
    pub fn kern_subtables(&self) -> &[KernSubtable] {
        &self.kern_subtables
    }

    /// Get the Glyph index for a given codepoint
    ///
    /// The first character map that knows the codepoint wins. Unknown codepoints map to
    /// [GlyphID::REPLACEMENT].
    pub fn get_glyph_id(&self, codepoint: u16) -> Result<GlyphID, TTFParseError> {
        for cmap in &self.cmaps {
            let glyph_id = cmap.get_glyph_id(codepoint)?;
            if !glyph_id.is_replacement() {
                return Ok(glyph_id);
            }
        }

        Ok(GlyphID::REPLACEMENT)
    }

    /// Decode the outline of a glyph.
    ///
    /// Returns `None` if the glyph has no outline, like a space.
    pub fn get_glyph(&self, glyph_id: GlyphID) -> Result<Option<Glyph>, TTFParseError> {
        self.check_glyph_id(glyph_id)?;
        self.glyph_table.get_glyph(self.data, glyph_id)
    }

    pub fn horizontal_metrics(&self, glyph_id: GlyphID) -> Result<LongHorMetric, TTFParseError> {
        self.hmtx_table.get_metric_for(self.data, glyph_id)
    }

    /// The path operations for a glyph, in font units
    pub fn glyph_outline(&self, glyph_id: GlyphID) -> Result<Vec<Operation>, TTFParseError> {
        let outline = match self.get_glyph(glyph_id)? {
            Some(glyph) => PathReader::new(&glyph).collect(),
            None => vec![],
        };

        Ok(outline)
    }

    /// Start a new run of text, forgetting the previously kerned glyph
    pub fn reset_kerning(&mut self) {
        for subtable in &mut self.kern_subtables {
            subtable.reset();
        }
    }

    /// Kern `glyph_id` against the previous glyph in the current run.
    ///
    /// The adjustments of all kerning subtables are summed up.
    pub fn next_kerning(&mut self, glyph_id: GlyphID) -> Vec2D<i32> {
        self.kern_subtables
            .iter_mut()
            .fold(Vec2D::default(), |total, subtable| {
                total + subtable.get(glyph_id)
            })
    }

    /// Lay out a line of text, starting with the pen at `position` (in device space).
    ///
    /// Glyphs that cannot be decoded are placed without an outline.
    /// See [the layout module](crate::layout) for the coordinate system.
    pub fn layout_text(&mut self, text: &str, position: Vec2D, font_size: f32) -> TextLayout {
        let mut layout = TextLayout::new(position, self.scale(font_size));

        self.reset_kerning();
        for codepoint in text.encode_utf16() {
            let glyph_id = self.get_glyph_id(codepoint).unwrap_or_else(|error| {
                log::warn!("Failed to map codepoint {codepoint:#x} to a glyph: {error}");
                GlyphID::REPLACEMENT
            });

            let advance_width = self.advance_width_or_zero(glyph_id);
            let kerning = self.next_kerning(glyph_id);
            let outline = self.glyph_outline_or_empty(glyph_id);

            layout.push_glyph(glyph_id, kerning.map(|value| value as f32), outline);
            layout.advance(advance_width as f32);
        }

        layout
    }

    /// Lay out a single glyph by its index, without kerning
    pub fn layout_glyph(&self, glyph_id: GlyphID, position: Vec2D, font_size: f32) -> TextLayout {
        let mut layout = TextLayout::new(position, self.scale(font_size));

        let advance_width = self.advance_width_or_zero(glyph_id);
        layout.push_glyph(glyph_id, Vec2D::default(), self.glyph_outline_or_empty(glyph_id));
        layout.advance(advance_width as f32);

        layout
    }

    /// Check the stored checksum of every table against its contents
    pub fn verify_checksums(&self) -> Result<(), TTFParseError> {
        let mut tables: Vec<_> = self.offset_table.tables().collect();
        tables.sort_by_key(|(tag, _)| *tag);

        for (tag, entry) in tables {
            entry.verify_checksum(self.data, tag)?;
            log::debug!("Checksum of table {tag} is valid");
        }

        Ok(())
    }

    /// Device pixels per font unit at the given font size
    #[must_use]
    pub fn scale(&self, font_size: f32) -> f32 {
        font_size / self.units_per_em().max(1) as f32
    }

    fn check_glyph_id(&self, glyph_id: GlyphID) -> Result<(), TTFParseError> {
        if glyph_id.numeric() >= self.num_glyphs() {
            return Err(TTFParseError::IndexOutOfRange(glyph_id.numeric() as usize));
        }
        Ok(())
    }

    fn advance_width_or_zero(&self, glyph_id: GlyphID) -> u16 {
        self.horizontal_metrics(glyph_id)
            .map(|metrics| metrics.advance_width())
            .unwrap_or_else(|error| {
                log::warn!("No horizontal metrics for glyph {glyph_id}: {error}");
                0
            })
    }

    fn glyph_outline_or_empty(&self, glyph_id: GlyphID) -> Vec<Operation> {
        self.glyph_outline(glyph_id).unwrap_or_else(|error| {
            log::warn!("Failed to decode glyph {glyph_id}, drawing it without an outline: {error}");
            vec![]
        })
    }
}

impl<'a> fmt::Debug for Font<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            write!(f, "{name}")
        } else {
            write!(f, "<Unnamed Font>")
        }
    }
}
