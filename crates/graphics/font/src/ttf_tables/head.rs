//! [Head](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6head.html) table implementation

use math::{Rectangle, Vec2D};

use crate::{
    stream::{FWord, Fixed, LongDateTime, Stream},
    ttf::TTFParseError,
};

/// Every valid `head` table contains this value
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaTableFormat {
    /// Offsets are stored as `u16`s, divided by two
    Short,

    /// Offsets are stored as `u32`s
    Long,
}

#[derive(Clone, Copy, Debug)]
pub struct HeadTable {
    version: Fixed,
    font_revision: Fixed,
    checksum_adjustment: u32,
    flags: u16,
    units_per_em: u16,
    created: LongDateTime,
    modified: LongDateTime,

    /// The smallest box containing every glyph in the font, in `FUnits`
    bounding_box: Rectangle<FWord>,

    mac_style: u16,
    lowest_rec_ppem: u16,
    font_direction_hint: i16,
    loca_table_format: LocaTableFormat,
    glyph_data_format: i16,
}

impl HeadTable {
    pub fn new(data: &[u8], offset: usize) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new_at(data, offset)?;

        let version = stream.read::<Fixed>()?;
        let font_revision = stream.read::<Fixed>()?;
        let checksum_adjustment = stream.read::<u32>()?;

        let magic_number = stream.read::<u32>()?;
        if magic_number != MAGIC_NUMBER {
            return Err(TTFParseError::BadMagic(magic_number));
        }

        let flags = stream.read::<u16>()?;
        let units_per_em = stream.read::<u16>()?;
        let created = stream.read::<LongDateTime>()?;
        let modified = stream.read::<LongDateTime>()?;

        let min_x = stream.read::<FWord>()?;
        let min_y = stream.read::<FWord>()?;
        let max_x = stream.read::<FWord>()?;
        let max_y = stream.read::<FWord>()?;
        let bounding_box = Rectangle::from_corners(Vec2D::new(min_x, min_y), Vec2D::new(max_x, max_y));

        let mac_style = stream.read::<u16>()?;
        let lowest_rec_ppem = stream.read::<u16>()?;
        let font_direction_hint = stream.read::<i16>()?;

        let loca_table_format = if stream.read::<i16>()? == 0 {
            LocaTableFormat::Short
        } else {
            LocaTableFormat::Long
        };

        let glyph_data_format = stream.read::<i16>()?;

        Ok(Self {
            version,
            font_revision,
            checksum_adjustment,
            flags,
            units_per_em,
            created,
            modified,
            bounding_box,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            loca_table_format,
            glyph_data_format,
        })
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> Fixed {
        self.version
    }

    #[inline]
    #[must_use]
    pub fn font_revision(&self) -> Fixed {
        self.font_revision
    }

    #[inline]
    #[must_use]
    pub fn checksum_adjustment(&self) -> u32 {
        self.checksum_adjustment
    }

    #[inline]
    #[must_use]
    pub fn flags(&self) -> u16 {
        self.flags
    }

    #[inline]
    #[must_use]
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    #[inline]
    #[must_use]
    pub fn created(&self) -> LongDateTime {
        self.created
    }

    #[inline]
    #[must_use]
    pub fn modified(&self) -> LongDateTime {
        self.modified
    }

    #[inline]
    #[must_use]
    pub fn bounding_box(&self) -> Rectangle<FWord> {
        self.bounding_box
    }

    #[inline]
    #[must_use]
    pub fn mac_style(&self) -> u16 {
        self.mac_style
    }

    /// Smallest readable size in pixels
    #[inline]
    #[must_use]
    pub fn lowest_rec_ppem(&self) -> u16 {
        self.lowest_rec_ppem
    }

    #[inline]
    #[must_use]
    pub fn font_direction_hint(&self) -> i16 {
        self.font_direction_hint
    }

    /// Get the format of the [Loca Table](super::loca::LocaTable).
    #[inline]
    #[must_use]
    pub fn loca_table_format(&self) -> LocaTableFormat {
        self.loca_table_format
    }

    #[inline]
    #[must_use]
    pub fn glyph_data_format(&self) -> i16 {
        self.glyph_data_format
    }
}
