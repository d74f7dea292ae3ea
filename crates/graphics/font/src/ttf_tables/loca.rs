//! [Loca](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6loca.html) table implementation.

use crate::{stream::Stream, ttf::TTFParseError};

use super::{cmap::GlyphID, head::LocaTableFormat};

#[derive(Clone, Copy, Debug)]
pub struct LocaTable {
    offset: usize,
    format: LocaTableFormat,
}

/// Where the outline of a glyph is stored, relative to the start of the `glyf` table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphLocation {
    pub offset: u32,
    pub length: u32,
}

impl LocaTable {
    #[must_use]
    pub fn new(offset: usize, format: LocaTableFormat) -> Self {
        Self { offset, format }
    }

    /// Returns `None` if the glyph has no outline (for example a space)
    pub fn get_glyph_location(
        &self,
        data: &[u8],
        glyph_id: GlyphID,
    ) -> Result<Option<GlyphLocation>, TTFParseError> {
        let index = glyph_id.numeric() as usize;

        let (offset, offset_of_next_glyph) = match self.format {
            LocaTableFormat::Short => {
                // Indexing is done in words
                // Also, the offset / 2 is stored (don't ask me why)
                let mut stream = Stream::new_at(data, self.offset + index * 2)?;
                let offset = stream.read::<u16>()? as u32 * 2;
                let next = stream.read::<u16>()? as u32 * 2;
                (offset, next)
            },
            LocaTableFormat::Long => {
                let mut stream = Stream::new_at(data, self.offset + index * 4)?;
                (stream.read::<u32>()?, stream.read::<u32>()?)
            },
        };

        if offset == offset_of_next_glyph {
            return Ok(None);
        }

        Ok(Some(GlyphLocation {
            offset,
            length: offset_of_next_glyph.saturating_sub(offset),
        }))
    }
}
