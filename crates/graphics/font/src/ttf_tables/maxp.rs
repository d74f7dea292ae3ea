//! [MaxP](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6maxp.html) table implementation.

use crate::{stream::Stream, ttf::TTFParseError};

#[derive(Clone, Copy, Debug)]
pub struct MaxPTable {
    /// Number of glyphs defined in the font
    num_glyphs: u16,
}

impl MaxPTable {
    pub fn new(data: &[u8], offset: usize) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new_at(data, offset)?;

        // The version decides which of the remaining (hinting related) fields
        // are present, we don't need any of them
        let _version = stream.read::<u32>()?;
        let num_glyphs = stream.read::<u16>()?;

        Ok(Self { num_glyphs })
    }

    #[inline]
    #[must_use]
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }
}
