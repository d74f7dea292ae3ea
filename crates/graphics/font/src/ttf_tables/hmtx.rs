//! [Horizontal Metrics](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6hmtx.html) table
//!
//! The table consists of two regions:
//! * `num_of_long_hor_metrics` pairs of `(advance width, left side bearing)`
//! * one left side bearing for every remaining glyph. These glyphs share
//!   the advance width of the last pair (monospaced fonts use this a lot).

use crate::{
    stream::{FWord, Stream},
    ttf::TTFParseError,
};

use super::cmap::GlyphID;

#[derive(Clone, Copy, Debug)]
pub struct HMTXTable {
    offset: usize,
    num_of_long_hor_metrics: usize,
    num_glyphs: usize,
}

impl HMTXTable {
    #[must_use]
    pub fn new(offset: usize, num_of_long_hor_metrics: u16, num_glyphs: u16) -> Self {
        Self {
            offset,
            num_of_long_hor_metrics: num_of_long_hor_metrics as usize,
            num_glyphs: num_glyphs as usize,
        }
    }

    pub fn get_metric_for(
        &self,
        data: &[u8],
        glyph_id: GlyphID,
    ) -> Result<LongHorMetric, TTFParseError> {
        let index = glyph_id.numeric() as usize;
        if index >= self.num_glyphs {
            return Err(TTFParseError::IndexOutOfRange(index));
        }

        if index < self.num_of_long_hor_metrics {
            let mut stream = Stream::new_at(data, self.offset + index * 4)?;
            return Ok(LongHorMetric {
                advance_width: stream.read::<u16>()?,
                left_side_bearing: stream.read::<FWord>()?,
            });
        }

        // The advance width is shared with the last long metric
        let last_long_metric = self
            .num_of_long_hor_metrics
            .checked_sub(1)
            .ok_or(TTFParseError::IndexOutOfRange(index))?;
        let advance_width =
            Stream::new_at(data, self.offset + last_long_metric * 4)?.read::<u16>()?;

        let bearing_offset =
            self.offset + self.num_of_long_hor_metrics * 4 + (index - self.num_of_long_hor_metrics) * 2;
        let left_side_bearing = Stream::new_at(data, bearing_offset)?.read::<FWord>()?;

        Ok(LongHorMetric {
            advance_width,
            left_side_bearing,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LongHorMetric {
    advance_width: u16,
    left_side_bearing: FWord,
}

impl LongHorMetric {
    #[inline]
    #[must_use]
    pub fn advance_width(&self) -> u16 {
        self.advance_width
    }

    #[inline]
    #[must_use]
    pub fn left_side_bearing(&self) -> FWord {
        self.left_side_bearing
    }
}
