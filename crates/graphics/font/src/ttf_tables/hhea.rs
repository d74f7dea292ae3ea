//! [Horizontal Header](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6hhea.html) Table
//!
//! Contains the global horizontal metrics and the information needed to read the [hmtx](super::hmtx) table.

use crate::{
    stream::{FWord, Fixed, Stream, UFWord},
    ttf::TTFParseError,
};

#[derive(Clone, Copy, Debug)]
pub struct HHEATable {
    pub version: Fixed,

    /// Distance from the baseline to the highest ascender
    pub ascent: FWord,

    /// Distance from the baseline to the lowest descender, usually negative
    pub descent: FWord,

    pub line_gap: FWord,
    pub advance_width_max: UFWord,
    pub min_left_side_bearing: FWord,
    pub min_right_side_bearing: FWord,
    pub x_max_extent: FWord,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: FWord,
    pub metric_data_format: i16,

    /// Number of entries in the `hmtx` table that carry an explicit advance width
    pub num_of_long_hor_metrics: u16,
}

impl HHEATable {
    pub fn new(data: &[u8], offset: usize) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new_at(data, offset)?;

        let version = stream.read::<Fixed>()?;
        let ascent = stream.read::<FWord>()?;
        let descent = stream.read::<FWord>()?;
        let line_gap = stream.read::<FWord>()?;
        let advance_width_max = stream.read::<UFWord>()?;
        let min_left_side_bearing = stream.read::<FWord>()?;
        let min_right_side_bearing = stream.read::<FWord>()?;
        let x_max_extent = stream.read::<FWord>()?;
        let caret_slope_rise = stream.read::<i16>()?;
        let caret_slope_run = stream.read::<i16>()?;
        let caret_offset = stream.read::<FWord>()?;

        // Four reserved fields
        stream.skip_bytes(4 * 2)?;

        let metric_data_format = stream.read::<i16>()?;
        let num_of_long_hor_metrics = stream.read::<u16>()?;

        Ok(Self {
            version,
            ascent,
            descent,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            num_of_long_hor_metrics,
        })
    }
}
