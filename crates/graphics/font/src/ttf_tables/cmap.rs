//! [CMAP](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html) table implementation

use std::{cell::RefCell, collections::HashMap, fmt};

use crate::{stream::Stream, ttf::TTFParseError};

/// Zero-cost wrapper around a `u16` for extra type safety.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GlyphID(u16);

impl GlyphID {
    /// The id of the replacement glyph (`.notdef`)
    pub const REPLACEMENT: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn numeric(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_replacement(self) -> bool {
        self.0 == Self::REPLACEMENT.0
    }
}

impl From<GlyphID> for u16 {
    fn from(value: GlyphID) -> Self {
        value.0
    }
}

impl fmt::Display for GlyphID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformID {
    Unicode,
    Mac,
    Reserved,
    Microsoft(WindowsPlatformSpecificID),
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowsPlatformSpecificID {
    Symbol,
    UnicodeBmpOnly,
    Other(u16),
}

impl From<(u16, u16)> for PlatformID {
    fn from(value: (u16, u16)) -> Self {
        match value.0 {
            0 => Self::Unicode,
            1 => Self::Mac,
            2 => Self::Reserved,
            3 => Self::Microsoft(value.1.into()),
            _ => Self::Unknown,
        }
    }
}

impl From<u16> for WindowsPlatformSpecificID {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Symbol,
            1 => Self::UnicodeBmpOnly,
            other => Self::Other(other),
        }
    }
}

impl PlatformID {
    /// Whether or not we know how to use subtables for this platform
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            Self::Microsoft(WindowsPlatformSpecificID::Symbol)
                | Self::Microsoft(WindowsPlatformSpecificID::UnicodeBmpOnly)
        )
    }
}

/// Read all supported subtables from the `cmap` table at `offset`.
///
/// The subtables are returned in the order they appear in the table directory.
pub fn read_cmap_table(data: &[u8], offset: usize) -> Result<Vec<CMap<'_>>, TTFParseError> {
    let mut stream = Stream::new_at(data, offset)?;

    let _version = stream.read::<u16>()?;
    let num_subtables = stream.read::<u16>()?;

    let mut cmaps = vec![];
    for _ in 0..num_subtables {
        let platform_id = stream.read::<u16>()?;
        let platform_specific_id = stream.read::<u16>()?;
        let subtable_offset = stream.read::<u32>()? as usize;

        let platform = PlatformID::from((platform_id, platform_specific_id));
        if !platform.is_supported() {
            log::debug!("Skipping cmap subtable for platform {platform:?}");
            continue;
        }

        if let Some(cmap) = CMap::new(data, offset + subtable_offset)? {
            cmaps.push(cmap);
        }
    }

    Ok(cmaps)
}

/// A single character-to-glyph mapping
#[derive(Clone, Debug)]
pub enum CMap<'a> {
    Format0(Format0),
    Format4(Format4<'a>),
}

impl<'a> CMap<'a> {
    /// Returns `None` if the subtable uses a format that we don't support
    pub fn new(data: &'a [u8], offset: usize) -> Result<Option<Self>, TTFParseError> {
        let mut stream = Stream::new_at(data, offset)?;

        let format = stream.read::<u16>()?;
        let _length = stream.read::<u16>()?;
        let _language = stream.read::<u16>()?;

        let cmap = match format {
            0 => Self::Format0(Format0::new(&mut stream)?),
            4 => Self::Format4(Format4::new(data, &mut stream)?),
            _ => {
                log::debug!("Unsupported cmap subtable format {format}");
                return Ok(None);
            },
        };

        Ok(Some(cmap))
    }

    #[must_use]
    pub fn format(&self) -> u16 {
        match self {
            Self::Format0(_) => 0,
            Self::Format4(_) => 4,
        }
    }

    /// Map a character code to a glyph.
    ///
    /// Unmapped codes map to [GlyphID::REPLACEMENT].
    pub fn get_glyph_id(&self, codepoint: u16) -> Result<GlyphID, TTFParseError> {
        match self {
            Self::Format0(format0) => Ok(format0.get_glyph_id(codepoint)),
            Self::Format4(format4) => format4.get_glyph_id(codepoint),
        }
    }
}

/// A direct mapping from one byte to the glyph index
#[derive(Clone, Debug)]
pub struct Format0 {
    glyph_ids: [u8; 256],
}

impl Format0 {
    fn new(stream: &mut Stream<'_>) -> Result<Self, TTFParseError> {
        Ok(Self {
            glyph_ids: stream.read()?,
        })
    }

    #[must_use]
    pub fn from_glyph_ids(glyph_ids: [u8; 256]) -> Self {
        Self { glyph_ids }
    }

    #[must_use]
    pub fn get_glyph_id(&self, codepoint: u16) -> GlyphID {
        self.glyph_ids
            .get(codepoint as usize)
            .map(|&id| GlyphID(id as u16))
            .unwrap_or(GlyphID::REPLACEMENT)
    }
}

/// A list of segments mapping ranges of character codes, possibly with gaps in between
#[derive(Clone)]
pub struct Format4<'a> {
    data: &'a [u8],
    segments: Vec<Format4Segment>,

    /// Lookups are memoized for the lifetime of the subtable
    cache: RefCell<HashMap<u16, GlyphID>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Format4Segment {
    pub start_code: u16,
    pub end_code: u16,
    pub id_delta: u16,

    /// Absolute position of the segment's glyph ids within the font data,
    /// or `None` if the glyph id is computed from `id_delta`
    pub glyph_id_array_offset: Option<usize>,
}

impl<'a> Format4<'a> {
    fn new(data: &'a [u8], stream: &mut Stream<'a>) -> Result<Self, TTFParseError> {
        // Byte layout after the common header looks like this:
        // Seg Count x 2 : u16
        // Search params : 3 * u16
        // End Code      : [u16; segcount]
        //                 < 2 byte padding>
        // Start Code    : [u16; segcount]
        // ID Delta      : [u16; segcount]
        // ID Range Offs : [u16; segcount]
        // Glyph IDS     : remaining space
        let segment_count = (stream.read::<u16>()? / 2) as usize;
        let _search_range = stream.read::<u16>()?;
        let _entry_selector = stream.read::<u16>()?;
        let _range_shift = stream.read::<u16>()?;

        let mut segments = Vec::with_capacity(segment_count);
        for _ in 0..segment_count {
            segments.push(Format4Segment {
                start_code: 0,
                end_code: stream.read()?,
                id_delta: 0,
                glyph_id_array_offset: None,
            });
        }

        let _reserved_pad = stream.read::<u16>()?;

        for segment in &mut segments {
            segment.start_code = stream.read()?;
        }

        for segment in &mut segments {
            segment.id_delta = stream.read()?;
        }

        for segment in &mut segments {
            // The range offset is relative to its own position in the table
            let position = stream.tell();
            let id_range_offset = stream.read::<u16>()?;
            if id_range_offset != 0 {
                segment.glyph_id_array_offset = Some(position + id_range_offset as usize);
            }
        }

        Ok(Self::from_segments(data, segments))
    }

    #[must_use]
    pub fn from_segments(data: &'a [u8], segments: Vec<Format4Segment>) -> Self {
        Self {
            data,
            segments,
            cache: RefCell::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Format4Segment] {
        &self.segments
    }

    pub fn get_glyph_id(&self, codepoint: u16) -> Result<GlyphID, TTFParseError> {
        if let Some(glyph_id) = self.cache.borrow().get(&codepoint) {
            return Ok(*glyph_id);
        }

        let glyph_id = self.lookup(codepoint)?;
        self.cache.borrow_mut().insert(codepoint, glyph_id);
        Ok(glyph_id)
    }

    fn lookup(&self, codepoint: u16) -> Result<GlyphID, TTFParseError> {
        let Some(segment) = self
            .segments
            .iter()
            .find(|segment| segment.start_code <= codepoint && codepoint <= segment.end_code)
        else {
            return Ok(GlyphID::REPLACEMENT);
        };

        let glyph_id = match segment.glyph_id_array_offset {
            Some(array_offset) => {
                let address = array_offset + 2 * (codepoint - segment.start_code) as usize;
                Stream::new_at(self.data, address)?.read::<u16>()?
            },
            None => codepoint.wrapping_add(segment.id_delta),
        };

        log::trace!(
            "Codepoint {codepoint:#x} is between {:#x} and {:#x}, maps to glyph {glyph_id}",
            segment.start_code,
            segment.end_code
        );

        Ok(GlyphID(glyph_id))
    }
}

impl<'a> fmt::Debug for Format4<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format4")
            .field("segments", &self.segments)
            .field("cached_lookups", &self.cache.borrow().len())
            .finish()
    }
}
