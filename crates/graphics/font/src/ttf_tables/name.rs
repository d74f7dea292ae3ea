//! [Name](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6name.html) table implementation.
//!
//! Only the handful of names that describe the font as a whole are retained.

use crate::{stream::Stream, ttf::TTFParseError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameID {
    FontFamily,
    FontSubFamily,
    FullName,
    PostScriptName,

    /// Any name we don't care about
    Other(u16),
}

impl From<u16> for NameID {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::FontFamily,
            2 => Self::FontSubFamily,
            4 => Self::FullName,
            6 => Self::PostScriptName,
            other => Self::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Encoding {
    /// Big endian UTF-16, used by the unicode (0) and microsoft (3) platforms
    Utf16,

    /// One byte per character
    Latin1,
}

impl Encoding {
    fn for_platform(platform_id: u16) -> Self {
        match platform_id {
            0 | 3 => Self::Utf16,
            _ => Self::Latin1,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NameTable {
    font_family: Option<String>,
    font_sub_family: Option<String>,
    full_name: Option<String>,
    postscript_name: Option<String>,
}

impl NameTable {
    pub fn new(data: &[u8], offset: usize) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new_at(data, offset)?;

        let format_selector = stream.read::<u16>()?;
        if format_selector != 0 {
            log::warn!("Expected name table format selector to be 0, found {format_selector}");
        }

        let num_records = stream.read::<u16>()?;
        let string_offset = offset + stream.read::<u16>()? as usize;

        let mut name_table = Self::default();
        for _ in 0..num_records {
            let platform_id = stream.read::<u16>()?;
            let platform_specific_id = stream.read::<u16>()?;
            let language_id = stream.read::<u16>()?;
            let name_id = NameID::from(stream.read::<u16>()?);
            let length = stream.read::<u16>()? as usize;
            let value_offset = stream.read::<u16>()? as usize;

            let slot = match name_id {
                NameID::FontFamily => &mut name_table.font_family,
                NameID::FontSubFamily => &mut name_table.font_sub_family,
                NameID::FullName => &mut name_table.full_name,
                NameID::PostScriptName => &mut name_table.postscript_name,
                NameID::Other(_) => continue,
            };

            let mut value_stream = Stream::new_at(data, string_offset + value_offset)?;
            let value = match Encoding::for_platform(platform_id) {
                Encoding::Utf16 => value_stream.read_utf16_string(length)?,
                Encoding::Latin1 => value_stream.read_latin1_string(length)?,
            };

            log::debug!(
                "Name {name_id:?} (platform {platform_id}/{platform_specific_id}, language {language_id}): {value:?}"
            );

            // Later records replace earlier ones, regardless of their platform
            *slot = Some(value);
        }

        Ok(name_table)
    }

    #[inline]
    #[must_use]
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn font_sub_family(&self) -> Option<&str> {
        self.font_sub_family.as_deref()
    }

    /// Get the full name of the font, if any.
    #[inline]
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn postscript_name(&self) -> Option<&str> {
        self.postscript_name.as_deref()
    }
}
