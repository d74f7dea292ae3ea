//! Sequential, bounds-checked big-endian reader over the raw font data.

use std::mem;

use chrono::{DateTime, Utc};

use crate::ttf::TTFParseError;

/// Distance between the Macintosh epoch (1904-01-01) and the unix epoch, in seconds
const SECONDS_FROM_1904_TO_1970: i64 = 2_082_844_800;

/// A signed distance in font design units
pub type FWord = i16;

/// An unsigned distance in font design units
pub type UFWord = u16;

#[derive(Clone, Copy, Debug)]
pub struct Stream<'a> {
    bytes: &'a [u8],
    ptr: usize,
}

impl<'a> Stream<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, ptr: 0 }
    }

    /// Create a stream that starts reading at `position`
    pub fn new_at(bytes: &'a [u8], position: usize) -> Result<Self, TTFParseError> {
        let mut stream = Self::new(bytes);
        stream.seek(position)?;
        Ok(stream)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The current read position
    #[inline]
    #[must_use]
    pub fn tell(&self) -> usize {
        self.ptr
    }

    /// Move the read position to `position`, returning the previous one.
    ///
    /// Seeking to the very end of the data is allowed, any read from there will fail.
    pub fn seek(&mut self, position: usize) -> Result<usize, TTFParseError> {
        if position > self.bytes.len() {
            return Err(TTFParseError::InvalidOffset(position));
        }

        Ok(mem::replace(&mut self.ptr, position))
    }

    pub fn skip_bytes(&mut self, num_bytes: usize) -> Result<(), TTFParseError> {
        let target = self
            .ptr
            .checked_add(num_bytes)
            .ok_or(TTFParseError::InvalidOffset(usize::MAX))?;
        self.seek(target)?;
        Ok(())
    }

    pub fn read<T: Readable>(&mut self) -> Result<T, TTFParseError> {
        let remaining = self.bytes.get(self.ptr..).ok_or(TTFParseError::OutOfBounds)?;
        let value = T::read(remaining)?;
        self.ptr += T::SIZE;
        Ok(value)
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8], TTFParseError> {
        let bytes = self
            .bytes
            .get(self.ptr..)
            .and_then(|remaining| remaining.get(..length))
            .ok_or(TTFParseError::OutOfBounds)?;
        self.ptr += length;
        Ok(bytes)
    }

    /// Read `length` bytes, interpreting each one as a latin-1 character
    pub fn read_latin1_string(&mut self, length: usize) -> Result<String, TTFParseError> {
        let bytes = self.read_bytes(length)?;
        Ok(bytes.iter().copied().map(char::from).collect())
    }

    /// Read `length` bytes of big-endian UTF-16.
    ///
    /// A trailing odd byte is consumed but does not contribute a character.
    pub fn read_utf16_string(&mut self, length: usize) -> Result<String, TTFParseError> {
        let bytes = self.read_bytes(length)?;
        let code_units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();

        Ok(String::from_utf16_lossy(&code_units))
    }
}

/// Trait for things that can be read from a byte stream
pub trait Readable: Sized {
    const SIZE: usize = mem::size_of::<Self>();

    fn read(bytes: &[u8]) -> Result<Self, TTFParseError>;
}

macro_rules! impl_readable_for_int {
    ($($int: ty),*) => {
        $(
            impl Readable for $int {
                fn read(bytes: &[u8]) -> Result<Self, TTFParseError> {
                    bytes
                        .first_chunk()
                        .copied()
                        .map(<$int>::from_be_bytes)
                        .ok_or(TTFParseError::OutOfBounds)
                }
            }
        )*
    };
}

impl_readable_for_int!(u8, i8, u16, i16, u32, i32);

impl<const N: usize> Readable for [u8; N] {
    fn read(bytes: &[u8]) -> Result<Self, TTFParseError> {
        bytes
            .first_chunk()
            .copied()
            .ok_or(TTFParseError::OutOfBounds)
    }
}

/// Signed 16.16 fixed point number
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fixed(i32);

impl Fixed {
    const SCALING_FACTOR: f32 = (1 << 16) as f32;

    #[inline]
    #[must_use]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    #[inline]
    #[must_use]
    pub const fn bits(&self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::SCALING_FACTOR
    }
}

impl Readable for Fixed {
    fn read(bytes: &[u8]) -> Result<Self, TTFParseError> {
        i32::read(bytes).map(Self)
    }
}

/// Signed 2.14 fixed point number, used for the scale factors of compound glyph components
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct F2Dot14(i16);

impl F2Dot14 {
    const SCALING_FACTOR: f32 = (1 << 14) as f32;

    #[inline]
    #[must_use]
    pub const fn from_bits(bits: i16) -> Self {
        Self(bits)
    }

    #[inline]
    #[must_use]
    pub const fn bits(&self) -> i16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::SCALING_FACTOR
    }
}

impl Readable for F2Dot14 {
    fn read(bytes: &[u8]) -> Result<Self, TTFParseError> {
        i16::read(bytes).map(Self)
    }
}

/// Seconds since 1904-01-01T00:00:00Z, stored as two big-endian `u32`s
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LongDateTime(i64);

impl LongDateTime {
    #[inline]
    #[must_use]
    pub const fn seconds_since_1904(&self) -> i64 {
        self.0
    }

    /// Convert to a calendar timestamp.
    ///
    /// Returns `None` if the timestamp cannot be represented.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let unix_timestamp = self.0.checked_sub(SECONDS_FROM_1904_TO_1970)?;
        DateTime::from_timestamp(unix_timestamp, 0)
    }
}

impl Readable for LongDateTime {
    fn read(bytes: &[u8]) -> Result<Self, TTFParseError> {
        let high = u32::read(bytes)? as u64;
        let low = u32::read(bytes.get(4..).ok_or(TTFParseError::OutOfBounds)?)? as u64;
        Ok(Self(((high << 32) | low) as i64))
    }
}
