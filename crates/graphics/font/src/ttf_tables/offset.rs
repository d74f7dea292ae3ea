//! The [offset subtable](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6.html#Directory)
//! and the table directory that follows it.

use std::{collections::HashMap, fmt};

use crate::{stream::Stream, ttf::TTFParseError};

/// A four-byte table identifier, like `b"glyf"`
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const CMAP: Self = Self::new(b"cmap");
    pub const GLYF: Self = Self::new(b"glyf");
    pub const HEAD: Self = Self::new(b"head");
    pub const HHEA: Self = Self::new(b"hhea");
    pub const HMTX: Self = Self::new(b"hmtx");
    pub const KERN: Self = Self::new(b"kern");
    pub const LOCA: Self = Self::new(b"loca");
    pub const MAXP: Self = Self::new(b"maxp");
    pub const NAME: Self = Self::new(b"name");

    #[inline]
    #[must_use]
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tags are usually ASCII, but nothing forces them to be
        for byte in self.0 {
            write!(f, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OffsetTable {
    scaler_type: u32,
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
    tables: HashMap<Tag, TableEntry>,
}

impl OffsetTable {
    pub fn new(data: &[u8]) -> Result<Self, TTFParseError> {
        let mut stream = Stream::new(data);

        let scaler_type = stream.read::<u32>()?;
        let num_tables = stream.read::<u16>()?;
        let search_range = stream.read::<u16>()?;
        let entry_selector = stream.read::<u16>()?;
        let range_shift = stream.read::<u16>()?;

        let mut tables = HashMap::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = Tag::new(&stream.read::<[u8; 4]>()?);
            let entry = TableEntry {
                checksum: stream.read::<u32>()?,
                offset: stream.read::<u32>()?,
                length: stream.read::<u32>()?,
            };

            log::debug!("Found table {tag} at offset {}", entry.offset);

            // Duplicate tags are not allowed, but if they occur the last one wins
            if tables.insert(tag, entry).is_some() {
                log::warn!("Font contains more than one {tag} table");
            }
        }

        Ok(Self {
            scaler_type,
            search_range,
            entry_selector,
            range_shift,
            tables,
        })
    }

    #[inline]
    #[must_use]
    pub fn scaler_type(&self) -> u32 {
        self.scaler_type
    }

    #[inline]
    #[must_use]
    pub fn search_range(&self) -> u16 {
        self.search_range
    }

    #[inline]
    #[must_use]
    pub fn entry_selector(&self) -> u16 {
        self.entry_selector
    }

    #[inline]
    #[must_use]
    pub fn range_shift(&self) -> u16 {
        self.range_shift
    }

    #[inline]
    #[must_use]
    pub fn get_table(&self, tag: Tag) -> Option<TableEntry> {
        self.tables.get(&tag).copied()
    }

    /// Like [get_table](Self::get_table), but fails if the table is absent
    pub fn require_table(&self, tag: Tag) -> Result<TableEntry, TTFParseError> {
        self.get_table(tag).ok_or(TTFParseError::MissingTable(tag))
    }

    /// Iterate over all the tables in the font, in no particular order
    pub fn tables(&self) -> impl Iterator<Item = (Tag, TableEntry)> + '_ {
        self.tables.iter().map(|(tag, entry)| (*tag, *entry))
    }

    #[inline]
    #[must_use]
    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableEntry {
    checksum: u32,
    offset: u32,
    length: u32,
}

impl TableEntry {
    #[inline]
    #[must_use]
    pub const fn new(checksum: u32, offset: u32, length: u32) -> Self {
        Self {
            checksum,
            offset,
            length,
        }
    }

    #[inline]
    #[must_use]
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Absolute position of the table within the font data
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// Whether or not the absolute position `offset` lies inside this table
    #[inline]
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        (self.offset()..self.offset() + self.length()).contains(&offset)
    }

    /// Sum the table as a sequence of big-endian `u32`s.
    ///
    /// The table is zero-padded to a multiple of four bytes. For the `head` table
    /// the `checkSumAdjustment` field (bytes 8 to 12) counts as zero.
    pub fn calculate_checksum(&self, data: &[u8], tag: Tag) -> Result<u32, TTFParseError> {
        let table = data
            .get(self.offset()..)
            .and_then(|remaining| remaining.get(..self.length()))
            .ok_or(TTFParseError::OutOfBounds)?;

        let checksum = table
            .chunks(4)
            .enumerate()
            .map(|(index, chunk)| {
                if tag == Tag::HEAD && index == 2 {
                    return 0;
                }

                let mut word = [0; 4];
                word[..chunk.len()].copy_from_slice(chunk);
                u32::from_be_bytes(word)
            })
            .fold(0_u32, u32::wrapping_add);

        Ok(checksum)
    }

    /// Compare the stored checksum against the table contents
    pub fn verify_checksum(&self, data: &[u8], tag: Tag) -> Result<(), TTFParseError> {
        let computed = self.calculate_checksum(data, tag)?;

        if computed != self.checksum {
            return Err(TTFParseError::ChecksumMismatch {
                tag,
                expected: self.checksum,
                computed,
            });
        }

        Ok(())
    }
}
