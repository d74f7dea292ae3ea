//! TrueType font decoding and text layout.
//!
//! The crate reads the tables of a TrueType font from an in-memory buffer, decodes glyph
//! outlines into path operations and places glyphs along a line of text.
//! Rasterization is left to the consumer of the [PathConsumer] operations.

pub mod layout;
pub mod path;
mod stream;
pub mod ttf;
pub mod ttf_tables;

pub use layout::{LayoutGlyph, TextLayout};
pub use path::{Operation, PathConsumer, PathReader};
pub use stream::{F2Dot14, FWord, Fixed, LongDateTime, Readable, Stream, UFWord};
pub use ttf::{Font, TTFParseError};
pub use ttf_tables::cmap::GlyphID;
