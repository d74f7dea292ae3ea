//! Assembles minimal TrueType fonts in memory

#![allow(dead_code)]

/// A point of a simple glyph: `(x, y, is_on_curve)`
pub type Point = (i16, i16, bool);

/// Coverage of a format 0 subtable with horizontal kerning
pub const HORIZONTAL_KERNING: u16 = 0x0001;

/// Coverage of a format 0 subtable with horizontal cross-stream kerning
pub const CROSS_STREAM_KERNING: u16 = 0x0005;

#[derive(Clone, Debug)]
struct KernSubtable {
    coverage: u16,
    pairs: Vec<(u16, u16, i16)>,
}

#[derive(Clone, Debug)]
struct TestGlyph {
    outline: Vec<u8>,
    advance_width: u16,
    left_side_bearing: i16,
}

/// Builds a font with a format 4 character map, long `loca` offsets and
/// one long horizontal metric per glyph.
///
/// If any byte mappings are given, a format 0 character map is written
/// in front of the format 4 one.
///
/// Glyph 0 is always an empty `.notdef` glyph.
#[derive(Clone, Debug)]
pub struct FontBuilder {
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    line_gap: i16,
    glyphs: Vec<TestGlyph>,
    mappings: Vec<(u16, u16)>,
    byte_mappings: Vec<(u8, u8)>,
    kern_subtables: Vec<KernSubtable>,
    names: Vec<(u16, String)>,
    omitted_tables: Vec<[u8; 4]>,
    magic_number: u32,
}

impl Default for FontBuilder {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            ascent: 800,
            descent: -200,
            line_gap: 90,
            glyphs: vec![TestGlyph {
                outline: vec![],
                advance_width: 0,
                left_side_bearing: 0,
            }],
            mappings: vec![],
            byte_mappings: vec![],
            kern_subtables: vec![],
            names: vec![],
            omitted_tables: vec![],
            magic_number: 0x5F0F3CF5,
        }
    }
}

impl FontBuilder {
    pub fn units_per_em(mut self, units_per_em: u16) -> Self {
        self.units_per_em = units_per_em;
        self
    }

    /// Add a glyph and return its index
    pub fn glyph(&mut self, outline: Vec<u8>, advance_width: u16) -> u16 {
        self.glyphs.push(TestGlyph {
            outline,
            advance_width,
            left_side_bearing: 0,
        });
        (self.glyphs.len() - 1) as u16
    }

    pub fn map(mut self, c: char, glyph_id: u16) -> Self {
        self.mappings.push((c as u16, glyph_id));
        self
    }

    /// Map a character code through the format 0 character map
    pub fn map_byte(mut self, code: u8, glyph_id: u8) -> Self {
        self.byte_mappings.push((code, glyph_id));
        self
    }

    /// Add a pair to the last kerning subtable, or to a new horizontal one
    pub fn kern(mut self, left: u16, right: u16, value: i16) -> Self {
        match self.kern_subtables.last_mut() {
            Some(subtable) if subtable.coverage == HORIZONTAL_KERNING => {
                subtable.pairs.push((left, right, value));
            },
            _ => self.kern_subtables.push(KernSubtable {
                coverage: HORIZONTAL_KERNING,
                pairs: vec![(left, right, value)],
            }),
        }
        self
    }

    pub fn kern_subtable(mut self, coverage: u16, pairs: &[(u16, u16, i16)]) -> Self {
        self.kern_subtables.push(KernSubtable {
            coverage,
            pairs: pairs.to_vec(),
        });
        self
    }

    pub fn name(mut self, name_id: u16, value: &str) -> Self {
        self.names.push((name_id, value.to_string()));
        self
    }

    pub fn without_table(mut self, tag: &[u8; 4]) -> Self {
        self.omitted_tables.push(*tag);
        self
    }

    pub fn magic_number(mut self, magic_number: u32) -> Self {
        self.magic_number = magic_number;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"head", self.head()),
            (*b"hhea", self.hhea()),
            (*b"maxp", self.maxp()),
            (*b"hmtx", self.hmtx()),
            (*b"loca", self.loca()),
            (*b"glyf", self.glyf()),
            (*b"cmap", self.cmap()),
            (*b"name", self.name_table()),
        ];
        if !self.kern_subtables.is_empty() {
            tables.push((*b"kern", self.kern_table()));
        }

        tables.retain(|(tag, _)| !self.omitted_tables.contains(tag));
        tables.sort_by_key(|(tag, _)| *tag);

        let mut font = Writer::default();
        font.u32(0x00010000);
        font.u16(tables.len() as u16);
        font.u16(16);
        font.u16(0);
        font.u16(0);

        let mut offset = 12 + 16 * tables.len();
        for (tag, table) in &tables {
            font.bytes(tag);
            font.u32(checksum(table));
            font.u32(offset as u32);
            font.u32(table.len() as u32);
            offset += padded_length(table);
        }

        for (_, table) in &tables {
            font.bytes(table);
            font.bytes(&vec![0; padded_length(table) - table.len()]);
        }

        font.0
    }

    fn head(&self) -> Vec<u8> {
        let mut head = Writer::default();
        head.u32(0x00010000); // version
        head.u32(0x00010000); // font revision
        head.u32(0); // checksum adjustment
        head.u32(self.magic_number);
        head.u16(0); // flags
        head.u16(self.units_per_em);
        head.u32(0);
        head.u32(0xD0000000); // created
        head.u32(0);
        head.u32(0xD0000000); // modified
        head.i16(0);
        head.i16(self.descent);
        head.i16(1000);
        head.i16(self.ascent);
        head.u16(0); // mac style
        head.u16(8); // lowest recommended ppem
        head.i16(2); // font direction hint
        head.i16(1); // long loca offsets
        head.i16(0); // glyph data format
        head.0
    }

    fn hhea(&self) -> Vec<u8> {
        let mut hhea = Writer::default();
        hhea.u32(0x00010000);
        hhea.i16(self.ascent);
        hhea.i16(self.descent);
        hhea.i16(self.line_gap);
        hhea.u16(self.glyphs.iter().map(|g| g.advance_width).max().unwrap_or(0));
        hhea.i16(0); // min left side bearing
        hhea.i16(0); // min right side bearing
        hhea.i16(0); // x max extent
        hhea.i16(1); // caret slope rise
        hhea.i16(0); // caret slope run
        hhea.i16(0); // caret offset
        hhea.bytes(&[0; 8]);
        hhea.i16(0); // metric data format
        hhea.u16(self.glyphs.len() as u16);
        hhea.0
    }

    fn maxp(&self) -> Vec<u8> {
        let mut maxp = Writer::default();
        maxp.u32(0x00005000);
        maxp.u16(self.glyphs.len() as u16);
        maxp.0
    }

    fn hmtx(&self) -> Vec<u8> {
        let mut hmtx = Writer::default();
        for glyph in &self.glyphs {
            hmtx.u16(glyph.advance_width);
            hmtx.i16(glyph.left_side_bearing);
        }
        hmtx.0
    }

    fn loca(&self) -> Vec<u8> {
        let mut loca = Writer::default();
        let mut offset = 0;
        loca.u32(offset);
        for glyph in &self.glyphs {
            offset += glyph.outline.len() as u32;
            loca.u32(offset);
        }
        loca.0
    }

    fn glyf(&self) -> Vec<u8> {
        self.glyphs
            .iter()
            .flat_map(|glyph| glyph.outline.iter().copied())
            .collect()
    }

    fn cmap(&self) -> Vec<u8> {
        let mut mappings = self.mappings.clone();
        mappings.sort();

        // One segment per character plus the mandatory final segment
        let mut segments: Vec<(u16, u16)> = mappings
            .iter()
            .map(|&(codepoint, glyph_id)| (codepoint, glyph_id.wrapping_sub(codepoint)))
            .collect();
        segments.push((0xFFFF, 1));
        let segment_count = segments.len() as u16;

        let mut cmap = Writer::default();
        cmap.u16(0); // version
        if self.byte_mappings.is_empty() {
            cmap.u16(1); // number of subtables
        } else {
            cmap.u16(2);
            cmap.u16(3); // microsoft
            cmap.u16(0); // symbol
            cmap.u32(20);
        }
        cmap.u16(3); // microsoft
        cmap.u16(1); // unicode bmp
        if self.byte_mappings.is_empty() {
            cmap.u32(12);
        } else {
            cmap.u32(20 + 262);

            let mut glyph_ids = [0; 256];
            for &(code, glyph_id) in &self.byte_mappings {
                glyph_ids[code as usize] = glyph_id;
            }
            cmap.u16(0); // format
            cmap.u16(262); // length
            cmap.u16(0); // language
            cmap.bytes(&glyph_ids);
        }

        cmap.u16(4); // format
        cmap.u16(16 + 8 * segment_count); // length
        cmap.u16(0); // language
        cmap.u16(segment_count * 2);
        cmap.u16(0);
        cmap.u16(0);
        cmap.u16(0);
        for (codepoint, _) in &segments {
            cmap.u16(*codepoint);
        }
        cmap.u16(0); // reserved pad
        for (codepoint, _) in &segments {
            cmap.u16(*codepoint);
        }
        for (_, delta) in &segments {
            cmap.u16(*delta);
        }
        for _ in &segments {
            cmap.u16(0);
        }
        cmap.0
    }

    fn name_table(&self) -> Vec<u8> {
        let strings: Vec<Vec<u8>> = self
            .names
            .iter()
            .map(|(_, value)| value.encode_utf16().flat_map(u16::to_be_bytes).collect())
            .collect();

        let mut name = Writer::default();
        name.u16(0);
        name.u16(self.names.len() as u16);
        name.u16(6 + 12 * self.names.len() as u16);

        let mut offset = 0;
        for ((name_id, _), string) in self.names.iter().zip(&strings) {
            name.u16(3);
            name.u16(1);
            name.u16(0x409);
            name.u16(*name_id);
            name.u16(string.len() as u16);
            name.u16(offset);
            offset += string.len() as u16;
        }

        for string in &strings {
            name.bytes(string);
        }
        name.0
    }

    fn kern_table(&self) -> Vec<u8> {
        let mut kern = Writer::default();
        kern.u16(0); // version
        kern.u16(self.kern_subtables.len() as u16);

        for subtable in &self.kern_subtables {
            kern.u16(0); // subtable version
            kern.u16(14 + 6 * subtable.pairs.len() as u16);
            kern.u16(subtable.coverage);
            kern.u16(subtable.pairs.len() as u16);
            kern.u16(0);
            kern.u16(0);
            kern.u16(0);
            for &(left, right, value) in &subtable.pairs {
                kern.u16(left);
                kern.u16(right);
                kern.i16(value);
            }
        }
        kern.0
    }
}

/// Encode a simple glyph, all coordinates are stored as 16 bit deltas
pub fn simple_glyph(contours: &[&[Point]]) -> Vec<u8> {
    let points: Vec<Point> = contours.iter().flat_map(|c| c.iter().copied()).collect();

    let mut glyph = Writer::default();
    glyph.i16(contours.len() as i16);
    bounding_box(&mut glyph, &points);

    let mut end = 0;
    for contour in contours {
        end += contour.len();
        glyph.u16(end as u16 - 1);
    }
    glyph.u16(0); // instruction length

    for &(_, _, is_on_curve) in &points {
        glyph.bytes(&[is_on_curve as u8]);
    }

    let mut previous = 0;
    for &(x, _, _) in &points {
        glyph.i16(x - previous);
        previous = x;
    }

    let mut previous = 0;
    for &(_, y, _) in &points {
        glyph.i16(y - previous);
        previous = y;
    }

    glyph.0
}

/// How a compound glyph component is positioned
#[derive(Clone, Copy, Debug)]
pub enum Arguments {
    /// 16 bit x and y offsets
    Offset(i16, i16),

    /// 8 bit x and y offsets
    ByteOffset(u8, u8),

    /// Match a point of the compound glyph with a point of the component
    PointMatch(u8, u8),
}

/// The linear part of a component transform, stored as F2Dot14 values
#[derive(Clone, Copy, Debug)]
pub enum Scale {
    Identity,
    Uniform(f32),
    XY(f32, f32),

    /// The matrix entries `a, b, c, d` in file order
    TwoByTwo(f32, f32, f32, f32),
}

/// A reference from a compound glyph to another glyph
#[derive(Clone, Copy, Debug)]
pub struct Component {
    pub glyph_id: u16,
    pub arguments: Arguments,
    pub scale: Scale,
}

impl Component {
    pub fn offset(glyph_id: u16, x: i16, y: i16) -> Self {
        Self {
            glyph_id,
            arguments: Arguments::Offset(x, y),
            scale: Scale::Identity,
        }
    }

    pub fn scaled(self, scale: Scale) -> Self {
        Self { scale, ..self }
    }
}

pub fn compound_glyph(components: &[Component]) -> Vec<u8> {
    compound_glyph_with_instructions(components, &[])
}

/// Encode a compound glyph, instructions are only written if there are any
pub fn compound_glyph_with_instructions(components: &[Component], instructions: &[u8]) -> Vec<u8> {
    const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
    const ARGS_ARE_XY_VALUES: u16 = 0x0002;
    const WE_HAVE_A_SCALE: u16 = 0x0008;
    const MORE_COMPONENTS: u16 = 0x0020;
    const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
    const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
    const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;

    let mut glyph = Writer::default();
    glyph.i16(-1);
    glyph.bytes(&[0; 8]);

    for (index, component) in components.iter().enumerate() {
        let mut flags = match component.arguments {
            Arguments::Offset(..) => ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES,
            Arguments::ByteOffset(..) => ARGS_ARE_XY_VALUES,
            Arguments::PointMatch(..) => 0,
        };
        flags |= match component.scale {
            Scale::Identity => 0,
            Scale::Uniform(_) => WE_HAVE_A_SCALE,
            Scale::XY(..) => WE_HAVE_AN_X_AND_Y_SCALE,
            Scale::TwoByTwo(..) => WE_HAVE_A_TWO_BY_TWO,
        };
        if index != components.len() - 1 {
            flags |= MORE_COMPONENTS;
        } else if !instructions.is_empty() {
            flags |= WE_HAVE_INSTRUCTIONS;
        }

        glyph.u16(flags);
        glyph.u16(component.glyph_id);
        match component.arguments {
            Arguments::Offset(x, y) => {
                glyph.i16(x);
                glyph.i16(y);
            },
            Arguments::ByteOffset(x, y) | Arguments::PointMatch(x, y) => glyph.bytes(&[x, y]),
        }
        match component.scale {
            Scale::Identity => {},
            Scale::Uniform(scale) => glyph.f2dot14(scale),
            Scale::XY(x, y) => {
                glyph.f2dot14(x);
                glyph.f2dot14(y);
            },
            Scale::TwoByTwo(a, b, c, d) => {
                glyph.f2dot14(a);
                glyph.f2dot14(b);
                glyph.f2dot14(c);
                glyph.f2dot14(d);
            },
        }
    }

    if !instructions.is_empty() {
        glyph.u16(instructions.len() as u16);
        glyph.bytes(instructions);
    }

    glyph.0
}

/// A glyph whose contour count is invalid
pub fn malformed_glyph() -> Vec<u8> {
    let mut glyph = Writer::default();
    glyph.i16(-2);
    glyph.bytes(&[0; 8]);
    glyph.0
}

fn bounding_box(glyph: &mut Writer, points: &[Point]) {
    let min_x = points.iter().map(|p| p.0).min().unwrap_or(0);
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
    let max_x = points.iter().map(|p| p.0).max().unwrap_or(0);
    let max_y = points.iter().map(|p| p.1).max().unwrap_or(0);

    glyph.i16(min_x);
    glyph.i16(min_y);
    glyph.i16(max_x);
    glyph.i16(max_y);
}

fn padded_length(table: &[u8]) -> usize {
    table.len().next_multiple_of(4)
}

fn checksum(table: &[u8]) -> u32 {
    table
        .chunks(4)
        .map(|chunk| {
            let mut word = [0; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_be_bytes(word)
        })
        .fold(0, u32::wrapping_add)
}

#[derive(Default)]
struct Writer(Vec<u8>);

impl Writer {
    fn bytes(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    fn u16(&mut self, value: u16) {
        self.bytes(&value.to_be_bytes());
    }

    fn i16(&mut self, value: i16) {
        self.bytes(&value.to_be_bytes());
    }

    fn u32(&mut self, value: u32) {
        self.bytes(&value.to_be_bytes());
    }

    fn f2dot14(&mut self, value: f32) {
        self.i16((value * 16384.) as i16);
    }
}

/// Outline of an upper case A: an outer triangle with a triangular hole
pub fn letter_a() -> Vec<u8> {
    simple_glyph(&[
        &[(0, 0, true), (250, 700, true), (500, 0, true)],
        &[(150, 200, true), (350, 200, true), (250, 450, true)],
    ])
}

/// A square with rounded corners on the right side, using off-curve points
pub fn rounded_square() -> Vec<u8> {
    simple_glyph(&[&[
        (0, 0, true),
        (0, 500, true),
        (400, 500, true),
        (500, 500, false),
        (500, 400, false),
        (500, 0, true),
    ]])
}
