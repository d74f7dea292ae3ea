//! A Tool used for [Unicode Rendering Tests](https://github.com/unicode-org/text-rendering-tests)

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use font::{Font, PathConsumer, TextLayout};
use math::Vec2D;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// Specify the font to be used
    #[arg(short = 'f', long = "font")]
    font_path: PathBuf,

    /// The characters to be rendered
    #[arg(short = 'r', long = "render")]
    text: String,

    /// The name of the current test case, used to prefix the ids in the svg
    #[arg(short = 't', long = "testcase", default_value = "text")]
    testcase: String,

    /// Font size in pixels
    #[arg(short = 's', long = "size", default_value_t = 64.)]
    size: f32,

    /// Verify the checksums of all tables before rendering
    #[arg(long = "verify-checksums")]
    verify_checksums: bool,
}

/// Collects path operations into the `d` attribute of an svg path
#[derive(Debug, Default)]
struct SvgPath {
    data: String,
}

impl SvgPath {
    fn push(&mut self, command: char, points: &[Vec2D]) {
        if !self.data.is_empty() {
            self.data.push(' ');
        }
        self.data.push(command);

        for (index, point) in points.iter().enumerate() {
            if index != 0 {
                self.data.push(' ');
            }
            // Writing to a String cannot fail
            self.data.push_str(&format!("{} {}", point.x, point.y));
        }
    }
}

impl PathConsumer for SvgPath {
    fn move_to(&mut self, p: Vec2D) {
        // Close the previous contour, if any
        if !self.data.is_empty() {
            self.data.push_str(" Z");
        }
        self.push('M', &[p]);
    }

    fn line_to(&mut self, p: Vec2D) {
        self.push('L', &[p]);
    }

    fn quad_bez_to(&mut self, p1: Vec2D, p2: Vec2D) {
        self.push('Q', &[p1, p2]);
    }
}

fn render_as_svg(layout: &TextLayout, id_prefix: &str) -> String {
    let mut paths = String::new();
    for (index, glyph) in layout.glyphs().iter().enumerate() {
        let mut path = SvgPath::default();
        for operation in layout.device_outline(glyph) {
            path.consume(operation);
        }

        if path.data.is_empty() {
            continue;
        }
        path.data.push_str(" Z");

        paths.push_str(&format!(
            "<path id=\"{id_prefix}/{index}\" d=\"{}\"></path>",
            path.data
        ));
    }

    let (min, max) = layout
        .bounding_box()
        .map(|bounding_box| (bounding_box.min(), bounding_box.max()))
        .unwrap_or_default();
    let width = max.x - min.x;
    let height = max.y - min.y;

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<svg version=\"1.1\"
    xmlns=\"http://www.w3.org/2000/svg\"
    viewBox=\"{} {} {width} {height}\">
  {paths}
</svg>",
        min.x, min.y,
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Arguments::parse();

    let font_bytes = fs::read(&args.font_path)
        .with_context(|| format!("Failed to read font from {}", args.font_path.display()))?;
    let mut font = Font::new(&font_bytes).context("Failed to parse font")?;

    if args.verify_checksums {
        font.verify_checksums()
            .context("Font failed the integrity check")?;
        log::info!("All table checksums are valid");
    }

    // Put the baseline far enough down for the ascenders to be visible
    let baseline = font.ascent() as f32 * font.scale(args.size);
    let layout = font.layout_text(&args.text, Vec2D::new(0., baseline), args.size);
    log::info!(
        "Laid out {} glyphs, pen ended at {:?}",
        layout.glyphs().len(),
        layout.pen()
    );

    println!("{}", render_as_svg(&layout, &args.testcase));

    Ok(())
}
