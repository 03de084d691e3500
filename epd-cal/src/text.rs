use std::sync::OnceLock;

use askama::Template;
use tiny_skia::Pixmap;

// A single text run as a minimal SVG document sized to the target surface,
// so resvg can composite it in place.
#[derive(Template)]
#[template(
    source = r#"<svg xmlns="http://www.w3.org/2000/svg" width="{{ width }}" height="{{ height }}"><text x="{{ x }}" y="{{ y }}" font-family="Arial, Liberation Sans, DejaVu Sans, sans-serif" font-size="{{ size }}" fill="black">{{ text }}</text></svg>"#,
    ext = "xml"
)]
struct TextSvgTemplate<'a> {
    width: u32,
    height: u32,
    x: i32,
    y: f32,
    size: u32,
    text: &'a str,
}

fn font_database() -> &'static fontdb::Database {
    static FONTS: OnceLock<fontdb::Database> = OnceLock::new();

    FONTS.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} font faces", db.len());
        db
    })
}

/// Draws `text` onto the pixmap with its top-left corner at (x, y).
///
/// Font resolution is best effort: the preferred families are looked up in
/// the system font database and resvg substitutes whatever it can find.
/// With no usable font the run is skipped and the surface is left untouched.
pub(crate) fn draw_text(pixmap: &mut Pixmap, x: i32, y: i32, size: u32, text: &str) {
    let svg_data = TextSvgTemplate {
        width: pixmap.width(),
        height: pixmap.height(),
        x,
        // SVG anchors text at the baseline; callers pass the top of the line.
        y: y as f32 + size as f32 * 0.8,
        size,
        text,
    }
    .render()
    .unwrap();

    let opt = usvg::Options::default();
    let tree = match usvg::Tree::from_data(svg_data.as_bytes(), &opt, font_database()) {
        Ok(tree) => tree,
        Err(err) => {
            log::warn!("Skipping text run {text:?}: {err}");
            return;
        }
    };

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
}
