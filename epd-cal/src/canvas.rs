use std::{
    fs::File,
    io::{Cursor, Write},
    path::Path,
};

use itertools::Itertools;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::text;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Width and height must be greater than zero")]
    InvalidDimension,

    #[error("Color depth must be a positive integer")]
    InvalidColorDepth,

    #[error("Failed to encode bitmap: {0}")]
    Encode(#[from] bmp_monochrome::BmpError),

    #[error("Failed to encode bitmap: {0}")]
    EncodeRgb(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Only this depth selects full-colour export; every other positive depth
/// is exported as 1-bit monochrome.
const RGB_DEPTH: u8 = 24;

/// Luma cut-off between white and black when flattening to 1-bit.
const MONO_THRESHOLD: u32 = 128;

/// A fixed-size pixel surface that exports as a Windows bitmap.
pub struct Canvas {
    width: u32,
    height: u32,
    color_depth: u8,
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32, color_depth: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension);
        }
        if color_depth == 0 {
            return Err(Error::InvalidColorDepth);
        }

        let mut pixmap = Pixmap::new(width, height).ok_or(Error::InvalidDimension)?;
        pixmap.fill(Color::WHITE);

        Ok(Self {
            width,
            height,
            color_depth,
            pixmap,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_depth(&self) -> u8 {
        self.color_depth
    }

    /// Outlines a rectangle with a 1 px black stroke. Regions outside the
    /// surface are clipped; degenerate sizes draw nothing.
    pub fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };

        let path = PathBuilder::from_rect(rect);

        let mut paint = Paint::default();
        paint.set_color(Color::BLACK);
        paint.anti_alias = false;

        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };

        self.pixmap
            .as_mut()
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Draws a line of black text with its top-left corner at (x, y).
    /// Text rendering is best effort and never fails the canvas.
    pub fn draw_text(&mut self, x: i32, y: i32, size: u32, text: &str) {
        text::draw_text(&mut self.pixmap, x, y, size, text);
    }

    /// Encodes the surface as a self-contained BMP byte stream.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());

        if self.color_depth == RGB_DEPTH {
            self.rgb_image()
                .write_to(&mut buffer, image::ImageFormat::Bmp)?;
        } else {
            bmp_monochrome::Bmp::new(self.mono_rows())?.write(&mut buffer)?;
        }

        Ok(buffer.into_inner())
    }

    /// Encodes the surface and writes it to `path`, overwriting any
    /// existing file. The handle is released on every exit path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.encode()?;

        let mut file = File::create(path)?;
        file.write_all(&bytes)?;

        Ok(())
    }

    fn mono_rows(&self) -> Vec<Vec<bool>> {
        let pixels = self.pixmap.pixels();

        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let p = pixels[(y * self.width + x) as usize].demultiply();
                        luma(p.red(), p.green(), p.blue()) < MONO_THRESHOLD
                    })
                    .collect_vec()
            })
            .collect_vec()
    }

    fn rgb_image(&self) -> image::RgbImage {
        let pixels = self.pixmap.pixels();

        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let p = pixels[(y * self.width + x) as usize].demultiply();
            image::Rgb([p.red(), p.green(), p.blue()])
        })
    }
}

fn luma(r: u8, g: u8, b: u8) -> u32 {
    (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000
}
