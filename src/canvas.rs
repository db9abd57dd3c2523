//! In-memory image that renders land in and textures are read from.
//!
//! Encoding and decoding are delegated to the `image` crate, so any format it
//! supports by extension (TGA, PNG, BMP, ...) can be read and written.

use std::path::Path;

use crate::colors::Color;
use crate::error::Result;

/// Pixel layout of a [`Canvas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Grayscale,
    Rgb,
    Rgba,
}

impl Format {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Format::Grayscale => 1,
            Format::Rgb => 3,
            Format::Rgba => 4,
        }
    }

    fn color_type(self) -> image::ColorType {
        match self {
            Format::Grayscale => image::ColorType::L8,
            Format::Rgb => image::ColorType::Rgb8,
            Format::Rgba => image::ColorType::Rgba8,
        }
    }
}

/// A width x height grid of pixels, row-major with `y = 0` as the first row.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: Format,
}

impl Canvas {
    /// Creates a black canvas (alpha 0 for RGBA).
    pub fn new(width: u32, height: u32, format: Format) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * format.bytes_per_pixel()],
            width,
            height,
            format,
        }
    }

    /// Reads an image file. Gray images stay grayscale; images with an alpha
    /// channel become RGBA; everything else is converted to RGB.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path)?;
        let (width, height) = (img.width(), img.height());

        let (format, data) = match img.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                (Format::Grayscale, img.into_luma8().into_raw())
            }
            c if c.has_alpha() => (Format::Rgba, img.into_rgba8().into_raw()),
            _ => (Format::Rgb, img.into_rgb8().into_raw()),
        };

        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = y as usize * self.width as usize + x as usize;
            Some(idx * self.format.bytes_per_pixel())
        } else {
            None
        }
    }

    /// Writes a pixel. Out-of-range coordinates are ignored.
    ///
    /// Grayscale canvases keep the red channel.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        match self.format {
            Format::Grayscale => self.data[i] = color.r,
            Format::Rgb => self.data[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]),
            Format::Rgba => {
                self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a])
            }
        }
    }

    /// Reads a pixel, or `None` if out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.offset(x, y)?;
        let d = &self.data;
        Some(match self.format {
            Format::Grayscale => Color::gray(d[i]),
            Format::Rgb => Color::rgb(d[i], d[i + 1], d[i + 2]),
            Format::Rgba => Color::new(d[i], d[i + 1], d[i + 2], d[i + 3]),
        })
    }

    /// Resets every byte to zero.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Fills every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                self.set(x, y, color);
            }
        }
    }

    /// Mirrors the rows so the first row becomes the last.
    ///
    /// Renders use a y-up convention; flip before writing to get an upright
    /// image file.
    pub fn flip_vertically(&mut self) {
        let row = self.width as usize * self.format.bytes_per_pixel();
        let h = self.height as usize;
        for y in 0..h / 2 {
            let (top, bottom) = self.data.split_at_mut((h - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    /// Encodes to `path`; the format is chosen by the file extension.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path,
            &self.data,
            self.width,
            self.height,
            self.format.color_type(),
        )?;
        Ok(())
    }
}
