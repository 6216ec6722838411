use std::fmt;

use thiserror::Error;

use crate::colors::Rgba;

/// Memory layout of a single pixel in a [`PixelArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba8,
    Bgra8,
    Rgb8,
    Gray8,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 4] = [
        PixelFormat::Rgba8,
        PixelFormat::Bgra8,
        PixelFormat::Rgb8,
        PixelFormat::Gray8,
    ];

    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 => 1,
        }
    }

    fn decode(self, px: &[u8]) -> Rgba {
        match self {
            PixelFormat::Rgba8 => Rgba::new(px[0], px[1], px[2], px[3]),
            PixelFormat::Bgra8 => Rgba::new(px[2], px[1], px[0], px[3]),
            PixelFormat::Rgb8 => Rgba::new(px[0], px[1], px[2], 255),
            PixelFormat::Gray8 => Rgba::new(px[0], px[0], px[0], 255),
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelArrayError {
    #[error("{width}x{height} {format} pixels need {expected} bytes, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },
    #[error("{width}x{height} {format} pixels do not fit in memory")]
    TooLarge {
        width: u32,
        height: u32,
        format: PixelFormat,
    },
}

/// Byte length of a `width` x `height` block, or `TooLarge` if it overflows.
fn byte_len(width: u32, height: u32, format: PixelFormat) -> Result<usize, PixelArrayError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|count| count.checked_mul(format.bytes_per_pixel()))
        .ok_or(PixelArrayError::TooLarge {
            width,
            height,
            format,
        })
}

/// Immutable block of pixel data, read row-major from the top-left corner.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelArray {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Box<[u8]>,
}

impl PixelArray {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: impl Into<Box<[u8]>>,
    ) -> Result<Self, PixelArrayError> {
        let data = data.into();
        let expected = byte_len(width, height, format)?;
        if data.len() != expected {
            return Err(PixelArrayError::LengthMismatch {
                width,
                height,
                format,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    pub fn from_rgba(
        width: u32,
        height: u32,
        pixels: &[Rgba],
    ) -> Result<Self, PixelArrayError> {
        let data: Vec<u8> = pixels.iter().flat_map(|px| px.to_array()).collect();
        Self::new(width, height, PixelFormat::Rgba8, data)
    }

    pub fn filled(width: u32, height: u32, colour: Rgba) -> Result<Self, PixelArrayError> {
        let len = byte_len(width, height, PixelFormat::Rgba8)?;
        let data: Vec<u8> = colour.to_array().into_iter().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            format: PixelFormat::Rgba8,
            data: data.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.row_bytes();
        let start = y as usize * stride;
        Some(&self.data[start..start + stride])
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let row = self.row(y)?;
        let start = x as usize * bpp;
        Some(self.format.decode(&row[start..start + bpp]))
    }

    /// All pixels converted to RGBA, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        if self.format == PixelFormat::Rgba8 {
            return self.data.to_vec();
        }
        self.data
            .chunks_exact(self.format.bytes_per_pixel())
            .flat_map(|px| self.format.decode(px).to_array())
            .collect()
    }
}

impl fmt::Debug for PixelArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelArray")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
