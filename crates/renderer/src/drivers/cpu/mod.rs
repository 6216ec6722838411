use std::any::Any;

use super::{check_extent, GraphicDriver, DEFAULT_MAX_EXTENT};
use crate::{
    colors::Rgba,
    graphic::{GraphicData, GraphicError},
    pixels::{PixelArray, PixelFormat},
};

/// Software graphic driver; keeps an RGBA8 copy of every upload.
#[derive(Debug, Clone)]
pub struct Cpu {
    formats: Vec<PixelFormat>,
    max_extent: u32,
}

impl Cpu {
    pub fn with_formats(formats: &[PixelFormat]) -> Self {
        Self {
            formats: formats.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_max_extent(mut self, max_extent: u32) -> Self {
        self.max_extent = max_extent;
        self
    }

    pub fn supports(&self, format: PixelFormat) -> bool {
        self.formats.contains(&format)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self {
            formats: PixelFormat::ALL.to_vec(),
            max_extent: DEFAULT_MAX_EXTENT,
        }
    }
}

impl GraphicDriver for Cpu {
    fn upload(&mut self, pixels: &PixelArray) -> Result<Box<dyn GraphicData>, GraphicError> {
        if !self.supports(pixels.format()) {
            return Err(GraphicError::UnsupportedFormat(pixels.format()));
        }
        if pixels.is_empty() {
            return Err(GraphicError::Empty {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        check_extent(pixels, self.max_extent)?;
        Ok(Box::new(CpuGraphic {
            width: pixels.width(),
            height: pixels.height(),
            rgba: pixels.to_rgba_bytes().into(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuGraphic {
    width: u32,
    height: u32,
    rgba: Box<[u8]>,
}

impl CpuGraphic {
    pub fn as_rgba_bytes(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba[start..start + 4];
        Some(Rgba::new(px[0], px[1], px[2], px[3]))
    }
}

impl GraphicData for CpuGraphic {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
