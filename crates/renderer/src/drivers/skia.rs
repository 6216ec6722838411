use std::{any::Any, borrow::Cow, fmt};

use derive_deref::Deref;
use skia::{images, AlphaType, ColorType, Data, ISize, Image, ImageInfo};

use super::{check_extent, GraphicDriver, DEFAULT_MAX_EXTENT};
use crate::{
    graphic::{GraphicData, GraphicError},
    pixels::{PixelArray, PixelFormat},
};

/// Raster graphic driver backed by skia images.
#[derive(Debug, Clone, Copy)]
pub struct Skia {
    max_extent: u32,
}

impl Skia {
    /// Edges are capped at `i32::MAX`, the largest size skia can describe.
    pub fn with_max_extent(mut self, max_extent: u32) -> Self {
        self.max_extent = max_extent.min(i32::MAX as u32);
        self
    }
}

impl Default for Skia {
    fn default() -> Self {
        Self {
            max_extent: DEFAULT_MAX_EXTENT,
        }
    }
}

impl GraphicDriver for Skia {
    fn upload(&mut self, pixels: &PixelArray) -> Result<Box<dyn GraphicData>, GraphicError> {
        if pixels.is_empty() {
            return Err(GraphicError::Empty {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        check_extent(pixels, self.max_extent)?;
        // skia has no packed 24-bit type, so RGB is widened first.
        let (color_type, alpha_type, bytes, row_bytes) = match pixels.format() {
            PixelFormat::Rgba8 => (
                ColorType::RGBA8888,
                AlphaType::Unpremul,
                Cow::Borrowed(pixels.as_bytes()),
                pixels.row_bytes(),
            ),
            PixelFormat::Bgra8 => (
                ColorType::BGRA8888,
                AlphaType::Unpremul,
                Cow::Borrowed(pixels.as_bytes()),
                pixels.row_bytes(),
            ),
            PixelFormat::Gray8 => (
                ColorType::Gray8,
                AlphaType::Opaque,
                Cow::Borrowed(pixels.as_bytes()),
                pixels.row_bytes(),
            ),
            PixelFormat::Rgb8 => (
                ColorType::RGBA8888,
                AlphaType::Opaque,
                Cow::Owned(pixels.to_rgba_bytes()),
                pixels.width() as usize * 4,
            ),
        };
        let info = ImageInfo::new(
            ISize::new(pixels.width() as i32, pixels.height() as i32),
            color_type,
            alpha_type,
            None,
        );
        let image = images::raster_from_data(&info, Data::new_copy(&bytes), row_bytes)
            .ok_or_else(|| {
                GraphicError::Allocation(format!(
                    "skia refused a {}x{} {} image",
                    pixels.width(),
                    pixels.height(),
                    pixels.format()
                ))
            })?;
        Ok(Box::new(SkiaGraphic(image)))
    }
}

#[derive(Deref)]
pub struct SkiaGraphic(Image);

impl fmt::Debug for SkiaGraphic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkiaGraphic")
            .field("width", &self.0.width())
            .field("height", &self.0.height())
            .finish()
    }
}

impl GraphicData for SkiaGraphic {
    fn width(&self) -> u32 {
        self.0.width() as u32
    }

    fn height(&self) -> u32 {
        self.0.height() as u32
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
