pub mod cpu;
#[cfg(feature = "skia")]
pub mod skia;

use crate::{
    graphic::{GraphicData, GraphicError},
    pixels::PixelArray,
};

pub use cpu::{Cpu, CpuGraphic};
#[cfg(feature = "skia")]
pub use self::skia::{Skia, SkiaGraphic};

/// Largest edge length a graphic driver will allocate by default.
pub const DEFAULT_MAX_EXTENT: u32 = 16384;

pub(crate) fn check_extent(pixels: &PixelArray, max_extent: u32) -> Result<(), GraphicError> {
    if pixels.width() > max_extent || pixels.height() > max_extent {
        return Err(GraphicError::Allocation(format!(
            "{}x{} exceeds the {} pixel limit",
            pixels.width(),
            pixels.height(),
            max_extent
        )));
    }
    Ok(())
}

/// Converts pixel snapshots into backend-owned graphic payloads.
pub trait GraphicDriver {
    /// Copies `pixels` into a new payload. The source is only borrowed for the
    /// duration of the call.
    fn upload(&mut self, pixels: &PixelArray) -> Result<Box<dyn GraphicData>, GraphicError>;
}
