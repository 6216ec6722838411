//! Pixel sources and the backend-renderable graphics created from them.

pub mod colors;
pub mod drivers;
pub mod graphic;
pub mod pixels;

pub use colors::Rgba;
pub use drivers::{Cpu, CpuGraphic, GraphicDriver};
#[cfg(feature = "skia")]
pub use drivers::{Skia, SkiaGraphic};
pub use graphic::{Graphic, GraphicData, GraphicError};
pub use pixels::{PixelArray, PixelArrayError, PixelFormat};
