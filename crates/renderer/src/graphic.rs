use std::{any::Any, fmt, rc::Rc};

use thiserror::Error;

use crate::pixels::PixelFormat;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphicError {
    #[error("pixel format {0} is not supported by this backend")]
    UnsupportedFormat(PixelFormat),
    #[error("cannot create a graphic from an empty {width}x{height} pixel array")]
    Empty { width: u32, height: u32 },
    #[error("backend allocation failed: {0}")]
    Allocation(String),
}

/// Backend payload behind a [`Graphic`].
pub trait GraphicData: Any + fmt::Debug {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn as_any(&self) -> &dyn Any;
}

struct GraphicInner {
    hotspot: (i32, i32),
    data: Box<dyn GraphicData>,
}

impl Drop for GraphicInner {
    fn drop(&mut self) {
        tracing::trace!(
            width = self.data.width(),
            height = self.data.height(),
            "graphic released"
        );
    }
}

/// Shared handle to a backend-renderable image.
///
/// Cloning is cheap; the payload is released with the last clone.
#[derive(Clone)]
pub struct Graphic {
    inner: Rc<GraphicInner>,
}

impl Graphic {
    pub fn new(data: Box<dyn GraphicData>, hx: i32, hy: i32) -> Self {
        Self {
            inner: Rc::new(GraphicInner {
                hotspot: (hx, hy),
                data,
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.data.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.data.height()
    }

    /// Anchor point, in pixels from the top-left corner.
    pub fn hotspot(&self) -> (i32, i32) {
        self.inner.hotspot
    }

    pub fn data(&self) -> &dyn GraphicData {
        &*self.inner.data
    }

    pub fn downcast_ref<T: GraphicData>(&self) -> Option<&T> {
        self.inner.data.as_any().downcast_ref::<T>()
    }

    pub fn ptr_eq(a: &Graphic, b: &Graphic) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }
}

impl fmt::Debug for Graphic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graphic")
            .field("hotspot", &self.inner.hotspot)
            .field("data", &self.inner.data)
            .finish()
    }
}
