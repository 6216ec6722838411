use std::panic::{self, UnwindSafe};

use renderer::{Graphic, GraphicError, PixelArray};
use thiserror::Error;

use crate::{
    display::{DisplayMode, DisplayModeVector},
    window::Window,
};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot create a {width}x{height} window")]
    InvalidWindowSize { width: u32, height: u32 },
    #[error("window limit of {0} reached")]
    WindowLimit(usize),
    #[error("platform refused the request: {0}")]
    Platform(String),
    #[error(transparent)]
    Graphic(#[from] GraphicError),
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// The platform boundary: creates windows and graphics and pumps the
/// platform event queue.
///
/// A driver is confined to the thread that owns the platform event queue and
/// is never duplicated. When it is dropped, windows it created that are still
/// open are closed.
pub trait Driver {
    /// Resolutions usable for exclusive full-screen output on the primary
    /// display. Empty when the backend has no full-screen support.
    fn full_screen_modes(&self) -> DisplayModeVector;

    /// The current desktop resolution. Never fails.
    fn desktop_mode(&self) -> DisplayMode;

    /// Opens a window registered for event delivery.
    ///
    /// `resizable` and `fullscreen` are requests; the returned window reports
    /// what the platform actually granted.
    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        resizable: bool,
        fullscreen: bool,
        title: &str,
    ) -> Result<Window, DriverError>;

    /// Same as [`create_graphic_at`](Driver::create_graphic_at) with the
    /// hotspot at the origin.
    fn create_graphic(&mut self, pixels: &PixelArray) -> Result<Graphic, DriverError> {
        self.create_graphic_at(pixels, 0, 0)
    }

    /// Converts a snapshot of `pixels` into a renderable graphic anchored at
    /// `(hx, hy)`.
    fn create_graphic_at(
        &mut self,
        pixels: &PixelArray,
        hx: i32,
        hy: i32,
    ) -> Result<Graphic, DriverError>;

    /// Drains the pending platform events without blocking, running the
    /// listeners of each target window. Returns `false` if nothing was
    /// pending.
    fn poll_events(&mut self) -> bool;

    /// Icon resource for windows created after this call. Only meaningful on
    /// Windows.
    fn set_windows_icon(&mut self, _resource_id: u16) {}
}

pub(crate) fn check_window_size(width: u32, height: u32) -> Result<(), DriverError> {
    if width == 0 || height == 0 {
        return Err(DriverError::InvalidWindowSize { width, height });
    }
    Ok(())
}

/// Runs platform initialisation that reports failure by panicking, turning
/// the panic into `BackendUnavailable`.
#[cfg_attr(not(feature = "native"), allow(dead_code))]
pub(crate) fn init_platform<T, F>(what: &str, init: F) -> Result<T, DriverError>
where
    F: FnOnce() -> T + UnwindSafe,
{
    panic::catch_unwind(init).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|reason| (*reason).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_owned());
        DriverError::BackendUnavailable(format!("{what}: {reason}"))
    })
}
