//! The driver boundary between applications and a windowing platform.
//!
//! A [`Driver`] creates [`Window`]s and [`Graphic`](renderer::Graphic)s and
//! pumps the platform event queue, delivering each event to the
//! [`WindowListener`]s attached to its window.

pub mod display;
pub mod driver;
pub mod drivers;
pub mod events;
mod routing;
pub mod window;

pub use display::{DisplayMode, DisplayModeVector};
pub use driver::{Driver, DriverError};
pub use drivers::{HeadlessConfig, HeadlessDriver};
#[cfg(feature = "native")]
pub use drivers::TaoDriver;
pub use events::{KeyInput, MouseButton, WindowEvent, WindowListener};
pub use window::{ListenerId, Window, WindowId};

use utilities::{BackendKind, Settings};

/// Builds the driver named by `settings.backend`.
pub fn create_driver(settings: &Settings) -> Result<Box<dyn Driver>, DriverError> {
    match settings.backend {
        BackendKind::Headless => {
            let config = HeadlessConfig {
                max_windows: settings.max_windows,
                ..HeadlessConfig::default()
            };
            Ok(Box::new(HeadlessDriver::with_config(config)))
        }
        BackendKind::Native => native_driver(settings),
    }
}

#[cfg(feature = "native")]
fn native_driver(settings: &Settings) -> Result<Box<dyn Driver>, DriverError> {
    Ok(Box::new(
        TaoDriver::new()?.with_max_windows(settings.max_windows),
    ))
}

#[cfg(not(feature = "native"))]
fn native_driver(_settings: &Settings) -> Result<Box<dyn Driver>, DriverError> {
    Err(DriverError::BackendUnavailable(
        "built without the `native` feature".to_owned(),
    ))
}
