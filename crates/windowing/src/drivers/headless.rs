//! In-memory driver with no platform behind it.
//!
//! Events are injected by the caller and delivered on the next poll, which
//! makes it the backend used by tests and CI runs.

use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::{Rc, Weak},
};

use renderer::{Cpu, Graphic, GraphicDriver, PixelArray, PixelFormat};
use tracing::{debug, info, trace, warn};

use crate::{
    display::{DisplayMode, DisplayModeVector},
    driver::{check_window_size, Driver, DriverError},
    events::{PlatformEvent, WindowEvent},
    routing::WindowRegistry,
    window::{NativeWindow, Window, WindowId, WindowState},
};

type EventQueue = RefCell<VecDeque<PlatformEvent<WindowId>>>;

#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub desktop: DisplayMode,
    pub full_screen_modes: DisplayModeVector,
    pub max_windows: Option<usize>,
    pub pixel_formats: Vec<PixelFormat>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        let modes = [(1920, 1080), (1280, 720), (800, 600), (640, 480)]
            .into_iter()
            .filter_map(|(width, height)| DisplayMode::new(width, height))
            .collect();
        Self {
            desktop: DisplayMode::new(1920, 1080).unwrap_or(DisplayMode::FALLBACK),
            full_screen_modes: modes,
            max_windows: None,
            pixel_formats: PixelFormat::ALL.to_vec(),
        }
    }
}

struct HeadlessWindow {
    id: WindowId,
    queue: Weak<EventQueue>,
}

impl NativeWindow for HeadlessWindow {
    fn set_title(&self, title: &str) {
        trace!(id = %self.id, title, "title changed");
    }

    fn request_repaint(&self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.borrow_mut().push_back(PlatformEvent::Window {
                target: self.id,
                event: WindowEvent::Repaint,
            });
        }
    }
}

pub struct HeadlessDriver {
    config: HeadlessConfig,
    registry: WindowRegistry<WindowId>,
    queue: Rc<EventQueue>,
    graphics: Cpu,
    icon: Option<u16>,
    pending_failure: Option<DriverError>,
}

impl HeadlessDriver {
    pub fn new() -> Self {
        Self::with_config(HeadlessConfig::default())
    }

    pub fn with_config(config: HeadlessConfig) -> Self {
        let graphics = Cpu::with_formats(&config.pixel_formats);
        Self {
            config,
            registry: WindowRegistry::new(),
            queue: Rc::new(RefCell::new(VecDeque::new())),
            graphics,
            icon: None,
            pending_failure: None,
        }
    }

    /// Queues `event` for `window`; it is delivered by the next poll.
    pub fn inject(&self, window: &Window, event: WindowEvent) {
        self.inject_to(window.id(), event);
    }

    /// Queues an event by id, whether or not such a window is still open.
    pub fn inject_to(&self, target: WindowId, event: WindowEvent) {
        self.queue
            .borrow_mut()
            .push_back(PlatformEvent::Window { target, event });
    }

    /// Queues an event kind the driver does not understand.
    pub fn inject_unsupported(&self, target: Option<WindowId>, description: impl Into<String>) {
        self.queue.borrow_mut().push_back(PlatformEvent::Unsupported {
            target,
            description: description.into(),
        });
    }

    /// Makes the next `create_window` call fail with `error`, whatever its
    /// arguments.
    pub fn fail_next_window(&mut self, error: DriverError) {
        self.pending_failure = Some(error);
    }

    /// Open windows reachable for event delivery.
    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    pub fn pending_events(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for HeadlessDriver {
    fn full_screen_modes(&self) -> DisplayModeVector {
        self.config.full_screen_modes.clone()
    }

    fn desktop_mode(&self) -> DisplayMode {
        self.config.desktop
    }

    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        resizable: bool,
        fullscreen: bool,
        title: &str,
    ) -> Result<Window, DriverError> {
        if let Some(error) = self.pending_failure.take() {
            warn!(%error, "injected window failure");
            return Err(error);
        }
        check_window_size(width, height)?;
        if let Some(max) = self.config.max_windows {
            if self.registry.len() >= max {
                return Err(DriverError::WindowLimit(max));
            }
        }

        let fullscreen_granted = fullscreen
            && DisplayMode::new(width, height)
                .map_or(false, |mode| self.config.full_screen_modes.contains(&mode));
        if fullscreen && !fullscreen_granted {
            warn!(width, height, "no full-screen mode of that size, opening windowed");
        }

        let id = WindowId::new();
        let window = Window::new(
            id,
            WindowState {
                width,
                height,
                title: title.to_owned(),
                resizable,
                fullscreen: fullscreen_granted,
                focused: false,
                icon: self.icon,
            },
            Box::new(HeadlessWindow {
                id,
                queue: Rc::downgrade(&self.queue),
            }),
        );
        self.registry.register(id, &window);
        info!(%id, width, height, title, "window created");
        Ok(window)
    }

    fn create_graphic_at(
        &mut self,
        pixels: &PixelArray,
        hx: i32,
        hy: i32,
    ) -> Result<Graphic, DriverError> {
        let data = self.graphics.upload(pixels)?;
        debug!(width = pixels.width(), height = pixels.height(), hx, hy, "graphic created");
        Ok(Graphic::new(data, hx, hy))
    }

    fn poll_events(&mut self) -> bool {
        let batch: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        self.registry.dispatch(batch)
    }

    fn set_windows_icon(&mut self, resource_id: u16) {
        self.icon = Some(resource_id);
    }
}

impl Drop for HeadlessDriver {
    fn drop(&mut self) {
        let released = self.registry.release_all();
        if released > 0 {
            info!(released, "closed windows still open at driver shutdown");
        }
    }
}
