use derive_deref::{Deref, DerefMut};
use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};
use renderer::{Graphic, GraphicDriver, PixelArray};
use tao::{
    dpi::PhysicalSize,
    event::{
        ElementState, Event as TaoEvent, MouseButton as TaoMouseButton, MouseScrollDelta,
        WindowEvent as TaoWindowEvent,
    },
    event_loop::{ControlFlow, EventLoop},
    monitor::{MonitorHandle, VideoMode},
    platform::run_return::EventLoopExtRunReturn,
    window::{Fullscreen, Icon, Window as TaoWindow, WindowBuilder as TaoWindowBuilder, WindowId as TaoWindowId},
};
use tracing::{debug, info, warn};

use crate::{
    display::{DisplayMode, DisplayModeVector},
    driver::{check_window_size, init_platform, Driver, DriverError},
    events::{KeyInput, MouseButton, PlatformEvent, WindowEvent},
    routing::WindowRegistry,
    window::{NativeWindow, Window, WindowId, WindowState},
};

#[cfg(feature = "skia")]
type GraphicsBackend = renderer::Skia;
#[cfg(not(feature = "skia"))]
type GraphicsBackend = renderer::Cpu;

#[derive(Deref, DerefMut)]
#[repr(transparent)]
struct OsWindow(TaoWindow);

impl NativeWindow for OsWindow {
    fn set_title(&self, title: &str) {
        self.0.set_title(title);
    }

    fn request_repaint(&self) {
        self.request_redraw();
    }

    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        Some(self.0.raw_window_handle())
    }
}

/// Driver for native windows through `tao`.
///
/// Must be created and used on the main thread.
pub struct TaoDriver {
    registry: WindowRegistry<TaoWindowId>,
    graphics: GraphicsBackend,
    icon: Option<u16>,
    max_windows: Option<usize>,
    event_loop: EventLoop<()>,
}

impl TaoDriver {
    /// Opens the platform event loop. Fails with
    /// [`DriverError::BackendUnavailable`] when the platform cannot be
    /// initialised, e.g. no display server.
    pub fn new() -> Result<Self, DriverError> {
        let event_loop = init_platform("failed to open the event loop", EventLoop::new)?;
        Ok(Self {
            registry: WindowRegistry::new(),
            graphics: GraphicsBackend::default(),
            icon: None,
            max_windows: None,
            event_loop,
        })
    }

    pub fn with_max_windows(mut self, max_windows: Option<usize>) -> Self {
        self.max_windows = max_windows;
        self
    }

    fn primary_monitor(&self) -> Option<MonitorHandle> {
        self.event_loop
            .primary_monitor()
            .or_else(|| self.event_loop.available_monitors().next())
    }

    fn exclusive_mode(&self, width: u32, height: u32) -> Option<VideoMode> {
        let wanted = PhysicalSize::new(width, height);
        self.primary_monitor()?
            .video_modes()
            .find(|mode| mode.size() == wanted)
    }

    #[cfg(target_os = "windows")]
    fn window_icon(&self) -> Option<(u16, Icon)> {
        use tao::platform::windows::IconExtWindows;

        let resource_id = self.icon?;
        match Icon::from_resource(resource_id, None) {
            Ok(icon) => Some((resource_id, icon)),
            Err(err) => {
                warn!(resource_id, %err, "failed to load window icon");
                None
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    fn window_icon(&self) -> Option<(u16, Icon)> {
        None
    }
}

impl Driver for TaoDriver {
    fn full_screen_modes(&self) -> DisplayModeVector {
        match self.primary_monitor() {
            Some(monitor) => monitor
                .video_modes()
                .filter_map(|mode| DisplayMode::new(mode.size().width, mode.size().height))
                .collect(),
            None => DisplayModeVector::new(),
        }
    }

    fn desktop_mode(&self) -> DisplayMode {
        self.primary_monitor()
            .and_then(|monitor| DisplayMode::new(monitor.size().width, monitor.size().height))
            .unwrap_or(DisplayMode::FALLBACK)
    }

    fn create_window(
        &mut self,
        width: u32,
        height: u32,
        resizable: bool,
        fullscreen: bool,
        title: &str,
    ) -> Result<Window, DriverError> {
        check_window_size(width, height)?;
        if let Some(max) = self.max_windows {
            if self.registry.len() >= max {
                return Err(DriverError::WindowLimit(max));
            }
        }

        let mut builder = TaoWindowBuilder::new()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(resizable);
        if fullscreen {
            match self.exclusive_mode(width, height) {
                Some(mode) => builder = builder.with_fullscreen(Some(Fullscreen::Exclusive(mode))),
                None => warn!(width, height, "no exclusive video mode of that size, opening windowed"),
            }
        }
        let mut icon = None;
        if let Some((resource_id, window_icon)) = self.window_icon() {
            builder = builder.with_window_icon(Some(window_icon));
            icon = Some(resource_id);
        }

        let os_window = builder
            .build(&self.event_loop)
            .map_err(|err| DriverError::Platform(err.to_string()))?;
        let size = os_window.inner_size();
        let key = os_window.id();
        let id = WindowId::new();
        let window = Window::new(
            id,
            WindowState {
                width: size.width,
                height: size.height,
                title: title.to_owned(),
                resizable: os_window.is_resizable(),
                fullscreen: os_window.fullscreen().is_some(),
                focused: false,
                icon,
            },
            Box::new(OsWindow(os_window)),
        );
        self.registry.register(key, &window);
        info!(%id, width = size.width, height = size.height, title, "window created");
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
        let mut batch = Vec::new();
        self.event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                TaoEvent::WindowEvent {
                    window_id, event, ..
                } => batch.push(match translate(&event) {
                    Some(event) => PlatformEvent::Window {
                        target: window_id,
                        event,
                    },
                    None => PlatformEvent::Unsupported {
                        target: Some(window_id),
                        description: format!("{:?}", event),
                    },
                }),
                TaoEvent::RedrawRequested(window_id) => batch.push(PlatformEvent::Window {
                    target: window_id,
                    event: WindowEvent::Repaint,
                }),
                TaoEvent::RedrawEventsCleared => *control_flow = ControlFlow::Exit,
                _ => (),
            }
        });
        self.registry.dispatch(batch)
    }

    fn set_windows_icon(&mut self, resource_id: u16) {
        self.icon = Some(resource_id);
    }
}

impl Drop for TaoDriver {
    fn drop(&mut self) {
        let released = self.registry.release_all();
        if released > 0 {
            info!(released, "closed windows still open at driver shutdown");
        }
    }
}

fn translate(event: &TaoWindowEvent<'_>) -> Option<WindowEvent> {
    let event = match event {
        TaoWindowEvent::CloseRequested => WindowEvent::CloseRequested,
        TaoWindowEvent::Resized(size) => WindowEvent::Resized {
            width: size.width,
            height: size.height,
        },
        TaoWindowEvent::Focused(focused) => WindowEvent::Focused(*focused),
        TaoWindowEvent::KeyboardInput { event, .. } => WindowEvent::Key(KeyInput {
            key: format!("{:?}", event.physical_key),
            text: event.text.map(str::to_owned),
            pressed: event.state == ElementState::Pressed,
            repeat: event.repeat,
        }),
        TaoWindowEvent::CursorMoved { position, .. } => WindowEvent::CursorMoved {
            x: position.x as i32,
            y: position.y as i32,
        },
        TaoWindowEvent::CursorEntered { .. } => WindowEvent::CursorEntered,
        TaoWindowEvent::CursorLeft { .. } => WindowEvent::CursorLeft,
        TaoWindowEvent::MouseInput { state, button, .. } => WindowEvent::MouseButton {
            button: match button {
                TaoMouseButton::Left => MouseButton::Left,
                TaoMouseButton::Right => MouseButton::Right,
                TaoMouseButton::Middle => MouseButton::Middle,
                TaoMouseButton::Other(code) => MouseButton::Other(*code),
                #[allow(unreachable_patterns)]
                _ => return None,
            },
            pressed: *state == ElementState::Pressed,
        },
        TaoWindowEvent::MouseWheel { delta, .. } => match delta {
            MouseScrollDelta::LineDelta(dx, dy) => WindowEvent::MouseWheel { dx: *dx, dy: *dy },
            MouseScrollDelta::PixelDelta(position) => WindowEvent::MouseWheel {
                dx: position.x as f32,
                dy: position.y as f32,
            },
            #[allow(unreachable_patterns)]
            _ => return None,
        },
        _ => return None,
    };
    Some(event)
}
