use crate::window::Window;

/// Events routed to a window's listeners by [`Driver::poll_events`].
///
/// [`Driver::poll_events`]: crate::Driver::poll_events
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    CloseRequested,
    Resized { width: u32, height: u32 },
    Focused(bool),
    Repaint,
    Key(KeyInput),
    CursorMoved { x: i32, y: i32 },
    CursorEntered,
    CursorLeft,
    MouseButton { button: MouseButton, pressed: bool },
    MouseWheel { dx: f32, dy: f32 },
}

/// A key transition. `key` is the backend's name for the physical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub text: Option<String>,
    pub pressed: bool,
    pub repeat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Receives the events addressed to the window it is attached to.
///
/// Every method has an empty default. `on_event` sees every event and fans
/// out to the specific callbacks; override it to handle events generically.
pub trait WindowListener {
    fn on_event(&mut self, window: &Window, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.on_close(window),
            WindowEvent::Resized { width, height } => self.on_resize(window, *width, *height),
            WindowEvent::Focused(focused) => self.on_focus(window, *focused),
            WindowEvent::Repaint => self.on_repaint(window),
            WindowEvent::Key(key) => self.on_key(window, key),
            WindowEvent::CursorMoved { x, y } => self.on_mouse_move(window, *x, *y),
            WindowEvent::CursorEntered => self.on_cursor_enter(window),
            WindowEvent::CursorLeft => self.on_cursor_leave(window),
            WindowEvent::MouseButton { button, pressed } => {
                self.on_mouse_button(window, *button, *pressed)
            }
            WindowEvent::MouseWheel { dx, dy } => self.on_mouse_wheel(window, *dx, *dy),
        }
    }

    fn on_close(&mut self, _window: &Window) {}
    fn on_resize(&mut self, _window: &Window, _width: u32, _height: u32) {}
    fn on_focus(&mut self, _window: &Window, _focused: bool) {}
    fn on_repaint(&mut self, _window: &Window) {}
    fn on_key(&mut self, _window: &Window, _key: &KeyInput) {}
    fn on_mouse_move(&mut self, _window: &Window, _x: i32, _y: i32) {}
    fn on_cursor_enter(&mut self, _window: &Window) {}
    fn on_cursor_leave(&mut self, _window: &Window) {}
    fn on_mouse_button(&mut self, _window: &Window, _button: MouseButton, _pressed: bool) {}
    fn on_mouse_wheel(&mut self, _window: &Window, _dx: f32, _dy: f32) {}
}

impl<F> WindowListener for F
where
    F: FnMut(&Window, &WindowEvent),
{
    fn on_event(&mut self, window: &Window, event: &WindowEvent) {
        self(window, event)
    }
}

/// One entry of a backend's pending queue, keyed by the backend's own
/// window identity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent<K> {
    Window { target: K, event: WindowEvent },
    Unsupported { target: Option<K>, description: String },
}
