use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
    sync::atomic::{AtomicU32, Ordering},
};

use raw_window_handle::RawWindowHandle;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::events::{WindowEvent, WindowListener};

static CURRENT_WINDOW_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique identity of a window, stable for its whole life.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct WindowId(u32);

impl WindowId {
    pub(crate) fn new() -> WindowId {
        WindowId(CURRENT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub struct ListenerId(u64);

/// Backend half of a window: the platform object the handle owns.
pub(crate) trait NativeWindow {
    fn set_title(&self, title: &str);
    fn request_repaint(&self);
    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        None
    }
}

/// What the window currently is, as obtained from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowState {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
    pub fullscreen: bool,
    pub focused: bool,
    pub icon: Option<u16>,
}

type ListenerSlot = (ListenerId, Rc<RefCell<dyn WindowListener>>);

pub(crate) struct WindowShared {
    id: WindowId,
    state: RefCell<WindowState>,
    closed: Cell<bool>,
    native: RefCell<Option<Box<dyn NativeWindow>>>,
    listeners: RefCell<SmallVec<[ListenerSlot; 2]>>,
    next_listener: Cell<u64>,
}

impl Drop for WindowShared {
    fn drop(&mut self) {
        if !self.closed.get() {
            info!(id = %self.id, "window released");
        }
    }
}

/// Shared handle to an OS window created by a [`Driver`](crate::Driver).
///
/// Clones refer to the same window. The platform window goes away when the
/// last handle is dropped, when [`Window::close`] is called, or when the
/// driver that created it is dropped.
#[derive(Clone)]
pub struct Window {
    shared: Rc<WindowShared>,
}

impl Window {
    pub(crate) fn new(id: WindowId, state: WindowState, native: Box<dyn NativeWindow>) -> Self {
        Self {
            shared: Rc::new(WindowShared {
                id,
                state: RefCell::new(state),
                closed: Cell::new(false),
                native: RefCell::new(Some(native)),
                listeners: RefCell::new(SmallVec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    pub fn id(&self) -> WindowId {
        self.shared.id
    }

    pub fn size(&self) -> (u32, u32) {
        let state = self.shared.state.borrow();
        (state.width, state.height)
    }

    pub fn width(&self) -> u32 {
        self.shared.state.borrow().width
    }

    pub fn height(&self) -> u32 {
        self.shared.state.borrow().height
    }

    pub fn title(&self) -> String {
        self.shared.state.borrow().title.clone()
    }

    pub fn set_title(&self, title: impl AsRef<str>) {
        let title = title.as_ref();
        self.shared.state.borrow_mut().title = title.to_owned();
        if let Some(native) = self.shared.native.borrow().as_ref() {
            native.set_title(title);
        }
    }

    pub fn is_resizable(&self) -> bool {
        self.shared.state.borrow().resizable
    }

    pub fn is_fullscreen(&self) -> bool {
        self.shared.state.borrow().fullscreen
    }

    pub fn has_focus(&self) -> bool {
        self.shared.state.borrow().focused
    }

    /// Icon resource that was applied when the window was created.
    pub fn icon_resource(&self) -> Option<u16> {
        self.shared.state.borrow().icon
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.get()
    }

    /// Destroys the platform window and detaches all listeners. The handle
    /// stays usable as a value; further operations do nothing.
    pub fn close(&self) {
        if self.shared.closed.replace(true) {
            return;
        }
        let native = self.shared.native.borrow_mut().take();
        drop(native);
        self.shared.listeners.borrow_mut().clear();
        info!(id = %self.shared.id, "window closed");
    }

    /// Asks the backend for a `Repaint` event on a later poll.
    pub fn request_repaint(&self) {
        if let Some(native) = self.shared.native.borrow().as_ref() {
            native.request_repaint();
        }
    }

    pub fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        self.shared
            .native
            .borrow()
            .as_ref()
            .and_then(|native| native.raw_window_handle())
    }

    pub fn add_listener<L: WindowListener + 'static>(&self, listener: L) -> ListenerId {
        self.add_shared_listener(Rc::new(RefCell::new(listener)))
    }

    /// Attaches a listener the caller keeps a handle to, so its state can be
    /// inspected between polls.
    pub fn add_shared_listener<L: WindowListener + 'static>(
        &self,
        listener: Rc<RefCell<L>>,
    ) -> ListenerId {
        let id = ListenerId(self.shared.next_listener.get());
        self.shared.next_listener.set(id.0 + 1);
        if self.is_closed() {
            warn!(window = %self.shared.id, "listener attached to a closed window");
            return id;
        }
        let listener: Rc<RefCell<dyn WindowListener>> = listener;
        self.shared.listeners.borrow_mut().push((id, listener));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(slot, _)| *slot != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }

    /// Number of live handles, the caller's included.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.shared)
    }

    pub fn ptr_eq(a: &Window, b: &Window) -> bool {
        Rc::ptr_eq(&a.shared, &b.shared)
    }

    pub(crate) fn downgrade(&self) -> WeakWindow {
        WeakWindow(Rc::downgrade(&self.shared))
    }

    /// Applies the event to the window state, then runs the listeners that
    /// were attached when delivery started, in attachment order.
    pub(crate) fn deliver(&self, event: &WindowEvent) {
        if self.is_closed() {
            return;
        }
        {
            let mut state = self.shared.state.borrow_mut();
            match event {
                WindowEvent::Resized { width, height } => {
                    state.width = *width;
                    state.height = *height;
                }
                WindowEvent::Focused(focused) => state.focused = *focused,
                _ => {}
            }
        }

        let listeners: SmallVec<[Rc<RefCell<dyn WindowListener>>; 2]> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            if self.is_closed() {
                break;
            }
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.on_event(self, event),
                Err(_) => debug!(window = %self.shared.id, ?event, "listener busy, skipped"),
            }
        }
    }
}

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        Window::ptr_eq(self, other)
    }
}

impl Eq for Window {}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.shared.id)
            .field("state", &*self.shared.state.borrow())
            .field("closed", &self.shared.closed.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Non-owning window reference held by the routing registry.
#[derive(Clone)]
pub(crate) struct WeakWindow(Weak<WindowShared>);

impl WeakWindow {
    pub(crate) fn upgrade(&self) -> Option<Window> {
        self.0.upgrade().map(|shared| Window { shared })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::events::KeyInput;

    pub(crate) struct NullNative;

    impl NativeWindow for NullNative {
        fn set_title(&self, _: &str) {}
        fn request_repaint(&self) {}
    }

    pub(crate) fn test_window(width: u32, height: u32) -> Window {
        Window::new(
            WindowId::new(),
            WindowState {
                width,
                height,
                title: "test".to_owned(),
                resizable: true,
                fullscreen: false,
                focused: false,
                icon: None,
            },
            Box::new(NullNative),
        )
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<WindowEvent>,
    }

    impl WindowListener for Recorder {
        fn on_event(&mut self, _: &Window, event: &WindowEvent) {
            self.events.push(event.clone());
        }
    }

    #[test]
    fn ids_are_unique() {
        let a = WindowId::new();
        let b = WindowId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn resize_updates_state_before_listeners_run() {
        let window = test_window(100, 100);
        let seen = Rc::new(Cell::new((0, 0)));
        let sink = Rc::clone(&seen);
        window.add_listener(move |window: &Window, _: &WindowEvent| sink.set(window.size()));

        window.deliver(&WindowEvent::Resized {
            width: 300,
            height: 200,
        });
        assert_eq!(window.size(), (300, 200));
        assert_eq!(seen.get(), (300, 200));
    }

    #[test]
    fn listeners_run_in_attachment_order() {
        let window = test_window(10, 10);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            window.add_listener(move |_: &Window, _: &WindowEvent| order.borrow_mut().push(tag));
        }
        window.deliver(&WindowEvent::Repaint);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let window = test_window(10, 10);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let id = window.add_shared_listener(Rc::clone(&recorder));

        window.deliver(&WindowEvent::Focused(true));
        assert!(window.remove_listener(id));
        assert!(!window.remove_listener(id));
        window.deliver(&WindowEvent::Focused(false));

        assert_eq!(recorder.borrow().events, vec![WindowEvent::Focused(true)]);
        assert!(!window.has_focus());
    }

    #[test]
    fn listener_added_during_dispatch_sees_next_event() {
        let window = test_window(10, 10);
        let late = Rc::new(RefCell::new(Recorder::default()));
        let pending = Rc::new(RefCell::new(Some(Rc::clone(&late))));
        window.add_listener(move |window: &Window, _: &WindowEvent| {
            if let Some(late) = pending.borrow_mut().take() {
                window.add_shared_listener(late);
            }
        });

        window.deliver(&WindowEvent::CursorEntered);
        assert!(late.borrow().events.is_empty());
        window.deliver(&WindowEvent::CursorLeft);
        assert_eq!(late.borrow().events, vec![WindowEvent::CursorLeft]);
    }

    #[test]
    fn listener_removed_during_dispatch_gets_the_event_in_flight() {
        let window = test_window(10, 10);
        let doomed: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let target = Rc::clone(&doomed);
        window.add_listener(move |window: &Window, _: &WindowEvent| {
            if let Some(id) = target.take() {
                assert!(window.remove_listener(id));
            }
        });
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        doomed.set(Some(window.add_shared_listener(Rc::clone(&recorder))));

        window.deliver(&WindowEvent::CursorEntered);
        assert_eq!(window.listener_count(), 1);
        assert_eq!(recorder.borrow().events, vec![WindowEvent::CursorEntered]);

        window.deliver(&WindowEvent::CursorLeft);
        assert_eq!(recorder.borrow().events, vec![WindowEvent::CursorEntered]);
    }

    #[test]
    fn busy_listener_is_skipped_on_reentrant_delivery() {
        let window = test_window(10, 10);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        window.add_listener(move |window: &Window, event: &WindowEvent| {
            counter.set(counter.get() + 1);
            if *event == WindowEvent::Repaint {
                window.deliver(&WindowEvent::Focused(true));
            }
        });
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        window.add_shared_listener(Rc::clone(&recorder));

        window.deliver(&WindowEvent::Repaint);
        assert_eq!(calls.get(), 1);
        assert_eq!(
            recorder.borrow().events,
            vec![WindowEvent::Focused(true), WindowEvent::Repaint]
        );
        assert!(window.has_focus());
    }

    #[test]
    fn closing_stops_delivery_and_detaches_listeners() {
        let window = test_window(10, 10);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        window.add_listener(|window: &Window, event: &WindowEvent| {
            if *event == WindowEvent::CloseRequested {
                window.close();
            }
        });
        window.add_shared_listener(Rc::clone(&recorder));

        window.deliver(&WindowEvent::CloseRequested);
        assert!(window.is_closed());
        assert_eq!(window.listener_count(), 0);
        assert!(recorder.borrow().events.is_empty());

        window.deliver(&WindowEvent::Key(KeyInput {
            key: "KeyA".to_owned(),
            text: Some("a".to_owned()),
            pressed: true,
            repeat: false,
        }));
        assert!(recorder.borrow().events.is_empty());
    }

    #[test]
    fn weak_reference_does_not_keep_window_alive() {
        let window = test_window(10, 10);
        let weak = window.downgrade();
        assert_eq!(window.handle_count(), 1);
        assert!(weak.upgrade().is_some());
        drop(window);
        assert!(weak.upgrade().is_none());
    }
}
