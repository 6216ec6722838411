use std::{cell::RefCell, rc::Rc};

use renderer::{CpuGraphic, GraphicError, PixelArray, PixelFormat, Rgba};
use windowing::{
    DisplayMode, Driver, DriverError, HeadlessConfig, HeadlessDriver, KeyInput, MouseButton,
    Window, WindowEvent, WindowListener,
};

#[derive(Default)]
struct Recorder {
    closes: usize,
    resizes: Vec<(u32, u32)>,
    buttons: Vec<(MouseButton, bool)>,
    keys: Vec<String>,
    repaints: usize,
}

impl WindowListener for Recorder {
    fn on_close(&mut self, _: &Window) {
        self.closes += 1;
    }

    fn on_resize(&mut self, _: &Window, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn on_key(&mut self, _: &Window, key: &KeyInput) {
        self.keys.push(key.key.clone());
    }

    fn on_mouse_button(&mut self, _: &Window, button: MouseButton, pressed: bool) {
        self.buttons.push((button, pressed));
    }

    fn on_repaint(&mut self, _: &Window) {
        self.repaints += 1;
    }
}

fn attach(window: &Window) -> Rc<RefCell<Recorder>> {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    window.add_shared_listener(Rc::clone(&recorder));
    recorder
}

#[test]
fn desktop_mode_is_never_degenerate() {
    let driver = HeadlessDriver::new();
    let mode = driver.desktop_mode();
    assert!(mode.width() > 0);
    assert!(mode.height() > 0);
}

#[test]
fn empty_queue_polls_false_without_callbacks() {
    let mut driver = HeadlessDriver::new();
    let window = driver.create_window(320, 240, true, false, "idle").unwrap();
    let recorder = attach(&window);

    assert!(!driver.poll_events());
    let recorder = recorder.borrow();
    assert_eq!(recorder.closes, 0);
    assert!(recorder.resizes.is_empty());
    assert_eq!(recorder.repaints, 0);
}

#[test]
fn fixed_size_window_matches_request() {
    let mut driver = HeadlessDriver::new();
    let window = driver.create_window(640, 480, false, false, "t").unwrap();
    assert_eq!(window.size(), (640, 480));
    assert!(!window.is_resizable());
    assert!(!window.is_fullscreen());
    assert_eq!(window.title(), "t");
    assert!(!window.is_closed());
    assert!(window.raw_window_handle().is_none());
}

#[test]
fn fullscreen_is_granted_only_for_advertised_modes() {
    let mut driver = HeadlessDriver::new();
    let granted = driver.create_window(1280, 720, false, true, "fs").unwrap();
    assert!(granted.is_fullscreen());

    let refused = driver.create_window(1000, 700, false, true, "odd").unwrap();
    assert!(!refused.is_fullscreen());
    assert_eq!(refused.size(), (1000, 700));
}

#[test]
fn default_hotspot_is_origin() {
    let mut driver = HeadlessDriver::new();
    let pixels = PixelArray::filled(4, 3, Rgba::GOLD).unwrap();
    let plain = driver.create_graphic(&pixels).unwrap();
    let anchored = driver.create_graphic_at(&pixels, 0, 0).unwrap();

    assert_eq!(plain.hotspot(), (0, 0));
    assert_eq!(plain.hotspot(), anchored.hotspot());
    assert_eq!(
        plain.downcast_ref::<CpuGraphic>(),
        anchored.downcast_ref::<CpuGraphic>()
    );

    let cursor = driver.create_graphic_at(&pixels, 2, 1).unwrap();
    assert_eq!(cursor.hotspot(), (2, 1));
    assert_eq!((cursor.width(), cursor.height()), (4, 3));
}

#[test]
fn graphic_creation_failures_are_typed() {
    let mut driver = HeadlessDriver::with_config(HeadlessConfig {
        pixel_formats: vec![PixelFormat::Rgba8],
        ..HeadlessConfig::default()
    });
    let gray = PixelArray::new(2, 2, PixelFormat::Gray8, vec![0u8; 4]).unwrap();
    assert!(matches!(
        driver.create_graphic(&gray),
        Err(DriverError::Graphic(GraphicError::UnsupportedFormat(PixelFormat::Gray8)))
    ));

    let empty = PixelArray::filled(0, 0, Rgba::RED).unwrap();
    assert!(matches!(
        driver.create_graphic(&empty),
        Err(DriverError::Graphic(GraphicError::Empty { .. }))
    ));
}

#[test]
fn full_screen_modes_are_stable() {
    let driver = HeadlessDriver::new();
    let first = driver.full_screen_modes();
    let second = driver.full_screen_modes();
    assert_eq!(first, second);
    assert!(first.contains(&DisplayMode::new(800, 600).unwrap()));
}

#[test]
fn backend_without_full_screen_reports_no_modes() {
    let mut driver = HeadlessDriver::with_config(HeadlessConfig {
        full_screen_modes: Default::default(),
        ..HeadlessConfig::default()
    });
    assert!(driver.full_screen_modes().is_empty());
    let window = driver.create_window(640, 480, false, true, "fs").unwrap();
    assert!(!window.is_fullscreen());
}

#[test]
fn dropping_one_window_leaves_the_other_live() {
    let mut driver = HeadlessDriver::new();
    let first = driver.create_window(200, 200, true, false, "first").unwrap();
    let second = driver.create_window(300, 300, true, false, "second").unwrap();
    let first_id = first.id();
    let recorder = attach(&second);
    assert_eq!(driver.window_count(), 2);

    drop(first);
    assert_eq!(driver.window_count(), 1);

    driver.inject_to(first_id, WindowEvent::CloseRequested);
    driver.inject(&second, WindowEvent::Resized { width: 320, height: 310 });
    assert!(driver.poll_events());
    assert_eq!(recorder.borrow().resizes, vec![(320, 310)]);
    assert_eq!(second.size(), (320, 310));

    driver.inject(&second, WindowEvent::CloseRequested);
    assert!(driver.poll_events());
    assert_eq!(recorder.borrow().closes, 1);
    assert!(!second.is_closed());
}

#[test]
fn failed_creation_registers_nothing() {
    let mut driver = HeadlessDriver::new();
    assert!(matches!(
        driver.create_window(0, 480, false, false, "bad"),
        Err(DriverError::InvalidWindowSize { width: 0, height: 480 })
    ));
    driver.fail_next_window(DriverError::Platform("out of handles".to_owned()));
    assert!(matches!(
        driver.create_window(640, 480, false, false, "refused"),
        Err(DriverError::Platform(_))
    ));
    assert_eq!(driver.window_count(), 0);
    assert!(!driver.poll_events());

    // the injected failure is consumed by one call
    let window = driver.create_window(640, 480, false, false, "ok").unwrap();
    assert_eq!(driver.window_count(), 1);
    drop(window);
}

#[test]
fn injected_failure_is_consumed_by_an_invalid_request() {
    let mut driver = HeadlessDriver::new();
    driver.fail_next_window(DriverError::Platform("no surface".to_owned()));
    assert!(matches!(
        driver.create_window(0, 0, false, false, "bad"),
        Err(DriverError::Platform(_))
    ));
    assert!(matches!(
        driver.create_window(0, 0, false, false, "bad"),
        Err(DriverError::InvalidWindowSize { width: 0, height: 0 })
    ));
    let window = driver.create_window(640, 480, false, false, "ok").unwrap();
    assert_eq!(window.size(), (640, 480));
    assert_eq!(driver.window_count(), 1);
}

#[test]
fn unsupported_events_are_skipped() {
    let mut driver = HeadlessDriver::new();
    let window = driver.create_window(100, 100, true, false, "w").unwrap();
    let recorder = attach(&window);

    driver.inject_unsupported(Some(window.id()), "tablet proximity");
    driver.inject(
        &window,
        WindowEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        },
    );
    driver.inject_unsupported(None, "display reconfigured");

    assert!(driver.poll_events());
    assert_eq!(recorder.borrow().buttons, vec![(MouseButton::Left, true)]);
    assert_eq!(driver.pending_events(), 0);
    assert!(!driver.poll_events());
}

#[test]
fn only_unsupported_events_still_count_as_drained() {
    let mut driver = HeadlessDriver::new();
    driver.inject_unsupported(None, "gamepad connected");
    assert!(driver.poll_events());
    assert!(!driver.poll_events());
}

#[test]
fn events_arrive_in_queue_order() {
    let mut driver = HeadlessDriver::new();
    let window = driver.create_window(100, 100, true, false, "w").unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&order);
    window.add_listener(move |_: &Window, event: &WindowEvent| sink.borrow_mut().push(event.clone()));

    let events = vec![
        WindowEvent::Focused(true),
        WindowEvent::CursorEntered,
        WindowEvent::CursorMoved { x: 4, y: 9 },
        WindowEvent::Key(KeyInput {
            key: "Space".to_owned(),
            text: Some(" ".to_owned()),
            pressed: true,
            repeat: false,
        }),
        WindowEvent::MouseWheel { dx: 0.0, dy: -1.0 },
        WindowEvent::CursorLeft,
    ];
    for event in &events {
        driver.inject(&window, event.clone());
    }
    assert!(driver.poll_events());
    assert_eq!(*order.borrow(), events);
    assert!(window.has_focus());
}

#[test]
fn repaint_requests_arrive_on_the_next_poll() {
    let mut driver = HeadlessDriver::new();
    let window = driver.create_window(100, 100, true, false, "w").unwrap();
    let recorder = attach(&window);
    window.add_listener(|window: &Window, event: &WindowEvent| {
        if let WindowEvent::Key(_) = event {
            window.request_repaint();
        }
    });

    driver.inject(
        &window,
        WindowEvent::Key(KeyInput {
            key: "KeyR".to_owned(),
            text: Some("r".to_owned()),
            pressed: true,
            repeat: false,
        }),
    );
    assert!(driver.poll_events());
    assert_eq!(recorder.borrow().keys, vec!["KeyR".to_owned()]);
    assert_eq!(recorder.borrow().repaints, 0);

    assert!(driver.poll_events());
    assert_eq!(recorder.borrow().repaints, 1);
    assert!(!driver.poll_events());
}

#[test]
fn closed_windows_stop_receiving_and_unregister() {
    let mut driver = HeadlessDriver::new();
    let window = driver.create_window(100, 100, true, false, "w").unwrap();
    let recorder = attach(&window);
    window.close();
    assert_eq!(driver.window_count(), 0);

    driver.inject(&window, WindowEvent::CloseRequested);
    assert!(driver.poll_events());
    assert_eq!(recorder.borrow().closes, 0);
}

#[test]
fn icon_applies_only_to_later_windows() {
    let mut driver = HeadlessDriver::new();
    let before = driver.create_window(100, 100, true, false, "before").unwrap();
    driver.set_windows_icon(101);
    let after = driver.create_window(100, 100, true, false, "after").unwrap();

    assert_eq!(before.icon_resource(), None);
    assert_eq!(after.icon_resource(), Some(101));
}

#[test]
fn dropping_the_driver_closes_open_windows() {
    let mut driver = HeadlessDriver::new();
    let window = driver.create_window(100, 100, true, false, "w").unwrap();
    attach(&window);
    assert_eq!(window.handle_count(), 1);

    drop(driver);
    assert!(window.is_closed());
    assert_eq!(window.listener_count(), 0);
    window.request_repaint();
    window.set_title("still a value");
    assert_eq!(window.title(), "still a value");
}

#[test]
fn works_through_a_trait_object() {
    let mut driver: Box<dyn Driver> = Box::new(HeadlessDriver::new());
    let window = driver.create_window(64, 64, false, false, "dyn").unwrap();
    let graphic = driver.create_graphic(&PixelArray::filled(1, 1, Rgba::WHITE).unwrap()).unwrap();
    assert_eq!(window.size(), (64, 64));
    assert_eq!(graphic.hotspot(), (0, 0));
    driver.set_windows_icon(7);
    assert!(!driver.poll_events());
}
