use std::{cell::Cell, rc::Rc};

use application::{run_app, Application, ApplicationContext, ControlFlow};
use renderer::{Graphic, PixelArray, PixelArrayError, Rgba};
use tracing::info;
use windowing::{KeyInput, Window, WindowListener};

/// Ticks to run when no native window exists to close.
const HEADLESS_TICKS: u32 = 120;

pub struct MainWindow {
    close_requested: Rc<Cell<bool>>,
}

impl WindowListener for MainWindow {
    fn on_close(&mut self, window: &Window) {
        info!(id = %window.id(), "close requested");
        self.close_requested.set(true);
    }

    fn on_resize(&mut self, _: &Window, width: u32, height: u32) {
        info!(width, height, "resized");
    }

    fn on_key(&mut self, _: &Window, key: &KeyInput) {
        if key.pressed && key.key == "Escape" {
            self.close_requested.set(true);
        }
    }
}

#[derive(Default)]
struct BasicApplication {
    window: Option<Window>,
    cursor: Option<Graphic>,
    close_requested: Rc<Cell<bool>>,
    ticks: u32,
}

impl Application for BasicApplication {
    type Data = Self;

    fn initialize(mut ctx: ApplicationContext<'_, Self::Data>) -> anyhow::Result<()> {
        let desktop = ctx.driver().desktop_mode();
        let modes = ctx.driver().full_screen_modes();
        info!(%desktop, full_screen_modes = modes.len(), "display");

        let window = ctx
            .driver()
            .create_window(640, 480, false, false, "Main Window")?;
        window.add_listener(MainWindow {
            close_requested: Rc::clone(&ctx.close_requested),
        });
        let cursor = ctx.driver().create_graphic_at(&checkerboard(16)?, 8, 8)?;

        ctx.window = Some(window);
        ctx.cursor = Some(cursor);
        Ok(())
    }

    fn update(mut ctx: ApplicationContext<'_, Self::Data>) -> ControlFlow {
        ctx.ticks += 1;
        let headless = ctx
            .window
            .as_ref()
            .map_or(true, |window| window.raw_window_handle().is_none());
        if ctx.close_requested.get() || (headless && ctx.ticks >= HEADLESS_TICKS) {
            ControlFlow::Exit
        } else {
            ControlFlow::Continue
        }
    }

    fn shutdown(ctx: ApplicationContext<'_, Self::Data>) {
        info!(ticks = ctx.ticks, "shutting down");
    }
}

fn checkerboard(size: u32) -> Result<PixelArray, PixelArrayError> {
    let pixels: Vec<Rgba> = (0..size * size)
        .map(|i| {
            if ((i % size) / 4 + (i / size) / 4) % 2 == 0 {
                Rgba::BLACK
            } else {
                Rgba::WHITE
            }
        })
        .collect();
    PixelArray::from_rgba(size, size, &pixels)
}

run_app!(BasicApplication);
