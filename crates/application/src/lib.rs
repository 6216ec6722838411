use std::{
    ops::{Deref, DerefMut},
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info};
use utilities::{logging, Settings};
use windowing::Driver;

/// What the run loop should do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

pub struct ApplicationContext<'a, T> {
    driver: &'a mut dyn Driver,
    data: &'a mut T,
}

impl<'a, T> ApplicationContext<'a, T> {
    pub(crate) fn new(driver: &'a mut dyn Driver, data: &'a mut T) -> Self {
        Self { driver, data }
    }

    pub fn driver(&mut self) -> &mut dyn Driver {
        &mut *self.driver
    }
}

impl<'a, T> Deref for ApplicationContext<'a, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        self.data
    }
}
impl<'a, T> DerefMut for ApplicationContext<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.data
    }
}

pub trait Application {
    type Data: Default;
    fn initialize(_: ApplicationContext<'_, Self::Data>) -> anyhow::Result<()> {
        Ok(())
    }
    /// Runs once per tick, after that tick's events were delivered.
    fn update(_: ApplicationContext<'_, Self::Data>) -> ControlFlow {
        ControlFlow::Continue
    }
    fn shutdown(_: ApplicationContext<'_, Self::Data>) {}
}

/// Drives `A` on an existing driver: one `poll_events` per tick, then
/// `update`. Ticks with no pending events sleep out the rest of `tick`.
pub fn run_with_driver<A>(driver: &mut dyn Driver, tick: Duration) -> anyhow::Result<A::Data>
where
    A: Application,
{
    let mut data = A::Data::default();
    A::initialize(ApplicationContext::new(driver, &mut data))?;

    let mut ticks: u64 = 0;
    loop {
        let started = Instant::now();
        let had_events = driver.poll_events();
        ticks += 1;
        if A::update(ApplicationContext::new(driver, &mut data)) == ControlFlow::Exit {
            break;
        }
        if !had_events {
            if let Some(rest) = tick.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
    debug!(ticks, "run loop exited");

    A::shutdown(ApplicationContext::new(driver, &mut data));
    Ok(data)
}

/// Runs the application
pub fn run_application<A>() -> anyhow::Result<()>
where
    A: Application,
{
    let settings = Settings::load()?;
    let _logging = logging::init(&settings)?;
    let mut driver = windowing::create_driver(&settings)?;
    info!(backend = %settings.backend, tick_hz = settings.tick_rate_hz, "driver ready");

    run_with_driver::<A>(driver.as_mut(), settings.tick_duration())?;
    Ok(())
}

#[macro_export]
macro_rules! run_app {
    ($APP_TYPE:ty) => {
        fn main() -> ::anyhow::Result<()> {
            ::application::run_application::<$APP_TYPE>()
        }
    };
}
