use std::{collections::HashMap, fmt, hash::Hash};

use tracing::{debug, trace};

use crate::{
    events::PlatformEvent,
    window::{WeakWindow, Window},
};

/// Maps a backend's window key to the window it addresses.
///
/// Entries are weak: the registry can always reach a live window but never
/// keeps one alive.
pub(crate) struct WindowRegistry<K> {
    routes: HashMap<K, WeakWindow>,
}

impl<K> WindowRegistry<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    pub(crate) fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub(crate) fn register(&mut self, key: K, window: &Window) {
        if self.routes.insert(key, window.downgrade()).is_some() {
            debug!(?key, "replaced a stale route");
        }
    }

    /// The open window registered under `key`, if any.
    pub(crate) fn lookup(&self, key: &K) -> Option<Window> {
        self.routes
            .get(key)
            .and_then(WeakWindow::upgrade)
            .filter(|window| !window.is_closed())
    }

    /// Number of open windows.
    pub(crate) fn len(&self) -> usize {
        self.routes
            .values()
            .filter_map(WeakWindow::upgrade)
            .filter(|window| !window.is_closed())
            .count()
    }

    /// Forgets dropped and closed windows.
    pub(crate) fn prune(&mut self) {
        let before = self.routes.len();
        self.routes
            .retain(|_, weak| weak.upgrade().map_or(false, |window| !window.is_closed()));
        let pruned = before - self.routes.len();
        if pruned > 0 {
            trace!(pruned, "pruned window routes");
        }
    }

    /// Closes every window still registered; returns how many were open.
    pub(crate) fn release_all(&mut self) -> usize {
        let mut released = 0;
        for (_, weak) in self.routes.drain() {
            if let Some(window) = weak.upgrade() {
                if !window.is_closed() {
                    window.close();
                    released += 1;
                }
            }
        }
        released
    }

    /// Routes a drained batch in order. Returns whether the batch held
    /// anything; events that cannot be delivered are skipped.
    pub(crate) fn dispatch<I>(&mut self, batch: I) -> bool
    where
        I: IntoIterator<Item = PlatformEvent<K>>,
    {
        let mut drained = false;
        for platform_event in batch {
            drained = true;
            match platform_event {
                PlatformEvent::Window { target, event } => match self.lookup(&target) {
                    Some(window) => window.deliver(&event),
                    None => debug!(?target, ?event, "no open window for event, skipped"),
                },
                PlatformEvent::Unsupported {
                    target,
                    description,
                } => debug!(?target, %description, "unsupported event skipped"),
            }
        }
        self.prune();
        drained
    }
}
