use std::fmt;

use derive_deref::Deref;

/// A display resolution in physical pixels. Both extents are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayMode {
    width: u32,
    height: u32,
}

impl DisplayMode {
    /// Reported as the desktop mode when the platform cannot name a monitor.
    pub const FALLBACK: DisplayMode = DisplayMode {
        width: 640,
        height: 480,
    };

    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Ordered list of display modes. Order is whatever the backend reported;
/// collecting drops repeated sizes and keeps the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct DisplayModeVector(Vec<DisplayMode>);

impl DisplayModeVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_unique(&mut self, mode: DisplayMode) -> bool {
        if self.0.contains(&mode) {
            return false;
        }
        self.0.push(mode);
        true
    }

    pub fn into_vec(self) -> Vec<DisplayMode> {
        self.0
    }
}

impl FromIterator<DisplayMode> for DisplayModeVector {
    fn from_iter<I: IntoIterator<Item = DisplayMode>>(iter: I) -> Self {
        let mut modes = Self::new();
        for mode in iter {
            modes.push_unique(mode);
        }
        modes
    }
}

impl IntoIterator for DisplayModeVector {
    type Item = DisplayMode;
    type IntoIter = std::vec::IntoIter<DisplayMode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DisplayModeVector {
    type Item = &'a DisplayMode;
    type IntoIter = std::slice::Iter<'a, DisplayMode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
