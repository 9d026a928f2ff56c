//! Dark/light flag shared between the key handler and the particle field.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Read-only view of the ambient theme, polled once per frame.
pub trait ThemeSource {
    fn is_dark(&self) -> bool;
}

impl<F: Fn() -> bool> ThemeSource for F {
    fn is_dark(&self) -> bool {
        self()
    }
}

/// Owned by the host; clones observe the same flag.
#[derive(Debug, Clone)]
pub struct ThemeFlag {
    dark: Arc<AtomicBool>,
}

impl ThemeFlag {
    pub fn new(dark: bool) -> Self {
        Self {
            dark: Arc::new(AtomicBool::new(dark)),
        }
    }

    pub fn set_dark(&self, dark: bool) {
        self.dark.store(dark, Ordering::Relaxed);
    }

    /// Flips the theme and returns the new "is dark" value.
    pub fn toggle(&self) -> bool {
        !self.dark.fetch_xor(true, Ordering::Relaxed)
    }
}

impl Default for ThemeFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ThemeSource for ThemeFlag {
    fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }
}
