//! Time sources for session and round timing.
use std::cell::Cell;
use std::rc::Rc;

/// Millisecond wall clock injected into session controllers.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> f64;
}

/// Process clock backed by [`std::time::SystemTime`].
///
/// Not usable on `wasm32-unknown-unknown`; the web crate supplies its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }
}

/// Hand-driven clock for deterministic tests and simulations.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to a controller.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    #[must_use]
    pub fn starting_at(ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(ms)),
        }
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set_ms(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Seconds elapsed between two millisecond readings, never negative.
#[must_use]
pub fn elapsed_seconds(start_ms: f64, end_ms: f64) -> f64 {
    ((end_ms - start_ms) / 1000.0).max(0.0)
}
