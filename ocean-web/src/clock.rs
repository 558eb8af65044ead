use ocean_game::Clock;

use crate::dom;

/// Wall clock read through `Date.now()`; `std::time` is unavailable on `wasm32-unknown-unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        dom::now_ms()
    }
}

/// Seed for a new session when the page does not supply one.
#[must_use]
pub fn entropy_seed() -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let random = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let time = dom::now_ms() as u64;
    random ^ time.rotate_left(32)
}
