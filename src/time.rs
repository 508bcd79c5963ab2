//! Frame clock
//!
//! Seconds since the first call, from the Performance API in the browser and
//! `Instant` elsewhere. Only differences are meaningful.

use std::sync::OnceLock;

static ORIGIN: OnceLock<f64> = OnceLock::new();

#[cfg(target_arch = "wasm32")]
fn raw_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
fn raw_seconds() -> f64 {
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

pub fn now_seconds() -> f64 {
    let origin = *ORIGIN.get_or_init(raw_seconds);
    (raw_seconds() - origin).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let a = now_seconds();
        let b = now_seconds();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
