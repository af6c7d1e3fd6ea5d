//! The process-wide enforcement switch.
//!
//! Enforcement defaults to on. The `PEDANT_ENABLE` environment variable is
//! read once, on first query; `enable` and `disable` override it for the
//! rest of the process. Each call samples the flag a single time at entry,
//! so a toggle never changes a call already in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static ENABLED: AtomicBool = AtomicBool::new(true);
static ENV_SEED: Once = Once::new();

fn seed_from_env() {
    ENV_SEED.call_once(|| {
        if let Ok(raw) = std::env::var("PEDANT_ENABLE") {
            if matches!(raw.trim(), "0" | "false" | "False" | "off" | "no") {
                ENABLED.store(false, Ordering::Relaxed);
            }
        }
    });
}

/// Whether contracts are currently enforced.
pub fn is_enabled() -> bool {
    seed_from_env();
    ENABLED.load(Ordering::Relaxed)
}

/// Turn enforcement on. Idempotent.
pub fn enable() {
    seed_from_env();
    ENABLED.store(true, Ordering::Relaxed);
}

/// Turn enforcement off. Idempotent. Disabled contracts bind arguments
/// and run the body, skipping introspection and every check.
pub fn disable() {
    seed_from_env();
    ENABLED.store(false, Ordering::Relaxed);
}
