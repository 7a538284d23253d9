//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `contactdesk_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("contactdesk_core ping={}", contactdesk_core::ping());
    println!("contactdesk_core version={}", contactdesk_core::core_version());
}
