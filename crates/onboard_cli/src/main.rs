//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `onboard_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("onboard_core ping={}", onboard_core::ping());
    println!("onboard_core version={}", onboard_core::core_version());
    println!(
        "onboard_core seed_tasks={}",
        onboard_core::default_onboarding_tasks().len()
    );
}
