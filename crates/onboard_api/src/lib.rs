//! Transport-facing adapter over `onboard_core`.
//!
//! HTTP servers or other hosts call [`OnboardingApi`] with parsed JSON bodies
//! and forward the returned status code and body unchanged.

pub mod api;

pub use api::{resolve_db_path, ApiResponse, OnboardingApi};
