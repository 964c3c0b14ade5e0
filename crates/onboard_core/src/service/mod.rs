//! Onboarding lifecycle services.
//!
//! # Responsibility
//! - Orchestrate record store calls into use-case level APIs.
//! - Own checklist seeding and nested-item mutation rules.
//! - Keep boundary adapters decoupled from storage details.

pub mod onboarding_service;
pub mod seed;
