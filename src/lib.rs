//! Partner Onboarding - Stripe Connect onboarding for partner merchants
//!
//! This crate creates connected accounts, issues hosted onboarding links,
//! reports onboarding completion and receives signed account webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
