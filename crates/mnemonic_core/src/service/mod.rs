//! Core use-case services.
//!
//! # Responsibility
//! - Apply caller-side rules (input trimming, review filtering) on top of
//!   repository calls.
//! - Keep front ends decoupled from storage details.

pub mod entry_service;
