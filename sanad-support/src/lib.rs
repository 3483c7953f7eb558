//! # Sanad Support
//!
//! Shared text utilities for the Sanad resolver.
//!
//! This crate provides:
//! - Dependency chain rendering for cycle reports
//! - Class name shortening for Rust types registered as classes
//! - "Did you mean?" suggestions for unknown names

pub mod rendering;
