//! # Sanduq Support
//!
//! Shared utilities for the Sanduq DI crates.
//!
//! This crate provides:
//! - Text rendering for error messages (chains, signatures, suggestions)

pub mod rendering;
