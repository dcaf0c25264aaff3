//! Provides helpers for managing sweep targets

pub mod subnet;
