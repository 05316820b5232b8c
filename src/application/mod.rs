//! Application layer containing the charge orchestration logic.
//!
//! This module defines the `PixService`, the primary entry point for creating
//! charges. It walks the configured providers sequentially and applies the
//! first-success-wins fallback policy.

pub mod service;
