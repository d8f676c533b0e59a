//! Durable output.
//!
//! # Submodules
//!
//! - [`csv`]: Per-day CSV stores, merged and deduplicated by URL on every save
//!
//! Archiving the finished output directory is left to external tooling.

pub mod csv;
