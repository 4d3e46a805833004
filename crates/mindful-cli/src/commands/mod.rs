//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database initialization and shared utilities (open_db)
//! - `serve` - API server and analysis service commands
//! - `transfer` - Export and import commands
//! - `backfill` - Analysis backfill command

pub mod backfill;
pub mod core;
pub mod serve;
pub mod transfer;

// Re-export command functions for main.rs
pub use backfill::*;
pub use core::*;
pub use serve::*;
pub use transfer::*;
