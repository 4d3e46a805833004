//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod cbt_logs;
pub mod data;
pub mod health;
pub mod moods;
pub mod users;

// Re-export all handlers for use in router
pub use cbt_logs::*;
pub use data::*;
pub use health::*;
pub use moods::*;
pub use users::*;
