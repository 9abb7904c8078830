//! Core types, configuration, and per-profile state for s3migrate.
//!
//! This crate provides the building blocks shared by the migration engine and
//! the command-line shell: validated AWS account identifiers, the
//! environment-driven [`MigrateConfig`], and [`ProfileStore`], the lazily
//! populated map that holds one value (typically an API client) per named
//! credential profile.

mod config;
mod error;
mod state;
mod types;

pub use config::MigrateConfig;
pub use error::{CoreError, CoreResult};
pub use state::ProfileStore;
pub use types::{AccountId, ProfileName};
