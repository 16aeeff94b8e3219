//! Configuration types for join runs.
//!
//! This module provides:
//! - `JoinOptions`: The validated, immutable options a `Joiner` runs with
//! - `JoinConfig` / `SideConfig`: Plain, deserializable configuration as
//!   read from a YAML or TOML file

mod file;
mod spec;

pub use file::{JoinConfig, SideConfig};
pub use spec::{DEFAULT_BUFFER_SIZE, DEFAULT_CONCURRENCY, JoinOptions};
