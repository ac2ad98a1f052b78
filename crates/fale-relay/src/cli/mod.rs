//! CLI command implementations.

pub mod fetch_cmd;
pub mod rewrite_cmd;
pub mod serve;
