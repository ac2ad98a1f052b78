// Copyright 2026 Fale Relay Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fale relay — fetch a page, rewrite "Yale" to "Fale" in its text, hand
//! it back.
//!
//! The library exposes the pipeline pieces for the binary and for
//! integration tests.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod error;
pub mod relay;
pub mod rest;
pub mod rewrite;

pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use relay::{FetchRequest, FetchResponse, Relay};
pub use rewrite::{ReplaceRule, Rewriter};
