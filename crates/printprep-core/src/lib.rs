// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printprep: core types, configuration, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod naming;
pub mod types;

pub use config::ProcessingConfig;
pub use error::PrintprepError;
pub use types::*;
