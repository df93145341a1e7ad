// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The capability processors use to publish generated files.

use chrono::{DateTime, Utc};
use printprep_core::error::Result;
use serde::{Deserialize, Serialize};

/// Asset tracking provided by whatever hosts the processors.
///
/// Names are bare file names relative to the output directory.
pub trait AssetHost: Send + Sync {
    /// Human-readable name of the host (used in log lines).
    fn host_name(&self) -> &str;

    /// Register a newly written file with the host.
    fn share(&self, name: &str) -> Result<()>;

    /// Ask the host to make the named, already shared files visible to
    /// downstream consumers.
    fn synchronize(&self, names: &[String]) -> Result<()>;
}

/// A file registered with a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedAsset {
    pub name: String,
    pub shared_at: DateTime<Utc>,
}
