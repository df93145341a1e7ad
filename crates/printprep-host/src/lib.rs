// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Host collaboration for printprep processors.
//!
//! Processors never register their outputs through ambient global state.
//! The caller passes an [`AssetHost`] capability in, and every generated file
//! is handed to it with `share` followed by `synchronize`, so downstream
//! consumers can resolve it.

pub mod manifest;
pub mod recording;
pub mod traits;

pub use manifest::ManifestHost;
pub use recording::{HostEvent, RecordingHost};
pub use traits::{AssetHost, SharedAsset};
