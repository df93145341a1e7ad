// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory host that records every call, in order.

use std::sync::Mutex;

use printprep_core::error::Result;
use tracing::debug;

use crate::traits::AssetHost;

/// One call made against a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Shared(String),
    Synchronized(Vec<String>),
}

/// Host that keeps an ordered log of `share` / `synchronize` calls.
///
/// Useful for embedding processors where the caller inspects the results
/// itself, and for tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far.
    pub fn events(&self) -> Vec<HostEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Names passed to `share`, in call order.
    pub fn shared(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Shared(name) => Some(name),
                HostEvent::Synchronized(_) => None,
            })
            .collect()
    }

    fn record(&self, event: HostEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl AssetHost for RecordingHost {
    fn host_name(&self) -> &str {
        "recording"
    }

    fn share(&self, name: &str) -> Result<()> {
        debug!(name, "asset shared");
        self.record(HostEvent::Shared(name.to_string()));
        Ok(())
    }

    fn synchronize(&self, names: &[String]) -> Result<()> {
        debug!(count = names.len(), "assets synchronized");
        self.record(HostEvent::Synchronized(names.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let host = RecordingHost::new();
        host.share("a.png").unwrap();
        host.synchronize(&["a.png".to_string()]).unwrap();
        host.share("b.png").unwrap();

        assert_eq!(
            host.events(),
            vec![
                HostEvent::Shared("a.png".into()),
                HostEvent::Synchronized(vec!["a.png".into()]),
                HostEvent::Shared("b.png".into()),
            ]
        );
        assert_eq!(host.shared(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn usable_as_trait_object() {
        let host = RecordingHost::new();
        let dyn_host: &dyn AssetHost = &host;
        dyn_host.share("x.tiff").unwrap();
        assert_eq!(dyn_host.host_name(), "recording");
        assert_eq!(host.shared(), vec!["x.tiff"]);
    }
}
