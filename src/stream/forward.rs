//! Registry of active port forwards.
//!
//! Forwards are started from resource screens and outlive them: the registry
//! is shared by every screen and by the watcher task of each forward, so all
//! bookkeeping goes through one lock. Readers get a copy via [`snapshot`].
//!
//! [`snapshot`]: ForwardRegistry::snapshot

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::stream::{BackgroundStream, ExitReason, ProcessEvent, ProcessStream, StopHandle};

/// How to forward a port for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardSpec {
    pub local_port: u16,
    pub remote_port: u16,
    /// Shell command that keeps the tunnel open while it runs.
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardStatus {
    Active,
    Ended(String),
}

impl std::fmt::Display for ForwardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Ended(reason) => write!(f, "ended ({reason})"),
        }
    }
}

/// A copy of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forward {
    pub id: u64,
    pub resource_id: String,
    pub resource_name: String,
    pub local_port: u16,
    pub remote_port: u16,
    pub started: DateTime<Utc>,
    pub status: ForwardStatus,
    /// Most recent output line of the tunnel process.
    pub last_output: Option<String>,
}

struct Entry {
    forward: Forward,
    stop: StopHandle,
}

#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
    next_id: u64,
    generation: u64,
}

#[derive(Clone, Default)]
pub struct ForwardRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl ForwardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking watcher leaves plain data behind; keep using it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a forward driven by an already started stream. Returns its id.
    pub fn register(
        &self,
        resource_id: impl Into<String>,
        resource_name: impl Into<String>,
        spec: &ForwardSpec,
        stop: StopHandle,
    ) -> u64 {
        let mut inner = self.lock();
        inner.next_id += 1;
        inner.generation += 1;
        let id = inner.next_id;
        inner.entries.push(Entry {
            forward: Forward {
                id,
                resource_id: resource_id.into(),
                resource_name: resource_name.into(),
                local_port: spec.local_port,
                remote_port: spec.remote_port,
                started: Utc::now(),
                status: ForwardStatus::Active,
                last_output: None,
            },
            stop,
        });
        id
    }

    /// Run the forward command as a background process and track it until it
    /// ends or is stopped. Must be called inside the tokio runtime.
    pub fn start(
        &self,
        resource_id: impl Into<String>,
        resource_name: impl Into<String>,
        spec: &ForwardSpec,
    ) -> u64 {
        let (mut source, stop) = ProcessStream::shell(spec.command.clone()).start();
        let id = self.register(resource_id, resource_name, spec, stop);
        info!(id, local = spec.local_port, remote = spec.remote_port, "Port forward started");

        let registry = self.clone();
        tokio::spawn(async move {
            while let Some(event) = source.next().await {
                match event {
                    ProcessEvent::Line(line) => registry.record_output(id, line),
                    ProcessEvent::Ended(reason) => {
                        registry.finish(id, &reason);
                        break;
                    }
                }
            }
        });
        id
    }

    fn record_output(&self, id: u64, line: String) {
        debug!(id, "forward: {line}");
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.forward.id == id) {
            entry.forward.last_output = Some(line);
        }
    }

    /// Mark a forward whose process ended on its own.
    pub fn finish(&self, id: u64, reason: &ExitReason) {
        let mut inner = self.lock();
        let Some(entry) = inner.entries.iter_mut().find(|e| e.forward.id == id) else {
            return;
        };
        if entry.forward.status != ForwardStatus::Active {
            return;
        }
        info!(id, %reason, "Port forward ended");
        entry.forward.status = ForwardStatus::Ended(reason.to_string());
        inner.generation += 1;
    }

    /// Stop a forward and drop it from the registry. Unknown ids are ignored.
    pub fn stop(&self, id: u64) -> bool {
        let mut inner = self.lock();
        let Some(position) = inner.entries.iter().position(|e| e.forward.id == id) else {
            return false;
        };
        let entry = inner.entries.remove(position);
        entry.stop.stop();
        inner.generation += 1;
        info!(id, "Port forward stopped");
        true
    }

    /// Stop every active forward bound to `local_port`. Returns how many
    /// were stopped.
    pub fn stop_port(&self, local_port: u16) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|entry| {
            let bound = entry.forward.local_port == local_port
                && entry.forward.status == ForwardStatus::Active;
            if bound {
                entry.stop.stop();
            }
            !bound
        });
        let stopped = before - inner.entries.len();
        if stopped > 0 {
            inner.generation += 1;
            info!(local_port, stopped, "Released local port");
        }
        stopped
    }

    pub fn stop_all(&self) {
        let mut inner = self.lock();
        if inner.entries.is_empty() {
            return;
        }
        for entry in inner.entries.drain(..) {
            entry.stop.stop();
        }
        inner.generation += 1;
    }

    /// Copies of all entries, oldest first.
    pub fn snapshot(&self) -> Vec<Forward> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.forward.clone())
            .collect()
    }

    /// Bumped on every change that affects a snapshot's rows.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn active_count(&self) -> usize {
        self.lock()
            .entries
            .iter()
            .filter(|entry| entry.forward.status == ForwardStatus::Active)
            .count()
    }
}
