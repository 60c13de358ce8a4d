//! Core data model.
//!
//! A work item is something that needs doing. It has identity (type + dedup key),
//! provenance (where it came from) and a priority level in the dispatch queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::queue::Priority;

// ---------------------------------------------------------------------------
// Work Item
// ---------------------------------------------------------------------------

/// A unit of pending work held by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier.
    pub id: WorkId,

    /// What kind of work this is (e.g., "sync", "reindex").
    pub work_type: String,

    /// Structural dedup key. A pending item with the same (work_type, dedup_key)
    /// is superseded when a new one is submitted. None means no dedup.
    pub dedup_key: Option<String>,

    /// Where this work came from (e.g., "user", "heartbeat").
    pub source: String,

    /// Arbitrary parameters for the worker. The engine doesn't interpret these.
    pub params: serde_json::Value,

    /// Queue level. Lower = dispatched sooner.
    pub priority: Priority,

    pub created_at: DateTime<Utc>,
}

impl WorkItem {
    /// Is this pending item structurally the same work as (`work_type`, `dedup_key`)?
    pub fn is_duplicate_of(&self, work_type: &str, dedup_key: &str) -> bool {
        self.work_type == work_type && self.dedup_key.as_deref() == Some(dedup_key)
    }
}

/// Newtype for work item IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkId(pub Uuid);

impl WorkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for WorkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for WorkId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for new work items. The engine's public API for submitting work.
#[derive(Debug, Clone)]
pub struct NewWorkItem {
    pub(crate) work_type: String,
    pub(crate) source: String,
    pub(crate) dedup_key: Option<String>,
    pub(crate) params: serde_json::Value,
    pub(crate) priority: Option<Priority>,
    pub(crate) position: Option<usize>,
    pub(crate) urgent: bool,
    pub(crate) to_end: bool,
}

impl NewWorkItem {
    pub fn new(work_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            work_type: work_type.into(),
            source: source.into(),
            dedup_key: None,
            params: serde_json::Value::Null,
            priority: None,
            position: None,
            urgent: false,
            to_end: false,
        }
    }

    pub fn dedup_key(mut self, key: impl Into<String>) -> Self {
        self.dedup_key = Some(key.into());
        self
    }

    pub fn params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    /// Explicit queue level. Without one the engine uses the work type's
    /// configured level.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Insert at this index within the level instead of appending.
    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Jump ahead of everything pending.
    pub fn urgent(mut self) -> Self {
        self.urgent = true;
        self
    }

    /// On dedup, go to the end of the level instead of taking over the
    /// superseded item's slot.
    pub fn to_end(mut self) -> Self {
        self.to_end = true;
        self
    }
}
