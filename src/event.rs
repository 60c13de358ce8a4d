//! Structured events emitted by the engine on every queue mutation.
//!
//! Consumers read the event stream to build dashboards or audit logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::WorkId;
use crate::queue::Priority;

/// A structured event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence number, starting at 1. Consumers can detect gaps.
    pub seq: u64,
    /// When this event occurred.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    WorkQueued {
        id: WorkId,
        work_type: String,
        priority: Priority,
    },
    WorkSuperseded {
        id: WorkId,
        work_type: String,
        dedup_key: String,
        replaced: usize,
    },
    WorkClaimed {
        id: WorkId,
        worker_id: String,
    },
    QueueCleared {
        dropped: usize,
    },
}
