//! Core engine. The public API for submitting and dispatching work.
//!
//! The engine owns the pending queue and the event stream. Every mutation
//! goes through here and is recorded as an [`Event`].

use chrono::Utc;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::model::*;
use crate::queue::{self, MIN_PRIORITY, PriorityQueue};
use crate::telemetry::work::{record_outcome, start_work_span};

/// The work engine. Owns all pending work and enforces dispatch order.
#[derive(Debug)]
pub struct Engine {
    queue: PriorityQueue<WorkItem>,
    config: EngineConfig,
    events: Vec<Event>,
    next_seq: u64,
}

/// What happened when work was submitted.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// Queued without displacing anything.
    Queued(WorkItem),
    /// Replaced `replaced` pending items with the same dedup key.
    Superseded { item: WorkItem, replaced: usize },
}

impl SubmitResult {
    pub fn item(&self) -> &WorkItem {
        match self {
            SubmitResult::Queued(item) => item,
            SubmitResult::Superseded { item, .. } => item,
        }
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            queue: PriorityQueue::new(),
            config,
            events: Vec::new(),
            next_seq: 1,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Submit new work.
    ///
    /// With a dedup key, every pending item of the same type and key is
    /// removed and the new item takes the earliest slot they held (or the
    /// end of its level when `to_end` applies).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for contradictory builder options, and
    /// [`Error::IndexOutOfRange`] for a position past the end of its level.
    /// The queue is unchanged on error.
    pub fn submit(&mut self, new: NewWorkItem) -> Result<SubmitResult> {
        validate(&new)?;

        let mut item = WorkItem {
            id: WorkId::new(),
            priority: if new.urgent {
                MIN_PRIORITY
            } else {
                new.priority
                    .unwrap_or_else(|| self.config.priority_for(&new.work_type))
            },
            work_type: new.work_type,
            dedup_key: new.dedup_key,
            source: new.source,
            params: new.params,
            created_at: Utc::now(),
        };
        let span = start_work_span(&item.work_type, &item.id);
        let _enter = span.enter();

        if new.urgent {
            self.queue.enqueue_front(item.clone());
            record_outcome(&span, "front");
            return Ok(self.queued(item));
        }

        if let Some(position) = new.position {
            self.queue
                .enqueue_at_priority_position(item.clone(), item.priority, position)?;
            record_outcome(&span, "queued");
            return Ok(self.queued(item));
        }

        let Some(dedup_key) = item.dedup_key.clone() else {
            self.queue.enqueue_at_priority(item.clone(), item.priority);
            record_outcome(&span, "queued");
            return Ok(self.queued(item));
        };

        let work_type = item.work_type.clone();
        let is_duplicate = |pending: &WorkItem| pending.is_duplicate_of(&work_type, &dedup_key);
        let to_end = new.to_end || self.config.dedup_to_end_for(&work_type);
        let requested = item.priority;

        // Taking over a slot means taking over its level too.
        if !to_end {
            if let Some((level, _)) = self.queue.find(is_duplicate) {
                item.priority = level;
            }
        }

        let replaced = self
            .queue
            .enqueue_remove_at(item.clone(), is_duplicate, requested, to_end);

        if replaced == 0 {
            record_outcome(&span, "queued");
            return Ok(self.queued(item));
        }

        info!(
            work_type = %work_type,
            dedup_key = %dedup_key,
            replaced,
            priority = item.priority,
            "superseded pending work"
        );
        record_outcome(&span, "superseded");
        self.record_event(EventKind::WorkSuperseded {
            id: item.id,
            work_type,
            dedup_key,
            replaced,
        });
        Ok(SubmitResult::Superseded { item, replaced })
    }

    /// Claim the next pending work item. Returns None if nothing is pending.
    pub fn claim(&mut self, worker_id: &str) -> Option<WorkItem> {
        let item = self.queue.try_dequeue()?;
        self.claimed(&item, worker_id);
        Some(item)
    }

    /// Claim the next pending work item.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if nothing is pending.
    pub fn next(&mut self, worker_id: &str) -> Result<WorkItem> {
        let item = self.queue.dequeue()?;
        self.claimed(&item, worker_id);
        Ok(item)
    }

    /// The item the next claim would return.
    pub fn peek(&self) -> Option<&WorkItem> {
        self.queue.peek()
    }

    /// Pending work in dispatch order.
    pub fn pending(&self) -> queue::Iter<'_, WorkItem> {
        self.queue.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Owned copy of the pending work in dispatch order.
    pub fn snapshot(&self) -> Vec<WorkItem> {
        self.queue.iter().cloned().collect()
    }

    /// Drop all pending work. Returns how many items were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        info!(dropped, "cleared pending work");
        self.record_event(EventKind::QueueCleared { dropped });
        dropped
    }

    /// Events with a sequence number greater than `since_seq`.
    pub fn get_events_since(&self, since_seq: u64) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.seq > since_seq)
            .cloned()
            .collect()
    }

    fn queued(&mut self, item: WorkItem) -> SubmitResult {
        info!(
            work_type = %item.work_type,
            id = %item.id,
            priority = item.priority,
            "queued work"
        );
        self.record_event(EventKind::WorkQueued {
            id: item.id,
            work_type: item.work_type.clone(),
            priority: item.priority,
        });
        SubmitResult::Queued(item)
    }

    fn claimed(&mut self, item: &WorkItem, worker_id: &str) {
        info!(id = %item.id, worker_id, "claimed work");
        self.record_event(EventKind::WorkClaimed {
            id: item.id,
            worker_id: worker_id.to_string(),
        });
    }

    fn record_event(&mut self, kind: EventKind) {
        self.events.push(Event {
            seq: self.next_seq,
            timestamp: Utc::now(),
            kind,
        });
        self.next_seq += 1;
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn validate(new: &NewWorkItem) -> Result<()> {
    if new.work_type.trim().is_empty() {
        return Err(Error::InvalidArgument("work_type must not be empty".to_string()));
    }
    if new.to_end && new.dedup_key.is_none() {
        return Err(Error::InvalidArgument(
            "to_end requires a dedup key to match pending work".to_string(),
        ));
    }
    if new.position.is_some() && (new.dedup_key.is_some() || new.urgent) {
        return Err(Error::InvalidArgument(
            "position cannot be combined with a dedup key or urgent".to_string(),
        ));
    }
    if new.urgent && (new.dedup_key.is_some() || new.priority.is_some()) {
        return Err(Error::InvalidArgument(
            "urgent work cannot carry a dedup key or an explicit priority".to_string(),
        ));
    }
    Ok(())
}
