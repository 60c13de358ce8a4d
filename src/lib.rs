//! # workq
//!
//! In-process work queue built on a bucketed priority queue.
//!
//! [`queue::PriorityQueue`] groups items by priority level (lower dequeues
//! first, FIFO within a level) and can collapse duplicate pending items into
//! the slot the earliest of them held. [`engine::Engine`] layers work items,
//! structural dedup keys and an event stream on top.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod plan;
pub mod queue;
pub mod telemetry;
