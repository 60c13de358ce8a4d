//! Work dispatch span helpers.

use tracing::Span;

use crate::model::WorkId;

/// Start a span covering the submission of one work item.
///
/// The `work.outcome` field is declared empty and filled in by
/// [`record_outcome`].
pub fn start_work_span(work_type: &str, work_id: &WorkId) -> Span {
    tracing::info_span!(
        "work.submit",
        "work.type" = work_type,
        "work.id" = %work_id,
        "work.outcome" = tracing::field::Empty,
    )
}

/// Record how the submission landed ("queued", "superseded", "front").
pub fn record_outcome(span: &Span, outcome: &str) {
    span.record("work.outcome", outcome);
}
