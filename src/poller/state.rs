use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::feed::{AggregateState, NormalizedRecord};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BoardStatus {
    /// Nothing published yet; the feed has not produced a valid row.
    Loading,
    Live,
}

impl Default for BoardStatus {
    fn default() -> Self {
        BoardStatus::Loading
    }
}

/// The published snapshot. This is the only shared mutable resource in
/// the pipeline: it is replaced wholesale on publish, so a concurrent
/// reader always sees either the old or the new complete state.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub status: BoardStatus,
    pub record: Option<NormalizedRecord>,
    pub aggregate: AggregateState,
    pub last_updated: Option<DateTime<Utc>>,
    /// Highest tick sequence applied so far. Ticks are not mutually
    /// exclusive, so a slow earlier fetch can finish after a newer one.
    #[serde(skip)]
    applied_seq: u64,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish one tick's result. Returns false and leaves the state
    /// untouched when the tick is stale, i.e. a tick dispatched later
    /// has already been applied.
    pub fn apply(
        &mut self,
        seq: u64,
        record: NormalizedRecord,
        aggregate: AggregateState,
        at: DateTime<Utc>,
    ) -> bool {
        if seq <= self.applied_seq {
            return false;
        }

        self.status = BoardStatus::Live;
        self.record = Some(record);
        self.aggregate = aggregate;
        self.last_updated = Some(at);
        self.applied_seq = seq;
        true
    }
}
