// ── Response aggregation ──
//
// One pending collection per outstanding request: a single receiver loop
// appends into an ordered buffer until its deadline fires. Arrival order
// is the point — it reflects who answered fastest — so nothing here ever
// re-sorts.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::message::Response;
use crate::model::Identity;

/// What to do when the same responder answers the same request twice
/// (e.g. a device reconnecting mid-window).
///
/// Deliberately explicit configuration, never a silent default choice.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the first arrival, ignore the rest.
    #[default]
    First,
    /// Replace the payload in place — the original arrival position is
    /// kept, so render order still reflects who answered first.
    Last,
}

/// The console-side buffer for one outstanding request: responses in
/// arrival order, deduplicated by responder identity, bounded by a
/// deadline the owning receive loop enforces.
#[derive(Debug)]
pub struct PendingCollection {
    request_id: u32,
    policy: DuplicatePolicy,
    deadline: Instant,
    responses: Vec<Response>,
    seen: HashMap<Identity, usize>,
}

impl PendingCollection {
    pub fn new(request_id: u32, policy: DuplicatePolicy, deadline: Instant) -> Self {
        Self {
            request_id,
            policy,
            deadline,
            responses: Vec::new(),
            seen: HashMap::new(),
        }
    }

    pub fn request_id(&self) -> u32 {
        self.request_id
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Offer a decoded response. Returns `true` if it was kept (appended
    /// or, under [`DuplicatePolicy::Last`], replaced in place).
    ///
    /// Responses correlating to a different request id are stale replies
    /// from an earlier window and are dropped.
    pub fn offer(&mut self, response: Response) -> bool {
        if response.id != self.request_id {
            trace!(
                expected = self.request_id,
                got = response.id,
                from = %response.from,
                "dropping stale response",
            );
            return false;
        }
        if let Some(&position) = self.seen.get(&response.from) {
            match self.policy {
                DuplicatePolicy::First => {
                    trace!(from = %response.from, "ignoring duplicate response");
                    false
                }
                DuplicatePolicy::Last => {
                    self.responses[position] = response;
                    true
                }
            }
        } else {
            self.seen
                .insert(response.from.clone(), self.responses.len());
            self.responses.push(response);
            true
        }
    }

    /// Close the collection and hand back the responses in arrival order.
    pub fn finish(self) -> Vec<Response> {
        self.responses
    }
}
