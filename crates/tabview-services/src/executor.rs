//! Remote query executor
//!
//! Issues descriptors to the engine and decides, when each reply arrives,
//! whether it may replace the displayed result. There is no cancellation:
//! every request runs to completion and stale replies are dropped on arrival.
//!
//! A reply is applied only if
//! 1. its originating descriptor equals the controller's current descriptor,
//! 2. no newer request has already been applied, and
//! 3. no newer request for an equal descriptor has been issued.
//!
//! The last two rules matter when the same descriptor is issued twice, e.g.
//! the re-fetch after a cell edit: the older reply still carries pre-edit
//! rows and must not overwrite the newer one, even when the newer one fails.

use std::sync::Arc;

use tabview_core::{QueryDescriptor, QueryEngine, QueryResult};

use crate::error::{RemoteOperation, ServiceError};

/// Tag identifying one issued query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    seq: u64,
    descriptor: Arc<QueryDescriptor>,
}

impl QueryTicket {
    /// Monotonic issue number, starting at 1
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn descriptor(&self) -> &Arc<QueryDescriptor> {
        &self.descriptor
    }
}

/// A request ready to be awaited. Owns everything it needs, so the caller's
/// state is free while it is pending.
pub struct PendingQuery {
    ticket: QueryTicket,
    engine: Arc<dyn QueryEngine>,
    session_id: String,
}

impl PendingQuery {
    pub fn ticket(&self) -> &QueryTicket {
        &self.ticket
    }

    /// Run the query against the engine
    #[tracing::instrument(skip(self), fields(seq = self.ticket.seq, page = self.ticket.descriptor.page))]
    pub async fn resolve(self) -> QueryCompletion {
        let outcome = self
            .engine
            .execute_query(&self.session_id, &self.ticket.descriptor)
            .await;
        match &outcome {
            Ok(result) => tracing::debug!(
                rows = result.rows.len(),
                total = result.total_elements,
                query_time_ms = result.query_time_ms,
                "query returned"
            ),
            Err(e) => tracing::warn!(error = %e, "query failed"),
        }
        QueryCompletion {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// A finished request, waiting to be delivered
#[derive(Debug)]
pub struct QueryCompletion {
    pub ticket: QueryTicket,
    pub outcome: tabview_core::Result<QueryResult>,
}

/// What happened to a delivered completion
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// The result is now displayed
    Applied,
    /// The request was stale; nothing changed
    Discarded,
    /// The current request failed; the previous result stays displayed
    Failed(ServiceError),
}

pub struct RemoteQueryExecutor {
    engine: Arc<dyn QueryEngine>,
    session_id: String,
    next_seq: u64,
    in_flight: usize,
    latest_issued: Option<QueryTicket>,
    last_applied_seq: Option<u64>,
    displayed: Option<Arc<QueryResult>>,
    last_error: Option<ServiceError>,
}

impl RemoteQueryExecutor {
    pub fn new(engine: Arc<dyn QueryEngine>, session_id: impl Into<String>) -> Self {
        Self {
            engine,
            session_id: session_id.into(),
            next_seq: 1,
            in_flight: 0,
            latest_issued: None,
            last_applied_seq: None,
            displayed: None,
            last_error: None,
        }
    }

    pub fn engine(&self) -> &Arc<dyn QueryEngine> {
        &self.engine
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Tag `descriptor` with the next sequence number and prepare the request
    pub fn issue(&mut self, descriptor: Arc<QueryDescriptor>) -> PendingQuery {
        let ticket = QueryTicket {
            seq: self.next_seq,
            descriptor,
        };
        self.next_seq += 1;
        self.in_flight += 1;
        self.latest_issued = Some(ticket.clone());

        tracing::debug!(seq = ticket.seq, in_flight = self.in_flight, "query issued");

        PendingQuery {
            ticket,
            engine: Arc::clone(&self.engine),
            session_id: self.session_id.clone(),
        }
    }

    /// Deliver a finished request, judged against the controller's `current` descriptor
    pub fn receive(&mut self, completion: QueryCompletion, current: &QueryDescriptor) -> Delivery {
        self.in_flight = self.in_flight.saturating_sub(1);
        let QueryCompletion { ticket, outcome } = completion;

        let superseded = self
            .last_applied_seq
            .is_some_and(|applied| applied > ticket.seq)
            || self.latest_issued.as_ref().is_some_and(|latest| {
                latest.seq > ticket.seq && latest.descriptor == ticket.descriptor
            });
        if *ticket.descriptor != *current || superseded {
            tracing::debug!(seq = ticket.seq, superseded, "discarding stale query response");
            return Delivery::Discarded;
        }

        match outcome {
            Ok(result) => {
                self.displayed = Some(Arc::new(result));
                self.last_applied_seq = Some(ticket.seq);
                self.last_error = None;
                Delivery::Applied
            }
            Err(e) => {
                let err = ServiceError::remote(RemoteOperation::Query, &e);
                self.last_error = Some(err.clone());
                Delivery::Failed(err)
            }
        }
    }

    /// The last successfully applied result
    pub fn displayed(&self) -> Option<&Arc<QueryResult>> {
        self.displayed.as_ref()
    }

    /// Failure of the most recent current request, if it failed
    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}
