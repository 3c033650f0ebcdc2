use crate::api_client::{AnswerClient, AnswerResponse, AskError};
use crate::app_state::{AskState, Settled, Ticket};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

/// A finished request on its way back to the UI thread
#[derive(Debug)]
pub struct Settlement {
    pub ticket: Ticket,
    pub outcome: Result<AnswerResponse, AskError>,
}

/// Binds a form submission to one request against the answer service.
///
/// `submit` flips the state to loading before the request task exists; the
/// task always reports back, whether the request succeeded or not, and the
/// report is applied on the caller's thread by `apply_settled` or
/// `next_settled`. Dropping the handler aborts whatever is still in flight.
pub struct SubmissionHandler {
    client: AnswerClient,
    tasks: JoinSet<()>,
    settled_tx: UnboundedSender<Settlement>,
    settled_rx: UnboundedReceiver<Settlement>,
}

impl SubmissionHandler {
    pub fn new(client: AnswerClient) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            client,
            tasks: JoinSet::new(),
            settled_tx,
            settled_rx,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// Number of requests that have not been reaped yet
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Start a request for the current query. Must be called inside a tokio runtime.
    pub fn submit(&mut self, state: &mut AskState) -> Ticket {
        let ticket = state.begin_submission();
        let query = state.query().to_string();
        info!(
            target: "submission",
            "Submitting ticket {} ({} chars) to {}",
            ticket.value(),
            query.chars().count(),
            self.client.endpoint()
        );

        let client = self.client.clone();
        let settled_tx = self.settled_tx.clone();
        self.tasks.spawn(async move {
            let outcome = client.ask(&query).await;
            if let Err(e) = &outcome {
                error!(target: "submission", "Error during fetch: {}", e);
            }
            // The receiver only disappears together with the handler
            let _ = settled_tx.send(Settlement { ticket, outcome });
        });

        ticket
    }

    /// Apply every settlement that has arrived so far without blocking.
    pub fn apply_settled(&mut self, state: &mut AskState) -> Vec<Settled> {
        let mut applied = Vec::new();
        while let Ok(settlement) = self.settled_rx.try_recv() {
            applied.push(Self::apply(state, settlement));
        }
        self.reap();
        applied
    }

    /// Wait for the next settlement and apply it.
    ///
    /// Returns `None` once nothing is in flight and no settlement is queued.
    pub async fn next_settled(&mut self, state: &mut AskState) -> Option<Settled> {
        loop {
            if let Ok(settlement) = self.settled_rx.try_recv() {
                let result = Self::apply(state, settlement);
                self.reap();
                return Some(result);
            }
            // A task sends its settlement before it finishes
            let joined = self.tasks.join_next().await?;
            Self::log_abnormal(joined);
        }
    }

    fn apply(state: &mut AskState, settlement: Settlement) -> Settled {
        let ticket = settlement.ticket;
        let result = state.settle(ticket, settlement.outcome);
        debug!(target: "submission", "Ticket {} settled: {:?}", ticket.value(), result);
        result
    }

    fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            Self::log_abnormal(joined);
        }
    }

    fn log_abnormal(joined: Result<(), JoinError>) {
        if let Err(e) = joined {
            error!(target: "submission", "Request task ended abnormally: {}", e);
        }
    }
}
