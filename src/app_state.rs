use crate::api_client::{AnswerResponse, AskError};
use tracing::debug;

/// Identifies one submission. Tickets increase monotonically, so the most
/// recent submission always holds the largest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What applying a settled submission did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The latest submission came back with a parseable body
    Answered,
    /// The latest submission failed; the previous answer is kept
    Failed,
    /// An older submission came back after a newer one was issued and was dropped
    Stale,
}

/// UI state owned by the root view.
///
/// Query, answer and loading mirror the form; `error` and the ticket counter
/// make failures visible and keep late responses from overwriting newer ones.
#[derive(Debug, Default)]
pub struct AskState {
    query: String,
    answer: Option<String>,
    loading: bool,
    error: Option<String>,
    latest: u64,
}

impl AskState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ticket of the most recent submission, if any was made
    pub fn latest_ticket(&self) -> Option<Ticket> {
        (self.latest > 0).then_some(Ticket(self.latest))
    }

    /// Mark a new submission as in flight and hand out its ticket.
    ///
    /// Busy is advisory: calling this while loading simply supersedes the
    /// outstanding submission.
    pub fn begin_submission(&mut self) -> Ticket {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        Ticket(self.latest)
    }

    /// Apply the outcome of a finished submission.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnswerResponse, AskError>,
    ) -> Settled {
        if ticket.0 != self.latest {
            debug!(
                target: "state",
                "Dropping stale result for ticket {} (latest is {})",
                ticket.0,
                self.latest
            );
            return Settled::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(response) => {
                self.answer = response.answer;
                Settled::Answered
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Settled::Failed
            }
        }
    }
}
