//! Racing one connection attempt per candidate address.
//!
//! [`race`] spawns a task for every candidate, all under a child of the
//! caller's [`CancellationToken`], and joins them through a single
//! [`JoinSet`]. The first attempt to *report* success wins; the shared token
//! is cancelled at that moment so the rest can give up early. Every attempt
//! is joined before `race` returns, and any connection that completes after
//! the winner is dropped, closing it.
//!
//! Winner selection is "first to report", not "first in the list". When two
//! attempts finish at effectively the same instant, which one wins depends on
//! task scheduling and is not deterministic.
//!
//! Dropping the `race` future aborts every attempt still in flight.

use crate::base::loadstate::AttemptState;
use crate::base::neterror::NetError;
use crate::dns::Candidate;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// What a race produced.
#[derive(Debug)]
pub enum RaceOutcome<C> {
    /// One attempt succeeded. Every other connection has been closed.
    Winner { connection: C, candidate: Candidate },
    /// Every attempt failed. One error per candidate, in completion order.
    AllFailed(Vec<NetError>),
}

impl<C> RaceOutcome<C> {
    pub fn is_winner(&self) -> bool {
        matches!(self, RaceOutcome::Winner { .. })
    }

    /// Convert into a `Result`, handing the errors back untouched.
    pub fn into_result(self) -> Result<(C, Candidate), Vec<NetError>> {
        match self {
            RaceOutcome::Winner { connection, candidate } => Ok((connection, candidate)),
            RaceOutcome::AllFailed(errors) => Err(errors),
        }
    }
}

struct Attempt<C> {
    candidate: Candidate,
    state: AttemptState,
    outcome: Result<C, NetError>,
}

/// Race `dial` against every candidate and keep the first success.
///
/// `dial` is called once per candidate, in list order, before any attempt
/// runs. Cancelling `parent` cancels every attempt; the outcome is then
/// `AllFailed` with [`NetError::Aborted`] for each attempt that had not yet
/// finished.
pub async fn race<C, F, Fut>(
    parent: &CancellationToken,
    candidates: Vec<Candidate>,
    dial: F,
) -> RaceOutcome<C>
where
    C: Send + 'static,
    F: Fn(Candidate) -> Fut,
    Fut: Future<Output = Result<C, NetError>> + Send + 'static,
{
    let token = parent.child_token();
    let mut attempts = JoinSet::new();

    for candidate in candidates {
        let token = token.clone();
        let connecting = dial(candidate);
        attempts.spawn(async move {
            let mut state = AttemptState::Pending;
            if token.is_cancelled() {
                // Never started; the connect future is dropped unpolled
                advance(&mut state, AttemptState::Canceled, &candidate);
                return Attempt { candidate, state, outcome: Err(NetError::Aborted) };
            }

            advance(&mut state, AttemptState::Dialing, &candidate);
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Err(NetError::Aborted),
                result = AssertUnwindSafe(connecting).catch_unwind() => match result {
                    Ok(result) => result,
                    Err(_) => Err(NetError::AttemptPanicked(candidate.to_string())),
                },
            };
            let next = match &outcome {
                Ok(_) => AttemptState::Succeeded,
                Err(NetError::Aborted) => AttemptState::Canceled,
                Err(_) => AttemptState::Failed,
            };
            advance(&mut state, next, &candidate);
            Attempt { candidate, state, outcome }
        });
    }

    let spawned = attempts.len();
    tracing::debug!(attempts = spawned, "race started");

    let mut winner: Option<(C, Candidate)> = None;
    let mut errors = Vec::new();
    let mut joined = 0usize;

    while let Some(joined_attempt) = attempts.join_next().await {
        joined += 1;
        let attempt = match joined_attempt {
            Ok(attempt) => attempt,
            Err(e) => {
                // Only reachable if the runtime is shutting down under us
                tracing::warn!(error = %e, "attempt task did not complete");
                errors.push(NetError::Aborted);
                continue;
            }
        };

        debug_assert!(attempt.state.is_terminal());
        match attempt.outcome {
            Ok(connection) if winner.is_none() => {
                token.cancel();
                tracing::debug!(candidate = %attempt.candidate, "race won");
                winner = Some((connection, attempt.candidate));
            }
            Ok(connection) => {
                tracing::debug!(candidate = %attempt.candidate, "closing late connection");
                drop(connection);
            }
            Err(e) => errors.push(e),
        }
    }

    debug_assert_eq!(spawned, joined);
    // The child token must not outlive the race even if nothing won
    token.cancel();

    match winner {
        Some((connection, candidate)) => RaceOutcome::Winner {
            connection,
            candidate,
        },
        None => RaceOutcome::AllFailed(errors),
    }
}

fn advance(state: &mut AttemptState, next: AttemptState, candidate: &Candidate) {
    debug_assert!(state.can_advance_to(next), "{:?} -> {:?}", state, next);
    tracing::trace!(candidate = %candidate, from = ?state, to = ?next, "attempt state");
    *state = next;
}
