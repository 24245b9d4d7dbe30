//! The event queue sequencer: drains the step list one element at a time on
//! a fixed timer tick, gated by completion of the in-flight step.

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::api::ChainApi;
use crate::config::QueueConfig;
use crate::strategy::StepKind;

/// Why a dispatched step failed.
#[derive(Debug, thiserror::Error)]
pub enum StepFailure {
    /// The chain API reported an error.
    #[error("{0}")]
    Api(String),

    /// The configured per-step deadline expired before completion.
    #[error("deadline of {0:?} exceeded")]
    Deadline(Duration),
}

/// Completion record of a dispatched step, delivered on the step's
/// notification channel.
#[derive(Debug)]
pub struct StepCompletion {
    /// The step that completed.
    pub kind: StepKind,
    /// The fetched payload on success, or the failure.
    pub result: Result<Option<Value>, StepFailure>,
}

/// Terminal signal of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The queue drained and every step completed successfully.
    Completed,
    /// At least one step failed; surfaced once, after the drain (or at the
    /// first failure in strict mode).
    Failed,
}

/// The sequencer owns the pending step queue and drives it to empty.
///
/// At most one step is in flight at any time: the in-flight slot holds the
/// receiver of the step's completion channel, and a new step can only be
/// dispatched once that slot has been emptied by an observed completion.
pub struct Sequencer<A> {
    api: Arc<A>,
    pending: VecDeque<StepKind>,
    in_flight: Option<(StepKind, oneshot::Receiver<StepCompletion>)>,
    last: Option<StepCompletion>,
    failed: bool,
    tick_interval: Duration,
    step_timeout: Option<Duration>,
    strict: bool,
}

impl<A: ChainApi> Sequencer<A> {
    /// Create a sequencer over the given step list.
    pub fn new(api: Arc<A>, steps: Vec<StepKind>, config: &QueueConfig) -> Self {
        Self {
            api,
            pending: steps.into(),
            in_flight: None,
            last: None,
            failed: false,
            tick_interval: config.tick_interval(),
            step_timeout: config.step_timeout(),
            strict: config.strict,
        }
    }

    /// Drain the queue and return the terminal signal.
    pub async fn run(mut self) -> RunOutcome {
        let mut ticker = tokio::time::interval(self.tick_interval);
        loop {
            ticker.tick().await;
            if let ControlFlow::Break(outcome) = self.tick() {
                return outcome;
            }
        }
    }

    /// One timer tick of the state machine.
    fn tick(&mut self) -> ControlFlow<RunOutcome> {
        // The in-flight completion arrives out of band; observe it here.
        if let Some((kind, mut rx)) = self.in_flight.take() {
            match rx.try_recv() {
                Ok(completion) => self.last = Some(completion),
                Err(oneshot::error::TryRecvError::Empty) => {
                    self.in_flight = Some((kind, rx));
                    return ControlFlow::Continue(());
                }
                Err(oneshot::error::TryRecvError::Closed) => {
                    warn!(step = %kind, "step task dropped its completion channel");
                    self.last = Some(StepCompletion {
                        kind,
                        result: Err(StepFailure::Api("completion channel closed".into())),
                    });
                }
            }
        }

        if let Some(done) = self.last.take() {
            match done.result {
                Ok(payload) => report_completion(done.kind, payload.as_ref()),
                Err(failure) => {
                    error!(step = %done.kind, error = %failure, "step failed");
                    self.failed = true;
                    if self.strict {
                        return ControlFlow::Break(RunOutcome::Failed);
                    }
                }
            }
        }

        let Some(next) = self.pending.pop_front() else {
            return ControlFlow::Break(if self.failed {
                RunOutcome::Failed
            } else {
                RunOutcome::Completed
            });
        };
        self.dispatch(next);
        ControlFlow::Continue(())
    }

    /// Spawn the chain operation for `kind` and park its completion channel
    /// in the in-flight slot. Does not wait for the operation.
    fn dispatch(&mut self, kind: StepKind) {
        info!(step = %kind, "dispatching step");
        let (tx, rx) = oneshot::channel();
        let api = Arc::clone(&self.api);
        let deadline = self.step_timeout;
        tokio::spawn(async move {
            let call = execute(api.as_ref(), kind);
            let result = match deadline {
                Some(timeout) => match tokio::time::timeout(timeout, call).await {
                    Ok(result) => result.map_err(|e| StepFailure::Api(format!("{e:#}"))),
                    Err(_) => Err(StepFailure::Deadline(timeout)),
                },
                None => call.await.map_err(|e| StepFailure::Api(format!("{e:#}"))),
            };
            // The receiver is gone when a strict run was cut short.
            let _ = tx.send(StepCompletion { kind, result });
        });
        self.in_flight = Some((kind, rx));
    }
}

async fn execute<A: ChainApi>(api: &A, kind: StepKind) -> anyhow::Result<Option<Value>> {
    match kind {
        StepKind::SendTx => api.send_tx().await,
        StepKind::GetReceipt => api.get_receipt().await,
        StepKind::GetContainerHeader => api.get_container_header().await,
        StepKind::GetGenesisHeader => api.get_genesis_header().await,
        StepKind::GetBalance => api.get_balance().await,
        StepKind::Reset => api.reset().await,
        StepKind::Relay => api.relay().await,
        StepKind::Redeem => api.redeem().await,
        StepKind::Transfer => api.transfer().await,
    }
}

/// One line per completed step, distinct per kind; fetch steps surface the
/// fetched payload.
fn report_completion(kind: StepKind, payload: Option<&Value>) {
    let null = Value::Null;
    let payload = payload.unwrap_or(&null);
    match kind {
        StepKind::SendTx => info!("source chain accepted the probe transaction"),
        StepKind::GetReceipt => info!(receipt = %payload, "transaction receipt fetched"),
        StepKind::GetContainerHeader => info!(header = %payload, "container header fetched"),
        StepKind::GetGenesisHeader => info!(header = %payload, "genesis header fetched"),
        StepKind::GetBalance => info!(balance = %payload, "relay account balance fetched"),
        StepKind::Reset => info!("genesis header reset on the destination chain"),
        StepKind::Relay => info!("header relayed to the destination chain"),
        StepKind::Redeem => info!("receipt redeemed on the destination chain"),
        StepKind::Transfer => info!("funds transferred to the contract holder"),
    }
}
