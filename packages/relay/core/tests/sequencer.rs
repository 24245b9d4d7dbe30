//! Sequencer drain behavior against a scripted chain API double.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use header_relay_core::api::ChainApi;
use header_relay_core::config::QueueConfig;
use header_relay_core::sequencer::{RunOutcome, Sequencer};
use header_relay_core::strategy::{StepKind, Strategy};
use serde_json::{json, Value};

/// Chain API double that records every dispatch and completes each step from
/// a script of failing and hanging step kinds.
struct ScriptedApi {
    dispatched: Mutex<Vec<StepKind>>,
    failing: Vec<StepKind>,
    hanging: Vec<StepKind>,
    step_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedApi {
    fn succeeding() -> Self {
        Self::scripted(&[], &[])
    }

    fn scripted(failing: &[StepKind], hanging: &[StepKind]) -> Self {
        Self {
            dispatched: Mutex::new(Vec::new()),
            failing: failing.to_vec(),
            hanging: hanging.to_vec(),
            step_delay: Duration::from_millis(5),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    fn dispatched(&self) -> Vec<StepKind> {
        self.dispatched.lock().unwrap().clone()
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn step(&self, kind: StepKind) -> Result<Option<Value>> {
        self.dispatched.lock().unwrap().push(kind);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if self.hanging.contains(&kind) {
            // Held until the per-step deadline drops this future.
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        tokio::time::sleep(self.step_delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.contains(&kind) {
            anyhow::bail!("scripted failure for {kind}");
        }
        Ok(Some(json!({ "step": kind.to_string() })))
    }
}

#[async_trait::async_trait]
impl ChainApi for ScriptedApi {
    async fn send_tx(&self) -> Result<Option<Value>> {
        self.step(StepKind::SendTx).await
    }

    async fn get_receipt(&self) -> Result<Option<Value>> {
        self.step(StepKind::GetReceipt).await
    }

    async fn get_container_header(&self) -> Result<Option<Value>> {
        self.step(StepKind::GetContainerHeader).await
    }

    async fn get_genesis_header(&self) -> Result<Option<Value>> {
        self.step(StepKind::GetGenesisHeader).await
    }

    async fn get_balance(&self) -> Result<Option<Value>> {
        self.step(StepKind::GetBalance).await
    }

    async fn reset(&self) -> Result<Option<Value>> {
        self.step(StepKind::Reset).await
    }

    async fn relay(&self) -> Result<Option<Value>> {
        self.step(StepKind::Relay).await
    }

    async fn redeem(&self) -> Result<Option<Value>> {
        self.step(StepKind::Redeem).await
    }

    async fn transfer(&self) -> Result<Option<Value>> {
        self.step(StepKind::Transfer).await
    }
}

fn fast_queue() -> QueueConfig {
    QueueConfig {
        tick_interval_ms: 10,
        step_timeout_ms: None,
        strict: false,
    }
}

#[tokio::test]
async fn drains_the_full_run_in_order() {
    let api = Arc::new(ScriptedApi::succeeding());
    let steps = Strategy::TestAll.expand(false);

    let outcome = Sequencer::new(Arc::clone(&api), steps.clone(), &fast_queue())
        .run()
        .await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(api.dispatched(), steps);
}

#[tokio::test]
async fn single_step_queue_completes() {
    let api = Arc::new(ScriptedApi::succeeding());
    let steps = Strategy::GetBalance.expand(true);

    let outcome = Sequencer::new(Arc::clone(&api), steps, &fast_queue())
        .run()
        .await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(api.dispatched(), vec![StepKind::GetBalance]);
}

#[tokio::test]
async fn failure_is_deferred_until_the_queue_drains() {
    let api = Arc::new(ScriptedApi::scripted(&[StepKind::Reset], &[]));
    let steps = Strategy::TestAll.expand(false);

    let outcome = Sequencer::new(Arc::clone(&api), steps.clone(), &fast_queue())
        .run()
        .await;

    // the failed step does not stop the drain, only the terminal signal
    assert_eq!(outcome, RunOutcome::Failed);
    assert_eq!(api.dispatched(), steps);
}

#[tokio::test]
async fn later_successes_do_not_mask_an_earlier_failure() {
    let api = Arc::new(ScriptedApi::scripted(&[StepKind::GetReceipt], &[]));
    let steps = Strategy::TestAll.expand(false);

    let outcome = Sequencer::new(Arc::clone(&api), steps.clone(), &fast_queue())
        .run()
        .await;

    assert_eq!(outcome, RunOutcome::Failed);
    assert_eq!(api.dispatched(), steps);
}

#[tokio::test]
async fn strict_mode_stops_at_the_first_failure() {
    let api = Arc::new(ScriptedApi::scripted(&[StepKind::GetBalance], &[]));
    let steps = Strategy::TestAll.expand(false);
    let config = QueueConfig {
        strict: true,
        ..fast_queue()
    };

    let outcome = Sequencer::new(Arc::clone(&api), steps.clone(), &config)
        .run()
        .await;

    assert_eq!(outcome, RunOutcome::Failed);
    // GetBalance is the fifth step of the full run; nothing after it ran
    assert_eq!(api.dispatched(), steps[..5].to_vec());
}

#[tokio::test]
async fn never_dispatches_a_step_while_one_is_in_flight() {
    let api = Arc::new(
        ScriptedApi::succeeding().with_step_delay(Duration::from_millis(25)),
    );
    let steps = Strategy::TestAll.expand(false);
    let config = QueueConfig {
        tick_interval_ms: 5,
        ..fast_queue()
    };

    let outcome = Sequencer::new(Arc::clone(&api), steps, &config).run().await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(api.max_in_flight(), 1);
}

#[tokio::test]
async fn deadline_expiry_fails_the_step_and_the_drain_continues() {
    let api = Arc::new(ScriptedApi::scripted(&[], &[StepKind::Reset]));
    let steps = Strategy::RelayHeader.expand(true);
    let config = QueueConfig {
        step_timeout_ms: Some(50),
        ..fast_queue()
    };

    let outcome = Sequencer::new(Arc::clone(&api), steps.clone(), &config)
        .run()
        .await;

    assert_eq!(outcome, RunOutcome::Failed);
    // the hung reset timed out but the relay step after it still ran
    assert_eq!(api.dispatched(), steps);
}
