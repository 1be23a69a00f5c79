use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::poller::target::PollTarget;
use crate::types::{AppError, BlockRecord};

pub const MIN_POLL_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
  Idle,
  ManualLoading,
  PollingPaused,
  PollingActive,
}

/// What a UI on top of the poller would render.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
  pub blocks: Vec<BlockRecord>,
  pub error: Option<String>,
  pub manual_loading: bool,
  pub paused: bool,
}

/// Owns the repeating trigger-and-reload timer. There is never more than
/// one live timer per controller: every transition that needs a timer
/// aborts the previous one before spawning the next, and dropping the
/// controller aborts whatever is left.
pub struct PollController {
  target: Arc<dyn PollTarget>,
  interval: Duration,
  timer: Option<JoinHandle<()>>,
  state: Arc<RwLock<ViewState>>,
}

impl PollController {
  pub fn new(target: Arc<dyn PollTarget>, interval_ms: u64) -> Self {
    Self {
      target,
      interval: clamp_interval(interval_ms),
      timer: None,
      state: Arc::new(RwLock::new(ViewState::default())),
    }
  }

  pub fn interval(&self) -> Duration {
    self.interval
  }

  pub async fn snapshot(&self) -> ViewState {
    self.state.read().await.clone()
  }

  pub async fn phase(&self) -> PollPhase {
    let state = self.state.read().await;
    if state.manual_loading {
      PollPhase::ManualLoading
    } else if state.paused {
      PollPhase::PollingPaused
    } else if self.timer.is_some() {
      PollPhase::PollingActive
    } else {
      PollPhase::Idle
    }
  }

  /// One immediate silent load, then polling starts.
  pub async fn start(&mut self) {
    load_blocks_silently(&self.target, &self.state).await;
    self.state.write().await.paused = false;
    self.restart_timer();
    info!("Poller started with interval {:?}", self.interval);
  }

  pub async fn pause(&mut self) {
    self.cancel_timer();
    self.state.write().await.paused = true;
  }

  pub async fn resume(&mut self) {
    self.state.write().await.paused = false;
    self.restart_timer();
  }

  pub async fn toggle_pause(&mut self) {
    let paused = self.state.read().await.paused;
    if paused {
      self.resume().await;
    } else {
      self.pause().await;
    }
  }

  pub async fn set_interval(&mut self, interval_ms: u64) {
    self.interval = clamp_interval(interval_ms);
    if self.timer.is_some() {
      self.restart_timer();
    }
  }

  /// Manual refresh. Works in any state, shows the loading flag while it
  /// runs and surfaces the error; the pause state it found is the pause
  /// state it leaves behind.
  pub async fn refresh_now(&self) {
    {
      let mut state = self.state.write().await;
      state.manual_loading = true;
      state.error = None;
    }

    let result = run_cycle(&self.target, &self.state).await;

    let mut state = self.state.write().await;
    if let Err(e) = result {
      state.error = Some(e.to_string());
    }
    state.manual_loading = false;
  }

  fn restart_timer(&mut self) {
    self.cancel_timer();

    let target = self.target.clone();
    let state = self.state.clone();
    let interval_duration = self.interval;

    self.timer = Some(tokio::spawn(async move {
      let mut tick = tokio::time::interval(interval_duration);
      tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
      // interval() fires immediately; the first cycle belongs one full
      // interval out
      tick.tick().await;

      loop {
        tick.tick().await;
        if let Err(e) = run_cycle(&target, &state).await {
          // background ticks never disturb the view state
          warn!("Background poll cycle failed: {}", e);
        }
      }
    }));
  }

  fn cancel_timer(&mut self) {
    if let Some(timer) = self.timer.take() {
      timer.abort();
    }
  }
}

impl Drop for PollController {
  fn drop(&mut self) {
    self.cancel_timer();
  }
}

fn clamp_interval(interval_ms: u64) -> Duration {
  Duration::from_millis(interval_ms.max(MIN_POLL_INTERVAL_MS))
}

async fn run_cycle(
  target: &Arc<dyn PollTarget>,
  state: &Arc<RwLock<ViewState>>,
) -> Result<(), AppError> {
  target.trigger_fetch().await?;
  let blocks = target.load_blocks().await?;
  state.write().await.blocks = blocks;
  Ok(())
}

async fn load_blocks_silently(target: &Arc<dyn PollTarget>, state: &Arc<RwLock<ViewState>>) {
  match target.load_blocks().await {
    Ok(blocks) => state.write().await.blocks = blocks,
    Err(e) => {
      warn!("Silent block load failed: {}", e);
      state.write().await.error = Some(e.to_string());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{PollController, PollPhase, MIN_POLL_INTERVAL_MS};
  use crate::poller::target::PollTarget;
  use crate::types::{AppError, BlockRecord};
  use async_trait::async_trait;
  use chrono::{TimeZone, Utc};
  use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
  use std::sync::Arc;
  use std::time::Duration;
  use tokio::time::sleep;

  #[derive(Default)]
  struct MockTarget {
    trigger_calls: AtomicUsize,
    load_calls: AtomicUsize,
    fail_trigger: AtomicBool,
    fail_load: AtomicBool,
  }

  impl MockTarget {
    fn triggers(&self) -> usize {
      self.trigger_calls.load(Ordering::SeqCst)
    }

    fn loads(&self) -> usize {
      self.load_calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl PollTarget for MockTarget {
    async fn trigger_fetch(&self) -> Result<(), AppError> {
      self.trigger_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_trigger.load(Ordering::SeqCst) {
        return Err(AppError::Client("Failed to fetch & save: 500".to_string()));
      }
      Ok(())
    }

    async fn load_blocks(&self) -> Result<Vec<BlockRecord>, AppError> {
      self.load_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_load.load(Ordering::SeqCst) {
        return Err(AppError::Client("Failed to load blocks: 500".to_string()));
      }
      Ok(vec![BlockRecord {
        block_number: 100,
        timestamp: Utc.with_ymd_and_hms(2025, 8, 6, 12, 0, 0).unwrap(),
        hash: None,
        mix_digest: None,
        base_fee: None,
        coinbase: None,
        latest_tx_hash: None,
        tx_count: None,
      }])
    }
  }

  fn controller_with(target: &Arc<MockTarget>, interval_ms: u64) -> PollController {
    PollController::new(target.clone(), interval_ms)
  }

  #[tokio::test(start_paused = true)]
  async fn start_does_one_silent_load_without_triggering() {
    let target = Arc::new(MockTarget::default());
    let mut controller = controller_with(&target, 3000);

    controller.start().await;

    assert_eq!(target.loads(), 1);
    assert_eq!(target.triggers(), 0);
    assert_eq!(controller.phase().await, PollPhase::PollingActive);
    assert_eq!(controller.snapshot().await.blocks.len(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn ticks_repeat_trigger_and_reload_at_the_interval() {
    let target = Arc::new(MockTarget::default());
    let mut controller = controller_with(&target, 3000);
    controller.start().await;

    sleep(Duration::from_millis(3100)).await;
    assert_eq!(target.triggers(), 1);
    assert_eq!(target.loads(), 2);

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(target.triggers(), 2);
    assert_eq!(target.loads(), 3);
  }

  #[tokio::test(start_paused = true)]
  async fn pausing_cancels_future_ticks() {
    let target = Arc::new(MockTarget::default());
    let mut controller = controller_with(&target, 3000);
    controller.start().await;

    sleep(Duration::from_millis(3100)).await;
    assert_eq!(target.triggers(), 1);

    controller.pause().await;
    assert_eq!(controller.phase().await, PollPhase::PollingPaused);

    // Ten intervals of silence while paused.
    sleep(Duration::from_millis(30_000)).await;
    assert_eq!(target.triggers(), 1);
    assert_eq!(target.loads(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn resuming_restarts_the_timer() {
    let target = Arc::new(MockTarget::default());
    let mut controller = controller_with(&target, 3000);
    controller.start().await;

    controller.pause().await;
    sleep(Duration::from_millis(10_000)).await;
    assert_eq!(target.triggers(), 0);

    controller.resume().await;
    assert_eq!(controller.phase().await, PollPhase::PollingActive);

    sleep(Duration::from_millis(3100)).await;
    assert_eq!(target.triggers(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn toggle_flips_between_active_and_paused() {
    let target = Arc::new(MockTarget::default());
    let mut controller = controller_with(&target, 3000);
    controller.start().await;

    controller.toggle_pause().await;
    assert_eq!(controller.phase().await, PollPhase::PollingPaused);

    controller.toggle_pause().await;
    assert_eq!(controller.phase().await, PollPhase::PollingActive);
  }

  #[tokio::test(start_paused = true)]
  async fn refresh_now_surfaces_errors_and_keeps_the_pause_state() {
    let target = Arc::new(MockTarget::default());
    let mut controller = controller_with(&target, 3000);
    controller.start().await;
    controller.pause().await;

    target.fail_trigger.store(true, Ordering::SeqCst);
    controller.refresh_now().await;

    let state = controller.snapshot().await;
    assert_eq!(state.error.as_deref(), Some("API Client error: Failed to fetch & save: 500"));
    assert!(!state.manual_loading);
    assert_eq!(controller.phase().await, PollPhase::PollingPaused);

    // A successful manual refresh clears the error again.
    target.fail_trigger.store(false, Ordering::SeqCst);
    controller.refresh_now().await;
    assert_eq!(controller.snapshot().await.error, None);
    assert_eq!(controller.phase().await, PollPhase::PollingPaused);
  }

  #[tokio::test(start_paused = true)]
  async fn refresh_now_works_while_polling_is_active() {
    let target = Arc::new(MockTarget::default());
    let mut controller = controller_with(&target, 3000);
    controller.start().await;

    controller.refresh_now().await;

    assert_eq!(target.triggers(), 1);
    assert_eq!(controller.phase().await, PollPhase::PollingActive);
  }

  #[tokio::test(start_paused = true)]
  async fn background_errors_are_swallowed_from_the_view_state() {
    let target = Arc::new(MockTarget::default());
    target.fail_trigger.store(true, Ordering::SeqCst);
    let mut controller = controller_with(&target, 3000);
    controller.start().await;

    sleep(Duration::from_millis(9500)).await;
    assert_eq!(target.triggers(), 3);

    let state = controller.snapshot().await;
    assert_eq!(state.error, None);
    assert_eq!(controller.phase().await, PollPhase::PollingActive);
  }

  #[tokio::test(start_paused = true)]
  async fn initial_load_failure_is_surfaced() {
    let target = Arc::new(MockTarget::default());
    target.fail_load.store(true, Ordering::SeqCst);
    let mut controller = controller_with(&target, 3000);
    controller.start().await;

    let state = controller.snapshot().await;
    assert_eq!(state.error.as_deref(), Some("API Client error: Failed to load blocks: 500"));
  }

  #[tokio::test(start_paused = true)]
  async fn interval_floor_is_enforced() {
    let target = Arc::new(MockTarget::default());
    let controller = controller_with(&target, 10);
    assert_eq!(controller.interval(), Duration::from_millis(MIN_POLL_INTERVAL_MS));
  }

  #[tokio::test(start_paused = true)]
  async fn set_interval_replaces_the_timer_without_duplicating_it() {
    let target = Arc::new(MockTarget::default());
    let mut controller = controller_with(&target, 3000);
    controller.start().await;

    controller.set_interval(500).await;

    // Three new-interval ticks and nothing else inside 1.6s.
    sleep(Duration::from_millis(1600)).await;
    assert_eq!(target.triggers(), 3);
  }

  #[tokio::test(start_paused = true)]
  async fn idle_before_start() {
    let target = Arc::new(MockTarget::default());
    let controller = controller_with(&target, 3000);
    assert_eq!(controller.phase().await, PollPhase::Idle);
    assert_eq!(target.loads(), 0);
  }
}
