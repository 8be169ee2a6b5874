use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::BoardConfig;
use crate::error::PollError;
use crate::feed::{derive_board, parse_feed, FeedTransport};

use super::state::BoardState;

/// Owns the poll loop and the published snapshot. Consumers read the
/// snapshot through `get_state`; nothing else in the process writes it.
pub struct BoardController {
    state: Arc<Mutex<BoardState>>,
    config: Arc<BoardConfig>,
    transport: Arc<FeedTransport>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl BoardController {
    pub fn new(config: BoardConfig) -> Result<Self> {
        let transport = FeedTransport::new(
            config.feed_url.clone(),
            Duration::from_secs(config.fetch_timeout_secs),
        )?;

        Ok(Self {
            state: Arc::new(Mutex::new(BoardState::new())),
            config: Arc::new(config),
            transport: Arc::new(transport),
            handle: None,
            cancel_token: None,
        })
    }

    pub async fn get_state(&self) -> BoardState {
        self.state.lock().await.clone()
    }

    pub fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            bail!("poller already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(poll_loop(
            self.state.clone(),
            self.config.clone(),
            self.transport.clone(),
            token_clone,
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the loop and wait for it to wind down. In-flight ticks are
    /// abandoned rather than aborted; the sequence guard in `BoardState`
    /// makes any late completion harmless.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("poll loop task failed to join")?;
        }
        Ok(())
    }
}

async fn poll_loop(
    state: Arc<Mutex<BoardState>>,
    config: Arc<BoardConfig>,
    transport: Arc<FeedTransport>,
    cancel_token: CancellationToken,
) {
    let mut ticker = interval(Duration::from_secs(config.poll_interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "poll loop started: every {}s against {}",
        config.poll_interval_secs, config.feed_url
    );

    // The first tick fires immediately, so the display fills without
    // waiting out a full interval.
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                seq += 1;
                tokio::spawn(run_tick(
                    seq,
                    state.clone(),
                    config.clone(),
                    transport.clone(),
                ));
            }
            _ = cancel_token.cancelled() => {
                info!("poll loop shutting down");
                break;
            }
        }
    }
}

/// One full pipeline pass: fetch, parse, select, normalize, publish.
/// Ticks overlap when the feed is slow; the sequence number decides
/// which completion wins, not arrival order.
async fn run_tick(
    seq: u64,
    state: Arc<Mutex<BoardState>>,
    config: Arc<BoardConfig>,
    transport: Arc<FeedTransport>,
) {
    let budget = Duration::from_secs(config.fetch_timeout_secs);
    let text = match timeout(budget, transport.fetch_text()).await {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            error!("tick {seq}: {err}; keeping previous snapshot");
            return;
        }
        Err(_) => {
            warn!(
                "tick {seq}: fetch exceeded {}s; keeping previous snapshot",
                config.fetch_timeout_secs
            );
            return;
        }
    };

    let outcome = parse_feed(&text, config.parse_mode)
        .and_then(|snapshot| derive_board(&snapshot, &config));

    match outcome {
        Ok((record, aggregate)) => {
            let mut guard = state.lock().await;
            if guard.apply(seq, record, aggregate, Utc::now()) {
                info!(
                    "tick {seq}: published snapshot (shake total {})",
                    guard.aggregate.shake_total
                );
            } else {
                debug!("tick {seq}: stale completion discarded");
            }
        }
        Err(PollError::NoValidRecord) => {
            warn!("tick {seq}: feed has no valid rows yet; nothing published");
        }
        Err(err) => {
            error!("tick {seq}: {err}; keeping previous snapshot");
        }
    }
}
