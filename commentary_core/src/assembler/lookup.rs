//! Optional external collaborators: player statistics and historical callbacks.
//!
//! Both are injected as shared trait objects. Each one is owned by a dedicated
//! worker thread; callers give up on an answer once the configured timeout elapses.

use cricket_rules::{DeliveryEvent, MatchFormat, MatchPhase};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::LookupError;
use crate::models::{MatchSituation, PressureLevel};

/// Career record of one batter against one bowler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub batter: String,
    pub bowler: String,
    pub balls_faced: u32,
    pub runs: u32,
    pub dismissals: u32,
    pub strike_rate: f32,
}

impl HeadToHead {
    /// One-line summary, e.g. `Kohli vs Cummins: 64 off 52, out 2 times`.
    pub fn short_context(&self) -> String {
        let mut line = format!(
            "{} vs {}: {} off {}",
            self.batter, self.bowler, self.runs, self.balls_faced
        );
        match self.dismissals {
            0 => line.push_str(", never dismissed"),
            1 => line.push_str(", out once"),
            n => line.push_str(&format!(", out {} times", n)),
        }
        line
    }
}

/// A player's record in one phase of the innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePerformance {
    pub player: String,
    pub phase: MatchPhase,
    pub innings: u32,
    pub runs: u32,
    pub balls: u32,
    pub dismissals: u32,
    pub strike_rate: f32,
}

impl PhasePerformance {
    /// One-line summary, e.g. `Kohli in death_overs: SR 158.2 over 12 innings`.
    pub fn short_context(&self) -> String {
        format!(
            "{} in {}: SR {:.1} over {} innings",
            self.player, self.phase, self.strike_rate, self.innings
        )
    }
}

/// Source of player statistics.
pub trait StatsLookup: Send + Sync {
    fn head_to_head(
        &self,
        batter: &str,
        bowler: &str,
        format: Option<MatchFormat>,
    ) -> Result<Option<HeadToHead>, LookupError>;

    fn phase_performance(
        &self,
        player: &str,
        phase: MatchPhase,
        format: Option<MatchFormat>,
    ) -> Result<Option<PhasePerformance>, LookupError>;
}

/// Source of historical analogues for a moment.
pub trait HistoricalLookup: Send + Sync {
    fn callbacks(
        &self,
        event: &DeliveryEvent,
        situation: &MatchSituation,
        pressure: PressureLevel,
    ) -> Result<Vec<String>, LookupError>;
}

/// Jobs a worker may hold beyond the one it is running.
const QUEUE_DEPTH: usize = 1;

type Job<L> = Box<dyn FnOnce(&L) + Send>;

/// A dedicated thread that owns one collaborator and answers its calls in order.
///
/// Callers wait at most a timeout for each answer. A call that overruns keeps the
/// worker busy, and further calls are refused with [`LookupError::Busy`] once the
/// queue is full, so a hung collaborator holds exactly one thread. The thread
/// exits when every handle is dropped and its current job returns.
pub(crate) struct LookupWorker<L: ?Sized> {
    jobs: Sender<Job<L>>,
}

impl<L: ?Sized> Clone for LookupWorker<L> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
        }
    }
}

impl<L: ?Sized + Send + Sync + 'static> LookupWorker<L> {
    /// Start the worker thread for `lookup`.
    pub(crate) fn spawn(name: &str, lookup: Arc<L>) -> Result<Self, LookupError> {
        let (jobs, queue) = bounded::<Job<L>>(QUEUE_DEPTH);
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for job in queue {
                    job(&*lookup);
                }
            })
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;
        Ok(Self { jobs })
    }

    /// Run `f` against the collaborator and wait at most `timeout` for its answer.
    ///
    /// A late answer is dropped along with its reply channel.
    pub(crate) fn call<T, F>(&self, timeout: Duration, f: F) -> Result<T, LookupError>
    where
        T: Send + 'static,
        F: FnOnce(&L) -> Result<T, LookupError> + Send + 'static,
    {
        let (reply, answer) = bounded(1);
        let job: Job<L> = Box::new(move |lookup| {
            let _ = reply.send(f(lookup));
        });
        self.jobs.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => LookupError::Busy,
            TrySendError::Disconnected(_) => LookupError::Disconnected,
        })?;

        match answer.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(LookupError::Timeout(timeout.as_millis() as u64)),
            Err(RecvTimeoutError::Disconnected) => Err(LookupError::Disconnected),
        }
    }
}

/// Head-to-head record, bounded by `timeout`.
pub(crate) fn head_to_head(
    stats: &LookupWorker<dyn StatsLookup>,
    batter: &str,
    bowler: &str,
    format: MatchFormat,
    timeout: Duration,
) -> Result<Option<HeadToHead>, LookupError> {
    let (batter, bowler) = (batter.to_string(), bowler.to_string());
    stats.call(timeout, move |stats| {
        stats.head_to_head(&batter, &bowler, Some(format))
    })
}

/// Phase record, bounded by `timeout`.
pub(crate) fn phase_performance(
    stats: &LookupWorker<dyn StatsLookup>,
    player: &str,
    phase: MatchPhase,
    format: MatchFormat,
    timeout: Duration,
) -> Result<Option<PhasePerformance>, LookupError> {
    let player = player.to_string();
    stats.call(timeout, move |stats| {
        stats.phase_performance(&player, phase, Some(format))
    })
}

/// Historical callbacks, bounded by `timeout`.
pub(crate) fn callbacks(
    history: &LookupWorker<dyn HistoricalLookup>,
    event: &DeliveryEvent,
    situation: &MatchSituation,
    pressure: PressureLevel,
    timeout: Duration,
) -> Result<Vec<String>, LookupError> {
    let (event, situation) = (event.clone(), situation.clone());
    history.call(timeout, move |history| {
        history.callbacks(&event, &situation, pressure)
    })
}
