//! Match State Accumulator - running state for one innings.
//!
//! The accumulator consumes delivery events strictly in order and owns every running
//! total: per-player batting and bowling figures keyed by name, the current partnership
//! and a rolling window of recent deliveries. Everything downstream reads views built
//! from this state and never mutates it.
//!
//! One accumulator describes one innings. Independent innings or matches get
//! independent instances.

mod figures;
mod window;

pub use figures::*;
pub use window::*;

use cricket_rules::{
    run_rate, DeliveryEvent, ExtrasKind, MatchFormat, MatchInfo, MatchPhase, Overs, BALLS_PER_OVER,
};
use std::collections::HashMap;
use tracing::debug;

use crate::config::ContextConfig;
use crate::error::{ContextError, Result};
use crate::models::{
    BatterContext, BowlerContext, MatchSituation, PartnershipContext, RecentEvents,
};

/// Running state for a single innings.
#[derive(Debug, Clone)]
pub struct MatchStateAccumulator {
    format: MatchFormat,
    innings: u32,
    batting_team: String,
    bowling_team: String,
    target: Option<u32>,

    total_runs: u32,
    total_wickets: u32,
    legal_balls: u32,

    batters: HashMap<String, BattingFigures>,
    bowlers: HashMap<String, BowlingFigures>,

    partnership: Partnership,
    /// Set by a dismissal; the new partnership starts with the next delivery.
    partnership_reset_pending: bool,

    window: RecentWindow,
    milestone_lookahead: u32,

    last_event: Option<DeliveryEvent>,
}

impl MatchStateAccumulator {
    /// Create an accumulator for an innings with default configuration.
    pub fn new(info: &MatchInfo, innings: u32) -> Self {
        Self::with_config(info, innings, &ContextConfig::default())
    }

    /// Create an accumulator for an innings.
    pub fn with_config(info: &MatchInfo, innings: u32, config: &ContextConfig) -> Self {
        let (batting, bowling) = info.sides(innings);
        Self {
            format: info.format,
            innings,
            batting_team: batting.to_string(),
            bowling_team: bowling.to_string(),
            target: info.target,
            total_runs: 0,
            total_wickets: 0,
            legal_balls: 0,
            batters: HashMap::new(),
            bowlers: HashMap::new(),
            partnership: Partnership::new(),
            partnership_reset_pending: false,
            window: RecentWindow::new(config.recent_window_balls),
            milestone_lookahead: config.milestone_lookahead,
            last_event: None,
        }
    }

    /// Set the chase target.
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = Some(target);
        self
    }

    /// Apply the next delivery of the innings.
    ///
    /// Out-of-contract events are rejected before any state changes.
    pub fn process(&mut self, event: &DeliveryEvent) -> Result<()> {
        self.validate(event)?;

        if self.partnership_reset_pending {
            self.partnership = Partnership::new();
            self.partnership_reset_pending = false;
        }
        if self.target.is_none() {
            self.target = event.snapshot.target;
        }

        self.total_runs += event.runs_total;
        if event.is_legal() {
            self.legal_balls += 1;
        }

        self.batters
            .entry(event.batter.clone())
            .or_default()
            .record(event);
        self.bowlers
            .entry(event.bowler.clone())
            .or_default()
            .record(event);
        self.partnership.record(event);
        self.window.push(event);

        if event.is_wicket() {
            self.total_wickets += 1;
            self.partnership_reset_pending = true;
        }

        debug!(
            ball = %event.ball,
            batter = %event.batter,
            bowler = %event.bowler,
            runs = event.runs_total,
            wicket = event.is_wicket(),
            score = self.total_runs,
            wickets = self.total_wickets,
            "processed delivery"
        );

        self.last_event = Some(event.clone());
        Ok(())
    }

    fn validate(&self, event: &DeliveryEvent) -> Result<()> {
        let ball = event.ball;

        if event.snapshot.innings != 0 && event.snapshot.innings != self.innings {
            return Err(ContextError::InningsMismatch {
                expected: self.innings,
                got: event.snapshot.innings,
            });
        }
        if ball.ball == 0 {
            return Err(ContextError::InvalidBall(ball));
        }
        if event.runs_total != event.runs_batter + event.runs_extras {
            return Err(ContextError::InconsistentRuns {
                ball,
                total: event.runs_total,
                batter: event.runs_batter,
                extras: event.runs_extras,
            });
        }
        if event.extras.is_none() && event.runs_extras > 0 {
            return Err(ContextError::ExtrasWithoutKind(ball));
        }
        if event.extras == Some(ExtrasKind::Wide) && event.runs_batter > 0 {
            return Err(ContextError::WideWithBatRuns(ball));
        }

        if let Some(previous) = &self.last_event {
            // A re-bowled delivery may reuse the label of the ball it replaced.
            let repeats_rebowled = ball == previous.ball && !previous.is_legal();
            if ball <= previous.ball && !repeats_rebowled {
                return Err(ContextError::OutOfOrder {
                    previous: previous.ball,
                    got: ball,
                });
            }
        }
        Ok(())
    }

    /// Innings number this accumulator tracks.
    pub fn innings(&self) -> u32 {
        self.innings
    }

    /// Format of the match.
    pub fn format(&self) -> MatchFormat {
        self.format
    }

    /// Runs in the innings, extras included.
    pub fn total_runs(&self) -> u32 {
        self.total_runs
    }

    /// Wickets fallen in the innings.
    pub fn total_wickets(&self) -> u32 {
        self.total_wickets
    }

    /// Legal balls bowled, as overs.
    pub fn overs(&self) -> Overs {
        Overs::from_balls(self.legal_balls)
    }

    /// The most recently processed delivery.
    pub fn last_event(&self) -> Option<&DeliveryEvent> {
        self.last_event.as_ref()
    }

    /// The rolling window of recent deliveries.
    pub fn window(&self) -> &RecentWindow {
        &self.window
    }

    /// Batting view for a player. Unknown names get a fresh zero record.
    pub fn batter_context(&self, name: &str) -> BatterContext {
        self.batters
            .get(name)
            .map(|f| f.to_context(name, self.milestone_lookahead))
            .unwrap_or_else(|| BatterContext::new(name))
    }

    /// Bowling view for a player. Unknown names get a fresh zero record.
    pub fn bowler_context(&self, name: &str) -> BowlerContext {
        self.bowlers
            .get(name)
            .map(|f| f.to_context(name))
            .unwrap_or_else(|| BowlerContext::new(name))
    }

    /// Wickets in the current spell of a bowler.
    pub fn spell_wickets(&self, bowler: &str) -> u32 {
        self.bowlers.get(bowler).map(|f| f.spell.wickets).unwrap_or(0)
    }

    /// The partnership the last delivery belongs to.
    pub fn partnership_context(&self) -> PartnershipContext {
        self.partnership.to_context(self.window.wickets())
    }

    /// Summary of the rolling window.
    pub fn recent_events(&self) -> RecentEvents {
        self.window.to_recent_events()
    }

    /// The situation after the last delivery.
    pub fn match_situation(&self) -> MatchSituation {
        let overs = self.overs();
        let runs_required = self.target.map(|t| t.saturating_sub(self.total_runs));
        let balls_remaining = match (self.target, self.format.scheduled_overs()) {
            (Some(_), Some(scheduled)) => Some(
                (scheduled * BALLS_PER_OVER).saturating_sub(self.legal_balls),
            ),
            _ => None,
        };
        let required_rate = match (runs_required, balls_remaining) {
            (Some(need), Some(balls)) if balls > 0 => Some(run_rate(need, Overs::from_balls(balls))),
            _ => None,
        };

        MatchSituation {
            batting_team: self.batting_team.clone(),
            bowling_team: self.bowling_team.clone(),
            innings_number: self.innings,
            total_runs: self.total_runs,
            total_wickets: self.total_wickets,
            overs_completed: overs,
            phase: MatchPhase::detect(self.format, overs),
            target: self.target,
            runs_required,
            balls_remaining,
            required_rate,
            current_run_rate: run_rate(self.total_runs, overs),
            match_format: self.format,
        }
    }
}
