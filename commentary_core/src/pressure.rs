//! Pressure Calculator - scores how much is riding on the next ball.
//!
//! A pure function of the match situation and three signals from the recent window.
//! Weights are fixed: the same inputs always give the same score and level.

use cricket_rules::MatchPhase;

use crate::models::{MatchSituation, PressureLevel};

/// Base pressure for the current phase of the innings.
fn phase_base(phase: MatchPhase) -> f32 {
    match phase {
        MatchPhase::Powerplay => 0.3,
        MatchPhase::MiddleOvers => 0.2,
        MatchPhase::DeathOvers => 0.5,
        MatchPhase::EarlyInnings | MatchPhase::MiddleInnings | MatchPhase::LateInnings => 0.2,
    }
}

/// Wickets in the recent window that count as a collapse.
const COLLAPSE_WICKETS: u32 = 3;

/// Balls without a boundary before dot-ball pressure starts to accumulate.
const BOUNDARY_DROUGHT: u32 = 12;

/// Stateless pressure scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressureCalculator;

impl PressureCalculator {
    /// A calculator with the fixed weights.
    pub fn new() -> Self {
        Self
    }

    /// Score the situation. The score is clamped to `[0, 1]`.
    pub fn calculate(
        &self,
        situation: &MatchSituation,
        wickets_in_window: u32,
        is_new_batter: bool,
        balls_since_boundary: u32,
    ) -> (PressureLevel, f32) {
        let mut score = phase_base(situation.phase);

        if let Some(rrr) = situation.required_rate {
            let gap = (rrr - situation.current_run_rate).max(0.0);
            score += (gap * 0.05).min(0.3);
        }

        if wickets_in_window >= COLLAPSE_WICKETS {
            score += 0.2;
        }

        if is_new_batter {
            score += 0.1;
        }

        if balls_since_boundary > BOUNDARY_DROUGHT {
            score += ((balls_since_boundary - BOUNDARY_DROUGHT) as f32 * 0.01).min(0.15);
        }

        let score = score.clamp(0.0, 1.0);
        (Self::level_for(score), score)
    }

    /// Map a score to its level.
    pub fn level_for(score: f32) -> PressureLevel {
        if score < 0.2 {
            PressureLevel::Calm
        } else if score < 0.4 {
            PressureLevel::Building
        } else if score < 0.6 {
            PressureLevel::Tense
        } else if score < 0.8 {
            PressureLevel::Intense
        } else {
            PressureLevel::Critical
        }
    }
}
