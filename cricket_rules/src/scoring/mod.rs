//! Scoring arithmetic: overs notation, run rates and innings phases.

use serde::{Deserialize, Serialize};

use crate::match_info::MatchFormat;

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Overs expressed as a count of legal balls.
///
/// Displays in scorebook notation, so 21 balls is `3.3`, never `3.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Overs {
    balls: u32,
}

impl Overs {
    /// Create overs from a count of legal balls.
    pub fn from_balls(balls: u32) -> Self {
        Self { balls }
    }

    /// Create overs from whole overs plus balls into the next one.
    pub fn new(completed: u32, balls: u32) -> Self {
        Self {
            balls: completed * BALLS_PER_OVER + balls,
        }
    }

    /// Total legal balls.
    pub fn balls(&self) -> u32 {
        self.balls
    }

    /// Whole overs completed.
    pub fn completed(&self) -> u32 {
        self.balls / BALLS_PER_OVER
    }

    /// Balls bowled in the over currently in progress (0-5).
    pub fn balls_into_over(&self) -> u32 {
        self.balls % BALLS_PER_OVER
    }

    /// True overs as a fraction, so 3.3 overs is 3.5.
    pub fn as_fraction(&self) -> f32 {
        self.balls as f32 / BALLS_PER_OVER as f32
    }

    /// Scorebook notation as a float, so 3.3 overs is 3.3.
    pub fn as_notation(&self) -> f32 {
        self.completed() as f32 + self.balls_into_over() as f32 / 10.0
    }
}

impl std::fmt::Display for Overs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.balls_into_over() {
            0 => write!(f, "{}", self.completed()),
            b => write!(f, "{}.{}", self.completed(), b),
        }
    }
}

/// Runs per over for the given legal balls. Zero balls gives a zero rate.
pub fn run_rate(runs: u32, overs: Overs) -> f32 {
    if overs.balls() == 0 {
        return 0.0;
    }
    runs as f32 / overs.as_fraction()
}

/// Runs per hundred balls.
pub fn strike_rate(runs: u32, balls: u32) -> f32 {
    if balls == 0 {
        return 0.0;
    }
    runs as f32 / balls as f32 * 100.0
}

/// Coarse segments of an innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    // Limited overs
    Powerplay,
    MiddleOvers,
    DeathOvers,

    // Multi-day
    EarlyInnings,
    MiddleInnings,
    LateInnings,
}

impl MatchPhase {
    /// Detect the phase from the format and legal balls bowled so far.
    ///
    /// Boundaries are inclusive of the last ball of the segment, so the sixth
    /// over of a T20 is still the powerplay.
    pub fn detect(format: MatchFormat, overs: Overs) -> Self {
        let balls = overs.balls();
        match format.phase_boundaries() {
            PhaseBoundaries::LimitedOvers {
                powerplay_end,
                middle_end,
            } => {
                if balls <= powerplay_end * BALLS_PER_OVER {
                    MatchPhase::Powerplay
                } else if balls <= middle_end * BALLS_PER_OVER {
                    MatchPhase::MiddleOvers
                } else {
                    MatchPhase::DeathOvers
                }
            }
            PhaseBoundaries::MultiDay { early_end, middle_end } => {
                if balls < early_end * BALLS_PER_OVER {
                    MatchPhase::EarlyInnings
                } else if balls < middle_end * BALLS_PER_OVER {
                    MatchPhase::MiddleInnings
                } else {
                    MatchPhase::LateInnings
                }
            }
        }
    }

    /// Short label used in rendered context.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPhase::Powerplay => "powerplay",
            MatchPhase::MiddleOvers => "middle_overs",
            MatchPhase::DeathOvers => "death_overs",
            MatchPhase::EarlyInnings => "early_innings",
            MatchPhase::MiddleInnings => "middle_innings",
            MatchPhase::LateInnings => "late_innings",
        }
    }
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Over counts at which phases change, per format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseBoundaries {
    /// Powerplay up to and including `powerplay_end`, middle up to `middle_end`.
    LimitedOvers { powerplay_end: u32, middle_end: u32 },
    /// Early before `early_end` overs, middle before `middle_end`.
    MultiDay { early_end: u32, middle_end: u32 },
}
