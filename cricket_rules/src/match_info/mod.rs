//! Match metadata - the facts known before the first ball is bowled.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{Overs, PhaseBoundaries};

/// Unique identifier for matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

impl MatchId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero id.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cricket match formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MatchFormat {
    #[default]
    Test,
    #[serde(rename = "ODI")]
    Odi,
    T20,
    T20I,
}

impl MatchFormat {
    /// Overs per innings, `None` for formats without a fixed allocation.
    pub fn scheduled_overs(&self) -> Option<u32> {
        match self {
            MatchFormat::T20 | MatchFormat::T20I => Some(20),
            MatchFormat::Odi => Some(50),
            MatchFormat::Test => None,
        }
    }

    /// Where the phases of an innings begin and end in this format.
    pub fn phase_boundaries(&self) -> PhaseBoundaries {
        match self {
            MatchFormat::T20 | MatchFormat::T20I => PhaseBoundaries::LimitedOvers {
                powerplay_end: 6,
                middle_end: 15,
            },
            MatchFormat::Odi => PhaseBoundaries::LimitedOvers {
                powerplay_end: 10,
                middle_end: 40,
            },
            MatchFormat::Test => PhaseBoundaries::MultiDay {
                early_end: 30,
                middle_end: 60,
            },
        }
    }

    /// Format tag as printed on a scorecard.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFormat::Test => "Test",
            MatchFormat::Odi => "ODI",
            MatchFormat::T20 => "T20",
            MatchFormat::T20I => "T20I",
        }
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about a match, available before the first event is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfo {
    pub id: MatchId,
    /// Teams in batting order of the first innings.
    pub teams: (String, String),
    pub venue: String,
    pub format: MatchFormat,
    /// Chase target for the innings being described, if any.
    pub target: Option<u32>,
}

impl MatchInfo {
    /// Create match metadata for two teams.
    pub fn new(
        home: impl Into<String>,
        away: impl Into<String>,
        format: MatchFormat,
    ) -> Self {
        Self {
            id: MatchId::new(),
            teams: (home.into(), away.into()),
            venue: String::new(),
            format,
            target: None,
        }
    }

    /// Set the ground.
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    /// Set the chase target for the second innings.
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = Some(target);
        self
    }

    /// Batting and bowling team for an innings. Odd innings belong to the first team.
    pub fn sides(&self, innings: u32) -> (&str, &str) {
        if innings % 2 == 1 {
            (&self.teams.0, &self.teams.1)
        } else {
            (&self.teams.1, &self.teams.0)
        }
    }
}

/// Cumulative score at the moment a ball was bowled, as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScoreSnapshot {
    pub innings: u32,
    pub runs: u32,
    pub wickets: u32,
    pub overs: Overs,
    pub target: Option<u32>,
}

impl ScoreSnapshot {
    /// Runs needed to win, if chasing.
    pub fn runs_required(&self) -> Option<u32> {
        self.target.map(|t| t.saturating_sub(self.runs))
    }

    /// Whether a target is set.
    pub fn is_chasing(&self) -> bool {
        self.target.is_some()
    }
}
