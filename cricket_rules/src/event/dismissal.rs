//! Dismissal definitions.

use serde::{Deserialize, Serialize};

/// How a batter was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalKind {
    // Credited to the bowler
    Bowled,
    Caught,
    CaughtAndBowled,
    Lbw,
    Stumped,
    HitWicket,

    // Not credited to the bowler
    RunOut,
    RetiredHurt,
    RetiredOut,
    ObstructingTheField,
    HandledTheBall,
    TimedOut,
}

impl DismissalKind {
    /// Whether the bowler is credited with the wicket.
    pub fn credited_to_bowler(&self) -> bool {
        matches!(
            self,
            DismissalKind::Bowled
                | DismissalKind::Caught
                | DismissalKind::CaughtAndBowled
                | DismissalKind::Lbw
                | DismissalKind::Stumped
                | DismissalKind::HitWicket
        )
    }

    /// Whether the dismissal ends a partnership. Retiring hurt does not count as a wicket.
    pub fn is_wicket(&self) -> bool {
        !matches!(self, DismissalKind::RetiredHurt)
    }

    /// Scorecard wording, e.g. `lbw` or `run out`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DismissalKind::Bowled => "bowled",
            DismissalKind::Caught => "caught",
            DismissalKind::CaughtAndBowled => "caught and bowled",
            DismissalKind::Lbw => "lbw",
            DismissalKind::Stumped => "stumped",
            DismissalKind::HitWicket => "hit wicket",
            DismissalKind::RunOut => "run out",
            DismissalKind::RetiredHurt => "retired hurt",
            DismissalKind::RetiredOut => "retired out",
            DismissalKind::ObstructingTheField => "obstructing the field",
            DismissalKind::HandledTheBall => "handled the ball",
            DismissalKind::TimedOut => "timed out",
        }
    }
}

impl std::fmt::Display for DismissalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dismissal on a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: DismissalKind,
    /// May be the non-striker (run outs).
    pub player_out: String,
    pub fielder: Option<String>,
}

impl Dismissal {
    /// A dismissal with no fielder recorded.
    pub fn new(kind: DismissalKind, player_out: impl Into<String>) -> Self {
        Self {
            kind,
            player_out: player_out.into(),
            fielder: None,
        }
    }

    /// Record the fielder involved.
    pub fn with_fielder(mut self, fielder: impl Into<String>) -> Self {
        self.fielder = Some(fielder.into());
        self
    }
}
