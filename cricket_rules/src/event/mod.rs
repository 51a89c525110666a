//! Delivery events - one immutable record per ball bowled.

mod dismissal;

pub use dismissal::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::match_info::ScoreSnapshot;

/// Unique identifier for delivery events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an event ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ball identifier in `over.ball` form. Overs are 0-indexed, balls 1-indexed.
///
/// A wide or no-ball either repeats the label of the ball it replaces or takes
/// the next label in the over (`0.7`), depending on the parser's convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallNumber {
    pub over: u32,
    pub ball: u32,
}

impl BallNumber {
    /// Ball `ball` of zero-based over `over`.
    pub fn new(over: u32, ball: u32) -> Self {
        Self { over, ball }
    }
}

impl std::fmt::Display for BallNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.over, self.ball)
    }
}

/// Error parsing a ball label such as `15.3`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ball number '{0}', expected <over>.<ball>")]
pub struct BallNumberParseError(pub String);

impl FromStr for BallNumber {
    type Err = BallNumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || BallNumberParseError(s.to_string());
        let (over, ball) = s.split_once('.').ok_or_else(err)?;
        Ok(Self {
            over: over.parse().map_err(|_| err())?,
            ball: ball.parse().map_err(|_| err())?,
        })
    }
}

/// Kinds of extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrasKind {
    Wide,
    NoBall,
    Bye,
    LegBye,
    Penalty,
}

impl ExtrasKind {
    /// Whether the delivery must be bowled again.
    pub fn is_rebowled(&self) -> bool {
        matches!(self, ExtrasKind::Wide | ExtrasKind::NoBall)
    }

    /// Whether the extras count against the bowler's figures.
    pub fn charged_to_bowler(&self) -> bool {
        matches!(self, ExtrasKind::Wide | ExtrasKind::NoBall)
    }
}

/// Coarse classification of a delivery's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DotBall,
    Single,
    Double,
    Triple,
    /// Five or more off the bat without a boundary, usually overthrows.
    Runs,
    BoundaryFour,
    BoundarySix,
    Wicket,
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl EventKind {
    /// Snake-case name, e.g. `boundary_four`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DotBall => "dot_ball",
            EventKind::Single => "single",
            EventKind::Double => "double",
            EventKind::Triple => "triple",
            EventKind::Runs => "runs",
            EventKind::BoundaryFour => "boundary_four",
            EventKind::BoundarySix => "boundary_six",
            EventKind::Wicket => "wicket",
            EventKind::Wide => "wide",
            EventKind::NoBall => "no_ball",
            EventKind::Bye => "bye",
            EventKind::LegBye => "leg_bye",
        }
    }
}

/// A single delivery and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub id: EventId,
    pub ball: BallNumber,

    pub batter: String,
    pub bowler: String,
    pub non_striker: String,

    pub runs_batter: u32,
    pub runs_extras: u32,
    pub runs_total: u32,
    pub extras: Option<ExtrasKind>,

    pub dismissal: Option<Dismissal>,

    /// Score state reported alongside this ball.
    pub snapshot: ScoreSnapshot,
}

impl DeliveryEvent {
    /// Create a dot ball. Use the `with_*` builders to describe the outcome.
    pub fn new(
        ball: BallNumber,
        batter: impl Into<String>,
        bowler: impl Into<String>,
        non_striker: impl Into<String>,
    ) -> Self {
        Self {
            id: EventId::new(),
            ball,
            batter: batter.into(),
            bowler: bowler.into(),
            non_striker: non_striker.into(),
            runs_batter: 0,
            runs_extras: 0,
            runs_total: 0,
            extras: None,
            dismissal: None,
            snapshot: ScoreSnapshot {
                innings: 1,
                ..Default::default()
            },
        }
    }

    /// Runs off the bat.
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs_batter = runs;
        self.runs_total = self.runs_batter + self.runs_extras;
        self
    }

    /// Extras of a given kind. A one-run wide is `with_extras(Wide, 1)`.
    pub fn with_extras(mut self, kind: ExtrasKind, runs: u32) -> Self {
        self.extras = Some(kind);
        self.runs_extras = runs;
        self.runs_total = self.runs_batter + self.runs_extras;
        self
    }

    /// Record a dismissal on this delivery.
    pub fn with_dismissal(mut self, dismissal: Dismissal) -> Self {
        self.dismissal = Some(dismissal);
        self
    }

    /// Attach the scoreboard as reported after this delivery.
    pub fn with_snapshot(mut self, snapshot: ScoreSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Whether a wicket fell on this ball.
    pub fn is_wicket(&self) -> bool {
        self.dismissal.as_ref().is_some_and(|d| d.kind.is_wicket())
    }

    /// Four or six off the bat.
    pub fn is_boundary(&self) -> bool {
        self.runs_batter == 4 || self.runs_batter == 6
    }

    /// No runs of any kind and no wicket.
    pub fn is_dot_ball(&self) -> bool {
        self.runs_total == 0 && !self.is_wicket()
    }

    /// Counts towards the over.
    pub fn is_legal(&self) -> bool {
        !self.extras.is_some_and(|e| e.is_rebowled())
    }

    /// Counts as a ball faced by the striker. Only wides are not faced.
    pub fn faced_by_batter(&self) -> bool {
        self.extras != Some(ExtrasKind::Wide)
    }

    /// Runs that go against the bowler's analysis.
    pub fn runs_conceded_by_bowler(&self) -> u32 {
        match self.extras {
            Some(kind) if kind.charged_to_bowler() => self.runs_batter + self.runs_extras,
            _ => self.runs_batter,
        }
    }

    /// Whether this ball adds to the bowler's wicket tally.
    pub fn bowler_credited_wicket(&self) -> bool {
        self.dismissal
            .as_ref()
            .is_some_and(|d| d.kind.credited_to_bowler())
    }

    /// Classify the outcome.
    pub fn kind(&self) -> EventKind {
        if self.is_wicket() {
            return EventKind::Wicket;
        }
        match self.extras {
            Some(ExtrasKind::Wide) => return EventKind::Wide,
            Some(ExtrasKind::NoBall) => return EventKind::NoBall,
            Some(ExtrasKind::Bye) if self.runs_batter == 0 => return EventKind::Bye,
            Some(ExtrasKind::LegBye) if self.runs_batter == 0 => return EventKind::LegBye,
            _ => {}
        }
        match self.runs_batter {
            0 => EventKind::DotBall,
            1 => EventKind::Single,
            2 => EventKind::Double,
            3 => EventKind::Triple,
            4 => EventKind::BoundaryFour,
            6 => EventKind::BoundarySix,
            _ => EventKind::Runs,
        }
    }

    /// Human-readable description of the delivery.
    pub fn description(&self) -> String {
        if let Some(d) = self.dismissal.as_ref().filter(|d| d.kind.is_wicket()) {
            return format!("WICKET! {} {}", d.player_out, d.kind);
        }
        match (self.runs_batter, self.extras) {
            (6, _) => format!("SIX! {} hits {} for 6", self.batter, self.bowler),
            (4, _) => format!("FOUR! {} hits {} for 4", self.batter, self.bowler),
            (_, Some(kind)) => format!("{}: {} run(s)", EventKind::from(kind).as_str(), self.runs_extras),
            (0, None) => format!("Dot ball to {}", self.batter),
            (runs, None) => format!("{} takes {}", self.batter, runs),
        }
    }
}

impl From<ExtrasKind> for EventKind {
    fn from(kind: ExtrasKind) -> Self {
        match kind {
            ExtrasKind::Wide => EventKind::Wide,
            ExtrasKind::NoBall => EventKind::NoBall,
            ExtrasKind::Bye | ExtrasKind::Penalty => EventKind::Bye,
            ExtrasKind::LegBye => EventKind::LegBye,
        }
    }
}
