//! Data model - read-only views and the assembled context record.
//!
//! Every type here is a snapshot reconstructed from accumulator state; none of them
//! feed back into the accumulator.

mod players;
mod rich;

pub use players::*;
pub use rich::*;

use cricket_rules::{MatchFormat, MatchPhase, Overs};
use serde::{Deserialize, Serialize};

/// Overall match situation after a delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSituation {
    pub batting_team: String,
    pub bowling_team: String,
    pub innings_number: u32,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub overs_completed: Overs,
    pub phase: MatchPhase,

    // Present only when chasing
    pub target: Option<u32>,
    pub runs_required: Option<u32>,
    pub balls_remaining: Option<u32>,
    pub required_rate: Option<f32>,

    pub current_run_rate: f32,
    pub match_format: MatchFormat,
}

impl MatchSituation {
    /// Format: `156/4 (15.3)`.
    pub fn score_string(&self) -> String {
        format!(
            "{}/{} ({})",
            self.total_runs, self.total_wickets, self.overs_completed
        )
    }

    /// Whether the batting side has a target.
    pub fn is_chase(&self) -> bool {
        self.target.is_some()
    }

    /// Required and current rates within two runs an over of each other.
    pub fn is_close_chase(&self) -> bool {
        match self.required_rate {
            Some(rrr) if self.is_chase() => (rrr - self.current_run_rate).abs() <= 2.0,
            _ => false,
        }
    }

    /// Wickets left to the batting side.
    pub fn wickets_in_hand(&self) -> u32 {
        10u32.saturating_sub(self.total_wickets)
    }
}

/// Pressure intensity levels, ordered from calm to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PressureLevel {
    #[default]
    Calm,
    Building,
    Tense,
    Intense,
    Critical,
}

impl PressureLevel {
    /// Snake-case name used in compact output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PressureLevel::Calm => "calm",
            PressureLevel::Building => "building",
            PressureLevel::Tense => "tense",
            PressureLevel::Intense => "intense",
            PressureLevel::Critical => "critical",
        }
    }

    /// Human-readable description of the level.
    pub fn description(&self) -> &'static str {
        match self {
            PressureLevel::Calm => "Comfortable situation, batters can play freely",
            PressureLevel::Building => "Pressure starting to mount, need to rotate strike",
            PressureLevel::Tense => "Tense situation, every run matters",
            PressureLevel::Intense => "High pressure moment, crucial phase of the match",
            PressureLevel::Critical => "Match on a knife's edge, one ball could change everything",
        }
    }
}

impl std::fmt::Display for PressureLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side holds the advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    BattingDominant,
    BowlingDominant,
    #[default]
    Balanced,
    /// The advantage just flipped.
    MomentumShift,
}

impl Momentum {
    /// Snake-case name used in compact output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Momentum::BattingDominant => "batting_dominant",
            Momentum::BowlingDominant => "bowling_dominant",
            Momentum::Balanced => "balanced",
            Momentum::MomentumShift => "momentum_shift",
        }
    }
}

impl std::fmt::Display for Momentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrative and storytelling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NarrativeState {
    /// What is unfolding. Empty until the first storyline threshold is crossed.
    pub current_storyline: String,
    /// 0.0 to 1.0.
    pub tension_level: f32,
    pub momentum: Momentum,
    pub key_subplot: Option<String>,
    /// What could happen next.
    pub dramatic_potential: Option<String>,
    /// Historical analogues supplied by an external lookup.
    pub callbacks_available: Vec<String>,
    /// Head-to-head line for the batter and bowler, if the record is long enough.
    pub matchup_context: Option<String>,
    /// The batter's record in the current phase.
    pub phase_form: Option<String>,
}

impl NarrativeState {
    /// Tension bucket used in rendered output.
    pub fn tension_label(&self) -> &'static str {
        if self.tension_level > 0.7 {
            "High"
        } else if self.tension_level > 0.4 {
            "Medium"
        } else {
            "Low"
        }
    }

    /// Convert to text for a generator prompt.
    pub fn to_prompt_string(&self) -> String {
        let mut lines = Vec::new();
        if !self.current_storyline.is_empty() {
            lines.push(format!("Storyline: {}", self.current_storyline));
        }
        if let Some(subplot) = &self.key_subplot {
            lines.push(format!("Subplot: {}", subplot));
        }
        lines.push(format!("Momentum: {}", self.momentum));
        lines.push(format!("Tension: {}", self.tension_label()));
        if let Some(potential) = &self.dramatic_potential {
            lines.push(format!("Potential: {}", potential));
        }
        if let Some(matchup) = &self.matchup_context {
            lines.push(format!("Matchup: {}", matchup));
        }
        if let Some(form) = &self.phase_form {
            lines.push(format!("Phase form: {}", form));
        }
        for callback in &self.callbacks_available {
            lines.push(format!("Callback: {}", callback));
        }
        lines.join("\n")
    }
}

/// Suggested register for the generated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Dramatic,
    Excited,
    Enthusiastic,
    Tense,
    Calm,
    #[default]
    Neutral,
}

impl Tone {
    /// Lower-case name used in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Dramatic => "dramatic",
            Tone::Excited => "excited",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Tense => "tense",
            Tone::Calm => "calm",
            Tone::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested length category for the generated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SuggestedLength {
    /// Lower-case name used in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestedLength::Short => "short",
            SuggestedLength::Medium => "medium",
            SuggestedLength::Long => "long",
        }
    }
}

impl std::fmt::Display for SuggestedLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
