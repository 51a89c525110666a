//! Per-player and partnership views derived from accumulated state.

use cricket_rules::{DeliveryEvent, ExtrasKind, Overs};
use serde::{Deserialize, Serialize};

/// Context about the batter on strike for the current delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatterContext {
    pub name: String,
    pub runs_scored: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f32,

    /// Next milestone (50, 100, 150, 200) if within reach.
    pub approaching_milestone: Option<u32>,
    /// Runs still needed for `approaching_milestone`.
    pub balls_to_milestone: Option<u32>,

    /// Bat runs of the last six balls faced, oldest first.
    pub recent_scoring: Vec<u32>,
    /// Consecutive scoreless balls faced.
    pub dot_ball_pressure: u32,
}

impl BatterContext {
    /// An empty record for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Just arrived at the crease.
    pub fn is_new_batter(&self) -> bool {
        self.balls_faced < 10
    }

    /// Set and scoring at a decent rate.
    pub fn is_settled(&self) -> bool {
        self.balls_faced >= 20 && self.strike_rate >= 80.0
    }

    /// Been in a while without getting going.
    pub fn is_struggling(&self) -> bool {
        self.balls_faced >= 15 && self.strike_rate < 60.0
    }
}

/// Outcome of a delivery from the bowler's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMark {
    Dot,
    Runs(u32),
    Four,
    Six,
    Wicket,
    Wide,
    NoBall,
}

impl From<&DeliveryEvent> for DeliveryMark {
    fn from(event: &DeliveryEvent) -> Self {
        if event.is_wicket() {
            return DeliveryMark::Wicket;
        }
        match (event.extras, event.runs_batter) {
            (Some(ExtrasKind::Wide), _) => DeliveryMark::Wide,
            (Some(ExtrasKind::NoBall), _) => DeliveryMark::NoBall,
            (_, 4) => DeliveryMark::Four,
            (_, 6) => DeliveryMark::Six,
            _ if event.runs_total == 0 => DeliveryMark::Dot,
            _ => DeliveryMark::Runs(event.runs_total),
        }
    }
}

impl std::fmt::Display for DeliveryMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMark::Dot => f.write_str("."),
            DeliveryMark::Runs(r) => write!(f, "{}", r),
            DeliveryMark::Four => f.write_str("4"),
            DeliveryMark::Six => f.write_str("6"),
            DeliveryMark::Wicket => f.write_str("W"),
            DeliveryMark::Wide => f.write_str("wd"),
            DeliveryMark::NoBall => f.write_str("nb"),
        }
    }
}

/// Context about the current bowler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BowlerContext {
    pub name: String,
    pub overs_bowled: Overs,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy: f32,

    pub current_spell_overs: Overs,
    pub current_spell_wickets: u32,
    pub current_spell_runs: u32,

    /// Last six deliveries, oldest first.
    pub recent_deliveries: Vec<DeliveryMark>,
    /// Two wicket-taking deliveries in a row.
    pub is_on_hat_trick: bool,
    pub consecutive_dots: u32,
}

impl BowlerContext {
    /// An empty record for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Economy under six, or two wickets in the current spell.
    pub fn is_bowling_well(&self) -> bool {
        (self.overs_bowled.balls() > 0 && self.economy < 6.0) || self.current_spell_wickets >= 2
    }

    /// Economy over nine after at least two completed overs.
    pub fn is_expensive(&self) -> bool {
        self.economy > 9.0 && self.overs_bowled.completed() >= 2
    }

    /// Scorecard figures, e.g. `3.3-0-28-1`.
    pub fn figures(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.overs_bowled, self.maidens, self.runs_conceded, self.wickets
        )
    }
}

/// Context about the current batting partnership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PartnershipContext {
    pub runs: u32,
    pub balls: u32,
    pub batter1_name: String,
    pub batter1_contribution: u32,
    pub batter2_name: String,
    pub batter2_contribution: u32,
    pub run_rate: f32,
    /// Steadying the innings after a cluster of wickets.
    pub is_rebuilding: bool,
    /// Taking the game away.
    pub is_dominant: bool,
}

impl PartnershipContext {
    /// Fifty or more.
    pub fn is_significant(&self) -> bool {
        self.runs >= 50
    }

    /// A hundred or more.
    pub fn is_century_stand(&self) -> bool {
        self.runs >= 100
    }
}

/// Summary of the recent window of deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecentEvents {
    /// Last six deliveries, e.g. `. 1 4 . W 2`.
    pub last_over_summary: String,
    pub wickets_in_window: u32,
    pub boundaries_in_window: u32,
    pub runs_in_window: u32,
    pub last_wicket_description: Option<String>,
    pub balls_since_last_boundary: u32,
    pub balls_since_last_wicket: u32,
}

impl RecentEvents {
    /// No boundaries or wickets for a good while.
    pub fn is_quiet_period(&self) -> bool {
        self.balls_since_last_boundary > 18 && self.balls_since_last_wicket > 30
    }

    /// Four boundaries or two wickets in the window.
    pub fn is_action_packed(&self) -> bool {
        self.boundaries_in_window >= 4 || self.wickets_in_window >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batter(balls: u32, strike_rate: f32) -> BatterContext {
        BatterContext {
            balls_faced: balls,
            strike_rate,
            ..BatterContext::new("Test")
        }
    }

    #[test]
    fn test_is_new_batter() {
        assert!(batter(5, 100.0).is_new_batter());
        assert!(!batter(15, 100.0).is_new_batter());
    }

    #[test]
    fn test_is_settled() {
        assert!(!batter(15, 133.0).is_settled());
        assert!(batter(25, 120.0).is_settled());
        assert!(batter(25, 80.0).is_settled());
        assert!(!batter(25, 79.9).is_settled());
    }

    #[test]
    fn test_is_struggling() {
        assert!(batter(20, 40.0).is_struggling());
        assert!(!batter(20, 100.0).is_struggling());
        assert!(!batter(14, 20.0).is_struggling());
    }

    #[test]
    fn test_batter_states_are_exclusive() {
        for balls in 0..60 {
            for sr in [0.0_f32, 30.0, 59.9, 60.0, 79.9, 80.0, 150.0] {
                let b = batter(balls, sr);
                let held = [b.is_new_batter(), b.is_settled(), b.is_struggling()]
                    .iter()
                    .filter(|s| **s)
                    .count();
                assert!(held <= 1, "balls={} sr={}", balls, sr);
            }
        }
    }

    #[test]
    fn test_bowler_status() {
        let good = BowlerContext {
            economy: 5.0,
            overs_bowled: Overs::new(4, 0),
            ..BowlerContext::new("Test")
        };
        assert!(good.is_bowling_well());

        let spell = BowlerContext {
            economy: 8.0,
            current_spell_wickets: 2,
            ..BowlerContext::new("Test")
        };
        assert!(spell.is_bowling_well());

        let expensive = BowlerContext {
            economy: 10.0,
            overs_bowled: Overs::new(3, 0),
            ..BowlerContext::new("Test")
        };
        assert!(expensive.is_expensive());

        let early = BowlerContext {
            economy: 10.0,
            overs_bowled: Overs::new(1, 0),
            ..BowlerContext::new("Test")
        };
        assert!(!early.is_expensive());
    }

    #[test]
    fn test_bowler_figures() {
        let bowler = BowlerContext {
            overs_bowled: Overs::new(3, 3),
            runs_conceded: 28,
            wickets: 1,
            ..BowlerContext::new("Cummins")
        };
        assert_eq!(bowler.figures(), "3.3-0-28-1");
    }

    #[test]
    fn test_partnership_flags() {
        let stand = PartnershipContext {
            runs: 105,
            ..Default::default()
        };
        assert!(stand.is_significant());
        assert!(stand.is_century_stand());

        let small = PartnershipContext {
            runs: 30,
            ..Default::default()
        };
        assert!(!small.is_significant());
    }

    #[test]
    fn test_recent_event_flags() {
        let quiet = RecentEvents {
            balls_since_last_boundary: 25,
            balls_since_last_wicket: 40,
            ..Default::default()
        };
        assert!(quiet.is_quiet_period());

        let busy = RecentEvents {
            boundaries_in_window: 5,
            ..Default::default()
        };
        assert!(busy.is_action_packed());
        assert!(!busy.is_quiet_period());
    }

    #[test]
    fn test_delivery_marks() {
        let marks: Vec<String> = [
            DeliveryMark::Dot,
            DeliveryMark::Runs(2),
            DeliveryMark::Four,
            DeliveryMark::Wicket,
            DeliveryMark::Wide,
        ]
        .iter()
        .map(|m| m.to_string())
        .collect();
        assert_eq!(marks.join(" "), ". 2 4 W wd");
    }
}
