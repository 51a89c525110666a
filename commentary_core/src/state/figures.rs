//! Running figures per batter, per bowler and for the current partnership.

use cricket_rules::{run_rate, strike_rate, DeliveryEvent, ExtrasKind, Overs, BALLS_PER_OVER};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::{BatterContext, BowlerContext, DeliveryMark, PartnershipContext};

/// Entries kept in per-player recent histories.
const RECENT_LEN: usize = 6;

/// Milestones are reported at every multiple of this many runs.
const MILESTONE_STEP: u32 = 50;

/// Highest milestone the batter view reports.
const LAST_MILESTONE: u32 = 200;

fn push_recent<T>(recent: &mut VecDeque<T>, value: T) {
    recent.push_back(value);
    if recent.len() > RECENT_LEN {
        recent.pop_front();
    }
}

/// Cumulative batting figures for one player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattingFigures {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    recent: VecDeque<u32>,
    dot_streak: u32,
}

impl BattingFigures {
    /// Apply a delivery on which this player was on strike.
    pub fn record(&mut self, event: &DeliveryEvent) {
        self.runs += event.runs_batter;
        match event.runs_batter {
            4 => self.fours += 1,
            6 => self.sixes += 1,
            _ => {}
        }

        if !event.faced_by_batter() {
            return;
        }
        self.balls += 1;
        push_recent(&mut self.recent, event.runs_batter);
        if event.runs_batter == 0 {
            self.dot_streak += 1;
        } else {
            self.dot_streak = 0;
        }
    }

    /// Build the public view.
    pub fn to_context(&self, name: &str, lookahead: u32) -> BatterContext {
        let next = (self.runs / MILESTONE_STEP + 1) * MILESTONE_STEP;
        let to_go = next - self.runs;
        let (approaching_milestone, balls_to_milestone) = if next <= LAST_MILESTONE && to_go <= lookahead {
            (Some(next), Some(to_go))
        } else {
            (None, None)
        };

        BatterContext {
            name: name.to_string(),
            runs_scored: self.runs,
            balls_faced: self.balls,
            fours: self.fours,
            sixes: self.sixes,
            strike_rate: strike_rate(self.runs, self.balls),
            approaching_milestone,
            balls_to_milestone,
            recent_scoring: self.recent.iter().copied().collect(),
            dot_ball_pressure: self.dot_streak,
        }
    }
}

/// Figures for a bowler's current spell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpellFigures {
    pub legal_balls: u32,
    pub runs: u32,
    pub wickets: u32,
    /// Over number (0-indexed) of the last delivery in this spell.
    last_over: Option<u32>,
}

impl SpellFigures {
    /// A spell continues while the bowler keeps bowling every other over.
    fn continues_into(&self, over: u32) -> bool {
        match self.last_over {
            Some(last) => over >= last && over - last <= 2,
            None => true,
        }
    }
}

/// Cumulative bowling figures for one player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BowlingFigures {
    pub legal_balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub maidens: u32,
    pub spell: SpellFigures,

    current_over: Option<u32>,
    balls_this_over: u32,
    runs_this_over: u32,

    recent: VecDeque<DeliveryMark>,
    dot_streak: u32,
    wicket_streak: u32,
}

impl BowlingFigures {
    /// Apply a delivery bowled by this player.
    pub fn record(&mut self, event: &DeliveryEvent) {
        let over = event.ball.over;
        let conceded = event.runs_conceded_by_bowler();
        let credited = event.bowler_credited_wicket();

        if !self.spell.continues_into(over) {
            self.spell = SpellFigures::default();
        }
        self.spell.last_over = Some(over);

        if self.current_over != Some(over) {
            self.current_over = Some(over);
            self.balls_this_over = 0;
            self.runs_this_over = 0;
        }

        self.runs_conceded += conceded;
        self.spell.runs += conceded;
        self.runs_this_over += conceded;

        if credited {
            self.wickets += 1;
            self.spell.wickets += 1;
            self.wicket_streak += 1;
        } else if event.extras != Some(ExtrasKind::Wide) {
            // Wides are re-bowled and do not interrupt a hat-trick.
            self.wicket_streak = 0;
        }

        if event.is_legal() {
            self.legal_balls += 1;
            self.spell.legal_balls += 1;
            self.balls_this_over += 1;
            if self.balls_this_over == BALLS_PER_OVER && self.runs_this_over == 0 {
                self.maidens += 1;
            }
        }

        if event.is_legal() && conceded == 0 && !event.is_wicket() {
            self.dot_streak += 1;
        } else {
            self.dot_streak = 0;
        }

        push_recent(&mut self.recent, DeliveryMark::from(event));
    }

    /// Runs conceded per six legal balls.
    pub fn economy(&self) -> f32 {
        run_rate(self.runs_conceded, Overs::from_balls(self.legal_balls))
    }

    /// Build the public view.
    pub fn to_context(&self, name: &str) -> BowlerContext {
        BowlerContext {
            name: name.to_string(),
            overs_bowled: Overs::from_balls(self.legal_balls),
            maidens: self.maidens,
            runs_conceded: self.runs_conceded,
            wickets: self.wickets,
            economy: self.economy(),
            current_spell_overs: Overs::from_balls(self.spell.legal_balls),
            current_spell_wickets: self.spell.wickets,
            current_spell_runs: self.spell.runs,
            recent_deliveries: self.recent.iter().copied().collect(),
            is_on_hat_trick: self.wicket_streak >= 2,
            consecutive_dots: self.dot_streak,
        }
    }
}

/// The current not-out pair and what they have added together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partnership {
    pub runs: u32,
    pub balls: u32,
    /// Batters in order of first appearance with their bat runs.
    batters: Vec<(String, u32)>,
}

impl Partnership {
    /// A stand with no runs yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a delivery.
    pub fn record(&mut self, event: &DeliveryEvent) {
        self.ensure_batter(&event.batter);
        self.ensure_batter(&event.non_striker);

        self.runs += event.runs_total;
        if event.faced_by_batter() {
            self.balls += 1;
        }
        if let Some((_, runs)) = self.batters.iter_mut().find(|(n, _)| *n == event.batter) {
            *runs += event.runs_batter;
        }
    }

    fn ensure_batter(&mut self, name: &str) {
        if self.batters.len() < 2 && !self.batters.iter().any(|(n, _)| n == name) {
            self.batters.push((name.to_string(), 0));
        }
    }

    /// Build the public view. `recent_wickets` is the wicket count of the recent window.
    pub fn to_context(&self, recent_wickets: u32) -> PartnershipContext {
        let rate = run_rate(self.runs, Overs::from_balls(self.balls));
        let batter = |i: usize| {
            self.batters
                .get(i)
                .map(|(n, r)| (n.clone(), *r))
                .unwrap_or_default()
        };
        let (batter1_name, batter1_contribution) = batter(0);
        let (batter2_name, batter2_contribution) = batter(1);

        PartnershipContext {
            runs: self.runs,
            balls: self.balls,
            batter1_name,
            batter1_contribution,
            batter2_name,
            batter2_contribution,
            run_rate: rate,
            is_rebuilding: recent_wickets >= 2 && self.runs < 30,
            is_dominant: self.runs >= 50 && rate >= 6.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_rules::{BallNumber, Dismissal, DismissalKind};

    fn delivery(over: u32, ball: u32) -> DeliveryEvent {
        DeliveryEvent::new(BallNumber::new(over, ball), "Bat", "Bowl", "Other")
    }

    #[test]
    fn test_batting_wide_not_faced() {
        let mut figures = BattingFigures::default();
        figures.record(&delivery(0, 1).with_extras(ExtrasKind::Wide, 1));
        figures.record(&delivery(0, 1).with_runs(4).with_extras(ExtrasKind::NoBall, 1));
        figures.record(&delivery(0, 2).with_extras(ExtrasKind::LegBye, 1));

        assert_eq!(figures.balls, 2);
        assert_eq!(figures.runs, 4);
        assert_eq!(figures.fours, 1);
    }

    #[test]
    fn test_batting_milestone() {
        let figures = BattingFigures {
            runs: 47,
            balls: 35,
            ..Default::default()
        };
        let ctx = figures.to_context("Kohli", 15);
        assert_eq!(ctx.approaching_milestone, Some(50));
        assert_eq!(ctx.balls_to_milestone, Some(3));

        let far = BattingFigures {
            runs: 20,
            ..Default::default()
        };
        assert_eq!(far.to_context("Kohli", 15).approaching_milestone, None);

        let double = BattingFigures {
            runs: 190,
            ..Default::default()
        };
        assert_eq!(double.to_context("Kohli", 15).approaching_milestone, Some(200));

        // Nothing is tracked past a double hundred.
        let big = BattingFigures {
            runs: 240,
            ..Default::default()
        };
        let ctx = big.to_context("Kohli", 15);
        assert_eq!(ctx.approaching_milestone, None);
        assert_eq!(ctx.balls_to_milestone, None);
    }

    #[test]
    fn test_batting_dot_streak() {
        let mut figures = BattingFigures::default();
        figures.record(&delivery(0, 1).with_runs(1));
        figures.record(&delivery(0, 2));
        figures.record(&delivery(0, 3));
        figures.record(&delivery(0, 4).with_extras(ExtrasKind::Wide, 1));
        assert_eq!(figures.to_context("Bat", 15).dot_ball_pressure, 2);
    }

    #[test]
    fn test_bowling_extras_rules() {
        let mut figures = BowlingFigures::default();
        figures.record(&delivery(0, 1).with_extras(ExtrasKind::Wide, 1));
        figures.record(&delivery(0, 1).with_runs(2).with_extras(ExtrasKind::NoBall, 1));
        figures.record(&delivery(0, 2).with_extras(ExtrasKind::Bye, 4));
        figures.record(&delivery(0, 3).with_runs(1));

        assert_eq!(figures.legal_balls, 2);
        assert_eq!(figures.runs_conceded, 5);
        let ctx = figures.to_context("Bowl");
        assert_eq!(ctx.overs_bowled.to_string(), "0.2");
    }

    #[test]
    fn test_bowling_maiden_and_economy() {
        let mut figures = BowlingFigures::default();
        for ball in 1..=6 {
            figures.record(&delivery(0, ball));
        }
        for ball in 1..=6 {
            figures.record(&delivery(2, ball).with_runs(2));
        }
        assert_eq!(figures.maidens, 1);
        assert!((figures.economy() - 6.0).abs() < 0.001);
        assert_eq!(figures.to_context("Bowl").consecutive_dots, 0);
    }

    #[test]
    fn test_hat_trick_flag() {
        let mut figures = BowlingFigures::default();
        let out = |over, ball, who: &str| {
            delivery(over, ball).with_dismissal(Dismissal::new(DismissalKind::Bowled, who))
        };
        figures.record(&out(0, 5, "A"));
        assert!(!figures.to_context("Bowl").is_on_hat_trick);

        figures.record(&out(0, 6, "B"));
        assert!(figures.to_context("Bowl").is_on_hat_trick);

        // A wide keeps the hat-trick alive, a legal ball ends it.
        figures.record(&delivery(2, 1).with_extras(ExtrasKind::Wide, 1));
        assert!(figures.to_context("Bowl").is_on_hat_trick);
        figures.record(&delivery(2, 1));
        assert!(!figures.to_context("Bowl").is_on_hat_trick);
    }

    #[test]
    fn test_run_out_not_on_hat_trick() {
        let mut figures = BowlingFigures::default();
        figures.record(&delivery(0, 1).with_dismissal(Dismissal::new(DismissalKind::Caught, "A")));
        figures.record(&delivery(0, 2).with_dismissal(Dismissal::new(DismissalKind::RunOut, "B")));
        let ctx = figures.to_context("Bowl");
        assert!(!ctx.is_on_hat_trick);
        assert_eq!(ctx.wickets, 1);
    }

    #[test]
    fn test_spell_breaks_after_missed_over() {
        let mut figures = BowlingFigures::default();
        figures.record(&delivery(0, 1).with_dismissal(Dismissal::new(DismissalKind::Lbw, "A")));
        figures.record(&delivery(2, 1).with_dismissal(Dismissal::new(DismissalKind::Lbw, "B")));
        assert_eq!(figures.spell.wickets, 2);

        // Skips over 4, returns in over 6.
        figures.record(&delivery(6, 1));
        assert_eq!(figures.spell.wickets, 0);
        assert_eq!(figures.spell.legal_balls, 1);
        assert_eq!(figures.wickets, 2);
    }

    #[test]
    fn test_partnership_contributions() {
        let mut stand = Partnership::new();
        stand.record(&DeliveryEvent::new(BallNumber::new(0, 1), "A", "X", "B").with_runs(4));
        stand.record(&DeliveryEvent::new(BallNumber::new(0, 2), "A", "X", "B").with_runs(1));
        stand.record(&DeliveryEvent::new(BallNumber::new(0, 3), "B", "X", "A").with_extras(ExtrasKind::LegBye, 1));
        stand.record(&DeliveryEvent::new(BallNumber::new(0, 4), "A", "X", "B").with_runs(2));

        let ctx = stand.to_context(0);
        assert_eq!(ctx.runs, 8);
        assert_eq!(ctx.balls, 4);
        assert_eq!(ctx.batter1_name, "A");
        assert_eq!(ctx.batter1_contribution, 7);
        assert_eq!(ctx.batter2_name, "B");
        assert_eq!(ctx.batter2_contribution, 0);
        assert!((ctx.run_rate - 12.0).abs() < 0.001);
    }
}
