//! Narrative Tracker - momentum, storyline and subplots.
//!
//! The tracker keeps two streak counters of its own (consecutive boundaries and
//! consecutive scoreless deliveries) and derives the story from them. The previous
//! narrative is passed in explicitly, so the storyline only changes when a new
//! threshold is crossed and otherwise carries over unchanged.

use cricket_rules::DeliveryEvent;
use tracing::debug;

use crate::models::{Momentum, NarrativeState};

/// Consecutive boundaries that hand the batting side the momentum.
const BOUNDARY_RUN: u32 = 3;

/// Consecutive scoreless deliveries that hand the bowling side the momentum.
const SCORELESS_RUN: u32 = 6;

/// Boundaries that must precede a wicket for it to count as a reversal.
const REVERSAL_BOUNDARIES: u32 = 2;

/// Batting milestones tracked for subplots.
const MILESTONES: [u32; 4] = [50, 100, 150, 200];

/// How close (in runs) a milestone or target must be to become a subplot.
const CLOSE_RUNS: u32 = 5;

/// Per-delivery figures the tracker needs from accumulated state.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeInput<'a> {
    pub event: &'a DeliveryEvent,
    /// The striker's runs after this delivery.
    pub batter_runs: u32,
    /// The bowler's wickets in the current spell after this delivery.
    pub bowler_wickets_in_spell: u32,
    /// The current partnership's runs after this delivery.
    pub partnership_runs: u32,
    /// Runs still needed, when chasing.
    pub runs_required: Option<u32>,
}

/// Derives momentum, storyline, subplot, dramatic potential and tension.
#[derive(Debug, Clone, Default)]
pub struct NarrativeTracker {
    boundary_streak: u32,
    scoreless_streak: u32,
}

impl NarrativeTracker {
    /// A tracker with no deliveries seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive boundaries up to and including the last delivery.
    pub fn boundary_streak(&self) -> u32 {
        self.boundary_streak
    }

    /// Consecutive scoreless deliveries up to and including the last delivery.
    pub fn scoreless_streak(&self) -> u32 {
        self.scoreless_streak
    }

    /// Fold one delivery into the narrative.
    ///
    /// External fields (callbacks, matchup, phase form) are left empty for the
    /// caller to fill in.
    pub fn update(&mut self, previous: &NarrativeState, input: NarrativeInput<'_>) -> NarrativeState {
        let event = input.event;
        let boundaries_before = self.boundary_streak;
        self.track(event);

        let momentum = self.momentum(event, boundaries_before);
        let current_storyline = self
            .storyline(&input)
            .unwrap_or_else(|| previous.current_storyline.clone());
        let key_subplot = subplot(&input);
        let dramatic_potential = self.dramatic_potential(&input);
        let tension_level = self.tension(event, momentum);

        if momentum != previous.momentum {
            debug!(ball = %event.ball, from = %previous.momentum, to = %momentum, "momentum changed");
        }

        NarrativeState {
            current_storyline,
            tension_level,
            momentum,
            key_subplot,
            dramatic_potential,
            ..Default::default()
        }
    }

    fn track(&mut self, event: &DeliveryEvent) {
        if event.is_boundary() && !event.is_wicket() {
            self.boundary_streak += 1;
        } else {
            self.boundary_streak = 0;
        }

        if event.runs_total == 0 {
            self.scoreless_streak += 1;
        } else {
            self.scoreless_streak = 0;
        }
    }

    fn momentum(&self, event: &DeliveryEvent, boundaries_before: u32) -> Momentum {
        if self.boundary_streak >= BOUNDARY_RUN {
            Momentum::BattingDominant
        } else if self.scoreless_streak >= SCORELESS_RUN {
            Momentum::BowlingDominant
        } else if event.is_wicket() && boundaries_before >= REVERSAL_BOUNDARIES {
            Momentum::MomentumShift
        } else {
            Momentum::Balanced
        }
    }

    /// A new storyline, if this delivery crossed a threshold.
    fn storyline(&self, input: &NarrativeInput<'_>) -> Option<String> {
        let event = input.event;
        if input.bowler_wickets_in_spell >= 2 {
            Some(format!(
                "{} is wreaking havoc, {} wickets in this spell",
                event.bowler, input.bowler_wickets_in_spell
            ))
        } else if self.boundary_streak >= BOUNDARY_RUN {
            Some(format!("Boundaries flowing! {} taking control", event.batter))
        } else {
            None
        }
    }

    fn dramatic_potential(&self, input: &NarrativeInput<'_>) -> Option<String> {
        let event = input.event;
        if let Some(milestone) = milestone_within(input.batter_runs) {
            return Some(format!("{} could reach {} soon", event.batter, milestone));
        }
        match input.partnership_runs {
            45..=49 => return Some("50 partnership within reach".to_string()),
            95..=99 => return Some("Century partnership beckons".to_string()),
            _ => {}
        }
        if input.bowler_wickets_in_spell >= 2 && event.is_wicket() {
            return Some(format!("Could {} get another?", event.bowler));
        }
        if self.scoreless_streak >= SCORELESS_RUN {
            return Some("Something has to give".to_string());
        }
        None
    }

    fn tension(&self, event: &DeliveryEvent, momentum: Momentum) -> f32 {
        let mut tension: f32 = 0.3;
        if event.is_wicket() {
            tension += 0.3;
        }
        if self.scoreless_streak >= SCORELESS_RUN {
            tension += 0.2;
        }
        if momentum == Momentum::MomentumShift {
            tension += 0.2;
        }
        tension.min(1.0)
    }
}

/// The milestone a score sits just below, if any.
fn milestone_within(runs: u32) -> Option<u32> {
    MILESTONES
        .iter()
        .copied()
        .find(|&m| runs < m && m - runs <= CLOSE_RUNS)
}

fn milestone_name(milestone: u32) -> String {
    match milestone {
        50 => "fifty".to_string(),
        100 => "hundred".to_string(),
        other => other.to_string(),
    }
}

/// Milestone proximity first, then a chase on its last few runs.
fn subplot(input: &NarrativeInput<'_>) -> Option<String> {
    if let Some(milestone) = milestone_within(input.batter_runs) {
        return Some(format!(
            "{} {} away from {}",
            input.event.batter,
            milestone - input.batter_runs,
            milestone_name(milestone)
        ));
    }
    match input.runs_required {
        Some(need) if (1..=CLOSE_RUNS).contains(&need) => Some(format!("{} needed to win", need)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_rules::{BallNumber, Dismissal, DismissalKind};

    struct Feed {
        tracker: NarrativeTracker,
        state: NarrativeState,
        n: u32,
    }

    impl Feed {
        fn new() -> Self {
            Self {
                tracker: NarrativeTracker::new(),
                state: NarrativeState::default(),
                n: 0,
            }
        }

        fn event(&mut self) -> DeliveryEvent {
            let e = DeliveryEvent::new(
                BallNumber::new(self.n / 6, self.n % 6 + 1),
                "Kohli",
                "Starc",
                "Gill",
            );
            self.n += 1;
            e
        }

        fn ball(&mut self, event: DeliveryEvent, batter_runs: u32, spell_wickets: u32) -> NarrativeState {
            let input = NarrativeInput {
                event: &event,
                batter_runs,
                bowler_wickets_in_spell: spell_wickets,
                partnership_runs: 0,
                runs_required: None,
            };
            self.state = self.tracker.update(&self.state, input);
            self.state.clone()
        }

        fn runs(&mut self, runs: u32) -> NarrativeState {
            let e = self.event().with_runs(runs);
            self.ball(e, 10, 0)
        }

        fn wicket(&mut self, spell_wickets: u32) -> NarrativeState {
            let e = self
                .event()
                .with_dismissal(Dismissal::new(DismissalKind::Caught, "Kohli"));
            self.ball(e, 10, spell_wickets)
        }
    }

    fn input(event: &DeliveryEvent, batter_runs: u32) -> NarrativeInput<'_> {
        NarrativeInput {
            event,
            batter_runs,
            bowler_wickets_in_spell: 0,
            partnership_runs: 0,
            runs_required: None,
        }
    }

    #[test]
    fn test_three_boundaries_batting_dominant() {
        let mut feed = Feed::new();
        assert_eq!(feed.runs(4).momentum, Momentum::Balanced);
        assert_eq!(feed.runs(6).momentum, Momentum::Balanced);
        let state = feed.runs(4);
        assert_eq!(state.momentum, Momentum::BattingDominant);
        assert_eq!(state.current_storyline, "Boundaries flowing! Kohli taking control");

        // A single ends the run of boundaries.
        assert_eq!(feed.runs(1).momentum, Momentum::Balanced);
    }

    #[test]
    fn test_six_scoreless_bowling_dominant() {
        let mut feed = Feed::new();
        for _ in 0..5 {
            assert_eq!(feed.runs(0).momentum, Momentum::Balanced);
        }
        let state = feed.runs(0);
        assert_eq!(state.momentum, Momentum::BowlingDominant);
        assert_eq!(state.dramatic_potential.as_deref(), Some("Something has to give"));
        assert!((state.tension_level - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_dots_then_wicket_stays_bowling_side() {
        let mut feed = Feed::new();
        for _ in 0..5 {
            feed.runs(0);
        }
        let state = feed.wicket(1);
        assert_eq!(state.momentum, Momentum::BowlingDominant);
        assert_ne!(state.momentum, Momentum::MomentumShift);
        assert!((state.tension_level - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_wicket_after_boundaries_is_shift() {
        let mut feed = Feed::new();
        feed.runs(4);
        feed.runs(4);
        let state = feed.wicket(1);
        assert_eq!(state.momentum, Momentum::MomentumShift);
        assert!((state.tension_level - 0.8).abs() < 1e-4);

        // One boundary is not enough for a reversal.
        let mut feed = Feed::new();
        feed.runs(1);
        feed.runs(4);
        assert_eq!(feed.wicket(1).momentum, Momentum::Balanced);
    }

    #[test]
    fn test_wicket_breaks_boundary_run() {
        let mut feed = Feed::new();
        feed.runs(4);
        feed.runs(4);
        feed.wicket(1);
        assert_eq!(feed.runs(4).momentum, Momentum::Balanced);
    }

    #[test]
    fn test_storyline_persists() {
        let mut feed = Feed::new();
        feed.runs(4);
        feed.runs(4);
        feed.runs(4);
        let state = feed.runs(1);
        assert_eq!(state.momentum, Momentum::Balanced);
        assert_eq!(state.current_storyline, "Boundaries flowing! Kohli taking control");

        let state = feed.wicket(2);
        assert_eq!(state.current_storyline, "Starc is wreaking havoc, 2 wickets in this spell");
        assert_eq!(state.dramatic_potential.as_deref(), Some("Could Starc get another?"));
    }

    #[test]
    fn test_no_storyline_until_threshold() {
        let mut feed = Feed::new();
        assert!(feed.runs(2).current_storyline.is_empty());
        assert!(feed.runs(0).current_storyline.is_empty());
    }

    #[test]
    fn test_milestone_subplot_window() {
        let event = DeliveryEvent::new(BallNumber::new(0, 1), "Kohli", "Starc", "Gill");

        let subplot_at = |runs| {
            NarrativeTracker::new()
                .update(&NarrativeState::default(), input(&event, runs))
                .key_subplot
        };

        assert_eq!(subplot_at(44), None);
        assert_eq!(subplot_at(45).as_deref(), Some("Kohli 5 away from fifty"));
        assert_eq!(subplot_at(47).as_deref(), Some("Kohli 3 away from fifty"));
        assert_eq!(subplot_at(49).as_deref(), Some("Kohli 1 away from fifty"));
        assert_eq!(subplot_at(50), None);
        assert_eq!(subplot_at(98).as_deref(), Some("Kohli 2 away from hundred"));
        assert_eq!(subplot_at(146).as_deref(), Some("Kohli 4 away from 150"));
    }

    #[test]
    fn test_chase_subplot() {
        let event = DeliveryEvent::new(BallNumber::new(19, 1), "Kohli", "Starc", "Gill");
        let mut chase = input(&event, 20);
        chase.runs_required = Some(4);
        let state = NarrativeTracker::new().update(&NarrativeState::default(), chase);
        assert_eq!(state.key_subplot.as_deref(), Some("4 needed to win"));

        chase.runs_required = Some(0);
        let state = NarrativeTracker::new().update(&NarrativeState::default(), chase);
        assert_eq!(state.key_subplot, None);

        // Milestone wins the tie.
        chase.batter_runs = 48;
        chase.runs_required = Some(3);
        let state = NarrativeTracker::new().update(&NarrativeState::default(), chase);
        assert_eq!(state.key_subplot.as_deref(), Some("Kohli 2 away from fifty"));
    }

    #[test]
    fn test_partnership_potential() {
        let event = DeliveryEvent::new(BallNumber::new(5, 1), "Kohli", "Starc", "Gill");
        let mut stand = input(&event, 20);

        stand.partnership_runs = 47;
        let state = NarrativeTracker::new().update(&NarrativeState::default(), stand);
        assert_eq!(state.dramatic_potential.as_deref(), Some("50 partnership within reach"));

        stand.partnership_runs = 97;
        let state = NarrativeTracker::new().update(&NarrativeState::default(), stand);
        assert_eq!(state.dramatic_potential.as_deref(), Some("Century partnership beckons"));

        stand.batter_runs = 96;
        let state = NarrativeTracker::new().update(&NarrativeState::default(), stand);
        assert_eq!(state.dramatic_potential.as_deref(), Some("Kohli could reach 100 soon"));
    }

    #[test]
    fn test_streak_counters() {
        let mut feed = Feed::new();
        for runs in [0, 1, 4, 6, 0, 0] {
            feed.runs(runs);
        }
        assert_eq!(feed.tracker.boundary_streak(), 0);
        assert_eq!(feed.tracker.scoreless_streak(), 2);
        feed.runs(4);
        assert_eq!(feed.tracker.boundary_streak(), 1);
        assert_eq!(feed.tracker.scoreless_streak(), 0);
    }

    #[test]
    fn test_same_state_same_output() {
        let mut feed = Feed::new();
        for runs in [4, 4, 0, 1, 0, 0, 0] {
            feed.runs(runs);
        }
        let mut copy = feed.tracker.clone();
        let previous = feed.state.clone();

        for runs in [0, 4, 0, 0, 6] {
            let event = feed.event().with_runs(runs);
            let mut stand = input(&event, 47);
            stand.partnership_runs = 46;
            let a = feed.tracker.update(&previous, stand);
            let b = copy.update(&previous, stand);
            assert_eq!(a, b);
        }
        assert_eq!(feed.tracker.scoreless_streak(), copy.scoreless_streak());
        assert_eq!(feed.tracker.boundary_streak(), copy.boundary_streak());
    }
}
