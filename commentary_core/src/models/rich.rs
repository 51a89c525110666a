//! The assembled per-delivery context.

use cricket_rules::DeliveryEvent;
use serde::{Deserialize, Serialize};

use super::{
    BatterContext, BowlerContext, MatchSituation, NarrativeState, PartnershipContext,
    PressureLevel, RecentEvents, SuggestedLength, Tone,
};

/// Complete situational context for one delivery, ready for a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichContext {
    /// The delivery being described.
    pub event: DeliveryEvent,

    pub match_situation: MatchSituation,

    pub batter: BatterContext,
    pub bowler: BowlerContext,
    pub partnership: PartnershipContext,

    pub recent: RecentEvents,

    pub narrative: NarrativeState,

    pub pressure: PressureLevel,
    /// 0.0 to 1.0.
    pub pressure_score: f32,

    pub suggested_tone: Tone,
    pub suggested_length: SuggestedLength,
    /// Phrases the generator used recently.
    pub avoid_phrases: Vec<String>,
}

impl RichContext {
    /// Serialize to JSON. Lossless, unlike the prompt renderings.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Format the context as a sectioned prompt string.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();
        let m = &self.match_situation;

        prompt.push_str("=== MATCH SITUATION ===\n");
        prompt.push_str(&format!("{} vs {}\n", m.batting_team, m.bowling_team));
        prompt.push_str(&format!("Score: {}\n", m.score_string()));
        if let (Some(target), Some(need)) = (m.target, m.runs_required) {
            match m.balls_remaining {
                Some(balls) => prompt.push_str(&format!(
                    "Target: {}, Need: {} from {} balls\n",
                    target, need, balls
                )),
                None => prompt.push_str(&format!("Target: {}, Need: {}\n", target, need)),
            }
        }
        match m.required_rate {
            Some(rrr) => prompt.push_str(&format!(
                "Required rate: {:.2}, Current rate: {:.2}\n",
                rrr, m.current_run_rate
            )),
            None => prompt.push_str(&format!("Current rate: {:.2}\n", m.current_run_rate)),
        }
        prompt.push_str(&format!("Phase: {} ({})\n", m.phase, m.match_format));

        prompt.push_str("\n=== THIS DELIVERY ===\n");
        prompt.push_str(&format!(
            "{} {} to {}\n",
            self.event.ball, self.bowler.name, self.batter.name
        ));
        prompt.push_str(&format!("Result: {}\n", self.event.description()));

        prompt.push_str("\n=== BATTER ===\n");
        prompt.push_str(&format!(
            "{}: {} ({}), SR: {:.1}, 4s: {}, 6s: {}\n",
            self.batter.name,
            self.batter.runs_scored,
            self.batter.balls_faced,
            self.batter.strike_rate,
            self.batter.fours,
            self.batter.sixes
        ));
        if let (Some(milestone), Some(to_go)) = (
            self.batter.approaching_milestone,
            self.batter.balls_to_milestone,
        ) {
            prompt.push_str(&format!("Approaching: {} ({} to go)\n", milestone, to_go));
        }
        if self.batter.is_new_batter() {
            prompt.push_str("Status: New at crease\n");
        } else if self.batter.is_struggling() {
            prompt.push_str("Status: Struggling\n");
        } else if self.batter.is_settled() {
            prompt.push_str("Status: Well set\n");
        }
        if self.batter.dot_ball_pressure > 0 {
            prompt.push_str(&format!("Dots in a row: {}\n", self.batter.dot_ball_pressure));
        }

        prompt.push_str("\n=== BOWLER ===\n");
        prompt.push_str(&format!(
            "{}: {}, Econ: {:.2}\n",
            self.bowler.name,
            self.bowler.figures(),
            self.bowler.economy
        ));
        prompt.push_str(&format!(
            "Spell: {}-{}-{}\n",
            self.bowler.current_spell_overs,
            self.bowler.current_spell_runs,
            self.bowler.current_spell_wickets
        ));
        if self.bowler.is_on_hat_trick {
            prompt.push_str("ON A HAT-TRICK!\n");
        }
        if self.bowler.is_bowling_well() {
            prompt.push_str("Status: Bowling well\n");
        } else if self.bowler.is_expensive() {
            prompt.push_str("Status: Under pressure\n");
        }

        if self.partnership.balls > 0 {
            prompt.push_str("\n=== PARTNERSHIP ===\n");
            prompt.push_str(&format!(
                "{} runs, {} balls ({} {}, {} {})\n",
                self.partnership.runs,
                self.partnership.balls,
                self.partnership.batter1_name,
                self.partnership.batter1_contribution,
                self.partnership.batter2_name,
                self.partnership.batter2_contribution
            ));
        }

        if !self.recent.last_over_summary.is_empty() {
            prompt.push_str("\n=== RECENT ===\n");
            prompt.push_str(&format!("Last balls: {}\n", self.recent.last_over_summary));
            if let Some(wicket) = &self.recent.last_wicket_description {
                prompt.push_str(&format!("Last wicket: {}\n", wicket));
            }
        }

        prompt.push_str("\n=== NARRATIVE ===\n");
        prompt.push_str(&self.narrative.to_prompt_string());
        prompt.push('\n');

        prompt.push_str(&format!(
            "\n=== PRESSURE: {} ({:.2}) ===\n",
            self.pressure.as_str().to_uppercase(),
            self.pressure_score
        ));
        prompt.push_str(self.pressure.description());
        prompt.push('\n');

        prompt.push_str("\n=== COMMENTARY GUIDANCE ===\n");
        prompt.push_str(&format!("Tone: {}\n", self.suggested_tone));
        prompt.push_str(&format!("Length: {}\n", self.suggested_length));
        if !self.avoid_phrases.is_empty() {
            prompt.push_str(&format!("Avoid: {}\n", self.avoid_phrases.join(", ")));
        }

        prompt
    }
}
