//! Context Assembler - builds the per-delivery context record.
//!
//! The assembler wires the pieces together for each delivery:
//! 1. **Accumulate**: apply the event to the innings state
//! 2. **Derive**: read batter, bowler, partnership and situation views
//! 3. **Score**: compute pressure from the situation and recent window
//! 4. **Narrate**: fold the event into the narrative
//! 5. **Enrich**: ask the optional lookups for matchup, form and callbacks
//! 6. **Assemble**: add tone and length guidance and package the record

mod lookup;

pub use lookup::*;

use cricket_rules::{DeliveryEvent, MatchInfo};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ContextConfig;
use crate::error::{ContextError, Result};
use crate::models::{
    MatchSituation, NarrativeState, PressureLevel, RichContext, SuggestedLength, Tone,
};
use crate::narrative::{NarrativeInput, NarrativeTracker};
use crate::pressure::PressureCalculator;
use crate::state::MatchStateAccumulator;

/// Builds a [`RichContext`] for each delivery of one innings.
///
/// Cloning an assembler checkpoints the innings; the clone carries on independently
/// and shares only the lookup workers.
#[derive(Clone)]
pub struct ContextAssembler {
    info: MatchInfo,
    innings: u32,
    config: ContextConfig,

    state: MatchStateAccumulator,
    tracker: NarrativeTracker,
    narrative: NarrativeState,
    pressure: PressureCalculator,

    stats: Option<LookupWorker<dyn StatsLookup>>,
    history: Option<LookupWorker<dyn HistoricalLookup>>,

    events_processed: usize,
}

impl ContextAssembler {
    /// Create an assembler for an innings.
    pub fn new(info: MatchInfo, innings: u32, config: ContextConfig) -> Self {
        let state = MatchStateAccumulator::with_config(&info, innings, &config);
        info!(
            match_id = %info.id,
            innings,
            format = %info.format,
            "context assembler created"
        );
        Self {
            info,
            innings,
            config,
            state,
            tracker: NarrativeTracker::new(),
            narrative: NarrativeState::default(),
            pressure: PressureCalculator::new(),
            stats: None,
            history: None,
            events_processed: 0,
        }
    }

    /// Set the chase target.
    pub fn with_target(mut self, target: u32) -> Self {
        self.info.target = Some(target);
        self.state = self.state.with_target(target);
        self
    }

    /// Attach a statistics source. It gets its own worker thread.
    ///
    /// If the thread cannot be started the assembler carries on without statistics.
    pub fn with_stats_lookup(mut self, stats: Arc<dyn StatsLookup>) -> Self {
        match LookupWorker::spawn("stats-lookup", stats) {
            Ok(worker) => self.stats = Some(worker),
            Err(e) => warn!(error = %e, "stats lookup not attached"),
        }
        self
    }

    /// Attach a source of historical callbacks. It gets its own worker thread.
    pub fn with_historical_lookup(mut self, history: Arc<dyn HistoricalLookup>) -> Self {
        match LookupWorker::spawn("history-lookup", history) {
            Ok(worker) => self.history = Some(worker),
            Err(e) => warn!(error = %e, "historical lookup not attached"),
        }
        self
    }

    /// The configuration this assembler was created with.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// The accumulated innings state.
    pub fn state(&self) -> &MatchStateAccumulator {
        &self.state
    }

    /// The narrative after the last delivery.
    pub fn narrative(&self) -> &NarrativeState {
        &self.narrative
    }

    /// Number of deliveries applied so far.
    pub fn events_processed(&self) -> usize {
        self.events_processed
    }

    /// Apply a delivery without building its context.
    pub fn advance(&mut self, event: &DeliveryEvent) -> Result<()> {
        self.state.process(event)?;
        let input = NarrativeInput {
            event,
            batter_runs: self.state.batter_context(&event.batter).runs_scored,
            bowler_wickets_in_spell: self.state.spell_wickets(&event.bowler),
            partnership_runs: self.state.partnership_context().runs,
            runs_required: self.state.match_situation().runs_required,
        };
        self.narrative = self.tracker.update(&self.narrative, input);
        self.events_processed += 1;
        Ok(())
    }

    /// Apply a delivery and build its context.
    ///
    /// `recent_phrases` are the generator's latest lines, oldest first.
    pub fn build(&mut self, event: &DeliveryEvent, recent_phrases: &[String]) -> Result<RichContext> {
        self.advance(event)?;

        let batter = self.state.batter_context(&event.batter);
        let bowler = self.state.bowler_context(&event.bowler);
        let partnership = self.state.partnership_context();
        let recent = self.state.recent_events();
        let match_situation = self.state.match_situation();

        let (pressure, pressure_score) = self.pressure.calculate(
            &match_situation,
            recent.wickets_in_window,
            batter.is_new_batter(),
            recent.balls_since_last_boundary,
        );

        let mut narrative = self.narrative.clone();
        self.enrich(&mut narrative, event, &match_situation, pressure);

        let suggested_tone = suggest_tone(event, pressure);
        let suggested_length = suggest_length(event, pressure);

        let skip = recent_phrases
            .len()
            .saturating_sub(self.config.max_avoid_phrases);
        let avoid_phrases = recent_phrases[skip..].to_vec();

        debug!(
            ball = %event.ball,
            pressure = %pressure,
            pressure_score,
            momentum = %narrative.momentum,
            tone = %suggested_tone,
            "built context"
        );

        Ok(RichContext {
            event: event.clone(),
            match_situation,
            batter,
            bowler,
            partnership,
            recent,
            narrative,
            pressure,
            pressure_score,
            suggested_tone,
            suggested_length,
            avoid_phrases,
        })
    }

    /// Rebuild the innings from the start and return the context at `index`.
    ///
    /// Replays `events[..index]` on a fresh state, so the cost is linear in `index`.
    /// Afterwards the assembler is positioned just after `events[index]`.
    pub fn context_at(
        &mut self,
        events: &[DeliveryEvent],
        index: usize,
        recent_phrases: &[String],
    ) -> Result<RichContext> {
        let target = events.get(index).ok_or(ContextError::IndexOutOfRange {
            index,
            len: events.len(),
        })?;

        let mut fresh = self.restarted();
        for event in &events[..index] {
            fresh.advance(event)?;
        }
        let context = fresh.build(target, recent_phrases)?;
        *self = fresh;
        Ok(context)
    }

    /// A copy of this assembler with the innings state cleared.
    fn restarted(&self) -> Self {
        Self {
            info: self.info.clone(),
            innings: self.innings,
            config: self.config.clone(),
            state: MatchStateAccumulator::with_config(&self.info, self.innings, &self.config),
            tracker: NarrativeTracker::new(),
            narrative: NarrativeState::default(),
            pressure: self.pressure,
            stats: self.stats.clone(),
            history: self.history.clone(),
            events_processed: 0,
        }
    }

    /// Fill the externally sourced narrative fields. Lookup failures are logged and skipped.
    fn enrich(
        &self,
        narrative: &mut NarrativeState,
        event: &DeliveryEvent,
        situation: &MatchSituation,
        pressure: PressureLevel,
    ) {
        let timeout = self.config.lookup_timeout();
        let format = self.info.format;

        if let Some(history) = &self.history {
            match lookup::callbacks(history, event, situation, pressure, timeout) {
                Ok(found) => {
                    let mut merged = found;
                    merged.append(&mut narrative.callbacks_available);
                    merged.truncate(self.config.max_callbacks);
                    narrative.callbacks_available = merged;
                }
                Err(e) => warn!(ball = %event.ball, error = %e, "historical lookup failed"),
            }
        }

        let Some(stats) = &self.stats else {
            return;
        };

        match lookup::head_to_head(stats, &event.batter, &event.bowler, format, timeout) {
            Ok(Some(record)) if record.balls_faced >= self.config.matchup_min_balls => {
                narrative.matchup_context = Some(record.short_context());
            }
            Ok(_) => {}
            Err(e) => warn!(ball = %event.ball, error = %e, "head-to-head lookup failed"),
        }

        match lookup::phase_performance(stats, &event.batter, situation.phase, format, timeout) {
            Ok(Some(form)) => narrative.phase_form = Some(form.short_context()),
            Ok(None) => {}
            Err(e) => warn!(ball = %event.ball, error = %e, "phase lookup failed"),
        }
    }
}

/// Register for the line about this delivery.
pub fn suggest_tone(event: &DeliveryEvent, pressure: PressureLevel) -> Tone {
    if event.is_wicket() {
        return Tone::Dramatic;
    }
    match event.runs_batter {
        6 => return Tone::Excited,
        4 => return Tone::Enthusiastic,
        _ => {}
    }
    match pressure {
        PressureLevel::Intense | PressureLevel::Critical => Tone::Dramatic,
        PressureLevel::Tense => Tone::Tense,
        PressureLevel::Calm => Tone::Calm,
        PressureLevel::Building => Tone::Neutral,
    }
}

/// Length category for the line about this delivery.
pub fn suggest_length(event: &DeliveryEvent, pressure: PressureLevel) -> SuggestedLength {
    if event.is_wicket() || event.is_boundary() {
        SuggestedLength::Short
    } else if pressure == PressureLevel::Critical {
        SuggestedLength::Long
    } else if event.is_dot_ball() && pressure <= PressureLevel::Building {
        SuggestedLength::Short
    } else {
        SuggestedLength::Medium
    }
}
