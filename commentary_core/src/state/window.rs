//! Rolling window of recent deliveries.

use cricket_rules::{BallNumber, DeliveryEvent};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::{DeliveryMark, RecentEvents};

/// What the window remembers about one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub ball: BallNumber,
    pub runs_total: u32,
    pub is_boundary: bool,
    pub is_wicket: bool,
    pub mark: DeliveryMark,
}

impl From<&DeliveryEvent> for WindowEntry {
    fn from(event: &DeliveryEvent) -> Self {
        Self {
            ball: event.ball,
            runs_total: event.runs_total,
            is_boundary: event.is_boundary(),
            is_wicket: event.is_wicket(),
            mark: DeliveryMark::from(event),
        }
    }
}

/// Fixed-capacity window over the most recent deliveries, plus running
/// "balls since" counters that are not bounded by the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentWindow {
    entries: VecDeque<WindowEntry>,
    capacity: usize,
    balls_since_boundary: u32,
    balls_since_wicket: u32,
    last_wicket: Option<String>,
}

impl RecentWindow {
    /// Create an empty window holding at most `capacity` deliveries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            balls_since_boundary: 0,
            balls_since_wicket: 0,
            last_wicket: None,
        }
    }

    /// Record a delivery, evicting the oldest once full.
    pub fn push(&mut self, event: &DeliveryEvent) {
        let entry = WindowEntry::from(event);

        if entry.is_boundary {
            self.balls_since_boundary = 0;
        } else {
            self.balls_since_boundary += 1;
        }

        if entry.is_wicket {
            self.balls_since_wicket = 0;
            if let Some(d) = &event.dismissal {
                self.last_wicket = Some(format!("{} {} by {}", d.player_out, d.kind, event.bowler));
            }
        } else {
            self.balls_since_wicket += 1;
        }

        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Wickets in the window.
    pub fn wickets(&self) -> u32 {
        self.entries.iter().filter(|e| e.is_wicket).count() as u32
    }

    /// Fours and sixes in the window.
    pub fn boundaries(&self) -> u32 {
        self.entries.iter().filter(|e| e.is_boundary).count() as u32
    }

    /// Runs in the window, extras included.
    pub fn runs(&self) -> u32 {
        self.entries.iter().map(|e| e.runs_total).sum()
    }

    /// Deliveries since the last boundary, or since the innings began.
    pub fn balls_since_boundary(&self) -> u32 {
        self.balls_since_boundary
    }

    /// Deliveries since the last wicket, or since the innings began.
    pub fn balls_since_wicket(&self) -> u32 {
        self.balls_since_wicket
    }

    /// The last `n` entries, oldest first.
    pub fn last(&self, n: usize) -> impl Iterator<Item = &WindowEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    /// Deliveries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no delivery has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot as the public view.
    pub fn to_recent_events(&self) -> RecentEvents {
        RecentEvents {
            last_over_summary: self
                .last(6)
                .map(|e| e.mark.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            wickets_in_window: self.wickets(),
            boundaries_in_window: self.boundaries(),
            runs_in_window: self.runs(),
            last_wicket_description: self.last_wicket.clone(),
            balls_since_last_boundary: self.balls_since_boundary,
            balls_since_last_wicket: self.balls_since_wicket,
        }
    }
}
