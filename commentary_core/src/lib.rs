//! # Commentary Core
//!
//! Turns a ball-by-ball stream of delivery events into rich situational context for a
//! commentary generator. The crate consumes `cricket_rules` events in order and, for
//! each delivery, answers "what is the situation right now?".
//!
//! ## Core Components
//!
//! - **state**: Match State Accumulator, running figures for one innings
//! - **pressure**: Pressure Calculator, a bounded score and level per delivery
//! - **narrative**: Narrative Tracker, momentum, storyline and subplots
//! - **assembler**: Context Assembler, wires the above with optional external lookups
//! - **render**: compact short-key rendering of the assembled context
//!
//! ## Design Philosophy
//!
//! - **Sequential**: one accumulator per innings, fed in ball order, no shared state
//! - **Fail-Fast**: malformed or misordered events are rejected, state is left untouched
//! - **Optional Enrichment**: statistics and historical lookups may fail or time out
//!   without affecting the core context

pub mod assembler;
pub mod config;
pub mod error;
pub mod models;
pub mod narrative;
pub mod pressure;
pub mod render;
pub mod state;

pub use assembler::*;
pub use config::ContextConfig;
pub use error::{ConfigError, ContextError, LookupError};
pub use models::*;
pub use narrative::*;
pub use pressure::*;
pub use render::{encode_compact, COMPACT_SCHEMA};
pub use state::*;
