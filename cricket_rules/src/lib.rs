//! # Cricket Rules
//!
//! The "scorebook" crate - delivery events, match metadata and the scoring arithmetic
//! (overs, rates, phases) shared by everything downstream.
//! This crate holds no accumulated state and does not contain any narrative logic.

pub mod event;
pub mod match_info;
pub mod scoring;

pub use event::*;
pub use match_info::*;
pub use scoring::*;
