//! Scenario runner
//!
//! Sequences fixture setup, navigation, UI interaction, and assertions
//! for the fixed scenario catalogue. Scenarios run serially and stay
//! isolated: a failure in one never blocks the next.

pub mod channels;
pub mod fixtures;
mod runner;

pub use runner::{catalogue, run_suite, Scenario, ScenarioCx, ScenarioResult, SuiteReport};
