//! Recurrence module.
//!
//! - `weekday` - Weekday labels and compact weekday sets
//! - `rule` - `RecurrenceRule` value object and validation
//! - `expander` - Pure expansion of a first window into dated occurrences

mod expander;
mod rule;
mod weekday;

pub use expander::{expand, OccurrenceWindow, Occurrences, ScheduleExpander};
pub use rule::{validate, RecurrenceRule, RecurrenceRuleParams, Termination};
pub use weekday::{Weekday, WeekdaySet};
