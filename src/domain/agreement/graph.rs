//! Read models for the persisted agreement → schedules → occurrences graph.

use serde::Serialize;

use super::{Agreement, Occurrence, Schedule};

/// A schedule together with its occurrences, ordered by start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleGraph {
    pub schedule: Schedule,
    pub occurrences: Vec<Occurrence>,
}

/// An agreement with every schedule it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgreementGraph {
    pub agreement: Agreement,
    pub schedules: Vec<ScheduleGraph>,
}

impl AgreementGraph {
    pub fn occurrence_count(&self) -> usize {
        self.schedules.iter().map(|s| s.occurrences.len()).sum()
    }

    pub fn occurrences(&self) -> impl Iterator<Item = &Occurrence> {
        self.schedules.iter().flat_map(|s| s.occurrences.iter())
    }
}
