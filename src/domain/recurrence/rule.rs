//! RecurrenceRule value object and its validation.
//!
//! A rule repeats a pickup every `interval` weeks on a set of weekdays and
//! stops after a number of occurrences or at an inclusive end date.
//! Exactly one of the two termination criteria is allowed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::weekday::{Weekday, WeekdaySet};
use crate::domain::foundation::ValidationError;

/// When a recurrence stops producing occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Stop after this many occurrences.
    Count(u32),
    /// Stop once an occurrence would start after this date (inclusive bound).
    Until(NaiveDate),
}

/// Unvalidated rule as received from the API layer or read from storage.
///
/// `interval` and `termination_count` are wide signed integers so that
/// out-of-range input reaches validation instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRuleParams {
    pub interval: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<Vec<Weekday>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
}

/// A validated recurrence rule.
///
/// # Invariants
///
/// - `interval >= 1`
/// - exactly one termination criterion
/// - an empty weekday set means "the weekday of the first occurrence"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecurrenceRuleParams", into = "RecurrenceRuleParams")]
pub struct RecurrenceRule {
    interval: u32,
    weekdays: WeekdaySet,
    termination: Termination,
}

impl RecurrenceRule {
    /// Builds a rule from already-typed parts.
    ///
    /// # Errors
    ///
    /// - `InvalidInterval` if `interval` is zero
    /// - `InvalidTerminationCount` if a count termination is zero
    pub fn new(
        interval: u32,
        weekdays: WeekdaySet,
        termination: Termination,
    ) -> Result<Self, ValidationError> {
        if interval == 0 {
            return Err(ValidationError::InvalidInterval { actual: 0 });
        }
        if termination == Termination::Count(0) {
            return Err(ValidationError::InvalidTerminationCount { actual: 0 });
        }
        Ok(Self {
            interval,
            weekdays,
            termination,
        })
    }

    /// Every `interval` weeks on the first occurrence's weekday, `count` times.
    pub fn weekly(interval: u32, count: u32) -> Result<Self, ValidationError> {
        Self::new(interval, WeekdaySet::empty(), Termination::Count(count))
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn termination_count(&self) -> Option<u32> {
        match self.termination {
            Termination::Count(count) => Some(count),
            Termination::Until(_) => None,
        }
    }

    pub fn termination_date(&self) -> Option<NaiveDate> {
        match self.termination {
            Termination::Until(date) => Some(date),
            Termination::Count(_) => None,
        }
    }
}

/// Validates raw rule parameters.
///
/// # Errors
///
/// - `InvalidInterval` if `interval < 1`
/// - `OutOfRange` if `interval` does not fit in 32 bits
/// - `MissingTermination` if neither count nor date is set
/// - `ConflictingTermination` if both are set
/// - `InvalidTerminationCount` if the count is below 1
pub fn validate(params: &RecurrenceRuleParams) -> Result<RecurrenceRule, ValidationError> {
    if params.interval < 1 {
        return Err(ValidationError::InvalidInterval {
            actual: params.interval,
        });
    }
    let interval = u32::try_from(params.interval).map_err(|_| {
        ValidationError::out_of_range("interval", 1, i64::from(u32::MAX), params.interval)
    })?;

    let termination = match (params.termination_count, params.termination_date) {
        (Some(_), Some(_)) => return Err(ValidationError::ConflictingTermination),
        (None, None) => return Err(ValidationError::MissingTermination),
        (Some(count), None) => {
            if count < 1 {
                return Err(ValidationError::InvalidTerminationCount { actual: count });
            }
            let count = u32::try_from(count).map_err(|_| {
                ValidationError::out_of_range("termination_count", 1, i64::from(u32::MAX), count)
            })?;
            Termination::Count(count)
        }
        (None, Some(date)) => Termination::Until(date),
    };

    // An explicitly empty list is the same as no list.
    let weekdays = params
        .weekdays
        .as_ref()
        .map(|days| days.iter().copied().collect())
        .unwrap_or_default();

    RecurrenceRule::new(interval, weekdays, termination)
}

impl TryFrom<RecurrenceRuleParams> for RecurrenceRule {
    type Error = ValidationError;

    fn try_from(params: RecurrenceRuleParams) -> Result<Self, Self::Error> {
        validate(&params)
    }
}

impl From<RecurrenceRule> for RecurrenceRuleParams {
    fn from(rule: RecurrenceRule) -> Self {
        Self {
            interval: i64::from(rule.interval),
            weekdays: if rule.weekdays.is_empty() {
                None
            } else {
                Some(rule.weekdays.into())
            },
            termination_count: rule.termination_count().map(i64::from),
            termination_date: rule.termination_date(),
        }
    }
}
