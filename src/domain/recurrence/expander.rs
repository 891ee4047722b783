//! Expansion of a first occurrence window plus a recurrence rule into the
//! full, ordered sequence of occurrence windows.
//!
//! Expansion is a pure computation: `ScheduleExpander` is a `Copy` value and
//! every call to [`ScheduleExpander::iter`] starts a fresh, independent walk.
//!
//! # Walk
//!
//! 1. Without a rule the sequence is the first window alone.
//! 2. With a weekday set that does not contain the first window's weekday,
//!    the cursor first moves to the next date falling on the set's
//!    smallest weekday.
//! 3. After each emission the cursor moves to the next weekday in the set
//!    within the same week. When none is left it wraps to the smallest
//!    weekday, which completes a cycle; an empty set always completes a
//!    cycle on the same weekday one week later. A completed cycle skips a
//!    further `interval - 1` weeks.
//! 4. A count termination stops after that many emitted windows; a date
//!    termination stops before the first window starting after the date.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::rule::{RecurrenceRule, Termination};
use super::weekday::Weekday;
use crate::domain::foundation::ValidationError;

/// A concrete start/end pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccurrenceWindow {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

impl OccurrenceWindow {
    /// # Errors
    ///
    /// - `InvalidWindow` unless `starts_at < ends_at`
    pub fn new(starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> Result<Self, ValidationError> {
        if ends_at <= starts_at {
            return Err(ValidationError::invalid_window(
                "occurrence",
                format!("end {} is not after start {}", ends_at, starts_at),
            ));
        }
        Ok(Self { starts_at, ends_at })
    }

    pub fn weekday(&self) -> Weekday {
        self.starts_at.weekday().into()
    }

    /// Moves both ends forward to the next date falling on `target`,
    /// keeping time of day and duration. Same weekday means one week ahead.
    fn advance_to(&self, target: Weekday) -> Option<Self> {
        self.shift(self.weekday().days_until(target))
    }

    fn shift(&self, days: u64) -> Option<Self> {
        let days = Days::new(days);
        Some(Self {
            starts_at: self.starts_at.checked_add_days(days)?,
            ends_at: self.ends_at.checked_add_days(days)?,
        })
    }
}

/// Expands one schedule definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleExpander {
    first: OccurrenceWindow,
    rule: Option<RecurrenceRule>,
}

impl ScheduleExpander {
    pub fn new(first: OccurrenceWindow, rule: Option<RecurrenceRule>) -> Self {
        Self { first, rule }
    }

    /// Starts a new lazy walk over the occurrence windows.
    pub fn iter(&self) -> Occurrences {
        let state = match self.rule {
            None => Walk::Single(Some(self.first)),
            Some(rule) => Walk::Recurring(Cursor {
                window: Some(self.first),
                rule,
                emitted: 0,
                aligned: false,
            }),
        };
        Occurrences { state }
    }

    /// Collects the whole expansion.
    ///
    /// Windows ending after `horizon` are dropped (the walk is ordered, so
    /// the first one ends it). More than `limit` windows is an error rather
    /// than a silent truncation.
    ///
    /// # Errors
    ///
    /// - `ExpansionLimitExceeded` if the walk yields more than `limit` windows
    pub fn materialize(
        &self,
        horizon: Option<NaiveDate>,
        limit: usize,
    ) -> Result<Vec<OccurrenceWindow>, ValidationError> {
        let windows: Vec<OccurrenceWindow> = self
            .iter()
            .take_while(|window| horizon.map_or(true, |last| window.ends_at.date() <= last))
            .take(limit.saturating_add(1))
            .collect();

        if windows.len() > limit {
            return Err(ValidationError::ExpansionLimitExceeded { limit });
        }
        Ok(windows)
    }
}

impl IntoIterator for &ScheduleExpander {
    type Item = OccurrenceWindow;
    type IntoIter = Occurrences;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Shorthand for `ScheduleExpander::new(first, rule).iter()`.
pub fn expand(first: OccurrenceWindow, rule: Option<RecurrenceRule>) -> Occurrences {
    ScheduleExpander::new(first, rule).iter()
}

/// Iterator returned by [`ScheduleExpander::iter`].
#[derive(Debug, Clone)]
pub struct Occurrences {
    state: Walk,
}

#[derive(Debug, Clone)]
enum Walk {
    Single(Option<OccurrenceWindow>),
    Recurring(Cursor),
}

#[derive(Debug, Clone)]
struct Cursor {
    /// `None` once date arithmetic ran off the calendar.
    window: Option<OccurrenceWindow>,
    rule: RecurrenceRule,
    emitted: u32,
    aligned: bool,
}

impl Cursor {
    fn align(&mut self) {
        self.aligned = true;
        let weekdays = self.rule.weekdays();
        if let (Some(window), Some(first_day)) = (self.window, weekdays.first()) {
            if !weekdays.contains(window.weekday()) {
                self.window = window.advance_to(first_day);
            }
        }
    }

    fn exhausted(&self, window: &OccurrenceWindow) -> bool {
        match self.rule.termination() {
            Termination::Count(count) => self.emitted >= count,
            Termination::Until(last) => window.starts_at.date() > last,
        }
    }

    fn step(&self, window: &OccurrenceWindow) -> Option<OccurrenceWindow> {
        let today = window.weekday();
        let weekdays = self.rule.weekdays();

        let (target, completes_cycle) = match weekdays.next_after(today) {
            Some(next) => (next, false),
            None => (weekdays.first().unwrap_or(today), true),
        };

        let next = window.advance_to(target)?;
        if completes_cycle && self.rule.interval() > 1 {
            let skipped_weeks = u64::from(self.rule.interval() - 1);
            next.shift(skipped_weeks * 7)
        } else {
            Some(next)
        }
    }
}

impl Iterator for Occurrences {
    type Item = OccurrenceWindow;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            Walk::Single(first) => first.take(),
            Walk::Recurring(cursor) => {
                if !cursor.aligned {
                    cursor.align();
                }
                let window = cursor.window?;
                if cursor.exhausted(&window) {
                    cursor.window = None;
                    return None;
                }
                cursor.emitted = cursor.emitted.saturating_add(1);
                cursor.window = cursor.step(&window);
                Some(window)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recurrence::weekday::WeekdaySet;
    use chrono::{Duration, NaiveTime};
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap())
    }

    /// 2024-03-04 is a Monday.
    fn monday_window() -> OccurrenceWindow {
        OccurrenceWindow::new(at(2024, 3, 4, 10), at(2024, 3, 4, 11)).unwrap()
    }

    fn rule(interval: u32, days: &[Weekday], termination: Termination) -> RecurrenceRule {
        RecurrenceRule::new(interval, days.iter().copied().collect(), termination).unwrap()
    }

    fn starts(windows: &[OccurrenceWindow]) -> Vec<NaiveDateTime> {
        windows.iter().map(|w| w.starts_at).collect()
    }

    #[test]
    fn window_rejects_end_before_start() {
        assert!(OccurrenceWindow::new(at(2024, 3, 4, 11), at(2024, 3, 4, 10)).is_err());
        assert!(OccurrenceWindow::new(at(2024, 3, 4, 10), at(2024, 3, 4, 10)).is_err());
    }

    #[test]
    fn no_rule_yields_the_first_window_only() {
        let windows: Vec<_> = expand(monday_window(), None).collect();
        assert_eq!(windows, vec![monday_window()]);
    }

    #[test]
    fn weekly_monday_rule_repeats_every_seven_days() {
        let windows: Vec<_> = expand(
            monday_window(),
            Some(rule(1, &[Weekday::Monday], Termination::Count(3))),
        )
        .collect();

        assert_eq!(
            starts(&windows),
            vec![at(2024, 3, 4, 10), at(2024, 3, 11, 10), at(2024, 3, 18, 10)]
        );
        for window in &windows {
            assert_eq!(window.ends_at - window.starts_at, Duration::hours(1));
        }
    }

    #[test]
    fn empty_weekdays_repeat_on_the_first_weekday() {
        let first = OccurrenceWindow::new(at(2024, 3, 7, 8), at(2024, 3, 7, 9)).unwrap();
        let windows: Vec<_> = expand(first, Some(RecurrenceRule::weekly(2, 3).unwrap())).collect();

        assert_eq!(
            starts(&windows),
            vec![at(2024, 3, 7, 8), at(2024, 3, 21, 8), at(2024, 4, 4, 8)]
        );
    }

    #[test]
    fn biweekly_monday_wednesday_skips_alternate_weeks() {
        let windows: Vec<_> = expand(
            monday_window(),
            Some(rule(
                2,
                &[Weekday::Monday, Weekday::Wednesday],
                Termination::Count(5),
            )),
        )
        .collect();

        assert_eq!(
            starts(&windows),
            vec![
                at(2024, 3, 4, 10),  // Mon week 1
                at(2024, 3, 6, 10),  // Wed week 1
                at(2024, 3, 18, 10), // Mon week 3
                at(2024, 3, 20, 10), // Wed week 3
                at(2024, 4, 1, 10),  // Mon week 5
            ]
        );
    }

    #[test]
    fn start_outside_weekdays_aligns_to_smallest_weekday() {
        // Tuesday start with {MON, WED}: alignment goes to the next Monday,
        // not to the Wednesday of the same week.
        let first = OccurrenceWindow::new(at(2024, 3, 5, 10), at(2024, 3, 5, 12)).unwrap();
        let windows: Vec<_> = expand(
            first,
            Some(rule(
                1,
                &[Weekday::Wednesday, Weekday::Monday],
                Termination::Count(3),
            )),
        )
        .collect();

        assert_eq!(
            starts(&windows),
            vec![at(2024, 3, 11, 10), at(2024, 3, 13, 10), at(2024, 3, 18, 10)]
        );
        assert_eq!(windows[0].ends_at, at(2024, 3, 11, 12));
    }

    #[test]
    fn until_date_is_inclusive() {
        let windows: Vec<_> = expand(
            monday_window(),
            Some(rule(
                1,
                &[Weekday::Monday],
                Termination::Until(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()),
            )),
        )
        .collect();

        assert_eq!(
            starts(&windows),
            vec![at(2024, 3, 4, 10), at(2024, 3, 11, 10), at(2024, 3, 18, 10)]
        );
    }

    #[test]
    fn until_date_before_first_start_yields_nothing() {
        let windows: Vec<_> = expand(
            monday_window(),
            Some(rule(
                1,
                &[],
                Termination::Until(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            )),
        )
        .collect();
        assert!(windows.is_empty());
    }

    #[test]
    fn all_weekdays_with_interval_two_emits_every_other_week() {
        let windows: Vec<_> = expand(
            monday_window(),
            Some(rule(2, &Weekday::ALL, Termination::Count(9))),
        )
        .collect();

        let expected: Vec<_> = (4..=10)
            .map(|day| at(2024, 3, day, 10))
            .chain([at(2024, 3, 18, 10), at(2024, 3, 19, 10)])
            .collect();
        assert_eq!(starts(&windows), expected);
    }

    #[test]
    fn each_iteration_restarts_from_the_first_window() {
        let expander = ScheduleExpander::new(
            monday_window(),
            Some(rule(1, &[Weekday::Friday], Termination::Count(4))),
        );
        let first_pass: Vec<_> = expander.iter().collect();
        let second_pass: Vec<_> = (&expander).into_iter().collect();
        assert_eq!(first_pass.len(), 4);
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn materialize_stops_at_horizon() {
        let expander = ScheduleExpander::new(
            monday_window(),
            Some(RecurrenceRule::weekly(1, 10).unwrap()),
        );
        let windows = expander
            .materialize(NaiveDate::from_ymd_opt(2024, 3, 20), 100)
            .unwrap();
        assert_eq!(windows.len(), 3);
    }

    #[test]
    fn materialize_rejects_expansions_over_the_limit() {
        let expander = ScheduleExpander::new(
            monday_window(),
            Some(RecurrenceRule::weekly(1, 6).unwrap()),
        );
        assert_eq!(
            expander.materialize(None, 5),
            Err(ValidationError::ExpansionLimitExceeded { limit: 5 })
        );
        assert_eq!(expander.materialize(None, 6).unwrap().len(), 6);
    }

    #[test]
    fn walk_ends_when_the_calendar_runs_out() {
        let first = OccurrenceWindow::new(
            NaiveDate::MAX.and_hms_opt(10, 0, 0).unwrap() - Duration::days(10),
            NaiveDate::MAX.and_hms_opt(11, 0, 0).unwrap() - Duration::days(10),
        )
        .unwrap();
        let windows: Vec<_> = expand(first, Some(RecurrenceRule::weekly(1, 5).unwrap())).collect();
        assert_eq!(windows.len(), 2);
    }

    fn weekday_set() -> impl Strategy<Value = WeekdaySet> {
        proptest::collection::vec(0u8..7, 0..7).prop_map(|ordinals| {
            ordinals
                .into_iter()
                .filter_map(Weekday::from_ordinal)
                .collect()
        })
    }

    fn first_window() -> impl Strategy<Value = OccurrenceWindow> {
        (0i64..3650, 0u32..20, 1i64..240).prop_map(|(day_offset, hour, minutes)| {
            let start = at(2020, 1, 1, hour) + Duration::days(day_offset);
            OccurrenceWindow::new(start, start + Duration::minutes(minutes)).unwrap()
        })
    }

    proptest! {
        #[test]
        fn starts_are_strictly_increasing(
            first in first_window(),
            days in weekday_set(),
            interval in 1u32..5,
            count in 1u32..60,
        ) {
            let rule = RecurrenceRule::new(interval, days, Termination::Count(count)).unwrap();
            let windows: Vec<_> = expand(first, Some(rule)).collect();
            for pair in windows.windows(2) {
                prop_assert!(pair[0].starts_at < pair[1].starts_at);
            }
        }

        #[test]
        fn count_rule_yields_exactly_count_windows(
            first in first_window(),
            days in weekday_set(),
            interval in 1u32..5,
            count in 1u32..60,
        ) {
            let rule = RecurrenceRule::new(interval, days, Termination::Count(count)).unwrap();
            prop_assert_eq!(expand(first, Some(rule)).count(), count as usize);
        }

        #[test]
        fn until_rule_never_passes_its_date(
            first in first_window(),
            days in weekday_set(),
            interval in 1u32..5,
            span in 0i64..400,
        ) {
            let until = first.starts_at.date() + Duration::days(span);
            let rule = RecurrenceRule::new(interval, days, Termination::Until(until)).unwrap();
            let windows: Vec<_> = expand(first, Some(rule)).take(1000).collect();
            prop_assert!(windows.len() < 1000);
            for window in &windows {
                prop_assert!(window.starts_at.date() <= until);
            }
        }

        #[test]
        fn windows_keep_time_of_day_and_duration(
            first in first_window(),
            days in weekday_set(),
            count in 1u32..30,
        ) {
            let rule = RecurrenceRule::new(1, days, Termination::Count(count)).unwrap();
            for window in expand(first, Some(rule)) {
                prop_assert_eq!(window.starts_at.time(), first.starts_at.time());
                prop_assert_eq!(window.ends_at - window.starts_at, first.ends_at - first.starts_at);
            }
        }

        #[test]
        fn non_empty_weekday_sets_are_respected(
            first in first_window(),
            days in weekday_set(),
            count in 1u32..30,
        ) {
            prop_assume!(!days.is_empty());
            let rule = RecurrenceRule::new(1, days, Termination::Count(count)).unwrap();
            for window in expand(first, Some(rule)) {
                prop_assert!(days.contains(window.weekday()));
            }
        }
    }
}
