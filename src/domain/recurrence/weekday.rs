//! Weekday labels and compact weekday sets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week, ordered Monday (0) through Sunday (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Monday = 0 … Sunday = 6.
    pub fn ordinal(self) -> u8 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// Days to move forward from `self` to reach `target`, in 1..=7.
    ///
    /// Landing on the same weekday means a full week ahead, never zero.
    pub fn days_until(self, target: Weekday) -> u64 {
        let delta = (7 + u64::from(target.ordinal()) - u64::from(self.ordinal())) % 7;
        if delta == 0 {
            7
        } else {
            delta
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Weekday::Monday => "MONDAY",
            Weekday::Tuesday => "TUESDAY",
            Weekday::Wednesday => "WEDNESDAY",
            Weekday::Thursday => "THURSDAY",
            Weekday::Friday => "FRIDAY",
            Weekday::Saturday => "SATURDAY",
            Weekday::Sunday => "SUNDAY",
        };
        write!(f, "{}", s)
    }
}

/// A set of weekdays stored as a 7-bit mask (bit n = ordinal n).
///
/// Iteration is always in ordinal order, so "smallest weekday" and
/// "next weekday after" are well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.ordinal();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.ordinal()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Smallest weekday by ordinal.
    pub fn first(&self) -> Option<Weekday> {
        self.iter().next()
    }

    /// Smallest weekday strictly after `day` in the same week.
    pub fn next_after(&self, day: Weekday) -> Option<Weekday> {
        self.iter().find(|candidate| candidate.ordinal() > day.ordinal())
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(|day| self.contains(*day))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl From<Vec<Weekday>> for WeekdaySet {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_start_at_monday() {
        assert_eq!(Weekday::Monday.ordinal(), 0);
        assert_eq!(Weekday::Sunday.ordinal(), 6);
        assert_eq!(Weekday::from_ordinal(2), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_ordinal(7), None);
    }

    #[test]
    fn days_until_is_never_zero() {
        assert_eq!(Weekday::Monday.days_until(Weekday::Wednesday), 2);
        assert_eq!(Weekday::Friday.days_until(Weekday::Monday), 3);
        assert_eq!(Weekday::Tuesday.days_until(Weekday::Tuesday), 7);
    }

    #[test]
    fn converts_from_chrono() {
        assert_eq!(Weekday::from(chrono::Weekday::Sat), Weekday::Saturday);
    }

    #[test]
    fn set_iterates_in_ordinal_order_without_duplicates() {
        let set: WeekdaySet = vec![Weekday::Friday, Weekday::Monday, Weekday::Friday].into();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Weekday::Monday, Weekday::Friday]
        );
    }

    #[test]
    fn next_after_returns_none_at_end_of_week() {
        let set: WeekdaySet = vec![Weekday::Monday, Weekday::Wednesday].into();
        assert_eq!(set.first(), Some(Weekday::Monday));
        assert_eq!(set.next_after(Weekday::Monday), Some(Weekday::Wednesday));
        assert_eq!(set.next_after(Weekday::Tuesday), Some(Weekday::Wednesday));
        assert_eq!(set.next_after(Weekday::Wednesday), None);
    }

    #[test]
    fn set_serializes_as_label_list() {
        let set: WeekdaySet = vec![Weekday::Wednesday, Weekday::Monday].into();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["MONDAY","WEDNESDAY"]"#);

        let back: WeekdaySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
