//! Family members and age computation

use std::fmt;

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Source of "today" for age computation.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a fixed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// How the age of a deceased member is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgePolicy {
    /// Deceased members with a known date of death are measured to that date.
    #[default]
    AtDeath,
    /// Everybody is measured to today, dead or alive.
    AsOfToday,
}

/// A member of the royal family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub is_alive: bool,
    /// Empty when the member holds no title
    pub title: String,
    pub date_of_death: Option<NaiveDate>,
}

impl Member {
    pub fn new(name: impl Into<String>, date_of_birth: NaiveDate, is_alive: bool) -> Self {
        Self {
            name: name.into(),
            date_of_birth,
            is_alive,
            title: String::new(),
            date_of_death: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_date_of_death(mut self, date_of_death: NaiveDate) -> Self {
        self.date_of_death = Some(date_of_death);
        self
    }

    /// Case-insensitive exact name comparison.
    pub fn has_name(&self, name: &str) -> bool {
        self.name
            .chars()
            .flat_map(char::to_lowercase)
            .eq(name.chars().flat_map(char::to_lowercase))
    }

    /// Whole years completed between birth and `date`.
    ///
    /// A Feb 29 birthday counts as reached on Feb 28 in non-leap years.
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        let years = date.year() - self.date_of_birth.year();
        let months = Months::new(years.unsigned_abs() * 12);
        let anniversary = if years >= 0 {
            self.date_of_birth.checked_add_months(months)
        } else {
            self.date_of_birth.checked_sub_months(months)
        };
        match anniversary {
            Some(anniversary) if date < anniversary => years - 1,
            _ => years,
        }
    }

    /// Current age according to `clock`, resolving deceased members per `policy`.
    pub fn age(&self, clock: &dyn Clock, policy: AgePolicy) -> i32 {
        let end = match (policy, self.is_alive, self.date_of_death) {
            (AgePolicy::AtDeath, false, Some(died)) => died,
            _ => clock.today(),
        };
        self.age_on(end)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.title.is_empty() {
            write!(f, " ({})", self.title)?;
        }
        let status = if self.is_alive { "Alive" } else { "Deceased" };
        write!(
            f,
            ", Born: {}, {}",
            self.date_of_birth.format("%Y-%m-%d"),
            status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 11, 13), 75)]
    #[case(date(2024, 11, 14), 76)]
    #[case(date(2024, 12, 31), 76)]
    #[case(date(1948, 11, 14), 0)]
    fn test_age_on_birthday_boundaries(#[case] on: NaiveDate, #[case] expected: i32) {
        let charles = Member::new("King Charles III", date(1948, 11, 14), true);
        assert_eq!(charles.age_on(on), expected);
    }

    #[rstest]
    #[case(date(2023, 2, 27), 22)]
    #[case(date(2023, 2, 28), 23)]
    #[case(date(2024, 2, 28), 23)]
    #[case(date(2024, 2, 29), 24)]
    fn test_age_on_leap_day_birthday(#[case] on: NaiveDate, #[case] expected: i32) {
        let member = Member::new("Leap", date(2000, 2, 29), true);
        assert_eq!(member.age_on(on), expected);
    }

    #[test]
    fn test_age_uses_injected_clock() {
        let member = Member::new("Louis", date(2018, 4, 23), true);
        let clock = FixedClock(date(2026, 4, 22));
        assert_eq!(member.age(&clock, AgePolicy::AtDeath), 7);
        assert_eq!(member.age(&clock, AgePolicy::AsOfToday), 7);
    }

    #[test]
    fn test_age_of_deceased_member_depends_on_policy() {
        let philip = Member::new("Philip", date(1921, 6, 10), false).with_date_of_death(date(2021, 4, 9));
        let clock = FixedClock(date(2026, 10, 18));
        assert_eq!(philip.age(&clock, AgePolicy::AtDeath), 99);
        assert_eq!(philip.age(&clock, AgePolicy::AsOfToday), 105);
    }

    #[test]
    fn test_age_of_deceased_member_without_death_date_falls_back_to_today() {
        let member = Member::new("Unknown", date(1900, 1, 1), false);
        let clock = FixedClock(date(2000, 1, 1));
        assert_eq!(member.age(&clock, AgePolicy::AtDeath), 100);
    }

    #[test]
    fn test_display_with_title() {
        let william = Member::new("William", date(1982, 6, 21), true).with_title("Prince of Wales");
        assert_eq!(william.to_string(), "William (Prince of Wales), Born: 1982-06-21, Alive");
    }

    #[test]
    fn test_display_without_title_omits_parentheses() {
        let member = Member::new("Prince George", date(2013, 7, 22), false);
        assert_eq!(member.to_string(), "Prince George, Born: 2013-07-22, Deceased");
    }

    #[rstest]
    #[case("prince george", true)]
    #[case("PRINCE GEORGE", true)]
    #[case("Prince", false)]
    #[case("Prince George ", false)]
    fn test_has_name_is_case_insensitive_exact(#[case] query: &str, #[case] expected: bool) {
        let member = Member::new("Prince George", date(2013, 7, 22), true);
        assert_eq!(member.has_name(query), expected);
    }

    #[rstest]
    #[case("éLISE", true)]
    #[case("ÉLISE", true)]
    #[case("Elise", false)]
    #[case("Élis", false)]
    fn test_has_name_folds_non_ascii(#[case] query: &str, #[case] expected: bool) {
        let member = Member::new("Élise", date(1990, 5, 1), true);
        assert_eq!(member.has_name(query), expected);
    }
}
