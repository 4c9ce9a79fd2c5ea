//! Fiscal period resolution.
//!
//! The reporting calendar counts weeks with the legacy console formula
//! (`ceil((day_of_year_0 + jan1_weekday_sun0 + 1) / 7)`) rather than ISO
//! week numbering, so that periods line up with the historical data the
//! service aggregates over. A week's date span is anchored on its Monday.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Granularity of a fiscal period. Also used as the meeting type on
/// meeting logs, which are keyed by the same calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Weekly,
    Monthly,
}

impl PeriodUnit {
    /// Number of periods in one year: 52 weeks or 12 months.
    pub fn capacity(self) -> i32 {
        match self {
            PeriodUnit::Weekly => 52,
            PeriodUnit::Monthly => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodUnit::Weekly => "weekly",
            PeriodUnit::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for PeriodUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(PeriodUnit::Weekly),
            "monthly" => Ok(PeriodUnit::Monthly),
            other => Err(format!("unknown period unit: {other}")),
        }
    }
}

/// A single fiscal week or month.
///
/// The index is always in `[1, capacity]`; construction renormalizes any
/// raw index by borrowing or carrying whole years, so arithmetic like
/// "current week minus 300" cannot produce an out-of-range period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Period {
    pub year: i32,
    pub unit: PeriodUnit,
    pub index: i32,
}

impl Period {
    /// Build a period from a raw (possibly out-of-range) index.
    pub fn new(year: i32, unit: PeriodUnit, raw_index: i32) -> Self {
        let capacity = unit.capacity();
        let mut year = year;
        let mut index = raw_index;
        while index <= 0 {
            index += capacity;
            year -= 1;
        }
        while index > capacity {
            index -= capacity;
            year += 1;
        }
        Self { year, unit, index }
    }

    /// The period containing `today`.
    ///
    /// A 53rd calendar week (possible in the final days of December under
    /// the legacy formula) collapses into week 52 so the index stays inside
    /// the year's capacity.
    pub fn current(today: NaiveDate, unit: PeriodUnit) -> Self {
        match unit {
            PeriodUnit::Weekly => {
                let week = week_number(today).min(52);
                Self::new(today.year(), unit, week)
            }
            PeriodUnit::Monthly => Self::new(today.year(), unit, today.month() as i32),
        }
    }

    /// The period `offset` steps before the current one.
    pub fn resolve(today: NaiveDate, unit: PeriodUnit, offset: i32) -> Self {
        Self::current(today, unit).advance(-offset)
    }

    /// Step forward (positive) or backward (negative), carrying years.
    pub fn advance(self, steps: i32) -> Self {
        Self::new(self.year, self.unit, self.index + steps)
    }

    pub fn previous(self) -> Self {
        self.advance(-1)
    }

    /// Inclusive calendar span covered by this period.
    ///
    /// Weekly spans run Monday through Sunday; monthly spans are calendar
    /// month boundaries.
    pub fn span(self) -> DateSpan {
        match self.unit {
            PeriodUnit::Weekly => {
                let monday = monday_of_week(self.year, self.index);
                DateSpan {
                    start: monday,
                    end: monday + Duration::days(6),
                }
            }
            PeriodUnit::Monthly => {
                let month = self.index as u32;
                let start = first_of_month(self.year, month);
                let end = if month == 12 {
                    first_of_month(self.year + 1, 1)
                } else {
                    first_of_month(self.year, month + 1)
                } - Duration::days(1);
                DateSpan { start, end }
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            PeriodUnit::Weekly => write!(f, "{}-W{:02}", self.year, self.index),
            PeriodUnit::Monthly => write!(f, "{}-{:02}", self.year, self.index),
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Week number of `date` within its calendar year.
///
/// `ceil((day_of_year_0 + jan1_weekday_sun0 + 1) / 7)` where weekday 0 is
/// Sunday. January 1st is always in week 1; a late-December date may land
/// in week 53.
pub fn week_number(date: NaiveDate) -> i32 {
    let jan1_weekday = jan1(date.year()).weekday().num_days_from_sunday() as i32;
    let day_of_year0 = date.ordinal0() as i32;
    (day_of_year0 + jan1_weekday + 1 + 6) / 7
}

/// Monday of the given week: first day of the year plus `(week-1) * 7`
/// days, snapped back to that week's Monday.
pub fn monday_of_week(year: i32, week: i32) -> NaiveDate {
    let anchor = jan1(year) + Duration::days(((week - 1) * 7) as i64);
    let dow = anchor.weekday().num_days_from_sunday() as i64;
    // Sunday belongs to the week that started six days earlier.
    let to_monday = if dow == 0 { -6 } else { 1 - dow };
    anchor + Duration::days(to_monday)
}

/// Week numbers whose Monday falls inside the given calendar month.
///
/// Every week belongs to exactly one month under this rule, so summing
/// per-month never double-counts a boundary week.
pub fn weeks_in_month(year: i32, month: u32) -> Vec<i32> {
    (1..=53)
        .filter(|&week| {
            let monday = monday_of_week(year, week);
            monday.year() == year && monday.month() == month
        })
        .collect()
}

fn jan1(year: i32) -> NaiveDate {
    first_of_month(year, 1)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Month is always 1..=12 here; fall back to the epoch rather than
    // panicking if an invalid value ever slips through.
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
}
