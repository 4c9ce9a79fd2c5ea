//! Edit-window authorization for target writes.
//!
//! A user may edit only their own targets, and only for the current period
//! or the one immediately before it. Older periods are frozen history;
//! violations are rejected with an explicit error rather than silently
//! dropped, so clients can surface the reason.

use chrono::NaiveDate;

use crate::error::{Result, TallyError};
use crate::models::Period;

/// Whether `requesting_user` may write the target owned by `owner` for
/// `period`, judged against today's business date.
pub fn can_edit_target(
    requesting_user: &str,
    owner: &str,
    period: Period,
    today: NaiveDate,
) -> bool {
    if requesting_user != owner {
        return false;
    }
    let current = Period::current(today, period.unit);
    period == current || period == current.previous()
}

/// [`can_edit_target`] as a guard: `Err(Forbidden)` on denial.
pub fn require_edit_allowed(
    requesting_user: &str,
    owner: &str,
    period: Period,
    today: NaiveDate,
) -> Result<()> {
    if can_edit_target(requesting_user, owner, period, today) {
        Ok(())
    } else if requesting_user != owner {
        Err(TallyError::Forbidden(
            "targets can only be edited by their owner".to_string(),
        ))
    } else {
        Err(TallyError::Forbidden(format!(
            "period {period} is outside the edit window"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodUnit;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap() // week 35
    }

    fn week(index: i32) -> Period {
        Period::new(2026, PeriodUnit::Weekly, index)
    }

    #[test]
    fn current_and_previous_period_are_editable() {
        assert!(can_edit_target("u1", "u1", week(35), today()));
        assert!(can_edit_target("u1", "u1", week(34), today()));
    }

    #[test]
    fn two_periods_back_is_frozen() {
        assert!(!can_edit_target("u1", "u1", week(33), today()));
        assert!(!can_edit_target("u1", "u1", week(36), today()));
    }

    #[test]
    fn other_users_targets_are_never_editable() {
        assert!(!can_edit_target("u1", "u2", week(35), today()));
    }

    #[test]
    fn window_crosses_year_boundary() {
        // First week of the year: the previous period is week 52 of the
        // prior year.
        let jan = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let previous = Period::new(2025, PeriodUnit::Weekly, 52);
        assert!(can_edit_target("u1", "u1", previous, jan));
    }

    #[test]
    fn guard_reports_the_denial_reason() {
        let err = require_edit_allowed("u1", "u2", week(35), today()).unwrap_err();
        assert!(matches!(err, TallyError::Forbidden(_)));

        let err = require_edit_allowed("u1", "u1", week(10), today()).unwrap_err();
        match err {
            TallyError::Forbidden(msg) => assert!(msg.contains("edit window")),
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    #[test]
    fn monthly_window_mirrors_weekly() {
        let aug = Period::new(2026, PeriodUnit::Monthly, 8);
        let jul = Period::new(2026, PeriodUnit::Monthly, 7);
        let jun = Period::new(2026, PeriodUnit::Monthly, 6);
        assert!(can_edit_target("u1", "u1", aug, today()));
        assert!(can_edit_target("u1", "u1", jul, today()));
        assert!(!can_edit_target("u1", "u1", jun, today()));
    }
}
