use chrono::{Datelike, Duration, NaiveDate};

use crate::models::ViewMode;
use crate::period;

/// The three navigation anchors, one per view mode. Stepping one view leaves
/// the other anchors where they are, so switching views returns to wherever
/// that view was last parked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    day: NaiveDate,
    week_start: NaiveDate,
    month_start: NaiveDate,
}

impl Cursors {
    /// Anchors for a fresh session: today, the week anchored at today, and
    /// the first day of today's month.
    pub fn starting_at(today: NaiveDate) -> Self {
        Self {
            day: today,
            week_start: today,
            month_start: first_of_month(today),
        }
    }

    pub fn anchor(&self, view: ViewMode) -> NaiveDate {
        match view {
            ViewMode::Daily => self.day,
            ViewMode::Weekly => self.week_start,
            ViewMode::Monthly => self.month_start,
        }
    }

    /// The bucket key the given view is currently pointing at.
    pub fn key(&self, view: ViewMode) -> String {
        period::period_key(self.anchor(view), view)
    }

    pub fn step_forward(&mut self, view: ViewMode) {
        self.step(view, 1);
    }

    pub fn step_back(&mut self, view: ViewMode) {
        self.step(view, -1);
    }

    fn step(&mut self, view: ViewMode, direction: i64) {
        match view {
            ViewMode::Daily => self.day = self.day + Duration::days(direction),
            // The week anchor moves in raw seven-day hops and may cross into
            // another month, where the week numbering starts over.
            ViewMode::Weekly => self.week_start = self.week_start + Duration::days(7 * direction),
            ViewMode::Monthly => self.month_start = shift_month(self.month_start, direction),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// One calendar month forward or back, wrapping the year and always landing
/// on day 1.
fn shift_month(date: NaiveDate, direction: i64) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i64 + direction;
    if month == 0 {
        month = 12;
        year -= 1;
    } else if month == 13 {
        month = 1;
        year += 1;
    }
    NaiveDate::from_ymd_opt(year, month as u32, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn starting_at_normalizes_only_the_month_anchor() {
        let cursors = Cursors::starting_at(date(2024, 3, 10));
        assert_eq!(cursors.anchor(ViewMode::Daily), date(2024, 3, 10));
        assert_eq!(cursors.anchor(ViewMode::Weekly), date(2024, 3, 10));
        assert_eq!(cursors.anchor(ViewMode::Monthly), date(2024, 3, 1));
    }

    #[test]
    fn key_uses_the_anchor_of_the_requested_view() {
        let cursors = Cursors::starting_at(date(2024, 3, 10));
        assert_eq!(cursors.key(ViewMode::Daily), "2024-03-10");
        assert_eq!(cursors.key(ViewMode::Weekly), "2024-03-W2");
        assert_eq!(cursors.key(ViewMode::Monthly), "2024-03");
    }

    #[test]
    fn daily_steps_cross_month_and_year_boundaries() {
        let mut cursors = Cursors::starting_at(date(2024, 3, 1));
        cursors.step_back(ViewMode::Daily);
        // 2024 is a leap year.
        assert_eq!(cursors.anchor(ViewMode::Daily), date(2024, 2, 29));
        cursors.step_forward(ViewMode::Daily);
        assert_eq!(cursors.anchor(ViewMode::Daily), date(2024, 3, 1));

        let mut cursors = Cursors::starting_at(date(2024, 1, 1));
        cursors.step_back(ViewMode::Daily);
        assert_eq!(cursors.anchor(ViewMode::Daily), date(2023, 12, 31));
    }

    #[test]
    fn weekly_steps_rederive_keys_across_the_month_boundary() {
        let mut cursors = Cursors::starting_at(date(2024, 3, 25));
        assert_eq!(cursors.key(ViewMode::Weekly), "2024-03-W4");

        cursors.step_forward(ViewMode::Weekly);
        assert_eq!(cursors.anchor(ViewMode::Weekly), date(2024, 4, 1));
        assert_eq!(cursors.key(ViewMode::Weekly), "2024-04-W1");

        cursors.step_back(ViewMode::Weekly);
        cursors.step_back(ViewMode::Weekly);
        assert_eq!(cursors.key(ViewMode::Weekly), "2024-03-W3");
    }

    #[test]
    fn monthly_steps_wrap_the_year_and_stay_on_day_one() {
        let mut cursors = Cursors::starting_at(date(2024, 12, 15));
        cursors.step_forward(ViewMode::Monthly);
        assert_eq!(cursors.anchor(ViewMode::Monthly), date(2025, 1, 1));

        let mut cursors = Cursors::starting_at(date(2024, 1, 20));
        cursors.step_back(ViewMode::Monthly);
        assert_eq!(cursors.anchor(ViewMode::Monthly), date(2023, 12, 1));

        // Interior months move without touching the year.
        cursors.step_forward(ViewMode::Monthly);
        cursors.step_forward(ViewMode::Monthly);
        assert_eq!(cursors.anchor(ViewMode::Monthly), date(2024, 2, 1));
    }

    #[test]
    fn stepping_one_view_leaves_the_other_anchors_alone() {
        let mut cursors = Cursors::starting_at(date(2024, 3, 10));
        cursors.step_forward(ViewMode::Monthly);
        cursors.step_back(ViewMode::Weekly);
        assert_eq!(cursors.anchor(ViewMode::Daily), date(2024, 3, 10));
        assert_eq!(cursors.anchor(ViewMode::Weekly), date(2024, 3, 3));
        assert_eq!(cursors.anchor(ViewMode::Monthly), date(2024, 4, 1));
    }
}
