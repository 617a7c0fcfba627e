//! Date and week helpers

use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::catalog::Day;

/// Approximate first day of the exam, `DD-MM-YYYY`
pub const DEFAULT_EXAM_DATE: &str = "03-11-2025";

/// Parse a `DD-MM-YYYY` date
pub fn parse_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text.trim(), "%d-%m-%Y")
}

/// Whole weeks between `today` and `target`, rounded up
///
/// The distance is absolute, so a date in the past still counts weeks.
pub fn weeks_until(target: NaiveDate, today: NaiveDate) -> u32 {
    let days = (target - today).num_days().unsigned_abs();
    days.div_ceil(7) as u32
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The study day a date falls on (`None` on Sundays)
pub fn study_day(date: NaiveDate) -> Option<Day> {
    Day::from_weekday(date.weekday())
}

/// Whether `date` is the weekly seminar day
pub fn is_seminar_day(date: NaiveDate, seminar_day: Weekday) -> bool {
    date.weekday() == seminar_day
}

/// Exam date and seminar day, resolved from config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamCalendar {
    pub exam_date: NaiveDate,
    pub seminar_day: Weekday,
}

impl ExamCalendar {
    pub fn weeks_until_exam(&self, today: NaiveDate) -> u32 {
        weeks_until(self.exam_date, today)
    }

    pub fn is_seminar_day(&self, today: NaiveDate) -> bool {
        is_seminar_day(today, self.seminar_day)
    }
}

impl Default for ExamCalendar {
    fn default() -> Self {
        Self {
            exam_date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap_or_default(),
            seminar_day: Weekday::Sat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_day_month_year() {
        assert_eq!(parse_date(DEFAULT_EXAM_DATE).unwrap(), date(2025, 11, 3));
        assert!(parse_date("2025-11-03").is_err());
    }

    #[test]
    fn test_weeks_until_rounds_up() {
        let exam = date(2025, 11, 3);
        assert_eq!(weeks_until(exam, exam), 0);
        assert_eq!(weeks_until(exam, date(2025, 11, 2)), 1);
        assert_eq!(weeks_until(exam, date(2025, 10, 27)), 1);
        assert_eq!(weeks_until(exam, date(2025, 10, 26)), 2);
    }

    #[test]
    fn test_weeks_until_is_absolute() {
        let exam = date(2025, 11, 3);
        assert_eq!(weeks_until(exam, date(2025, 11, 17)), 2);
    }

    #[test]
    fn test_study_day() {
        // 2025-11-01 was a Saturday
        assert_eq!(study_day(date(2025, 11, 1)), Some(Day::Saturday));
        assert_eq!(study_day(date(2025, 11, 2)), None);
        assert_eq!(study_day(date(2025, 11, 3)), Some(Day::Monday));
    }

    #[test]
    fn test_default_calendar_matches_default_exam_date() {
        let calendar = ExamCalendar::default();
        assert_eq!(calendar.exam_date, parse_date(DEFAULT_EXAM_DATE).unwrap());
        assert!(calendar.is_seminar_day(date(2025, 11, 1)));
        assert_eq!(calendar.weeks_until_exam(date(2025, 10, 20)), 2);
    }

    #[test]
    fn test_is_seminar_day() {
        assert!(is_seminar_day(date(2025, 11, 1), Weekday::Sat));
        assert!(!is_seminar_day(date(2025, 11, 3), Weekday::Sat));
    }
}
