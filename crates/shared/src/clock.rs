//! Time source and shop-local calendar.
//!
//! Repositories never call `Utc::now()` directly: "now" comes from a [`Clock`] so
//! the closing gates (cutoff day, "a daily closing exists today") are testable.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Clock trait - abstracts time operations for testability.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for deterministic tests and seeding.
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time.
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// Moves the clock to `time`.
    pub fn set(&self, time: DateTime<Utc>) {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut guard = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A clock bound to the shop's timezone.
#[derive(Clone)]
pub struct ShopCalendar {
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl ShopCalendar {
    /// Creates a calendar over `clock` in `tz`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { clock, tz }
    }

    /// Wall-clock calendar.
    #[must_use]
    pub fn system(tz: Tz) -> Self {
        Self::new(Arc::new(SystemClock), tz)
    }

    /// Current instant.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current shop-local calendar date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    /// Shop-local calendar date of an instant.
    #[must_use]
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.tz).date_naive()
    }

    /// The shop timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }
}

impl std::fmt::Debug for ShopCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopCalendar")
            .field("tz", &self.tz)
            .field("now", &self.now())
            .finish()
    }
}

/// Returns the last day of a month.
#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// First and last calendar day of the month containing `date`.
#[must_use]
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    (first, last_day_of_month(date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_set_and_advance() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), start + Duration::hours(2));

        let later = Utc.with_ymd_and_hms(2026, 3, 28, 9, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_today_uses_shop_timezone() {
        // 03:00 UTC on the 2nd is still the evening of the 1st in Mexico City.
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 3, 0, 0).unwrap();
        let calendar = ShopCalendar::new(
            Arc::new(FixedClock::new(at)),
            chrono_tz::America::Mexico_City,
        );
        assert_eq!(calendar.today(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());

        let utc_calendar = ShopCalendar::new(Arc::new(FixedClock::new(at)), chrono_tz::UTC);
        assert_eq!(utc_calendar.today(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2026, 1),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );
        assert_eq!(
            last_day_of_month(2026, 2),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        ); // Leap year
        assert_eq!(
            last_day_of_month(2026, 12),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_month_bounds() {
        let (first, last) = month_bounds(NaiveDate::from_ymd_opt(2026, 4, 17).unwrap());
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 4, 30).unwrap());
    }
}
