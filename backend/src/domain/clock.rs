use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of the current date and time for the services
pub trait Clock: Send + Sync {
    /// Today's date in the server's local timezone
    fn today(&self) -> NaiveDate;

    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { today, now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 24).unwrap();
        let clock = FixedClock::new(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date_naive(), day);
    }
}
