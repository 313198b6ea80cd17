use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};

/// Venue trading session: a Monday-to-Friday window between open and close,
/// in venue-local time. When the gate is enforced and the session is
/// closed, an invocation skips before touching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl SessionHours {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        assert!(open < close, "session open must precede close");
        Self { open, close }
    }

    /// True when `now` falls inside the weekday session window, ends
    /// inclusive.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        match now.weekday() {
            Weekday::Sat | Weekday::Sun => return false,
            _ => {}
        }
        let t = now.time();
        t >= self.open && t <= self.close
    }
}

impl Default for SessionHours {
    /// NSE cash session, IST.
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            close: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    #[test]
    fn open_mid_session_on_a_weekday() {
        // 2024-01-03 is a Wednesday.
        assert!(SessionHours::default().is_open(at(2024, 1, 3, 11, 0)));
    }

    #[test]
    fn closed_on_weekends_regardless_of_time() {
        let session = SessionHours::default();
        assert!(!session.is_open(at(2024, 1, 6, 11, 0))); // Saturday
        assert!(!session.is_open(at(2024, 1, 7, 11, 0))); // Sunday
    }

    #[test]
    fn window_edges_are_inclusive() {
        let session = SessionHours::default();
        assert!(session.is_open(at(2024, 1, 3, 9, 15)));
        assert!(session.is_open(at(2024, 1, 3, 15, 30)));
        assert!(!session.is_open(at(2024, 1, 3, 9, 14)));
        assert!(!session.is_open(at(2024, 1, 3, 15, 31)));
    }

    #[test]
    #[should_panic(expected = "session open must precede close")]
    fn inverted_window_is_rejected() {
        SessionHours::new(
            NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
    }
}
