//! Time primitives.
//!
//! Two thin value types split a timestamp into the parts the scheduler
//! reasons about separately:
//!
//! - [`TimeWithoutDate`]: time of day, milliseconds since midnight in
//!   `[0, 86_400_000)`. Arithmetic wraps past midnight.
//! - [`DateWithoutTime`]: calendar day. Ordered, hashable, and convertible
//!   to a day count since the Unix epoch.
//!
//! Both are immutable and totally ordered by value.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::ScheduleError;

/// Milliseconds in one day.
pub const MS_PER_DAY: u32 = 86_400_000;

const MS_PER_MINUTE: u32 = 60_000;
const MS_PER_HOUR: u32 = 60 * MS_PER_MINUTE;

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const CE_TO_UNIX_EPOCH_DAYS: i64 = 719_163;

/// Time of day without a date.
///
/// Serializes as `HH:MM`. Deserializes from that text form or from a
/// spreadsheet date-serial number, whose fractional part is the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct TimeWithoutDate(u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum TimeInput {
    Text(String),
    Serial(f64),
}

impl TimeWithoutDate {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// 23:59:59, the clip point for slots that run past midnight.
    pub const END_OF_DAY: Self = Self(MS_PER_DAY - 1000);

    /// Creates a time from milliseconds since midnight (wrapping).
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms % MS_PER_DAY)
    }

    /// Creates a time from hours and minutes (wrapping).
    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self::from_millis(hours * MS_PER_HOUR + minutes * MS_PER_MINUTE)
    }

    /// Converts the fractional part of a spreadsheet date-serial number
    /// into a time of day, rounded to the nearest minute.
    ///
    /// `0.75` is 18:00; `45_000.5` is 12:00.
    pub fn from_day_fraction(serial: f64) -> Self {
        let fraction = serial - serial.floor();
        let minutes = (fraction * 1440.0).round() as u32;
        Self::from_millis(minutes * MS_PER_MINUTE)
    }

    /// Milliseconds since midnight.
    #[inline]
    pub fn millis(&self) -> u32 {
        self.0
    }

    /// Whole minutes since midnight.
    #[inline]
    pub fn minutes(&self) -> u32 {
        self.0 / MS_PER_MINUTE
    }

    /// Adds minutes, wrapping past midnight.
    pub fn add_minutes(&self, minutes: u32) -> Self {
        let added = (self.0 as u64 + minutes as u64 * MS_PER_MINUTE as u64) % MS_PER_DAY as u64;
        Self(added as u32)
    }
}

impl fmt::Display for TimeWithoutDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = (self.0 / 1000) % 60;
        let minutes = self.minutes() % 60;
        let hours = self.0 / MS_PER_HOUR;
        if seconds == 0 {
            write!(f, "{hours:02}:{minutes:02}")
        } else {
            write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
        }
    }
}

impl FromStr for TimeWithoutDate {
    type Err = ScheduleError;

    /// Parses `HH:MM` or `HH:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidToken(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid());
        }
        let hours: u32 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: u32 = parts[1].parse().map_err(|_| invalid())?;
        let seconds: u32 = match parts.get(2) {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None => 0,
        };
        if hours >= 24 || minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }
        Ok(Self(hours * MS_PER_HOUR + minutes * MS_PER_MINUTE + seconds * 1000))
    }
}

impl TryFrom<String> for TimeWithoutDate {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl<'de> Deserialize<'de> for TimeWithoutDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match TimeInput::deserialize(deserializer)? {
            TimeInput::Text(text) => text.parse().map_err(de::Error::custom),
            TimeInput::Serial(serial) if serial.is_finite() => Ok(Self::from_day_fraction(serial)),
            TimeInput::Serial(serial) => Err(de::Error::custom(ScheduleError::InvalidToken(
                serial.to_string(),
            ))),
        }
    }
}

impl From<TimeWithoutDate> for String {
    fn from(value: TimeWithoutDate) -> Self {
        value.to_string()
    }
}

/// Calendar day without a time.
///
/// Serializes as an ISO `YYYY-MM-DD` date. Deserializes from that form or
/// from a spreadsheet date-serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "NaiveDate")]
pub struct DateWithoutTime(NaiveDate);

#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Iso(NaiveDate),
    Serial(f64),
}

impl DateWithoutTime {
    /// Creates a date from year, month, day. `None` if invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Creates a date from a day count since 1970-01-01.
    pub fn from_epoch_day(day: i64) -> Option<Self> {
        let ce = i32::try_from(day + CE_TO_UNIX_EPOCH_DAYS).ok()?;
        NaiveDate::from_num_days_from_ce_opt(ce).map(Self)
    }

    /// Converts a spreadsheet date-serial number (days since 1899-12-30)
    /// into a date, dropping any time-of-day fraction.
    pub fn from_serial(serial: f64) -> Option<Self> {
        let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        let days = serial.floor();
        if days < 0.0 {
            return None;
        }
        base.checked_add_days(Days::new(days as u64)).map(Self)
    }

    /// Day count since 1970-01-01.
    #[inline]
    pub fn epoch_day(&self) -> i64 {
        self.0.num_days_from_ce() as i64 - CE_TO_UNIX_EPOCH_DAYS
    }

    /// Day of week.
    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Adds (or subtracts, when negative) whole days.
    ///
    /// Saturates at the ends of the representable range.
    pub fn add_days(&self, days: i64) -> Self {
        let moved = if days >= 0 {
            self.0.checked_add_days(Days::new(days as u64))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        match moved {
            Some(date) => Self(date),
            None if days >= 0 => Self(NaiveDate::MAX),
            None => Self(NaiveDate::MIN),
        }
    }

    /// Number of days from `earlier` to `self` (negative if `self` is earlier).
    #[inline]
    pub fn days_since(&self, earlier: &Self) -> i64 {
        self.epoch_day() - earlier.epoch_day()
    }

    /// The underlying `chrono` date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateWithoutTime {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl From<DateWithoutTime> for NaiveDate {
    fn from(value: DateWithoutTime) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for DateWithoutTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match DateInput::deserialize(deserializer)? {
            DateInput::Iso(date) => Ok(Self(date)),
            DateInput::Serial(serial) => Self::from_serial(serial).ok_or_else(|| {
                de::Error::custom(ScheduleError::InvalidToken(serial.to_string()))
            }),
        }
    }
}

impl fmt::Display for DateWithoutTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_from_hm() {
        let t = TimeWithoutDate::from_hm(13, 30);
        assert_eq!(t.millis(), 13 * 3_600_000 + 30 * 60_000);
        assert_eq!(t.minutes(), 810);
        assert_eq!(t.to_string(), "13:30");
    }

    #[test]
    fn test_time_wraps_past_midnight() {
        let t = TimeWithoutDate::from_hm(22, 0).add_minutes(180);
        assert_eq!(t, TimeWithoutDate::from_hm(1, 0));
        assert_eq!(TimeWithoutDate::from_hm(24, 0), TimeWithoutDate::MIDNIGHT);
    }

    #[test]
    fn test_time_ordering() {
        assert!(TimeWithoutDate::from_hm(9, 0) < TimeWithoutDate::from_hm(10, 0));
        assert!(TimeWithoutDate::END_OF_DAY > TimeWithoutDate::from_hm(23, 59));
        assert_eq!(TimeWithoutDate::END_OF_DAY.to_string(), "23:59:59");
    }

    #[test]
    fn test_time_from_day_fraction() {
        assert_eq!(
            TimeWithoutDate::from_day_fraction(0.75),
            TimeWithoutDate::from_hm(18, 0)
        );
        assert_eq!(
            TimeWithoutDate::from_day_fraction(45_000.5),
            TimeWithoutDate::from_hm(12, 0)
        );
        // 09:00 is 0.375 of a day
        assert_eq!(
            TimeWithoutDate::from_day_fraction(0.375),
            TimeWithoutDate::from_hm(9, 0)
        );
    }

    #[test]
    fn test_time_parse() {
        assert_eq!(
            "18:00".parse::<TimeWithoutDate>().unwrap(),
            TimeWithoutDate::from_hm(18, 0)
        );
        assert_eq!(
            "23:59:59".parse::<TimeWithoutDate>().unwrap(),
            TimeWithoutDate::END_OF_DAY
        );
        assert!("24:00".parse::<TimeWithoutDate>().is_err());
        assert!("noon".parse::<TimeWithoutDate>().is_err());
    }

    #[test]
    fn test_time_serde_as_string() {
        let t = TimeWithoutDate::from_hm(9, 5);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"09:05\"");
        let back: TimeWithoutDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_time_serde_from_serial() {
        let t: TimeWithoutDate = serde_json::from_str("0.375").unwrap();
        assert_eq!(t, TimeWithoutDate::from_hm(9, 0));
        // Date part of a full serial is ignored
        let t: TimeWithoutDate = serde_json::from_str("45444.75").unwrap();
        assert_eq!(t, TimeWithoutDate::from_hm(18, 0));
        let t: TimeWithoutDate = serde_json::from_str("0").unwrap();
        assert_eq!(t, TimeWithoutDate::MIDNIGHT);
        assert!(serde_json::from_str::<TimeWithoutDate>("\"late\"").is_err());
    }

    #[test]
    fn test_date_epoch_day() {
        let epoch = DateWithoutTime::from_ymd(1970, 1, 1).unwrap();
        assert_eq!(epoch.epoch_day(), 0);
        let d = DateWithoutTime::from_ymd(2024, 6, 1).unwrap();
        assert_eq!(DateWithoutTime::from_epoch_day(d.epoch_day()), Some(d));
    }

    #[test]
    fn test_date_add_days() {
        let d = DateWithoutTime::from_ymd(2024, 2, 28).unwrap();
        assert_eq!(d.add_days(1), DateWithoutTime::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(d.add_days(2), DateWithoutTime::from_ymd(2024, 3, 1).unwrap());
        assert_eq!(d.add_days(-28), DateWithoutTime::from_ymd(2024, 1, 31).unwrap());
        assert_eq!(d.add_days(3).days_since(&d), 3);
    }

    #[test]
    fn test_date_weekday() {
        // 2024-06-02 is a Sunday
        let d = DateWithoutTime::from_ymd(2024, 6, 2).unwrap();
        assert_eq!(d.weekday(), Weekday::Sun);
        assert_eq!(d.add_days(-1).weekday(), Weekday::Sat);
    }

    #[test]
    fn test_date_from_serial() {
        // Serial 45444 is 2024-06-01 in spreadsheet date systems
        let d = DateWithoutTime::from_serial(45_444.75).unwrap();
        assert_eq!(d, DateWithoutTime::from_ymd(2024, 6, 1).unwrap());
        assert!(DateWithoutTime::from_serial(-1.0).is_none());
    }

    #[test]
    fn test_date_serde() {
        let d = DateWithoutTime::from_ymd(2024, 6, 1).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2024-06-01\"");
        assert_eq!(d.to_string(), "2024-06-01");
        assert_eq!(serde_json::from_str::<DateWithoutTime>(&json).unwrap(), d);
    }

    #[test]
    fn test_date_serde_from_serial() {
        let d: DateWithoutTime = serde_json::from_str("45444").unwrap();
        assert_eq!(d, DateWithoutTime::from_ymd(2024, 6, 1).unwrap());
        let d: DateWithoutTime = serde_json::from_str("45444.5").unwrap();
        assert_eq!(d, DateWithoutTime::from_ymd(2024, 6, 1).unwrap());
        assert!(serde_json::from_str::<DateWithoutTime>("-3").is_err());
    }
}
