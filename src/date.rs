//! Civil dates and their conversion to and from Julian Day.
//!
//! Civil dates follow the Julian calendar up to 1582-10-04 and the Gregorian
//! calendar from 1582-10-15 on. The ten days in between never existed; they
//! are normalized to 1582-10-15 instead of being rejected.
//!
//! All Julian Days here are plain day counts with the day boundary at noon.
//! No time scale is implied: callers decide whether a value is TT or UT.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Julian Day of 1582-10-15 12:00, the first day of the Gregorian calendar.
pub const GREGORIAN_REFORM_JD: f64 = 2299161.0;

/// Last day reckoned in the Julian calendar.
const JULIAN_LAST_DAY: (i32, u32, u32) = (1582, 10, 4);
/// First day reckoned in the Gregorian calendar.
const GREGORIAN_FIRST_DAY: (i32, u32, u32) = (1582, 10, 15);

/// Calendar used to reckon a civil date.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CalendarSystem {
    Julian,
    Gregorian,
}

impl CalendarSystem {
    /// Selects the calendar in force on the given day.
    ///
    /// Returns `None` for the ten dropped days 1582-10-05 through 1582-10-14.
    pub fn for_date(year: i32, month: u32, day: u32) -> Option<Self> {
        let ymd = (year, month, day);
        if ymd <= JULIAN_LAST_DAY {
            Some(Self::Julian)
        } else if ymd >= GREGORIAN_FIRST_DAY {
            Some(Self::Gregorian)
        } else {
            None
        }
    }
}

/// A civil date with time of day.
///
/// `year` is an astronomical year number, i.e. 1 BC is `0`, 2 BC is `-1`,
/// etc.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CivilDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl CivilDate {
    /// Creates a date at midnight after checking it against the true length
    /// of its month.
    ///
    /// Dates inside the 1582 reform gap are normalized to 1582-10-15.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::CivilDate;
    ///
    /// assert!(CivilDate::new(2023, 2, 29).is_err());
    /// assert_eq!(CivilDate::ymd(1582, 10, 15), CivilDate::new(1582, 10, 10).unwrap());
    /// ```
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        let valid = (1..=12).contains(&month)
            && day >= 1
            && day <= YearType::from_year(year).days_in_month(month);
        if !valid {
            return Err(DomainError::InvalidCivilDate {
                year,
                month: month as i32,
                day: day as i32,
            }
            .into());
        }
        Ok(Self::ymd(year, month, day).normalized())
    }

    /// Creates a date at midnight without validation.
    pub const fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }

    /// Creates a date at noon, the instant where its Julian Day is integral.
    pub const fn noon(year: i32, month: u32, day: u32) -> Self {
        Self::ymd(year, month, day).with_time(12, 0, 0, 0)
    }

    /// Replaces the time of day.
    pub const fn with_time(self, hour: u32, minute: u32, second: u32, millisecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
            ..self
        }
    }

    /// Truncates the time of day to midnight.
    pub const fn at_midnight(self) -> Self {
        self.with_time(0, 0, 0, 0)
    }

    /// Maps a date inside the reform gap to 1582-10-15, keeping the time of
    /// day. Other dates are returned unchanged.
    pub fn normalized(self) -> Self {
        match CalendarSystem::for_date(self.year, self.month, self.day) {
            Some(_) => self,
            None => {
                let (year, month, day) = GREGORIAN_FIRST_DAY;
                Self {
                    year,
                    month,
                    day,
                    ..self
                }
            }
        }
    }

    /// Returns the Julian Day of this instant.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::CivilDate;
    ///
    /// assert_eq!(2451545.0, CivilDate::noon(2000, 1, 1).julian_day());
    /// assert_eq!(2299160.0, CivilDate::noon(1582, 10, 4).julian_day());
    /// ```
    pub fn julian_day(&self) -> f64 {
        let date = self.normalized();
        let calendar = CalendarSystem::for_date(date.year, date.month, date.day)
            .unwrap_or(CalendarSystem::Gregorian);
        let jdn = day_number(calendar, date.year, date.month, date.day);
        let second = f64::from(date.second) + f64::from(date.millisecond) / 1000.0;
        let fraction =
            f64::from(date.hour) / 24.0 + f64::from(date.minute) / 1440.0 + second / 86400.0;
        jdn as f64 - 0.5 + fraction
    }

    /// Decomposes a Julian Day into a civil date and time of day.
    ///
    /// Days before [`GREGORIAN_REFORM_JD`] are reckoned in the Julian
    /// calendar.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::CivilDate;
    ///
    /// let date = CivilDate::from_julian_day(2451545.25);
    /// assert_eq!(CivilDate::ymd(2000, 1, 1).with_time(18, 0, 0, 0), date);
    /// ```
    pub fn from_julian_day(jd: f64) -> Self {
        let shifted = jd + 0.5;
        let z = shifted.floor();
        let f = shifted - z;

        let mut a = if z < GREGORIAN_REFORM_JD {
            z
        } else {
            let alpha = ((z - 1867216.25) / 36524.25).floor();
            z + 1.0 + alpha - (alpha / 4.0).floor()
        };

        // 30.6001 can still land a first-of-month on day 0 of the next month;
        // step back a day and add it again afterwards.
        let mut borrowed = 0.0;
        let (c, e, mut day) = loop {
            let b = a + 1524.0;
            let c = ((b - 122.1) / 365.25).floor();
            let d = (365.25 * c).floor();
            let e = ((b - d) / 30.6001).floor();
            let day = b - d - (30.6001 * e).floor() + f;
            if day >= 1.0 {
                break (c, e, day);
            }
            a -= 1.0;
            borrowed += 1.0;
        };

        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
        let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };
        day += borrowed;
        if day.trunc() == 0.0 {
            day += 1.0;
        }

        let whole_day = day.floor();
        let hours = (day - whole_day) * 24.0;
        let hour = hours.floor();
        let minutes = (hours - hour) * 60.0;
        let minute = minutes.floor();
        let seconds = (minutes - minute) * 60.0;
        let second = seconds.floor();
        let millisecond = ((seconds - second) * 1000.0).floor();

        Self {
            year: year as i32,
            month: month as u32,
            day: whole_day as u32,
            hour: hour as u32,
            minute: minute as u32,
            second: second as u32,
            millisecond: millisecond as u32,
        }
    }

    /// Returns the whole day this instant falls on.
    pub fn date(&self) -> Date {
        Date::from_jdn((self.julian_day() + 0.5).floor() as i32)
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if (self.hour, self.minute, self.second, self.millisecond) != (0, 0, 0, 0) {
            write!(
                f,
                "T{:02}:{:02}:{:02}.{:03}",
                self.hour, self.minute, self.second, self.millisecond
            )?;
        }
        Ok(())
    }
}

/// Julian Day Number of a date in the given calendar.
fn day_number(calendar: CalendarSystem, year: i32, month: u32, day: u32) -> i64 {
    let month = i64::from(month);
    let a = (14 - month) / 12;
    let y = i64::from(year) + 4800 - a;
    let m = month + 12 * a - 3;
    let common = i64::from(day) + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4);
    match calendar {
        CalendarSystem::Julian => common - 32083,
        CalendarSystem::Gregorian => common - y.div_euclid(100) + y.div_euclid(400) - 32045,
    }
}

/// A whole civil day, identified by its Julian Day Number (JDN).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Date {
    jdn: i32,
}

impl Date {
    /// Creates a `Date` with a Julian Day Number (JDN).
    pub fn from_jdn(jdn: i32) -> Self {
        Self { jdn }
    }
    /// Returns the Julian Day Number (JDN) of the date.
    pub fn jdn(&self) -> i32 {
        self.jdn
    }

    /// Creates a `Date` from a civil date, Julian before the 1582 reform and
    /// Gregorian after it.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::Date;
    ///
    /// assert_eq!(2451545, Date::from_civil(2000, 1, 1).jdn());
    /// assert_eq!(2299161, Date::from_civil(1582, 10, 10).jdn());
    /// ```
    pub fn from_civil(year: i32, month: u32, day: u32) -> Self {
        CivilDate::noon(year, month, day).date()
    }
    /// Represents the date as a civil date at midnight.
    pub fn civil(&self) -> CivilDate {
        CivilDate::from_julian_day(f64::from(self.jdn)).at_midnight()
    }
    /// Formats the date as `YYYY-MM-DD`.
    ///
    /// ```
    /// use nongli::Date;
    ///
    /// assert_eq!("2021-09-08", Date::from_jdn(2459466).iso());
    /// ```
    pub fn iso(&self) -> String {
        self.civil().to_string()
    }

    /// Returns the Chinese sexagenary day number of the date, numbered from 1
    /// (甲子) to 60 (癸亥).
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::Date;
    ///
    /// assert_eq!(55, Date::from_civil(2000, 1, 1).sexagenary()); // 戊午
    /// ```
    pub fn sexagenary(&self) -> u32 {
        (self.jdn + 49).rem_euclid(60) as u32 + 1
    }
}

impl Add<i32> for Date {
    type Output = Date;
    fn add(self, rhs: i32) -> Self::Output {
        Date::from_jdn(self.jdn + rhs)
    }
}
impl Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> Self::Output {
        self.jdn - rhs.jdn
    }
}

/// Indicates whether a year is a leap year or common year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum YearType {
    Common,
    Leap,
}

impl YearType {
    /// Determines if `year` is a leap year, using the Julian rule up to 1582
    /// and the Gregorian rule afterwards.
    pub fn from_year(year: i32) -> Self {
        let leap = if year <= GREGORIAN_FIRST_DAY.0 {
            year.rem_euclid(4) == 0
        } else {
            year % 4 == 0 && year % 100 != 0 || year % 400 == 0
        };
        if leap { Self::Leap } else { Self::Common }
    }
    /// Returns `true` if `self` is `Leap`, otherwise `false`.
    pub fn is_leap(&self) -> bool {
        matches!(self, YearType::Leap)
    }
    /// Number of days in `month` (1..=12); 0 for any other month.
    pub fn days_in_month(&self, month: u32) -> u32 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => 28 + self.is_leap() as u32,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_civil() {
        assert_eq!(2440588, Date::from_civil(1970, 1, 1).jdn());
        assert_eq!(2459466, Date::from_civil(2021, 9, 8).jdn());
        assert_eq!(0, Date::from_civil(-4712, 1, 1).jdn());
    }

    #[test]
    fn to_civil() {
        assert_eq!(CivilDate::ymd(1970, 1, 1), Date::from_jdn(2440588).civil());
        assert_eq!(CivilDate::ymd(2021, 9, 8), Date::from_jdn(2459466).civil());
        assert_eq!(CivilDate::ymd(2000, 1, 1), Date::from_jdn(2451545).civil());
    }

    #[test]
    fn reform_boundary() {
        assert_eq!(
            CivilDate::noon(1582, 10, 4),
            CivilDate::from_julian_day(2299160.0)
        );
        assert_eq!(
            CivilDate::noon(1582, 10, 15),
            CivilDate::from_julian_day(2299161.0)
        );
        assert_eq!(
            1,
            Date::from_civil(1582, 10, 15) - Date::from_civil(1582, 10, 4)
        );
        for day in 5..=14 {
            let jd = CivilDate::noon(1582, 10, day).julian_day();
            assert_eq!(GREGORIAN_REFORM_JD, jd, "1582-10-{day:02}");
        }
        assert_eq!(None, CalendarSystem::for_date(1582, 10, 5));
        assert_eq!(
            Some(CalendarSystem::Julian),
            CalendarSystem::for_date(1000, 3, 1)
        );
    }

    #[test]
    fn julian_epoch() {
        assert_eq!(0.0, CivilDate::noon(-4712, 1, 1).julian_day());
        assert_eq!(
            CivilDate::noon(-4712, 1, 1),
            CivilDate::from_julian_day(0.0)
        );
    }

    #[test]
    fn time_of_day() {
        let date = CivilDate::ymd(2000, 1, 1).with_time(18, 0, 0, 0);
        assert_eq!(2451545.25, date.julian_day());
        assert_eq!(date, CivilDate::from_julian_day(2451545.25));
        assert_eq!(2451544.5, CivilDate::ymd(2000, 1, 1).julian_day());
        assert_eq!(
            CivilDate::ymd(2000, 1, 1),
            CivilDate::from_julian_day(2451544.5)
        );
    }

    #[test]
    fn month_ends() {
        // Each of these lands where 30.6 * E is integral.
        for (y, m, d) in [(2021, 3, 31), (2021, 8, 31), (1500, 3, 31), (2000, 2, 29)] {
            let date = CivilDate::noon(y, m, d);
            assert_eq!(
                date,
                CivilDate::from_julian_day(date.julian_day()),
                "{date}"
            );
        }
    }

    #[test]
    fn checked_new() {
        assert!(CivilDate::new(1500, 2, 29).is_ok());
        assert!(CivilDate::new(1700, 2, 29).is_err());
        assert!(CivilDate::new(2000, 2, 29).is_ok());
        assert!(CivilDate::new(2021, 4, 31).is_err());
        assert!(CivilDate::new(2021, 13, 1).is_err());
        assert_eq!(
            CivilDate::ymd(1582, 10, 15),
            CivilDate::new(1582, 10, 14).unwrap()
        );
    }

    #[test]
    fn to_sexagenary() {
        assert_eq!(18, Date::from_civil(1970, 1, 1).sexagenary());
        assert_eq!(56, Date::from_civil(2021, 9, 8).sexagenary());
    }

    #[test]
    fn display() {
        assert_eq!("2021-09-08", CivilDate::ymd(2021, 9, 8).to_string());
        assert_eq!(
            "2000-01-01T18:30:00.000",
            CivilDate::ymd(2000, 1, 1).with_time(18, 30, 0, 0).to_string()
        );
    }
}
