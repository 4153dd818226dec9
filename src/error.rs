//! Errors reported by the conversion routines.
//!
//! Every error is raised at the offending input and nothing is retried: the
//! computations are deterministic, so the same input always fails the same
//! way.

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error, split by whether the input is out of range altogether or
/// merely invalid for the year it names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}

/// Input outside the numeric range supported by the models.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("year {year} outside supported range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    #[error("month {0} not in 1..=12")]
    MonthOutOfRange(i32),
    #[error("day {day} not in 1..={max}")]
    DayOutOfRange { day: i32, max: i32 },
    #[error("{year:04}-{month:02}-{day:02} is not a valid civil date")]
    InvalidCivilDate { year: i32, month: i32, day: i32 },
}

/// Input that is in range but does not exist in the given lunisolar year.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    #[error("lunar year {year} has no leap month")]
    NoLeapMonth { year: i32 },
    #[error("month {requested} is not the leap month of {year}, which is {actual}")]
    WrongLeapMonth {
        year: i32,
        requested: u32,
        actual: u32,
    },
    #[error("day {day} exceeds the {length} days of the month")]
    DayExceedsMonth { day: u32, length: u32 },
}

impl Error {
    /// `true` for inputs outside the supported numeric range.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
    /// `true` for in-range inputs that are invalid for the requested year.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub(crate) fn check_year(year: i32, min: i32, max: i32) -> Result<()> {
    if (min..=max).contains(&year) {
        Ok(())
    } else {
        Err(DomainError::YearOutOfRange { year, min, max }.into())
    }
}

pub(crate) fn check_month(month: i32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(DomainError::MonthOutOfRange(month).into())
    }
}

pub(crate) fn check_day(day: i32, max: i32) -> Result<()> {
    if (1..=max).contains(&day) {
        Ok(())
    } else {
        Err(DomainError::DayOutOfRange { day, max }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let err: Error = DomainError::MonthOutOfRange(13).into();
        assert!(err.is_domain());
        assert!(!err.is_invalid_argument());
        let err: Error = InvalidArgument::NoLeapMonth { year: 2021 }.into();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn messages() {
        let err = check_year(-1001, -1000, 3000).unwrap_err();
        assert_eq!(
            "year -1001 outside supported range -1000..=3000",
            err.to_string()
        );
        assert_eq!(
            "day 31 not in 1..=30",
            check_day(31, 30).unwrap_err().to_string()
        );
        assert!(check_month(12).is_ok());
    }
}
