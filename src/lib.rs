//! Conversion between civil dates and the Chinese lunisolar calendar.
//!
//! Solar terms and new moons are computed directly from astronomical series
//! instead of looked up in tables, so any year from -1000 to 3000 is
//! supported. Dates up to 1582-10-04 are in the Julian calendar and later ones
//! in the Gregorian calendar; the ten days skipped by the reform are treated
//! as 1582-10-15. Day boundaries follow Beijing time (UTC+8).
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use nongli::{CivilDate, Date};
//!
//! let date = Date::from_civil(2000, 1, 1);
//!
//! assert_eq!(2451545, date.jdn());
//! assert_eq!(CivilDate::ymd(2000, 1, 1), date.civil());
//! ```
//!
//! Chinese lunisolar calendar:
//!
//! ```
//! use nongli::{Calendar, CivilDate, Month::*};
//!
//! let calendar = Calendar::new();
//! let date = calendar.gregorian_to_lunar(2000, 1, 1).unwrap();
//!
//! assert_eq!((1999, Common(11), 25), (date.year, date.month, date.day));
//! assert_eq!("己卯年冬月廿五", date.to_string());
//!
//! let back = calendar.lunar_to_gregorian(1999, 11, 25, false).unwrap();
//! assert_eq!(CivilDate::ymd(2000, 1, 1), back);
//! ```
//!
//! Year tables are cached inside a [`Calendar`]; clones share the cache.
//! Cache misses are reported as `tracing` debug events.

pub mod chinese;
pub mod date;
pub mod error;
pub mod time_scales;

pub use chinese::{Calendar, LunarDate, Month};
pub use date::{CivilDate, Date, YearType};
pub use error::{Error, Result};
