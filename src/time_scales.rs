//! Time scales used by the astronomical models, and the ΔT (TT − UT)
//! correction between them.
//!
//! Orbital formulas produce [`Tt`]; calendar days are decided in [`Ut`]. The
//! difference follows the polynomial expressions of Espenak & Meeus (NASA
//! eclipse canon, 2006), valid for years -1999 through 3000.

use crate::date::Date;
use crate::error::{Result, check_year};

/// Earliest year covered by the ΔT polynomials.
pub const DELTA_T_MIN_YEAR: i32 = -1999;
/// Latest year covered by the ΔT polynomials.
pub const DELTA_T_MAX_YEAR: i32 = 3000;

/// [Terrestrial time](https://en.wikipedia.org/wiki/Terrestrial_Time),
/// represented in Julian Day (JD).
///
/// The uniform time scale in which the solar and lunar series are evaluated.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time),
/// represented in Julian Day (JD).
///
/// Tracks the actual rotation of the Earth, so it is the scale that decides
/// which civil day an instant falls on.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Converts a TT instant given the ΔT correction in days.
    pub fn from_tt(tt: Tt, delta_t_days: f64) -> Self {
        Ut(tt.0 - delta_t_days)
    }
    /// Returns the date at the time point in timezone ahead (east) of UTC by
    /// `tz_offset_minutes` minutes.
    ///
    /// For Beijing time (UTC+8), `tz_offset_minutes` should be +480.
    ///
    /// # Example
    ///
    /// ```
    /// use nongli::time_scales::Ut;
    ///
    /// let ut = Ut(2451545.2); // 2000-01-01 16:48 UT
    /// assert_eq!("2000-01-01", ut.date_in_timezone(0).iso());
    /// assert_eq!("2000-01-02", ut.date_in_timezone(480).iso());
    /// ```
    pub fn date_in_timezone(&self, tz_offset_minutes: i32) -> Date {
        let local = self.0 + f64::from(tz_offset_minutes) / 1440.0;
        Date::from_jdn((local + 0.5).floor() as i32)
    }
}

/// ΔT in seconds for the given year and month.
///
/// `month` may be fractional or fall outside `1..=12`; it only shifts the
/// epoch `year + (month - 0.5) / 12` at which the polynomial is evaluated.
/// The polynomial itself is chosen by `year` alone.
///
/// # Example
///
/// ```
/// use nongli::time_scales::delta_t_seconds;
///
/// let dt = delta_t_seconds(2000, 1.0).unwrap();
/// assert!((dt - 63.87).abs() < 0.01);
/// assert!(delta_t_seconds(3001, 1.0).is_err());
/// ```
pub fn delta_t_seconds(year: i32, month: f64) -> Result<f64> {
    check_year(year, DELTA_T_MIN_YEAR, DELTA_T_MAX_YEAR)?;

    let y = f64::from(year) + (month - 0.5) / 12.0;
    let dt = if year < -500 {
        let u = (f64::from(year) - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    } else if year < 500 {
        let c = [
            10583.6,
            -1014.41,
            33.78311,
            -5.952053,
            -0.1798452,
            0.022174192,
            0.0090316521,
        ];
        polynomial(y / 100.0, &c)
    } else if year < 1600 {
        let c = [
            1574.2,
            -556.01,
            71.23472,
            0.319781,
            -0.8503463,
            -0.005050998,
            0.0083572073,
        ];
        polynomial((y - 1000.0) / 100.0, &c)
    } else if year < 1700 {
        polynomial(y - 1600.0, &[120.0, -0.9808, -0.01532, 1.0 / 7129.0])
    } else if year < 1800 {
        let c = [8.83, 0.1603, -0.0059285, 0.00013336, -1.0 / 1174000.0];
        polynomial(y - 1700.0, &c)
    } else if year < 1860 {
        let c = [
            13.72,
            -0.332447,
            0.0068612,
            0.0041116,
            -0.00037436,
            0.0000121272,
            -0.0000001699,
            0.000000000875,
        ];
        polynomial(y - 1800.0, &c)
    } else if year < 1900 {
        let c = [
            7.62,
            0.5737,
            -0.251754,
            0.01680668,
            -0.0004473624,
            1.0 / 233174.0,
        ];
        polynomial(y - 1860.0, &c)
    } else if year < 1920 {
        let c = [-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197];
        polynomial(y - 1900.0, &c)
    } else if year < 1941 {
        polynomial(y - 1920.0, &[21.2, 0.84493, -0.0761, 0.0020936])
    } else if year < 1961 {
        polynomial(y - 1950.0, &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0])
    } else if year < 1986 {
        polynomial(y - 1975.0, &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0])
    } else if year < 2005 {
        let c = [
            63.86,
            0.3345,
            -0.060374,
            0.0017275,
            0.000651814,
            0.00002373599,
        ];
        polynomial(y - 2000.0, &c)
    } else if year < 2050 {
        polynomial(y - 2000.0, &[62.92, 0.32217, 0.005589])
    } else if year < 2150 {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
    } else {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    };

    // The fits assume a lunar secular acceleration of -26"/cy²; ELP-2000/82
    // uses -25.858"/cy². 1955..2005 was observed independently of it.
    let correction = if (1955..2005).contains(&year) {
        0.0
    } else {
        -0.000012932 * (y - 1955.0) * (y - 1955.0)
    };
    Ok(dt + correction)
}

/// ΔT in days, see [`delta_t_seconds`].
pub fn delta_t_days(year: i32, month: f64) -> Result<f64> {
    Ok(delta_t_seconds(year, month)? / 86400.0)
}

/// Evaluates `c[0] + c[1]·x + c[2]·x² + …` by Horner's rule.
fn polynomial(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
