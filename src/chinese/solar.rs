//! 以開普勒軌道推求節氣。
//!
//! 節氣自春分起按黃經每 15° 編號：0 為春分，6 為夏至，12 為秋分，18 為冬至。
//! 每年的表含 26 個節氣，跨過公元年末。偶數號為中氣，用以定閏。
//!
//! 春分及攝動公式見 Meeus《Astronomical Algorithms》第 27 章。

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use crate::error::Result;
use crate::time_scales::{Tt, Ut, delta_t_days};

use super::cache::YearCache;

/// 每年推算的節氣數，自春分至次年清明。
pub const TERM_COUNT: usize = 26;
/// 自上一年冬至起的中氣數。
pub const QI_COUNT: usize = 16;

/// J2000.0 曆元，即 2000-01-01 12:00 TT。
pub(crate) const J2000: f64 = 2451545.0;
const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// 冬至在年表中的序號。
pub const WINTER_SOLSTICE: usize = 18;

/// 自 J2000.0 起的儒略世紀數。
pub(crate) fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_JULIAN_YEAR / 100.0
}

fn julian_millennia(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_JULIAN_YEAR / 1000.0
}

/// `year` 年的平春分。
///
/// 1000 至 3000 年用較準的擬合式；其餘年份用 -1000..1000 的擬合式外推，離得越遠越不準。
pub fn vernal_equinox(year: i32) -> Tt {
    let y = f64::from(year);
    let jd = if (1000..=3000).contains(&year) {
        let m = (y - 2000.0) / 1000.0;
        2451623.80984 + 365242.37404 * m + 0.05169 * m.powi(2) - 0.00411 * m.powi(3)
            - 0.00057 * m.powi(4)
    } else {
        let m = y / 1000.0;
        1721139.29189 + 365242.1374 * m + 0.06134 * m.powi(2) + 0.00111 * m.powi(3)
            - 0.00071 * m.powi(4)
    };
    Tt(jd)
}

/// `year` 年的平氣，未加攝動及 ΔT 改正。
///
/// 自近日點起，真近點角每進 15° 解一次開普勒方程，以此分割回歸年。
pub fn mean_solar_terms(year: i32) -> [Tt; TERM_COUNT] {
    let equinox = vernal_equinox(year).0;
    let tropical_year = vernal_equinox(year + 1).0 - equinox;

    let t = julian_millennia(equinox);
    let e = 0.0167086342 - 0.0004203654 * t - 0.0000126734 * t.powi(2)
        + 0.0000001444 * t.powi(3)
        - 0.0000000002 * t.powi(4)
        + 0.0000000003 * t.powi(5);

    // 春分點至近日點的角距
    let ty = f64::from(year) / 1000.0;
    let perihelion = (111.25586939 - 17.0119934518333 * ty - 0.044091890166673 * ty.powi(2)
        - 4.37356166661345E-04 * ty.powi(3)
        + 8.16716666602386E-06 * ty.powi(4))
    .to_radians();

    let step = 2.0 * PI / 24.0;
    let offsets: [f64; TERM_COUNT] = std::array::from_fn(|i| {
        let theta = step * i as f64 + perihelion;
        // tan(θ/2) 只覆蓋 (-π, π)，其餘折回並計圈數
        let (theta, laps) = if theta > 3.0 * PI {
            (4.0 * PI - theta, 2.0)
        } else if theta > PI {
            (2.0 * PI - theta, 1.0)
        } else {
            (theta, 0.0)
        };
        let f1 = 2.0 * (((1.0 - e) / (1.0 + e)).sqrt() * (theta / 2.0).tan()).atan();
        let f2 = e * (1.0 - e * e).sqrt() * theta.sin() / (1.0 + e * theta.cos());
        let f = (f1 - f2) * tropical_year / 2.0 / PI;
        if laps > 0.0 {
            laps * tropical_year - f
        } else {
            f
        }
    });

    std::array::from_fn(|i| Tt(equinox + offsets[i] - offsets[0]))
}

/// 週期項 `A·cos(B + C·T)` 的 (A, B, C)，B、C 以度計。
const PERTURBATION_TERMS: [(f64, f64, f64); 24] = [
    (485.0, 324.96, 1934.136),
    (203.0, 337.23, 32964.467),
    (199.0, 342.08, 20.186),
    (182.0, 27.85, 445267.112),
    (156.0, 73.14, 45036.886),
    (136.0, 171.52, 22518.443),
    (77.0, 222.54, 65928.934),
    (74.0, 296.72, 3034.906),
    (70.0, 243.58, 9037.513),
    (58.0, 119.81, 33718.147),
    (52.0, 297.17, 150.678),
    (50.0, 21.02, 2281.226),
    (45.0, 247.54, 29929.562),
    (44.0, 325.15, 31555.956),
    (29.0, 60.93, 4443.417),
    (18.0, 155.12, 67555.328),
    (17.0, 288.79, 4562.452),
    (16.0, 198.04, 62894.029),
    (14.0, 199.76, 31436.921),
    (12.0, 95.39, 14577.848),
    (12.0, 287.11, 31931.756),
    (12.0, 320.81, 34777.259),
    (9.0, 227.73, 1222.114),
    (8.0, 15.45, 16859.074),
];

/// 行星攝動對平氣 `jd` 的改正，以日計。
pub fn perturbation(jd: Tt) -> f64 {
    let t = julian_centuries(jd.0);
    let s: f64 = PERTURBATION_TERMS
        .iter()
        .map(|&(a, b, c)| a * (b.to_radians() + c.to_radians() * t).cos())
        .sum();
    let w = (35999.373 * t - 2.47).to_radians();
    let rate = 1.0 + 0.0334 * w.cos() + 0.0007 * (2.0 * w).cos();
    0.00001 * s / rate
}

/// `year` 年序號在 `indices` 內的定氣，已加攝動改正並換算為 UT。
///
/// # Panics
///
/// 若 `indices` 超出 [`TERM_COUNT`] 則 panic。
pub fn adjusted_solar_terms(
    cache: &YearCache,
    year: i32,
    indices: RangeInclusive<usize>,
) -> Result<Vec<Ut>> {
    let mean = cache
        .mean_terms
        .get_or_try_insert_with(year, || Ok::<_, crate::Error>(mean_solar_terms(year)))?;
    indices
        .map(|i| {
            let tt = mean[i];
            let month = ((i + 1) / 2 + 3) as f64;
            let dt = delta_t_days(year, month)?;
            Ok(Ut::from_tt(Tt(tt.0 + perturbation(tt)), dt))
        })
        .collect()
}

/// 自 `year - 1` 年冬至起的 16 個中氣：上一年的冬至、大寒、雨水，
/// 及本年春分至次年春分的偶數號節氣。
pub fn qi_since_winter_solstice(cache: &YearCache, year: i32) -> Result<[Ut; QI_COUNT]> {
    cache.qi.get_or_try_insert_with(year, || {
        let previous =
            adjusted_solar_terms(cache, year - 1, WINTER_SOLSTICE..=WINTER_SOLSTICE + 4)?;
        let current = adjusted_solar_terms(cache, year, 0..=TERM_COUNT - 2)?;
        let major: Vec<Ut> = previous
            .iter()
            .step_by(2)
            .chain(current.iter().step_by(2))
            .copied()
            .collect();
        Ok(std::array::from_fn(|i| major[i]))
    })
}
