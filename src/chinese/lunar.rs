//! 以週期級數推求定朔，見 Meeus《Astronomical Algorithms》第 49 章。
//!
//! 朔望月以 2000-01-06 的平朔為第 0 月，其後第 `k` 個朔為第 `k` 月，之前為負。

use crate::time_scales::Tt;

use super::solar::julian_centuries;

/// 朔望月平均長度，以日計。
pub const MEAN_SYNODIC_MONTH: f64 = 29.530588853;

/// 2000-01-06 14:20:36 TT 的平朔；定朔在 18:14。
pub const REFERENCE_NEW_MOON: f64 = 2451550.0976504628;

/// `jd` 所在平朔望月的序號。
///
/// ```
/// use nongli::chinese::lunar::synodic_month_index;
///
/// assert_eq!(0, synodic_month_index(2451551.0));
/// assert_eq!(-1, synodic_month_index(2451545.0));
/// ```
pub fn synodic_month_index(jd: f64) -> i32 {
    ((jd - REFERENCE_NEW_MOON) / MEAN_SYNODIC_MONTH).floor() as i32
}

/// 週期項中各引數 (M, M′, F, Ω) 的倍數。
type Arguments = [f64; 4];

/// 定朔週期項：振幅（日）、離心率因子 E 的冪次、各引數倍數。
const NEW_MOON_TERMS: [(f64, i32, Arguments); 25] = [
    (-0.40720, 0, [0.0, 1.0, 0.0, 0.0]),
    (0.17241, 1, [1.0, 0.0, 0.0, 0.0]),
    (0.01608, 0, [0.0, 2.0, 0.0, 0.0]),
    (0.01039, 0, [0.0, 0.0, 2.0, 0.0]),
    (0.00739, 1, [-1.0, 1.0, 0.0, 0.0]),
    (-0.00514, 1, [1.0, 1.0, 0.0, 0.0]),
    (0.00208, 2, [2.0, 0.0, 0.0, 0.0]),
    (-0.00111, 0, [0.0, 1.0, -2.0, 0.0]),
    (-0.00057, 0, [0.0, 1.0, 2.0, 0.0]),
    (0.00056, 1, [1.0, 2.0, 0.0, 0.0]),
    (-0.00042, 0, [0.0, 3.0, 0.0, 0.0]),
    (0.00042, 1, [1.0, 0.0, 2.0, 0.0]),
    (0.00038, 1, [1.0, 0.0, -2.0, 0.0]),
    (-0.00024, 1, [-1.0, 2.0, 0.0, 0.0]),
    (-0.00017, 0, [0.0, 0.0, 0.0, 1.0]),
    (-0.00007, 0, [2.0, 1.0, 0.0, 0.0]),
    (0.00004, 0, [0.0, 2.0, -2.0, 0.0]),
    (0.00004, 0, [3.0, 0.0, 0.0, 0.0]),
    (0.00003, 0, [1.0, 1.0, -2.0, 0.0]),
    (0.00003, 0, [0.0, 2.0, 2.0, 0.0]),
    (-0.00003, 0, [1.0, 1.0, 2.0, 0.0]),
    (0.00003, 0, [-1.0, 1.0, 2.0, 0.0]),
    (-0.00002, 0, [-1.0, 1.0, -2.0, 0.0]),
    (-0.00002, 0, [1.0, 3.0, 0.0, 0.0]),
    (0.00002, 0, [0.0, 4.0, 0.0, 0.0]),
];

/// 行星項：振幅（日），及以度計的引數 `a + b·k`。
const PLANETARY_TERMS: [(f64, f64, f64); 14] = [
    (0.000325, 299.77, 0.107408),
    (0.000165, 251.88, 0.016321),
    (0.000164, 251.83, 26.651886),
    (0.000126, 349.42, 36.412478),
    (0.000110, 84.66, 18.206239),
    (0.000062, 141.74, 53.303771),
    (0.000060, 207.14, 2.453732),
    (0.000056, 154.84, 7.306860),
    (0.000047, 34.52, 27.261239),
    (0.000042, 207.19, 0.121824),
    (0.000040, 291.34, 1.844379),
    (0.000037, 161.72, 24.198154),
    (0.000035, 239.56, 25.513099),
    (0.000023, 331.55, 3.592518),
];

/// 第 `k` 月的定朔時刻。
///
/// ```
/// use nongli::chinese::lunar::true_new_moon;
///
/// // 2000-01-06 18:14 TT
/// let jd = true_new_moon(0).0;
/// assert!((jd - 2451550.26).abs() < 0.001);
/// ```
pub fn true_new_moon(k: i32) -> Tt {
    let k = f64::from(k);
    let mean = REFERENCE_NEW_MOON + MEAN_SYNODIC_MONTH * k;
    let t = julian_centuries(mean);
    let (t2, t3, t4) = (t.powi(2), t.powi(3), t.powi(4));

    let phase = mean + 0.0001337 * t2 - 0.00000015 * t3 + 0.00000000073 * t4;

    // 太陽平近點角
    let m = 2.5534 + 29.10535669 * k - 0.0000218 * t2 - 0.00000011 * t3;
    // 月亮平近點角
    let mp = 201.5643 + 385.81693528 * k + 0.0107438 * t2 + 0.00001239 * t3 - 0.000000058 * t4;
    // 月亮升交角距
    let f = 160.7108 + 390.67050274 * k - 0.0016341 * t2 - 0.00000227 * t3 + 0.000000011 * t4;
    // 升交點黃經
    let omega = 124.7746 - 1.5637558 * k + 0.0020691 * t2 + 0.00000215 * t3;

    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let args = [m, mp, f, omega];

    let periodic: f64 = NEW_MOON_TERMS
        .iter()
        .map(|&(amplitude, e_power, multiples)| {
            let angle: f64 = multiples.iter().zip(args).map(|(n, a)| n * a).sum();
            amplitude * e.powi(e_power) * angle.to_radians().sin()
        })
        .sum();

    let planetary: f64 = PLANETARY_TERMS
        .iter()
        .enumerate()
        .map(|(i, &(amplitude, a, b))| {
            // 僅首項含 T² 項
            let drift = if i == 0 { -0.009173 * t2 } else { 0.0 };
            amplitude * (a + b * k + drift).to_radians().sin()
        })
        .sum();

    Tt(phase + periodic + planetary)
}
