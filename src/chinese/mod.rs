//! Chinese calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本程序不用曆表，直接由天文算法推求節氣與合朔時刻：
//!
//! - [`solar`]：以開普勒方程求平氣，加攝動及 ΔT 改正得定氣；
//! - [`lunar`]：以月相級數求定朔；
//! - 本模塊：以冬至所在月為十一月，按「無中氣置閏」編排各月。
//!
//! 日界以北京時間（UTC+8）定，且全部比較均按整日（`floor(jd + 0.5)`）進行。
//! 支持公元 -1000 至 3000 年。

use std::fmt as std_fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::date::{CivilDate, Date};
use crate::error::{InvalidArgument, Result, check_day, check_month, check_year};
use crate::time_scales::{Ut, delta_t_days};

pub mod cache;
pub mod fmt;
pub mod lunar;
pub mod solar;

pub use cache::YearCache;

/// 北京時間相對 UTC 的分鐘數，用以定日界。
pub const CHINA_OFFSET_MINUTES: i32 = 480;
/// 支持的最早年份。
pub const MIN_YEAR: i32 = -1000;
/// 支持的最晚年份。
pub const MAX_YEAR: i32 = 3000;

/// 每歲推求的候選合朔數。
const CANDIDATES: usize = 20;
/// 自冬至所在月起連續的月首數。
pub const NEW_MOON_COUNT: usize = 16;
/// 月代碼個數，即 [`NEW_MOON_COUNT`] 個月首所圍成的月數。
pub const MONTH_SLOTS: usize = NEW_MOON_COUNT - 1;

/// 月名，`Common` 為平月，`Leap` 為閏月。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Month {
    Common(u32),
    Leap(u32),
}
impl Month {
    /// 依月序號及平閏構造月名。
    pub fn new(num: u32, is_leap: bool) -> Self {
        if is_leap {
            Self::Leap(num)
        } else {
            Self::Common(num)
        }
    }
    /// 取得月序號，無論平閏。
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// 閏月為 `true`，平月為 `false`
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
    /// 取得月名的文本形式，十一、十二月稱「冬月」「臘月」。
    pub fn name(&self) -> String {
        fmt::month(*self)
    }
}

/// 農曆日期。
///
/// `year` 為農曆年，以正月為首，與公元年大致對應；正月以前的十一、十二月屬上一年。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: Month,
    pub day: u32,
}
impl LunarDate {
    /// 是否閏月
    pub fn is_leap(&self) -> bool {
        self.month.is_leap()
    }
}
impl std_fmt::Display for LunarDate {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.write_str(&fmt::lunar_date(self))
    }
}

/// 月代碼：冬月（上一年十一月）為 0，臘月為 1，正月為 2，餘類推；閏月的代碼在其前月之上加半。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MonthCode {
    ordinal: u32,
    leap: bool,
}
impl MonthCode {
    fn common(ordinal: u32) -> Self {
        Self {
            ordinal,
            leap: false,
        }
    }
    fn leap_after(ordinal: u32) -> Self {
        Self {
            ordinal,
            leap: true,
        }
    }
    /// 代碼的數值，閏月帶 `.5`。
    pub fn value(&self) -> f64 {
        f64::from(self.ordinal) + if self.leap { 0.5 } else { 0.0 }
    }
    /// 代碼的整數部分。
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }
    /// 是否閏月
    pub fn is_leap(&self) -> bool {
        self.leap
    }
    /// `floor(代碼 + 0.5)`，用以標記閏月位置：
    /// 1 為上一年閏十一月，2 為閏十二月，3 為閏正月，餘類推。
    pub fn position(&self) -> u32 {
        self.ordinal + u32::from(self.leap)
    }
    /// 對應的月名。
    pub fn month(&self) -> Month {
        Month::new((self.ordinal + 10) % 12 + 1, self.leap)
    }
    /// 是否屬上一年的十一、十二月。
    fn in_prior_year(&self) -> bool {
        self.ordinal < 2
    }
}

/// 一年的編曆資料：自上一年冬至起的 16 個中氣、16 個月首，以及其間 15 個月的月代碼。
///
/// 時刻均以 UT 表示，換算為北京時間日期即得曆日。
#[derive(Debug, Clone, PartialEq)]
pub struct YearTables {
    /// 公元年
    pub year: i32,
    /// 中氣，`qi[0]` 為上一年冬至
    pub qi: [Ut; solar::QI_COUNT],
    /// 月首，`new_moons[0]` 為冬至所在月（十一月）之朔
    pub new_moons: [Ut; NEW_MOON_COUNT],
    /// `month_codes[i]` 為 `new_moons[i]` 至 `new_moons[i + 1]` 之月的代碼
    pub month_codes: [MonthCode; MONTH_SLOTS],
}

impl YearTables {
    /// 閏月位置，即首個閏月代碼的 [`MonthCode::position`]；無閏月為 0。
    pub fn leap_position(&self) -> u32 {
        self.month_codes[1..]
            .iter()
            .find(|code| code.is_leap())
            .map_or(0, MonthCode::position)
    }

    /// 各月首所在日期（北京時間）。
    pub fn new_moon_dates(&self) -> [Date; NEW_MOON_COUNT] {
        self.new_moons.map(local_date)
    }

    /// 各月日數，大月 30 日，小月 29 日。
    pub fn month_lengths(&self) -> [u32; MONTH_SLOTS] {
        let dates = self.new_moon_dates();
        std::array::from_fn(|i| (dates[i + 1] - dates[i]) as u32)
    }

    /// 取得 `year` 年 `month` 月（`is_leap` 為閏月）所在的月位。
    fn slot_of(&self, month: u32, is_leap: bool) -> Result<usize> {
        let leap = self.leap_position();
        let m = month + 2;
        let slot = if is_leap {
            if leap < 3 {
                return Err(InvalidArgument::NoLeapMonth { year: self.year }.into());
            }
            if leap != m {
                return Err(InvalidArgument::WrongLeapMonth {
                    year: self.year,
                    requested: month,
                    actual: leap - 2,
                }
                .into());
            }
            m
        } else if leap == 0 {
            m - 1
        } else {
            m + u32::from(m > leap) - 1
        };
        Ok(slot as usize)
    }

    /// 取得給定日期所在月位，不在各月首範圍內則返回 `None`。
    fn slot_containing(&self, date: Date) -> Option<usize> {
        let dates = self.new_moon_dates();
        dates.windows(2).position(|w| (w[0]..w[1]).contains(&date))
    }
}

/// 農曆一月的信息
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LunarMonth {
    /// 月名
    pub month: Month,
    /// 初一所在日期
    pub first_day: Date,
    /// 該月日數
    pub days: u32,
}

/// 節氣信息
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarTerm {
    /// 節氣序號，0 為春分，18 為冬至，19 為小寒
    pub index: u32,
    /// 交節時刻
    pub time: Ut,
    /// 交節日期（北京時間）
    pub date: Date,
}
impl SolarTerm {
    /// 節氣名稱
    pub fn name(&self) -> &'static str {
        fmt::solar_term(self.index)
    }
}

/// 夏曆推算器，持有按年緩存的節氣表。
///
/// 複製開銷很小，各副本共用同一緩存，可跨線程使用。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{Calendar, Month::*};
///
/// let calendar = Calendar::new();
/// let date = calendar.gregorian_to_lunar(2000, 1, 1).unwrap();
///
/// assert_eq!((1999, Common(11), 25), (date.year, date.month, date.day));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    cache: Arc<YearCache>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }
    /// 以既有緩存構造，便於多個推算器共用。
    pub fn with_cache(cache: Arc<YearCache>) -> Self {
        Self { cache }
    }
    /// 所用緩存
    pub fn cache(&self) -> &Arc<YearCache> {
        &self.cache
    }

    /// 取得公元 `year` 年的編曆資料。
    pub fn year_tables(&self, year: i32) -> Result<YearTables> {
        check_year(year, MIN_YEAR, MAX_YEAR)?;
        self.tables(year)
    }

    fn tables(&self, year: i32) -> Result<YearTables> {
        let qi = solar::qi_since_winter_solstice(&self.cache, year)?;
        let new_moons = self.new_moons_since_winter_solstice(year, qi[0])?;
        let month_codes = month_codes(&qi, &new_moons);
        tracing::trace!(year, ?month_codes, "derived month codes");
        Ok(YearTables {
            year,
            qi,
            new_moons,
            month_codes,
        })
    }

    /// 自冬至所在月起連續 16 個月首。
    fn new_moons_since_winter_solstice(
        &self,
        year: i32,
        winter_solstice: Ut,
    ) -> Result<[Ut; NEW_MOON_COUNT]> {
        // 自上一年十一月初附近起推，足以涵蓋冬至前的月首。
        let november = CivilDate::ymd(year - 1, 11, 1).julian_day();
        let kn = lunar::synodic_month_index(november);

        let mut candidates = [Ut(0.0); CANDIDATES];
        for (i, slot) in candidates.iter_mut().enumerate() {
            let tt = lunar::true_new_moon(kn + i as i32);
            // 0 為上一年十二月，-1 為上一年十一月
            *slot = Ut::from_tt(tt, delta_t_days(year, i as f64 - 1.0)?);
        }

        let ws = local_date(winter_solstice);
        let anchor = candidates[..CANDIDATES - 1]
            .iter()
            .position(|&nm| local_date(nm) > ws)
            .unwrap_or(1);
        let first = anchor.saturating_sub(1).min(CANDIDATES - NEW_MOON_COUNT);
        Ok(std::array::from_fn(|i| candidates[first + i]))
    }

    /// 公曆（1582 年 10 月 4 日及以前為儒略曆）日期轉農曆日期。
    ///
    /// 1582 年 10 月 5 日至 14 日作 15 日處理。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::chinese::{Calendar, Month::*};
    ///
    /// let calendar = Calendar::new();
    /// let date = calendar.gregorian_to_lunar(2017, 7, 23).unwrap();
    /// assert_eq!((2017, Leap(6), 1), (date.year, date.month, date.day));
    /// ```
    pub fn gregorian_to_lunar(&self, year: i32, month: i32, day: i32) -> Result<LunarDate> {
        check_year(year, MIN_YEAR, MAX_YEAR)?;
        check_month(month)?;
        check_day(day, 31)?;

        let date = Date::from_civil(year, month as u32, day as u32);
        let mut tables = self.tables(year)?;
        let mut prior = false;
        if date < local_date(tables.new_moons[0]) {
            prior = true;
            tables = self.tables(year - 1)?;
        }

        let slot = tables.slot_containing(date).unwrap_or(0);
        let code = tables.month_codes[slot];
        let lunar_year = if code.in_prior_year() || prior {
            year - 1
        } else {
            year
        };
        Ok(LunarDate {
            year: lunar_year,
            month: code.month(),
            day: (date - local_date(tables.new_moons[slot]) + 1) as u32,
        })
    }

    /// 農曆日期轉公曆日期（北京時間零時）。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::CivilDate;
    /// use nongli::chinese::Calendar;
    ///
    /// let calendar = Calendar::new();
    /// let date = calendar.lunar_to_gregorian(2021, 11, 1, false).unwrap();
    /// assert_eq!(CivilDate::ymd(2021, 12, 4), date);
    /// assert!(calendar.lunar_to_gregorian(2021, 11, 1, true).is_err());
    /// ```
    pub fn lunar_to_gregorian(
        &self,
        year: i32,
        month: i32,
        day: i32,
        is_leap: bool,
    ) -> Result<CivilDate> {
        check_year(year, MIN_YEAR, MAX_YEAR)?;
        check_month(month)?;
        check_day(day, 30)?;

        let tables = self.tables(year)?;
        let slot = tables.slot_of(month as u32, is_leap)?;
        let length = tables.month_lengths()[slot];
        let day = day as u32;
        if day > length {
            return Err(InvalidArgument::DayExceedsMonth { day, length }.into());
        }

        let target = Ut(tables.new_moons[slot].0 + f64::from(day - 1));
        Ok(local_date(target).civil())
    }

    /// 農曆某月的日數。
    ///
    /// ```
    /// use nongli::chinese::Calendar;
    ///
    /// let calendar = Calendar::new();
    /// assert_eq!(30, calendar.days_in_month(2017, 6, true).unwrap());
    /// ```
    pub fn days_in_month(&self, year: i32, month: i32, is_leap: bool) -> Result<u32> {
        check_year(year, MIN_YEAR, MAX_YEAR)?;
        check_month(month)?;

        let tables = self.tables(year)?;
        let slot = tables.slot_of(month as u32, is_leap)?;
        Ok(tables.month_lengths()[slot])
    }

    /// 農曆某年閏幾月，無閏月返回 0。
    ///
    /// ```
    /// use nongli::chinese::Calendar;
    ///
    /// let calendar = Calendar::new();
    /// assert_eq!(6, calendar.leap_month(2017).unwrap());
    /// assert_eq!(0, calendar.leap_month(2021).unwrap());
    /// ```
    pub fn leap_month(&self, year: i32) -> Result<u32> {
        Ok(self.year_tables(year)?.leap_position().saturating_sub(2))
    }

    /// 農曆某年自正月至臘月（含閏月）的各月。
    pub fn months(&self, year: i32) -> Result<Vec<LunarMonth>> {
        let tables = self.year_tables(year)?;
        let dates = tables.new_moon_dates();
        let lengths = tables.month_lengths();
        Ok(tables
            .month_codes
            .iter()
            .enumerate()
            .filter(|(_, code)| (2..=13).contains(&code.ordinal()))
            .map(|(i, code)| LunarMonth {
                month: code.month(),
                first_day: dates[i],
                days: lengths[i],
            })
            .collect())
    }

    /// 公元某年內交節的 24 個節氣，自小寒至冬至。
    pub fn solar_terms(&self, year: i32) -> Result<Vec<SolarTerm>> {
        check_year(year, MIN_YEAR, MAX_YEAR)?;
        let first = solar::WINTER_SOLSTICE + 1;
        let previous = solar::adjusted_solar_terms(&self.cache, year - 1, first..=first + 4)?;
        let current = solar::adjusted_solar_terms(&self.cache, year, 0..=solar::WINTER_SOLSTICE)?;
        let indices = (first..first + 5).chain(0..=solar::WINTER_SOLSTICE);
        Ok(indices
            .zip(previous.into_iter().chain(current))
            .map(|(index, time)| SolarTerm {
                index: index as u32,
                time,
                date: local_date(time),
            })
            .collect())
    }
}

/// 以整日比較求月代碼。
///
/// 兩冬至間若有 13 個月首，則第一個不含中氣的月為閏月；否則前 13 個月不置閏，只檢查其後兩月。
fn month_codes(
    qi: &[Ut; solar::QI_COUNT],
    new_moons: &[Ut; NEW_MOON_COUNT],
) -> [MonthCode; MONTH_SLOTS] {
    let qi = qi.map(local_date);
    let nm = new_moons.map(local_date);

    let mut codes = [MonthCode::common(0); MONTH_SLOTS];
    let first_checked = if qi[12] >= nm[13] {
        1
    } else {
        for (i, code) in codes.iter_mut().enumerate().take(13) {
            *code = MonthCode::common(i as u32);
        }
        13
    };

    let mut seen = 0;
    for i in first_checked..MONTH_SLOTS {
        // 月首在前一中氣之後，而次月首不晚於下一中氣，則本月無中氣
        if nm[i] > qi[i - 1 - seen] && nm[i + 1] <= qi[i - seen] {
            tracing::trace!(slot = i, "month without major term");
            codes[i] = MonthCode::leap_after(i as u32 - 1);
            seen = 1;
        } else {
            codes[i] = MonthCode::common((i - seen) as u32);
        }
    }
    codes
}

/// 將 UT 時刻轉為北京時間日期。
pub fn local_date(ut: Ut) -> Date {
    ut.date_in_timezone(CHINA_OFFSET_MINUTES)
}

/// 取得所給公元年的干支。
///
/// # 用例
///
/// ```
/// use nongli::chinese::sexagenary_for_year;
///
/// assert_eq!(1, sexagenary_for_year(-2696));
/// ```
pub fn sexagenary_for_year(year: i32) -> u32 {
    (year + 2696).rem_euclid(60) as u32 + 1
}
