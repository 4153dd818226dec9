//! 格式化農曆日期、干支、節氣等的文本形式

use super::{LunarDate, Month, sexagenary_for_year};

/// 漢數字，第 `1..=9` 項分別為「一」到「九」。為便於格式化日期，第 0 項為「十」。
pub const NUM_CHINESE: &[&str] = &["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 天干
pub const STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];
/// 地支
pub const BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];
/// 生肖，與地支對應
pub const ZODIAC: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龍", "蛇", "馬", "羊", "猴", "雞", "狗", "豬",
];

/// 干支序號（1 為甲子，60 為癸亥）轉為文本形式。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("甲辰", chinese::fmt::sexagenary(41));
/// ```
pub fn sexagenary(num: u32) -> String {
    let i = (num + 59) % 60;
    STEMS[(i % 10) as usize].to_owned() + BRANCHES[(i % 12) as usize]
}

/// 干支序號對應的生肖。
///
/// ```
/// use nongli::chinese::{fmt, sexagenary_for_year};
///
/// assert_eq!("牛", fmt::zodiac(sexagenary_for_year(2021)));
/// ```
pub fn zodiac(num: u32) -> &'static str {
    ZODIAC[((num + 59) % 12) as usize]
}

/// 農曆年的干支紀年，如「辛丑年」。
pub fn year(year: i32) -> String {
    sexagenary(sexagenary_for_year(year)) + "年"
}

/// 取得月名（含「月」字）。十一、十二月稱「冬月」「臘月」。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{self, Month::*};
///
/// assert_eq!("冬月", chinese::fmt::month(Common(11)));
/// assert_eq!("閏正月", chinese::fmt::month(Leap(1)));
/// ```
///
/// # Panics
///
/// 若月序號不在 `1..=12` 間則 panic。
pub fn month(m: Month) -> String {
    let num = m.num();
    let name = match num {
        1 => "正",
        2..=10 => NUM_CHINESE[(num % 10) as usize],
        11 => "冬",
        12 => "臘",
        _ => panic!("month {num} not in 1..=12"),
    };
    let prefix = if m.is_leap() { "閏" } else { "" };
    format!("{prefix}{name}月")
}

/// 日名：初一至初十、十一至十九、二十、廿一至廿九、三十。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("初八", chinese::fmt::day(8));
/// assert_eq!("廿三", chinese::fmt::day(23));
/// ```
///
/// # Panics
///
/// 若日序號不在 `1..=30` 間則 panic。
pub fn day(d: u32) -> String {
    let (tens, units) = match d {
        20 => ("二", "十"),
        30 => ("三", "十"),
        1..=29 => (
            ["初", "十", "廿"][((d - 1) / 10) as usize],
            NUM_CHINESE[(d % 10) as usize],
        ),
        _ => panic!("day {d} not in 1..=30"),
    };
    format!("{tens}{units}")
}

/// 節氣序號轉為名稱。0 為春分，6 為夏至，18 為冬至，23 為驚蟄，序號以 24 為週期。
///
/// # 用例
///
/// ```
/// use nongli::chinese;
///
/// assert_eq!("穀雨", chinese::fmt::solar_term(2));
/// assert_eq!("春分", chinese::fmt::solar_term(24));
/// ```
pub fn solar_term(index: u32) -> &'static str {
    const NAMES: [&str; 24] = [
        "春分", "清明", "穀雨", "立夏", "小滿", "芒種", "夏至", "小暑", "大暑", "立秋", "處暑",
        "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒", "立春",
        "雨水", "驚蟄",
    ];
    NAMES[(index % 24) as usize]
}

/// 農曆日期的完整文本形式，如「辛丑年冬月初一」。
pub fn lunar_date(date: &LunarDate) -> String {
    year(date.year) + &month(date.month) + &day(date.day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::Month::*;

    #[test]
    fn test_sexagenary() {
        for (std, num) in [("甲子", 1), ("庚寅", 27), ("辛丑", 38), ("癸亥", 60)] {
            assert_eq!(std, sexagenary(num));
        }
    }

    #[test]
    fn test_zodiac() {
        for (std, year) in [("鼠", 2020), ("龍", 2000), ("豬", 2019), ("猴", -2688)] {
            assert_eq!(std, zodiac(sexagenary_for_year(year)), "{year}");
        }
    }

    #[test]
    fn test_month() {
        let cases = [
            ("十月", Common(10)),
            ("閏六月", Leap(6)),
            ("臘月", Common(12)),
        ];
        for (std, m) in cases {
            assert_eq!(std, month(m));
        }
    }

    #[test]
    fn test_day() {
        let names: Vec<_> = [1, 5, 10, 11, 19, 20, 21, 29, 30].map(day).into();
        let std = [
            "初一", "初五", "初十", "十一", "十九", "二十", "廿一", "廿九", "三十",
        ];
        assert_eq!(std, names[..]);
    }

    #[test]
    fn test_lunar_date() {
        let date = LunarDate {
            year: 2021,
            month: Common(11),
            day: 1,
        };
        assert_eq!("辛丑年冬月初一", lunar_date(&date));
        assert_eq!("辛丑年冬月初一", date.to_string());
        let date = LunarDate {
            year: 2017,
            month: Leap(6),
            day: 15,
        };
        assert_eq!("丁酉年閏六月十五", lunar_date(&date));
    }
}
