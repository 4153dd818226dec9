use nongli::chinese::{Calendar, LunarDate, MAX_YEAR, MIN_YEAR, Month::*};
use nongli::error::{DomainError, InvalidArgument};
use nongli::{CivilDate, Date, Error};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn lunar(year: i32, month: nongli::Month, day: u32) -> LunarDate {
    LunarDate { year, month, day }
}

#[test]
fn first_of_eleventh_month_2021() {
    init_tracing();
    let calendar = Calendar::new();
    assert_eq!(
        CivilDate::ymd(2021, 12, 4),
        calendar.lunar_to_gregorian(2021, 11, 1, false).unwrap()
    );
    assert_eq!(
        lunar(2021, Common(11), 1),
        calendar.gregorian_to_lunar(2021, 12, 4).unwrap()
    );
}

#[test]
fn known_dates() {
    let calendar = Calendar::new();
    for ((y, m, d), std) in [
        ((2000, 1, 1), lunar(1999, Common(11), 25)),
        ((2017, 1, 28), lunar(2017, Common(1), 1)),
        ((2017, 7, 23), lunar(2017, Leap(6), 1)),
        ((2023, 3, 22), lunar(2023, Leap(2), 1)),
        ((2024, 2, 10), lunar(2024, Common(1), 1)),
        ((1900, 1, 31), lunar(1900, Common(1), 1)),
        ((-1000, 1, 1), lunar(-1001, Common(11), 20)),
        ((3000, 6, 1), lunar(3000, Common(5), 7)),
    ] {
        assert_eq!(
            std,
            calendar.gregorian_to_lunar(y, m, d).unwrap(),
            "{y}-{m}-{d}"
        );
    }
}

#[test]
fn leap_months() {
    let calendar = Calendar::new();
    for (year, std) in [
        (-1000, 6),
        (1582, 0),
        (1984, 10),
        (2000, 0),
        (2017, 6),
        (2020, 4),
        (2021, 0),
        (2023, 2),
        (2025, 6),
        (2033, 11),
        (3000, 6),
    ] {
        assert_eq!(std, calendar.leap_month(year).unwrap(), "{year}");
    }
    assert_eq!(
        CivilDate::ymd(1984, 11, 23),
        calendar.lunar_to_gregorian(1984, 10, 1, true).unwrap()
    );
    assert_eq!(
        CivilDate::ymd(2020, 5, 23),
        calendar.lunar_to_gregorian(2020, 4, 1, true).unwrap()
    );
    assert_eq!(
        CivilDate::ymd(-1000, 8, 4),
        calendar.lunar_to_gregorian(-1000, 6, 1, true).unwrap()
    );
}

#[test]
fn round_trip() {
    let calendar = Calendar::new();
    let sparse = [-999, -500, 0, 500, 1000, 1582, 1583, 1700, 2999];
    for year in (1990..2040).chain(sparse) {
        for month in calendar.months(year).unwrap() {
            let num = month.month.num() as i32;
            let is_leap = month.month.is_leap();
            for day in [1, month.days] {
                let civil = calendar
                    .lunar_to_gregorian(year, num, day as i32, is_leap)
                    .unwrap();
                assert_eq!(month.first_day + (day as i32 - 1), civil.date());
                let back = calendar
                    .gregorian_to_lunar(civil.year, civil.month as i32, civil.day as i32)
                    .unwrap();
                assert_eq!(lunar(year, month.month, day), back, "{civil}");
            }
        }
    }
}

#[test]
fn month_lengths_and_leap_exclusivity() {
    let calendar = Calendar::new();
    for year in (MIN_YEAR..MAX_YEAR).step_by(7) {
        let months = calendar.months(year).unwrap();
        let leap = calendar.leap_month(year).unwrap();
        let leaps: Vec<_> = months.iter().filter(|m| m.month.is_leap()).collect();
        if leap == 0 {
            assert_eq!(12, months.len(), "{year}");
            assert!(leaps.is_empty());
        } else {
            assert_eq!(13, months.len(), "{year}");
            assert_eq!(
                vec![&Leap(leap)],
                leaps.iter().map(|m| &m.month).collect::<Vec<_>>()
            );
        }
        for m in &months {
            assert!(m.days == 29 || m.days == 30, "{year}: {m:?}");
            let num = m.month.num() as i32;
            assert_eq!(
                m.days,
                calendar.days_in_month(year, num, m.month.is_leap()).unwrap()
            );
        }
        for w in months.windows(2) {
            assert_eq!(w[0].first_day + w[0].days as i32, w[1].first_day, "{year}");
        }
    }
}

#[test]
fn one_leap_month_per_year() {
    let calendar = Calendar::new();
    for year in (MIN_YEAR..=MAX_YEAR).step_by(13) {
        let leap = calendar.leap_month(year).unwrap() as i32;
        let accepted: Vec<_> = (1..=12)
            .filter(|&m| calendar.days_in_month(year, m, true).is_ok())
            .collect();
        let expected = if leap == 0 { vec![] } else { vec![leap] };
        assert_eq!(expected, accepted, "{year}");
        for m in (1..=12).filter(|&m| m != leap) {
            let err = calendar.lunar_to_gregorian(year, m, 1, true).unwrap_err();
            assert!(err.is_invalid_argument(), "{year}: {m}");
        }
    }
}

#[test]
fn tables_increase() {
    let calendar = Calendar::new();
    for year in (MIN_YEAR..=MAX_YEAR).step_by(97) {
        let tables = calendar.year_tables(year).unwrap();
        assert!(tables.qi.windows(2).all(|w| w[0] < w[1]), "{year}");
        assert!(tables.new_moons.windows(2).all(|w| w[0] < w[1]), "{year}");
        // 十一月含冬至
        let dates = tables.new_moon_dates();
        let ws = nongli::chinese::local_date(tables.qi[0]);
        assert!(dates[0] <= ws && ws < dates[1], "{year}");
    }
}

#[test]
fn reform_gap() {
    let calendar = Calendar::new();
    let after = calendar.gregorian_to_lunar(1582, 10, 15).unwrap();
    assert_eq!(lunar(1582, Common(9), 19), after);
    for day in 5..15 {
        assert_eq!(after, calendar.gregorian_to_lunar(1582, 10, day).unwrap());
    }
    assert_eq!(
        lunar(1582, Common(9), 18),
        calendar.gregorian_to_lunar(1582, 10, 4).unwrap()
    );
    assert_eq!(
        Date::from_civil(1582, 10, 4) + 1,
        Date::from_civil(1582, 10, 15)
    );
}

#[test]
fn errors() {
    let calendar = Calendar::new();
    assert_eq!(
        Error::Domain(DomainError::YearOutOfRange {
            year: -1001,
            min: MIN_YEAR,
            max: MAX_YEAR,
        }),
        calendar.gregorian_to_lunar(-1001, 1, 1).unwrap_err()
    );
    for (m, d) in [(13, 1), (0, 1), (1, 32), (1, 0)] {
        let err = calendar.gregorian_to_lunar(2000, m, d).unwrap_err();
        assert!(err.is_domain(), "{m}-{d}");
    }
    for (y, d) in [(2000, 31), (3001, 1)] {
        let err = calendar.lunar_to_gregorian(y, 1, d, false).unwrap_err();
        assert!(err.is_domain(), "{y}: {d}");
    }

    assert_eq!(
        Error::InvalidArgument(InvalidArgument::NoLeapMonth { year: 2021 }),
        calendar.lunar_to_gregorian(2021, 11, 1, true).unwrap_err()
    );
    let short = calendar
        .months(2021)
        .unwrap()
        .into_iter()
        .find(|m| m.days == 29)
        .unwrap();
    let err = calendar
        .lunar_to_gregorian(2021, short.month.num() as i32, 30, false)
        .unwrap_err();
    assert_eq!(
        Error::InvalidArgument(InvalidArgument::DayExceedsMonth {
            day: 30,
            length: 29,
        }),
        err
    );
}

#[test]
fn shared_cache() {
    let calendar = Calendar::new();
    let clone = calendar.clone();
    calendar.gregorian_to_lunar(2021, 6, 1).unwrap();
    let held = clone.cache().len();
    assert!(held > 0);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let calendar = calendar.clone();
            std::thread::spawn(move || calendar.gregorian_to_lunar(2021, 6, 1).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(lunar(2021, Common(4), 21), handle.join().unwrap());
    }
    assert_eq!(held, calendar.cache().len());
}

#[test]
fn serde_shape() {
    let date = lunar(2017, Leap(6), 1);
    let json = serde_json::to_value(date).unwrap();
    assert_eq!(
        serde_json::json!({"year": 2017, "month": {"Leap": 6}, "day": 1}),
        json
    );
    assert_eq!(date, serde_json::from_value(json).unwrap());

    let civil = CivilDate::ymd(2021, 12, 4);
    let json = serde_json::to_string(&civil).unwrap();
    assert_eq!(
        r#"{"year":2021,"month":12,"day":4,"hour":0,"minute":0,"second":0,"millisecond":0}"#,
        json
    );
}
