//! Clock and date text

use core::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use super::layer::Label;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full English weekday name
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAYS[weekday.num_days_from_monday() as usize]
}

/// Full English month name, `month0` counts from 0 = January
pub fn month_name(month0: u32) -> &'static str {
    MONTHS.get(month0 as usize).copied().unwrap_or("")
}

/// Write hour, minute and am/pm.
///
/// Without the 24 hour preference the hour is written 24 hour style and
/// am/pm stays blank. With the preference set the hour is written 12 hour
/// style followed by a lowercase am/pm.
pub fn write_time<const H: usize, const M: usize, const A: usize>(
    time: &NaiveDateTime,
    clock_is_24h_style: bool,
    hour: &mut Label<H>,
    minute: &mut Label<M>,
    ampm: &mut Label<A>,
) -> fmt::Result {
    if !clock_is_24h_style {
        hour.show(format_args!("{:02}", time.hour()))?;
        minute.show(format_args!("{:02}", time.minute()))?;
        ampm.clear();
    } else {
        let (is_pm, hour12) = time.hour12();
        hour.show(format_args!("{:02}", hour12))?;
        minute.show(format_args!("{:02}", time.minute()))?;
        ampm.set(if is_pm { "pm" } else { "am" })?;
    }

    Ok(())
}

/// Write the full weekday name
pub fn write_day<const N: usize>(time: &NaiveDateTime, day: &mut Label<N>) -> fmt::Result {
    day.set(weekday_name(time.weekday()))
}

/// Write full month name and zero padded day of month
pub fn write_date<const N: usize>(time: &NaiveDateTime, date: &mut Label<N>) -> fmt::Result {
    date.show(format_args!(
        "{} {:02}",
        month_name(time.month0()),
        time.day()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wednesday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn render(time: &NaiveDateTime, is_24h_style: bool) -> (Label<2>, Label<2>, Label<4>) {
        let (mut hour, mut minute, mut ampm) = (Label::new(), Label::new(), Label::new());
        write_time(time, is_24h_style, &mut hour, &mut minute, &mut ampm).unwrap();
        (hour, minute, ampm)
    }

    #[test]
    fn without_preference_uses_24_hour_digits() {
        let (hour, minute, ampm) = render(&wednesday(14, 5), false);
        assert_eq!(hour.as_str(), "14");
        assert_eq!(minute.as_str(), "05");
        assert_eq!(ampm.as_str(), "");
    }

    #[test]
    fn with_preference_uses_12_hour_digits() {
        let (hour, minute, ampm) = render(&wednesday(14, 5), true);
        assert_eq!(hour.as_str(), "02");
        assert_eq!(minute.as_str(), "05");
        assert_eq!(ampm.as_str(), "pm");

        let (hour, _, ampm) = render(&wednesday(0, 30), true);
        assert_eq!(hour.as_str(), "12");
        assert_eq!(ampm.as_str(), "am");
    }

    #[test]
    fn switching_preference_blanks_ampm() {
        let time = wednesday(14, 5);
        let (mut hour, mut minute, mut ampm) = render(&time, true);
        write_time(&time, false, &mut hour, &mut minute, &mut ampm).unwrap();
        assert_eq!(ampm.as_str(), "");
    }

    #[test]
    fn day_and_date() {
        let time = wednesday(14, 5);
        let mut day = Label::<12>::new();
        let mut date = Label::<12>::new();
        write_day(&time, &mut day).unwrap();
        write_date(&time, &mut date).unwrap();
        assert_eq!(day.as_str(), "Wednesday");
        assert_eq!(date.as_str(), "March 03");
    }

    #[test]
    fn longest_date_fits() {
        let time = NaiveDate::from_ymd_opt(2021, 9, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut date = Label::<12>::new();
        write_date(&time, &mut date).unwrap();
        assert_eq!(date.as_str(), "September 30");
    }
}
