use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month};

use crate::ValidationError;

/// Fixed calendar-date format used by quote series and presentation.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` string. `index` is the position reported on failure.
pub fn parse_date(index: usize, input: &str) -> Result<Date, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        index,
        value: input.to_owned(),
    };

    if !has_date_shape(input) {
        return Err(invalid());
    }

    Date::parse(input, DATE_FORMAT).map_err(|_| invalid())
}

/// Parse a date string outside of series construction (CLI arguments, lookups).
pub fn parse_date_str(input: &str) -> Result<Date, ValidationError> {
    parse_date(0, input.trim())
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| {
        format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        )
    })
}

fn has_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Shift a date by whole calendar months, clamping the day to the target month's length.
pub fn add_months(date: Date, months: i32) -> Option<Date> {
    let total = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + months;
    let year = total.div_euclid(12);
    let month = Month::try_from(u8::try_from(total.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).ok()
}

/// Fractional calendar months from `start` to `end`.
///
/// Whole months come from the calendar fields; the remainder is interpolated
/// over the length of the month surrounding `end`.
pub fn months_between(start: Date, end: Date) -> f64 {
    let whole = (end.year() - start.year()) * 12
        + (i32::from(u8::from(end.month())) - i32::from(u8::from(start.month())));

    let Some(anchor) = add_months(start, whole) else {
        return f64::NAN;
    };

    let offset = (end - anchor).whole_days() as f64;
    let neighbour = if offset < 0.0 { whole - 1 } else { whole + 1 };
    let Some(neighbour) = add_months(start, neighbour) else {
        return f64::NAN;
    };

    let span = (neighbour - anchor).whole_days().abs() as f64;
    f64::from(whole) + offset / span
}

/// Fractional years between two dates (calendar months / 12).
pub fn fractional_years(start: Date, end: Date) -> f64 {
    months_between(start, end) / 12.0
}
