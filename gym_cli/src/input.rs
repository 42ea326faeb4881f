//! Parsers for command-line values.

use chrono::{Datelike, Local, NaiveDate};
use gym_core::SetValue;
use std::str::FromStr;

/// Parse a date relative to `today`.
///
/// Accepts `YYYY-MM-DD`, `MM-DD` and `t`/`today`. Any run of non-digits
/// separates the parts, so `2025/4/5` and `04.05` work too. A month-day
/// that would fall after `today` refers to last year.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("t") || input.eq_ignore_ascii_case("today") {
        return Ok(today);
    }

    let parts = input
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid date {:?}: {}", input, e))?;

    let invalid = || format!("invalid date {:?} (expected YYYY-MM-DD, MM-DD or 'today')", input);

    match parts.as_slice() {
        [year, month, day] => {
            let year = i32::try_from(*year).map_err(|_| invalid())?;
            NaiveDate::from_ymd_opt(year, *month, *day).ok_or_else(invalid)
        }
        [month, day] => {
            let this_year = NaiveDate::from_ymd_opt(today.year(), *month, *day);
            match this_year {
                Some(date) if date <= today => Ok(date),
                _ => NaiveDate::from_ymd_opt(today.year() - 1, *month, *day).ok_or_else(invalid),
            }
        }
        _ => Err(invalid()),
    }
}

/// clap value parser for dates, relative to the local date
pub fn date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_date(input, Local::now().date_naive())
}

/// clap value parser for a single value or a comma-separated per-set list
pub fn set_value_arg<T>(input: &str) -> Result<SetValue<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    input.parse::<SetValue<T>>().map_err(|e| e.to_string())
}

/// Read a yes/no answer; only `y` or `yes` confirm.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
