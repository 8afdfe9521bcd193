use chrono::{Local, NaiveDate, ParseResult};

pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub fn parse_date(text: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Number of rental days, counting both the first and the last day.
///
/// Ordering is not checked: an end before the start yields zero or a
/// negative count.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

pub fn days(start: &str, end: &str) -> ParseResult<i64> {
    Ok(inclusive_days(parse_date(start)?, parse_date(end)?))
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn dmy(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn same_day_is_one_day() {
        assert_eq!(days("01.01.2024", "01.01.2024"), Ok(1));
    }

    #[test]
    fn span_counts_both_ends() {
        assert_eq!(days("01.01.2024", "03.01.2024"), Ok(3));
        assert_eq!(days("28.02.2024", "01.03.2024"), Ok(3));
        assert_eq!(days("31.12.2023", "01.01.2024"), Ok(2));
    }

    #[test]
    fn inverted_range_is_not_positive() {
        let count = days("03.01.2024", "01.01.2024").unwrap();
        assert!(count <= 0);
        assert_eq!(count, -1);
    }

    #[test]
    fn rejects_other_formats() {
        assert!(days("2024-01-01", "03.01.2024").is_err());
        assert!(days("01.01.2024", "32.01.2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn parse_ignores_surrounding_space() {
        assert_eq!(parse_date(" 05.01.2024 "), Ok(dmy(5, 1, 2024)));
    }

    #[test]
    fn format_round_trips() {
        assert_eq!(format_date(dmy(5, 1, 2024)), "05.01.2024");
    }
}
