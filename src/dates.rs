//! Parsing and formatting of the `dd/MM/yyyy` date format shown to the user.
//!
//! Dates are stored in the database as ISO calendar dates; this display
//! format only exists at the edges (form input and rendered lists). Parsing
//! and formatting round-trip for every representable calendar date.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

const DISPLAY_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[day]/[month]/[year]");

/// Parse a `dd/MM/yyyy` string into a calendar date.
///
/// # Errors
/// Returns [Error::InvalidDateFormat] if the string is not a valid date in
/// the display format.
pub fn parse_display_date(input: &str) -> Result<Date, Error> {
    Date::parse(input, DISPLAY_FORMAT).map_err(|_| Error::InvalidDateFormat(input.to_owned()))
}

/// Format a calendar date as a `dd/MM/yyyy` string.
pub fn format_display_date(date: Date) -> String {
    date.format(DISPLAY_FORMAT)
        .expect("a calendar date always formats as dd/MM/yyyy")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::{format_display_date, parse_display_date};

    #[test]
    fn parses_display_dates() {
        assert_eq!(parse_display_date("07/08/2024"), Ok(date!(2024 - 08 - 07)));
        assert_eq!(parse_display_date("29/02/2024"), Ok(date!(2024 - 02 - 29)));
    }

    #[test]
    fn formats_display_dates() {
        assert_eq!(format_display_date(date!(2024 - 08 - 07)), "07/08/2024");
        assert_eq!(format_display_date(date!(2001 - 01 - 01)), "01/01/2001");
    }

    #[test]
    fn parse_and_format_round_trip() {
        let cases = [
            date!(1999 - 12 - 31),
            date!(2000 - 02 - 29),
            date!(2024 - 01 - 01),
            date!(2038 - 06 - 15),
        ];

        for want in cases {
            let got = parse_display_date(&format_display_date(want)).unwrap();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn rejects_invalid_dates() {
        let cases = ["", "2024-01-01", "31/02/2024", "1/1/24", "not a date"];

        for input in cases {
            assert_eq!(
                parse_display_date(input),
                Err(Error::InvalidDateFormat(input.to_owned())),
                "input {input:?} should not parse"
            );
        }
    }
}
