use chrono::NaiveDateTime;
use std::path::Path;

/// Timestamp layout of packet headers and group files
pub const LOG_DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Timestamp layout embedded in data file names
pub const FILE_DATE_FORMAT: &str = "%d-%b-%Y_%H-%M-%S";

/// Parse `DD-Mon-YYYY HH:MM:SS`
pub fn parse_log_date(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), LOG_DATE_FORMAT).ok()
}

pub fn format_log_date(date: &NaiveDateTime) -> String {
    date.format(LOG_DATE_FORMAT).to_string()
}

pub fn format_file_date(date: &NaiveDateTime) -> String {
    date.format(FILE_DATE_FORMAT).to_string()
}

/// File name without its directory, lossily converted
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_log_date() {
        let date = parse_log_date("01-Jan-2022 10:00:00").unwrap();
        let expected = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        assert_eq!(date, expected);
    }

    #[test]
    fn test_parse_log_date_rejects_other_layouts() {
        assert!(parse_log_date("2022-01-01 10:00:00").is_none());
        assert!(parse_log_date("01-Jan-2022").is_none());
        assert!(parse_log_date("").is_none());
    }

    #[test]
    fn test_file_date_format() {
        let date = parse_log_date("05-Mar-2021 09:08:07").unwrap();

        assert_eq!(format_file_date(&date), "05-Mar-2021_09-08-07");
        assert_eq!(date.second(), 7);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/data/logs/tests.log")), "tests.log");
        assert_eq!(base_name(Path::new("tests.log")), "tests.log");
    }
}
