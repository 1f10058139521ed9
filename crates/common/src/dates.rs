use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// 印尼语长日期格式，例如 `16 Oktober 2026`
pub fn format_long_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// 可选日期，缺失时显示 `-`
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_long_date).unwrap_or_else(|| "-".to_string())
}

/// 带时间的长格式，例如 `16 Oktober 2026 14:05`
pub fn format_long_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} {}",
        format_long_date(at.date_naive()),
        at.format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn month_names_are_indonesian() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(format_long_date(date), "16 Oktober 2026");
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(format_long_date(date), "2 Januari 2025");
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(format_long_date(date), "31 Desember 2024");
    }

    #[test]
    fn missing_date_renders_dash() {
        assert_eq!(format_optional_date(None), "-");
    }

    #[test]
    fn datetime_uses_its_own_offset() {
        let at = FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 5, 1, 8, 30, 0)
            .unwrap();
        assert_eq!(format_long_datetime(&at), "1 Mei 2026 08:30");

        let utc = Utc.with_ymd_and_hms(2026, 8, 17, 23, 59, 0).unwrap();
        assert_eq!(format_long_datetime(&utc), "17 Agustus 2026 23:59");
    }
}
