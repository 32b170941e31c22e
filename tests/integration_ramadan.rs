use chrono::NaiveDate;
use prayer_times::ramadan::{RamadanTimetable, TIMETABLE_YEAR};
use std::io::Write;
use tempfile::NamedTempFile;

const TABLE: &str = r#"[
    {"Day": 1, "Date": "18 February", "Suhoor End": "4:56 AM", "Fajr": "5:06 AM", "Sunrise": "6:26 AM",
     "Zuhr": "12:05 PM", "Ashar": "3:14 PM", "Maghrib": "5:39 PM", "Iftar Start": "5:39 PM", "Isha": "6:59 PM"},
    {"Day": 2, "Date": "19 February", "Suhoor End": "4:55 AM", "Fajr": "5:05 AM", "Sunrise": "6:25 AM",
     "Zuhr": "12:05 PM", "Ashar": "3:15 PM", "Maghrib": "5:40 PM", "Iftar Start": "5:40 PM", "Isha": "7:00 PM"},
    {"Day": 3, "Date": "20 Feb", "Suhoor End": "4:54 AM", "Fajr": "5:04 AM", "Sunrise": "6:24 AM",
     "Zuhr": "12:05 PM", "Ashar": "3:16 PM", "Maghrib": "5:41 PM", "Iftar Start": "5:41 PM", "Isha": "7:01 PM"}
]"#;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(TIMETABLE_YEAR, m, d).unwrap()
}

fn timetable_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(TABLE.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file_and_pick_days() {
    let file = timetable_file();
    let timetable = RamadanTimetable::from_path(file.path(), TIMETABLE_YEAR).unwrap();
    assert_eq!(timetable.rows.len(), 3);

    let next = timetable.next_day("Osaka", date(2, 19)).unwrap();
    assert_eq!(next.day, "2");
    assert_eq!(next.fajr, "5:05 AM");

    // Tokyo runs 17 minutes earlier
    let tokyo = timetable.current_day("Tokyo", date(2, 20)).unwrap();
    assert_eq!(tokyo.fajr, "4:47 AM");
    assert_eq!(tokyo.zuhr, "11:48 AM");
    assert_eq!(tokyo.maghrib, "5:24 PM");

    // After Ramadan the first day is shown again
    assert_eq!(timetable.next_day("Osaka", date(3, 30)).unwrap().day, "1");
    assert!(timetable.current_day("Osaka", date(3, 30)).is_none());
}

#[test]
fn test_missing_or_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(RamadanTimetable::from_path(&dir.path().join("missing.json"), TIMETABLE_YEAR).is_err());

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{\"Day\": 1}").unwrap();
    assert!(RamadanTimetable::from_path(file.path(), TIMETABLE_YEAR).is_err());
}
