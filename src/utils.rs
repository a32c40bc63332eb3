// Utility functions
use chrono::{Datelike, Local, NaiveDate};

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "fevrier",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "aout",
    "septembre",
    "octobre",
    "novembre",
    "decembre",
];

/// Last calendar day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Formats the end of `date`'s month as `"<day> <mois>"`, e.g. `"31 octobre"`.
pub fn deadline_for(date: NaiveDate) -> String {
    let end = end_of_month(date);
    format!("{} {}", end.day(), MONTHS_FR[end.month0() as usize])
}

/// Deadline for the current local month.
pub fn current_deadline() -> String {
    deadline_for(Local::now().date_naive())
}
