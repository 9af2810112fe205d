use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

use crate::model::{Entry, parse_minutes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthYear {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRow {
    /// One per matching entry, or a single blank row (empty service and
    /// minutes) for a day without entries.
    Day {
        weekday: &'static str,
        date: String,
        service: String,
        minutes: String,
    },
    /// "Wochenstunden gesamt" after each Sunday and after the last day.
    WeekTotal { hours: String },
    /// "Gesamtstunden", always the final row.
    GrandTotal { hours: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    pub rows: Vec<ReportRow>,
    pub grand_total_minutes: i64,
}

/// Builds the monthly attendance table: one row group per calendar day in
/// ascending order, a week subtotal after each Sunday (or the month's last
/// day), and a grand total at the end. Entries match a day by exact ISO date
/// string; entries dated outside the month are ignored.
pub fn build_report(month: MonthYear, entries: &[Entry]) -> MonthlyReport {
    let mut by_date: HashMap<&str, Vec<&Entry>> = HashMap::new();
    for e in entries {
        by_date.entry(e.date.as_str()).or_default().push(e);
    }

    let mut rows = Vec::new();
    let mut week_minutes: i64 = 0;
    let mut grand_minutes: i64 = 0;

    let last_day = days_in_month(month);
    for day in 1..=last_day {
        let date = match NaiveDate::from_ymd_opt(month.year, month.month, day) {
            Some(d) => d,
            None => continue,
        };
        let iso = date.format("%Y-%m-%d").to_string();

        match by_date.get(iso.as_str()) {
            Some(matching) => {
                for e in matching {
                    rows.push(ReportRow::Day {
                        weekday: weekday_label(date),
                        date: format_date(date),
                        service: e.service.clone(),
                        minutes: e.minutes.clone(),
                    });
                    week_minutes += parse_minutes(&e.minutes);
                }
            }
            None => rows.push(ReportRow::Day {
                weekday: weekday_label(date),
                date: format_date(date),
                service: String::new(),
                minutes: String::new(),
            }),
        }

        if date.weekday() == Weekday::Sun || day == last_day {
            rows.push(ReportRow::WeekTotal {
                hours: format_hours(week_minutes),
            });
            grand_minutes += week_minutes;
            week_minutes = 0;
        }
    }

    rows.push(ReportRow::GrandTotal {
        hours: format_hours(grand_minutes),
    });

    MonthlyReport {
        rows,
        grand_total_minutes: grand_minutes,
    }
}

// Last day number of the month, via the next month's first day.
fn days_in_month(month: MonthYear) -> u32 {
    let (next_year, next_month) = if month.month == 12 {
        (month.year + 1, 1)
    } else {
        (month.year, month.month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Di",
        Weekday::Wed => "Mi",
        Weekday::Thu => "Do",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "So",
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Minutes as hours with two decimals and a dot separator, e.g. "2.00".
pub fn format_hours(minutes: i64) -> String {
    format!("{:.2}", minutes as f64 / 60.0)
}

/// Report header month, German abbreviated month plus two-digit year.
pub fn month_label(month: MonthYear) -> String {
    let name = match month.month {
        1 => "Jan.",
        2 => "Feb.",
        3 => "März",
        4 => "Apr.",
        5 => "Mai",
        6 => "Juni",
        7 => "Juli",
        8 => "Aug.",
        9 => "Sept.",
        10 => "Okt.",
        11 => "Nov.",
        12 => "Dez.",
        _ => "Unbekannt",
    };
    format!("{} {:02}", name, month.year.rem_euclid(100))
}
