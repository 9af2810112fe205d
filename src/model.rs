use chrono::{Datelike, Local, NaiveDate};
use tracing::warn;

use crate::report::MonthYear;

// --- Data Structs ---
#[derive(Debug, Clone)]
pub struct Client {
    pub name: String,
    pub birthdate: String,
    pub address: String,
    pub provider: String,
    pub weekly_hours: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub client: String,
    /// ISO date, "YYYY-MM-DD".
    pub date: String,
    pub service: String,
    /// "HH:MM", may be empty.
    pub time_from: String,
    /// "HH:MM", may be empty.
    pub time_to: String,
    /// Integer minutes kept as a string; unparsable values count as 0.
    pub minutes: String,
}

/// Everything a session owns: the recorded clients and entries plus the
/// client the report header refers to. Lives in memory only; one process
/// run is one session.
#[derive(Debug, Default)]
pub struct Session {
    pub clients: Vec<Client>,
    pub entries: Vec<Entry>,
    selected: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_client(&mut self, client: Client) {
        self.clients.push(client);
    }

    /// Appends an entry and makes its client the selected one, matching the
    /// entry form whose client field drives the report header.
    pub fn add_entry(&mut self, entry: Entry) {
        self.selected = Some(entry.client.clone());
        self.entries.push(entry);
    }

    pub fn select_client(&mut self, name: String) {
        self.selected = Some(name);
    }

    pub fn client_by_name(&self, name: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.name == name)
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.selected.as_deref().and_then(|n| self.client_by_name(n))
    }

    /// Target month for the report: the first recorded entry's date, or the
    /// current month when there are no entries (or the date does not parse).
    pub fn report_month(&self) -> MonthYear {
        let today = Local::now().date_naive();
        let fallback = MonthYear {
            year: today.year(),
            month: today.month(),
        };
        match self.entries.first() {
            None => fallback,
            Some(first) => match NaiveDate::parse_from_str(&first.date, "%Y-%m-%d") {
                Ok(d) => MonthYear {
                    year: d.year(),
                    month: d.month(),
                },
                Err(_) => {
                    warn!(date = %first.date, "first entry date does not parse, using current month");
                    fallback
                }
            },
        }
    }
}

// Helpers for Display (used directly as Select items)
impl std::fmt::Display for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} – {} – {} – {} Minuten",
            self.date, self.client, self.service, self.minutes
        )
    }
}

/// Minutes of day for a 24-hour "HH:MM" string. `None` unless the input is
/// two `:`-separated integer fields.
pub fn parse_hhmm(raw: &str) -> Option<i64> {
    let (h, m) = raw.trim().split_once(':')?;
    let h: i64 = h.trim().parse().ok()?;
    let m: i64 = m.trim().parse().ok()?;
    Some(h * 60 + m)
}

/// Derived duration for the entry form: when both times parse and the end is
/// after the start, the difference in minutes as a string. Zero, negative, or
/// unparsable inputs yield `None` and the duration field stays untouched.
pub fn autofill_minutes(from: &str, to: &str) -> Option<String> {
    let start = parse_hhmm(from)?;
    let end = parse_hhmm(to)?;
    let total = end - start;
    if total > 0 { Some(total.to_string()) } else { None }
}

/// Permissive minutes parse: unparsable values contribute 0 to the totals
/// (the raw string still shows up in the report cell). Negative values pass
/// through unchanged.
pub fn parse_minutes(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            if !raw.trim().is_empty() {
                warn!(minutes = %raw, "unparsable minutes value, counting 0");
            }
            0
        }
    }
}
