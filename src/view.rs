use prettytable::{Cell, Row, Table, format};

use crate::model::{Entry, Session};
use crate::report::{MonthlyReport, ReportRow, month_label};

pub fn entries_table(entries: &[Entry]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(vec![
        Cell::new("Datum"),
        Cell::new("Klient:in"),
        Cell::new("Leistung"),
        Cell::new("Minuten"),
    ]));
    for e in entries {
        table.add_row(Row::new(vec![
            Cell::new(&e.date),
            Cell::new(&e.client),
            Cell::new(&e.service),
            Cell::new(&e.minutes),
        ]));
    }
    table
}

pub fn report_table(report: &MonthlyReport) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(vec![
        Cell::new("WT"),
        Cell::new("Datum"),
        Cell::new("Betreuungsinhalt"),
        Cell::new("Std./Min"),
        Cell::new("Unterschrift"),
    ]));

    for row in &report.rows {
        match row {
            ReportRow::Day {
                weekday,
                date,
                service,
                minutes,
            } => {
                table.add_row(Row::new(vec![
                    Cell::new(weekday),
                    Cell::new(date),
                    Cell::new(service),
                    Cell::new(minutes),
                    Cell::new(""),
                ]));
            }
            ReportRow::WeekTotal { hours } => {
                table.add_row(Row::new(vec![
                    Cell::new("Wochenstunden gesamt").style_spec("b").with_hspan(3),
                    Cell::new(hours).style_spec("b"),
                    Cell::new(""),
                ]));
            }
            ReportRow::GrandTotal { hours } => {
                table.add_row(Row::new(vec![
                    Cell::new("Gesamtstunden").style_spec("b").with_hspan(3),
                    Cell::new(hours).style_spec("bub"), // Bold Underline Bold
                    Cell::new(""),
                ]));
            }
        }
    }
    table
}

/// Header block above the report table, identifying the selected client.
pub fn header_block(session: &Session) -> String {
    let mut block = String::new();
    block.push_str("Anlage 2 - Leistungsnachweis\n");
    block.push_str("Betreuungsnachweis für ambulant betreutes Wohnen\n");
    match session.selected_client() {
        Some(client) => {
            block.push_str("Leistungserbringer:\n");
            block.push_str(&format!(
                "Name, Vorname: {}    geb. am: {}\n",
                client.name, client.birthdate
            ));
            block.push_str(&format!("wohnhaft in: {}\n", client.address));
            block.push_str(&format!(
                "Monat: {}    Betr.Std./Wo.: {}\n",
                month_label(session.report_month()),
                client.weekly_hours
            ));
        }
        None => block.push_str("Leistungserbringer: Keine Daten\n"),
    }
    block
}

/// Report-only view for the print spooler: header block, table, signature
/// caption lines. No other UI output appears here.
pub fn print_view(session: &Session, report: &MonthlyReport) -> String {
    let mut out = header_block(session);
    out.push('\n');
    out.push_str(&report_table(report).to_string());
    out.push_str("\nDatum/ Unterschrift des Betreuten:\n\n");
    out.push_str("Unterschrift Mitarbeiter:in:\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Client;
    use crate::report::{MonthYear, build_report};

    fn session_with_client() -> Session {
        let mut session = Session::new();
        session.add_client(Client {
            name: "Muster, Max".to_string(),
            birthdate: "01.01.1990".to_string(),
            address: "Musterweg 1, Berlin".to_string(),
            provider: "Träger e.V.".to_string(),
            weekly_hours: "5".to_string(),
        });
        session.add_entry(Entry {
            client: "Muster, Max".to_string(),
            date: "2024-06-03".to_string(),
            service: "Einkauf".to_string(),
            time_from: "09:00".to_string(),
            time_to: "11:00".to_string(),
            minutes: "120".to_string(),
        });
        session
    }

    #[test]
    fn header_block_identifies_the_selected_client() {
        let block = header_block(&session_with_client());
        assert!(block.contains("Anlage 2 - Leistungsnachweis"));
        assert!(block.contains("Name, Vorname: Muster, Max    geb. am: 01.01.1990"));
        assert!(block.contains("wohnhaft in: Musterweg 1, Berlin"));
        assert!(block.contains("Monat: Juni 24    Betr.Std./Wo.: 5"));
    }

    #[test]
    fn header_block_without_client_degrades_to_keine_daten() {
        let block = header_block(&Session::new());
        assert!(block.contains("Leistungserbringer: Keine Daten"));
        assert!(!block.contains("Name, Vorname"));
    }

    #[test]
    fn report_table_renders_subtotal_labels() {
        let session = session_with_client();
        let report = build_report(
            MonthYear {
                year: 2024,
                month: 6,
            },
            &session.entries,
        );
        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("Betreuungsinhalt"));
        assert!(rendered.contains("Einkauf"));
        assert!(rendered.contains("Wochenstunden gesamt"));
        assert!(rendered.contains("Gesamtstunden"));
    }

    #[test]
    fn entries_table_lists_all_entries_in_order() {
        let session = session_with_client();
        let table = entries_table(&session.entries);
        assert_eq!(table.len(), 1);
        let rendered = table.to_string();
        assert!(rendered.contains("2024-06-03"));
        assert!(rendered.contains("Muster, Max"));
    }

    #[test]
    fn print_view_ends_with_signature_captions() {
        let session = session_with_client();
        let report = build_report(session.report_month(), &session.entries);
        let view = print_view(&session, &report);
        assert!(view.starts_with("Anlage 2 - Leistungsnachweis"));
        assert!(view.contains("Datum/ Unterschrift des Betreuten:"));
        assert!(view.trim_end().ends_with("Unterschrift Mitarbeiter:in:"));
    }
}
