use anyhow::Result;
use rust_xlsxwriter::{Format, FormatBorder, Workbook};
use std::path::{Path, PathBuf};

use crate::model::Entry;

pub const EXCEL_FILENAME: &str = "Leistungsnachweis.xlsx";
pub const SHEET_NAME: &str = "Leistungsnachweis";

// Column keys as they appear in the exported sheet's header row.
pub const COLUMNS: [&str; 6] = ["client", "date", "service", "timeFrom", "timeTo", "minutes"];

/// One tabular row per raw entry, in recorded order. The XLSX writer writes
/// exactly these rows; `entries_from_rows` restores entries from them.
pub fn entry_rows(entries: &[Entry]) -> Vec<[String; 6]> {
    entries
        .iter()
        .map(|e| {
            [
                e.client.clone(),
                e.date.clone(),
                e.service.clone(),
                e.time_from.clone(),
                e.time_to.clone(),
                e.minutes.clone(),
            ]
        })
        .collect()
}

pub fn entries_from_rows(rows: &[[String; 6]]) -> Vec<Entry> {
    rows.iter()
        .map(|r| Entry {
            client: r[0].clone(),
            date: r[1].clone(),
            service: r[2].clone(),
            time_from: r[3].clone(),
            time_to: r[4].clone(),
            minutes: r[5].clone(),
        })
        .collect()
}

/// Writes the raw entry list (not the grouped report) to the fixed workbook
/// filename in `export_dir` and returns the written path.
pub fn export_excel(entries: &[Entry], export_dir: &Path) -> Result<PathBuf> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_fmt = Format::new().set_bold().set_border(FormatBorder::Thin);

    for (col, key) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *key, &header_fmt)?;
        worksheet.set_column_width(col as u16, 18)?;
    }

    for (row, cells) in entry_rows(entries).iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            worksheet.write_string((row + 1) as u32, col as u16, value)?;
        }
    }

    let path = export_dir.join(EXCEL_FILENAME);
    workbook.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<Entry> {
        vec![
            Entry {
                client: "Muster, Max".to_string(),
                date: "2024-06-03".to_string(),
                service: "Einkauf".to_string(),
                time_from: "09:00".to_string(),
                time_to: "11:00".to_string(),
                minutes: "120".to_string(),
            },
            Entry {
                client: "Beispiel, Berta".to_string(),
                date: "2024-06-10".to_string(),
                service: "Behördengang".to_string(),
                time_from: String::new(),
                time_to: String::new(),
                minutes: "60".to_string(),
            },
        ]
    }

    #[test]
    fn codec_round_trip_preserves_fields_and_order() {
        let entries = sample_entries();
        let restored = entries_from_rows(&entry_rows(&entries));
        assert_eq!(restored, entries);
    }

    #[test]
    fn rows_follow_the_column_key_order() {
        let rows = entry_rows(&sample_entries());
        assert_eq!(rows[0][0], "Muster, Max");
        assert_eq!(rows[0][1], "2024-06-03");
        assert_eq!(rows[0][3], "09:00");
        assert_eq!(rows[1][5], "60");
    }

    #[test]
    fn export_writes_the_fixed_workbook_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_excel(&sample_entries(), dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), EXCEL_FILENAME);
    }

    #[test]
    fn export_with_no_entries_still_writes_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_excel(&[], dir.path()).unwrap();
        assert!(path.exists());
    }
}
