use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;

use crate::model::Session;
use crate::report::{MonthlyReport, ReportRow, month_label};

pub const MD_FILENAME: &str = "Leistungsnachweis.md";
pub const PDF_FILENAME: &str = "Leistungsnachweis.pdf";

/// Renders the grouped weekly report as a Markdown document and converts it
/// to PDF using pandoc if available.
pub struct DocumentGenerator {
    output_dir: PathBuf,
}

impl DocumentGenerator {
    pub fn new(output_dir: &Path) -> Result<Self> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Writes the Markdown file and the PDF under their fixed names and
    /// returns both paths. When pandoc fails or is missing, the Markdown
    /// content is written under the `.pdf` name instead so the fixed
    /// filename always exists.
    pub fn generate(
        &self,
        session: &Session,
        report: &MonthlyReport,
    ) -> Result<(PathBuf, PathBuf)> {
        let markdown = render_markdown(session, report);

        let md_path = self.output_dir.join(MD_FILENAME);
        let pdf_path = self.output_dir.join(PDF_FILENAME);

        let mut file = File::create(&md_path)?;
        file.write_all(markdown.as_bytes())?;

        let pdf_result = Command::new("pandoc")
            .arg(&md_path)
            .arg("-o")
            .arg(&pdf_path)
            .arg("-V")
            .arg("papersize=a4")
            .output();

        match pdf_result {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                warn!(
                    "pandoc failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                );
                self.create_markdown_copy(&md_path, &pdf_path)?;
            }
            Err(e) => {
                warn!("could not run pandoc: {e}");
                self.create_markdown_copy(&md_path, &pdf_path)?;
            }
        }

        Ok((md_path, pdf_path))
    }

    fn create_markdown_copy(&self, md_path: &Path, pdf_path: &Path) -> Result<()> {
        let content = fs::read_to_string(md_path)?;
        let mut file = File::create(pdf_path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn render_markdown(session: &Session, report: &MonthlyReport) -> String {
    let mut content = String::new();

    content.push_str("<div style=\"font-family: Arial; font-size: 8pt;\">\n\n");
    content.push_str("**Anlage 2 - Leistungsnachweis**\n\n");
    content.push_str("Betreuungsnachweis für ambulant betreutes Wohnen\n\n");

    match session.selected_client() {
        Some(client) => {
            content.push_str("**Leistungserbringer:**\n\n");
            content.push_str(&format!(
                "**Name, Vorname:** {} &nbsp;&nbsp;&nbsp; **geb. am:** {}\n\n",
                client.name, client.birthdate
            ));
            content.push_str(&format!("**wohnhaft in:** {}\n\n", client.address));
            content.push_str(&format!(
                "**Monat:** {} &nbsp;&nbsp;&nbsp; **Betr.Std./Wo.:** {}\n\n",
                month_label(session.report_month()),
                client.weekly_hours
            ));
        }
        None => content.push_str("Leistungserbringer: Keine Daten\n\n"),
    }

    content.push_str("<table style=\"width: 100%; border-collapse: collapse;\" border=\"1\">\n");
    content.push_str("<thead>\n");
    content.push_str(
        "<tr><th>WT</th><th>Datum</th><th>Betreuungsinhalt</th><th>Std./Min</th><th>Unterschrift</th></tr>\n",
    );
    content.push_str("</thead>\n<tbody>\n");

    for row in &report.rows {
        match row {
            ReportRow::Day {
                weekday,
                date,
                service,
                minutes,
            } => {
                content.push_str(&format!(
                    "<tr><td>{weekday}</td><td>{date}</td><td>{service}</td><td>{minutes}</td><td></td></tr>\n"
                ));
            }
            ReportRow::WeekTotal { hours } => {
                content.push_str(&format!(
                    "<tr><td colspan=\"3\"><strong>Wochenstunden gesamt</strong></td><td><strong>{hours}</strong></td><td></td></tr>\n"
                ));
            }
            ReportRow::GrandTotal { hours } => {
                content.push_str(&format!(
                    "<tr><td colspan=\"3\"><strong>Gesamtstunden</strong></td><td><strong>{hours}</strong></td><td></td></tr>\n"
                ));
            }
        }
    }

    content.push_str("</tbody>\n</table>\n\n");
    content.push_str("Unterschrift des Betreuten:\n\n");
    content.push_str("Unterschrift des Mitarbeiters:\n\n");
    content.push_str("</div>\n");

    content
}
