mod excel;
mod model;
mod pdf;
mod report;
mod view;

use chrono::Local;
use clap::Parser;
use dotenv::dotenv;
use inquire::{Password, Select, Text};
use std::env;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{Level, info, warn};

use model::{Client, Entry, Session, autofill_minutes};

// --- CLI Structure ---
#[derive(Parser)]
#[command(name = "Leistungsnachweis")]
#[command(about = "Leistungen erfassen und als Monatsnachweis exportieren", long_about = None)]
struct Cli {
    /// Zielverzeichnis für die Exportdateien (überschreibt EXPORT_DIR)
    #[arg(long)]
    export_dir: Option<String>,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok(); // Reads the .env file

    tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::WARN),
        )
        .init();

    let cli = Cli::parse();
    let export_dir = cli
        .export_dir
        .or_else(|| env::var("EXPORT_DIR").ok())
        .unwrap_or_else(|| ".".to_string());

    login();

    let mut session = Session::new();

    loop {
        let options = vec![
            "Klient:in anlegen",
            "Klient:in auswählen",
            "Leistung erfassen",
            "Einträge anzeigen",
            "Auswertung anzeigen",
            "Drucken",
            "Exportieren als Excel",
            "Exportieren als PDF",
            "Beenden",
        ];
        let choice = Select::new("Aktion:", options).prompt();

        match choice {
            Ok("Klient:in anlegen") => handle_new_client(&mut session),
            Ok("Klient:in auswählen") => handle_select_client(&mut session),
            Ok("Leistung erfassen") => handle_new_entry(&mut session),
            Ok("Einträge anzeigen") => handle_entries(&session),
            Ok("Auswertung anzeigen") => handle_report(&session),
            Ok("Drucken") => handle_print(&session),
            Ok("Exportieren als Excel") => {
                match excel::export_excel(&session.entries, Path::new(&export_dir)) {
                    Ok(path) => {
                        info!(path = %path.display(), "excel export written");
                        println!("Datei erfolgreich erstellt: {}", path.display());
                    }
                    Err(e) => println!("Warnung: Excel-Export fehlgeschlagen: {}", e),
                }
            }
            Ok("Exportieren als PDF") => {
                let monthly = report::build_report(session.report_month(), &session.entries);
                let result = pdf::DocumentGenerator::new(Path::new(&export_dir))
                    .and_then(|g| g.generate(&session, &monthly));
                match result {
                    Ok((md_path, pdf_path)) => {
                        info!(path = %pdf_path.display(), "pdf export written");
                        println!(
                            "Dateien erfolgreich erstellt: {} und {}",
                            md_path.display(),
                            pdf_path.display()
                        );
                    }
                    Err(e) => println!("Warnung: PDF-Export fehlgeschlagen: {}", e),
                }
            }
            _ => break,
        }
    }

    info!(
        clients = session.clients.len(),
        entries = session.entries.len(),
        "session finished"
    );
    Ok(())
}

// --- Anmeldung ---
// Any non-empty username/password pair is accepted; nothing is verified or
// stored. A stand-in gate, not a security boundary.
fn login() {
    println!("\n--- Anmeldung ---");
    loop {
        let username = Text::new("Benutzername:").prompt().unwrap_or_default();
        let password = Password::new("Passwort:")
            .without_confirmation()
            .prompt()
            .unwrap_or_default();

        if !username.is_empty() && !password.is_empty() {
            info!(user = %username, "login accepted");
            println!("Willkommen, {}!", username);
            break;
        }
        println!("Bitte Benutzername und Passwort eingeben.");
    }
}

// --- Klient:in anlegen ---
fn handle_new_client(session: &mut Session) {
    println!("\n--- Klient:in anlegen ---");
    let name = Text::new("Name:").prompt().unwrap_or_default();
    let birthdate = Text::new("Geburtsdatum:").prompt().unwrap_or_default();
    let address = Text::new("Adresse:").prompt().unwrap_or_default();

    let provider_default = env::var("LEISTUNGSANBIETER").unwrap_or_default();
    let provider = Text::new("Träger:")
        .with_default(&provider_default)
        .prompt()
        .unwrap_or_else(|_| provider_default.clone());

    let weekly_hours = Text::new("Betr.Std./Wo.:").prompt().unwrap_or_default();

    session.add_client(Client {
        name,
        birthdate,
        address,
        provider,
        weekly_hours,
    });
    println!("Klient:in gespeichert.");
}

// --- Klient:in auswählen ---
fn handle_select_client(session: &mut Session) {
    if session.clients.is_empty() {
        println!("Keine Klient:innen erfasst.");
        return;
    }
    if let Ok(client) = Select::new("Klient:in:", session.clients.clone()).prompt() {
        session.select_client(client.name);
    }
}

// --- Leistung erfassen ---
fn handle_new_entry(session: &mut Session) {
    println!("\n--- Leistung erfassen ---");

    let client = if session.clients.is_empty() {
        Text::new("Klient:in:").prompt().unwrap_or_default()
    } else {
        match Select::new("Klient:in:", session.clients.clone()).prompt() {
            Ok(c) => c.name,
            Err(_) => return,
        }
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    let date = Text::new("Datum (YYYY-MM-DD):")
        .with_default(&today)
        .prompt()
        .unwrap_or_else(|_| today.clone());

    let service = Text::new("Leistung:").prompt().unwrap_or_default();
    let time_from = Text::new("Von (HH:MM):").prompt().unwrap_or_default();
    let time_to = Text::new("Bis (HH:MM):").prompt().unwrap_or_default();

    // Positive Von/Bis spans pre-fill the minutes prompt, still editable.
    let minutes = match autofill_minutes(&time_from, &time_to) {
        Some(auto) => Text::new("Minuten:")
            .with_default(&auto)
            .prompt()
            .unwrap_or_else(|_| auto.clone()),
        None => Text::new("Minuten:").prompt().unwrap_or_default(),
    };

    session.add_entry(Entry {
        client,
        date,
        service,
        time_from,
        time_to,
        minutes,
    });
    println!("Eintrag gespeichert.");
}

// --- Einträge anzeigen ---
fn handle_entries(session: &Session) {
    if session.entries.is_empty() {
        println!("Keine Einträge erfasst.");
        return;
    }
    println!("\n--- Einträge ---");
    view::entries_table(&session.entries).printstd();
}

// --- Auswertung anzeigen ---
fn handle_report(session: &Session) {
    println!("\n--- Auswertung ---");
    let monthly = report::build_report(session.report_month(), &session.entries);
    print!("{}", view::header_block(session));
    view::report_table(&monthly).printstd();
}

// --- Drucken ---
fn handle_print(session: &Session) {
    let monthly = report::build_report(session.report_month(), &session.entries);
    let rendered = view::print_view(session, &monthly);

    match spool(&rendered) {
        Ok(()) => println!("Druckauftrag übergeben."),
        Err(e) => {
            warn!("print spooler unavailable: {e}");
            println!("Kein Drucksystem erreichbar, Ausgabe erfolgt auf der Konsole:\n");
            println!("{rendered}");
        }
    }
}

// Hands the rendered report to the host print system, fixed A4 paper.
fn spool(content: &str) -> anyhow::Result<()> {
    let mut child = Command::new("lp")
        .arg("-o")
        .arg("media=A4")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()?;

    // Take and drop stdin so lp sees EOF before we wait.
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(content.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        anyhow::bail!("lp exited with {status}");
    }
    Ok(())
}
