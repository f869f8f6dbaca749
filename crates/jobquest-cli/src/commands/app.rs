use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use jobquest_core::application::{parse_import, read_import, sort_for_listing};
use jobquest_core::{
    ApplicationPatch, ApplicationRecord, ApplicationStatus, NewApplication, StatusFilter, Tracker,
};

use super::{open, report, CmdResult};

#[derive(Subcommand)]
pub enum AppAction {
    /// Record a new application
    Add {
        /// Company name
        company: String,
        /// Position applied for
        position: String,
        /// Status (applied, interview, offered, rejected, accepted)
        #[arg(long)]
        status: Option<ApplicationStatus>,
        /// Date applied (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Contact person
        #[arg(long)]
        contact: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List applications, newest first
    List {
        /// Filter by status, or "all"
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one application as JSON
    Show {
        /// Application ID
        id: String,
    },
    /// Update fields of an application
    Update {
        /// Application ID
        id: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        status: Option<ApplicationStatus>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an application (points are kept)
    Delete {
        /// Application ID
        id: String,
    },
    /// Import applications from a JSON array file ("-" for stdin)
    Import {
        file: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AppAction, today: NaiveDate) -> CmdResult {
    let (config, db) = open()?;
    let tracker = Tracker::new(&db, config.engine());

    match action {
        AppAction::Add {
            company,
            position,
            status,
            date,
            contact,
            notes,
            json,
        } => {
            let new = NewApplication {
                company,
                position,
                date_applied: date,
                contact_person: contact,
                status,
                notes,
            };
            let outcome = tracker.create_application(new, today)?;
            if !json {
                if let Some(app) = outcome.applications.first() {
                    println!("Created: {}", app.id);
                }
            }
            report(&config, &outcome, json)?;
        }
        AppAction::List { status, json } => {
            let mut apps: Vec<ApplicationRecord> = tracker
                .applications()?
                .into_iter()
                .filter(|a| status.matches(a))
                .collect();
            sort_for_listing(&mut apps);
            if json {
                println!("{}", serde_json::to_string_pretty(&apps)?);
            } else if apps.is_empty() {
                println!("No applications.");
            } else {
                for app in &apps {
                    println!(
                        "{}  {}  {:<10}  {} @ {}",
                        app.id,
                        app.date_applied,
                        app.status.label(),
                        app.position,
                        app.company
                    );
                }
            }
        }
        AppAction::Show { id } => {
            let app = tracker.application(&id)?;
            println!("{}", serde_json::to_string_pretty(&app)?);
        }
        AppAction::Update {
            id,
            company,
            position,
            status,
            date,
            contact,
            notes,
            json,
        } => {
            let patch = ApplicationPatch {
                company,
                position,
                date_applied: date,
                contact_person: contact,
                status,
                notes,
            };
            let outcome = tracker.update_application(&id, &patch, today)?;
            report(&config, &outcome, json)?;
        }
        AppAction::Delete { id } => {
            tracker.delete_application(&id)?;
            println!("Deleted: {id}");
        }
        AppAction::Import { file, json } => {
            let rows = if file.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                parse_import(&buf)?
            } else {
                read_import(&file)?
            };
            let outcome = tracker.import_applications(rows, today)?;
            if !json {
                println!("Imported: {}", outcome.applications.len());
            }
            report(&config, &outcome, json)?;
        }
    }
    Ok(())
}
