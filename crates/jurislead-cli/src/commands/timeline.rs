//! `juris timeline`: case timelines kept on this device.

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand, ValueEnum};
use jurislead_core::{EventKind, Importance, NewEvent, TimelineStatus};
use jurislead_store::timelines;

use super::App;
use crate::display;

#[derive(Debug, Subcommand)]
pub enum TimelineAction {
    /// List timelines, newest first.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Start a new timeline.
    New {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a timeline's events and Aura's review of them.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Add an event to a timeline.
    Add(AddArgs),
    /// Remove one event.
    Remove { id: String, event: String },
    /// Mark a timeline active, completed, or pending.
    Status {
        id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },
    /// Delete a whole timeline.
    Delete {
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Timeline id.
    pub id: String,
    #[arg(long)]
    pub title: String,
    /// Event date (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,
    #[arg(long = "type", value_enum, default_value_t = KindArg::Incident)]
    pub kind: KindArg,
    #[arg(long, value_enum, default_value_t = ImportanceArg::Medium)]
    pub importance: ImportanceArg,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Incident,
    Document,
    Date,
}

impl From<KindArg> for EventKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::Incident => Self::Incident,
            KindArg::Document => Self::Document,
            KindArg::Date => Self::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportanceArg {
    Low,
    Medium,
    High,
}

impl From<ImportanceArg> for Importance {
    fn from(v: ImportanceArg) -> Self {
        match v {
            ImportanceArg::Low => Self::Low,
            ImportanceArg::Medium => Self::Medium,
            ImportanceArg::High => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Active,
    Completed,
    Pending,
}

impl From<StatusArg> for TimelineStatus {
    fn from(v: StatusArg) -> Self {
        match v {
            StatusArg::Active => Self::Active,
            StatusArg::Completed => Self::Completed,
            StatusArg::Pending => Self::Pending,
        }
    }
}

impl From<AddArgs> for NewEvent {
    fn from(args: AddArgs) -> Self {
        NewEvent {
            kind: args.kind.into(),
            title: args.title,
            description: args.description,
            date: Some(args.date),
            importance: args.importance.into(),
        }
    }
}

pub fn run(app: &App, action: TimelineAction) -> anyhow::Result<()> {
    let storage = &app.storage;
    match action {
        TimelineAction::List { json } => {
            let all = timelines::load_timelines(storage)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                display::print_timelines(&all);
            }
        }
        TimelineAction::New { name, description } => {
            let t = timelines::create_timeline(storage, &name, &description, Utc::now())?;
            println!("Created timeline {} ({}).", t.id, t.name);
        }
        TimelineAction::Show { id, json } => {
            let Some(t) = timelines::find_timeline(storage, &id)? else {
                bail!("no timeline with id {id}");
            };
            let brief = t.brief();
            if json {
                let out = serde_json::json!({ "timeline": t, "analysis": brief });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                display::print_timeline(&t, &brief);
            }
        }
        TimelineAction::Add(args) => {
            let id = args.id.clone();
            let event = timelines::add_event(storage, &id, args.into(), Utc::now())
                .with_context(|| format!("adding event to timeline {id}"))?;
            println!("Added event {} on {}.", event.id, event.date.format("%d/%m/%Y"));
        }
        TimelineAction::Remove { id, event } => {
            if !timelines::remove_event(storage, &id, &event, Utc::now())? {
                bail!("timeline {id} has no event {event}");
            }
            println!("Removed event {event}.");
        }
        TimelineAction::Status { id, status } => {
            let status = TimelineStatus::from(status);
            timelines::set_status(storage, &id, status, Utc::now())?;
            println!("Timeline {id} is now {status}.");
        }
        TimelineAction::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete timeline {id} without --yes");
            }
            if !timelines::delete_timeline(storage, &id)? {
                bail!("no timeline with id {id}");
            }
            println!("Deleted timeline {id}.");
        }
    }
    Ok(())
}
