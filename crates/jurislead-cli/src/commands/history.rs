//! `juris history`: the activity log.

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand, ValueEnum};
use jurislead_client::{ActivityBucket, HistoryFilter, HistoryQuery, HistorySource, HistoryView};
use jurislead_core::ActivityStatus;

use super::{App, now_millis, write_download};
use crate::display;

const PAGE_SIZE: u32 = 20;

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List recent activity.
    List(ListArgs),
    /// Show the activity types the backend records.
    Types,
    /// Totals, the last week's trend, and the most frequent activities.
    Analytics {
        #[arg(long)]
        json: bool,
    },
    /// Delete server-side history.
    Clear {
        /// Only delete entries older than this many days.
        #[arg(long)]
        days: Option<u32>,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Write history to a JSON file.
    Export {
        #[command(flatten)]
        filters: RemoteFilters,
        /// Defaults to `juris-history-<millis>.json`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove an entry from the local view and the history kept on this device.
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Success,
    Failed,
    Pending,
    Cancelled,
}

impl From<StatusArg> for ActivityStatus {
    fn from(v: StatusArg) -> Self {
        match v {
            StatusArg::Success => Self::Success,
            StatusArg::Failed => Self::Failed,
            StatusArg::Pending => Self::Pending,
            StatusArg::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Args)]
pub struct RemoteFilters {
    /// `all`, `analysis`, `summary`, or an exact activity type.
    #[arg(long = "type", default_value = "all")]
    pub kind: String,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    /// Backend period such as `today`, `week`, or `month`.
    #[arg(long)]
    pub period: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    /// Earliest date (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Latest date (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: RemoteFilters,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = PAGE_SIZE)]
    pub page_size: u32,
    #[arg(long)]
    pub json: bool,
}

impl RemoteFilters {
    /// Query sent to the backend. Grouped buckets are applied client-side.
    pub fn query(&self) -> HistoryQuery {
        let activity_type = match ActivityBucket::parse(&self.kind) {
            ActivityBucket::Type(t) => Some(t),
            _ => None,
        };
        HistoryQuery {
            activity_type,
            status: self.status.map(Into::into),
            period: self.period.clone(),
            search: self.search.clone(),
            date_from: self.from,
            date_to: self.to,
            ..Default::default()
        }
    }

    pub fn filter(&self) -> HistoryFilter {
        HistoryFilter {
            search: self.search.clone(),
            bucket: ActivityBucket::parse(&self.kind),
            status: self.status.map(Into::into),
        }
    }
}

pub async fn run(app: &App, action: HistoryAction) -> anyhow::Result<()> {
    match action {
        HistoryAction::List(args) => list(app, args).await,
        HistoryAction::Types => {
            let types = app.history().activity_types().await?;
            for t in types {
                println!("{:<28} {}", t.value, t.label);
            }
            Ok(())
        }
        HistoryAction::Analytics { json } => {
            let report = app.history().analytics().await.context("loading analytics")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display::print_analytics(&report);
            }
            Ok(())
        }
        HistoryAction::Clear { days, yes } => {
            if !yes {
                bail!("refusing to clear history without --yes");
            }
            let outcome = app.history().clear(days).await?;
            if outcome.message.is_empty() {
                println!("Deleted {} entries.", outcome.deleted_count);
            } else {
                println!("{}", outcome.message);
            }
            Ok(())
        }
        HistoryAction::Export { filters, output } => {
            let records = app.history().export(&filters.query()).await?;
            let json = serde_json::to_string_pretty(&records)?;
            let default_name = format!("juris-history-{}.json", now_millis());
            let path = write_download(output.as_deref(), &default_name, &json)?;
            println!("Exported {} entries to {}", records.len(), path.display());
            Ok(())
        }
        HistoryAction::Delete { id } => delete(app, &id).await,
    }
}

async fn list(app: &App, args: ListArgs) -> anyhow::Result<()> {
    let query = HistoryQuery {
        page: Some(args.page),
        page_size: Some(args.page_size),
        ..args.filters.query()
    };
    let now = Utc::now();
    let page = app
        .history()
        .load_at(&query, now)
        .await
        .context("loading history")?;
    let view = HistoryView::new(page);
    let filter = args.filters.filter();
    let shown: Vec<_> = view.filtered(&filter).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }
    display::print_history(&shown, view.source());
    display::print_history_stats(&view.stats(now));
    Ok(())
}

async fn delete(app: &App, id: &str) -> anyhow::Result<()> {
    let page = app
        .history()
        .load(&HistoryQuery::default())
        .await
        .context("loading history")?;
    let mut view = HistoryView::new(page);
    let gone = view.delete(id, &app.storage)?;
    if !gone.found() {
        bail!("no history entry with id {id}");
    }
    if gone.on_device {
        println!("Removed {id} from the history kept on this device.");
    } else {
        println!("Removed {id} locally.");
    }
    if view.source() == HistorySource::Remote {
        println!("The server copy is unchanged.");
    }
    Ok(())
}
