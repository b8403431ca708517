//! `juris explore` and `juris section`: the offline penal-code reference.

use anyhow::{Context, bail};
use clap::Args;
use jurislead_search::{CATEGORIES, IpcDataset, SearchResults, search};

use crate::display;

#[derive(Debug, Args)]
pub struct ExploreArgs {
    /// Search words, e.g. `section 302` or `dowry death`.
    pub query: Vec<String>,
    /// Topic category, or `IPC Sections` to list penal-code sections.
    #[arg(short, long, default_value = "All")]
    pub category: String,
    #[arg(long)]
    pub json: bool,
}

fn dataset() -> anyhow::Result<IpcDataset> {
    IpcDataset::bundled().context("loading bundled IPC dataset")
}

pub fn run(args: ExploreArgs) -> anyhow::Result<()> {
    if !CATEGORIES.contains(&args.category.as_str()) {
        bail!(
            "unknown category {:?}; expected one of: {}",
            args.category,
            CATEGORIES.join(", ")
        );
    }
    let dataset = dataset()?;
    let query = args.query.join(" ");
    let results = search(&dataset, &query, &args.category);

    if args.json {
        let json = match &results {
            SearchResults::Sections(s) => serde_json::to_string_pretty(s)?,
            SearchResults::Topics(t) => serde_json::to_string_pretty(t)?,
        };
        println!("{json}");
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for {query:?}.");
        return Ok(());
    }
    match &results {
        SearchResults::Sections(sections) => {
            println!("IPC sections ({}):", sections.len());
            display::print_ranked(sections);
        }
        SearchResults::Topics(topics) => {
            println!("Legal topics ({}):", topics.len());
            display::print_topics(topics);
        }
    }
    Ok(())
}

pub fn section(id: &str) -> anyhow::Result<()> {
    let dataset = dataset()?;
    let Some(entry) = dataset.get(id) else {
        bail!("IPC section {id} is not in the reference");
    };
    let related = dataset.related(&entry.section);
    display::print_section_card(entry, &related);
    Ok(())
}
