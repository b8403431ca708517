//! IPC reference search.
//!
//! A query either asks for penal-code sections ("Section 302", "fraud",
//! anything under the `IPC Sections` category) or for general legal topics.
//! [`search`] decides which and returns one or the other, never both.

mod dataset;
mod error;
pub mod query;
pub mod rank;
pub mod topics;

pub use dataset::IpcDataset;
pub use error::SearchError;
pub use query::{CRIME_KEYWORDS, QueryIntent};
pub use rank::{RankedSection, rank_sections};
pub use topics::{ALL_CATEGORY, CATEGORIES, IPC_CATEGORY, LEGAL_TOPICS, LegalTopic, filter_topics};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults<'a> {
    Sections(Vec<RankedSection<'a>>),
    Topics(Vec<&'static LegalTopic>),
}

impl SearchResults<'_> {
    /// Whether the explorer is showing penal-code sections rather than topics.
    pub fn shows_ipc_results(&self) -> bool {
        matches!(self, Self::Sections(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Sections(s) => s.len(),
            Self::Topics(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run an explorer search over the dataset and the topic list.
///
/// An empty query under `IPC Sections` lists the whole dataset in section
/// order, every entry scored zero.
pub fn search<'a>(dataset: &'a IpcDataset, query: &str, category: &str) -> SearchResults<'a> {
    let intent = QueryIntent::parse(query, category);
    debug!(
        query,
        category,
        section = ?intent.section,
        terms = intent.terms.len(),
        code_seeking = intent.code_seeking,
        "explorer search"
    );

    if !intent.code_seeking {
        return SearchResults::Topics(filter_topics(query, &intent.terms, category));
    }

    if query.trim().is_empty() {
        let all = dataset
            .sorted()
            .into_iter()
            .map(|entry| RankedSection {
                entry,
                score: 0,
                section_hit: false,
            })
            .collect();
        return SearchResults::Sections(all);
    }

    SearchResults::Sections(rank_sections(dataset, &intent))
}
