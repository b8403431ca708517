//! Relevance scoring over the section dataset.

use jurislead_core::{IpcSection, normalize_section};
use serde::Serialize;

use crate::IpcDataset;
use crate::query::QueryIntent;

pub const SECTION_HIT: u32 = 100;
pub const TITLE_HIT: u32 = 50;
pub const KEYWORD_HIT: u32 = 25;
pub const DESCRIPTION_HIT: u32 = 10;

/// A dataset entry that matched a query, with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSection<'a> {
    pub entry: &'a IpcSection,
    pub score: u32,
    /// The entry's section identifier contains the queried number.
    pub section_hit: bool,
}

/// Lowercased searchable fields of one entry.
struct Haystack {
    section: String,
    title: String,
    description: String,
    punishment: String,
    category: String,
    chapter: String,
    keywords: Vec<String>,
    related: Vec<String>,
}

impl Haystack {
    fn new(entry: &IpcSection) -> Self {
        let lower_all =
            |v: &[String]| -> Vec<String> { v.iter().map(|s| s.to_lowercase()).collect() };
        Self {
            section: entry.section.to_lowercase(),
            title: entry.title.to_lowercase(),
            description: entry.description.to_lowercase(),
            punishment: entry.punishment.to_lowercase(),
            category: entry.category.as_deref().map(str::to_lowercase).unwrap_or_default(),
            chapter: entry.chapter.as_deref().map(str::to_lowercase).unwrap_or_default(),
            keywords: lower_all(&entry.keywords),
            related: lower_all(&entry.related_sections),
        }
    }

    fn matches_term(&self, term: &str) -> bool {
        self.title.contains(term)
            || self.description.contains(term)
            || self.category.contains(term)
            || self.chapter.contains(term)
            || self.punishment.contains(term)
            || self.keywords.iter().any(|k| k.contains(term))
            || self.related.iter().any(|r| r.contains(term))
    }

    fn score(&self, terms: &[String], section_hit: bool) -> u32 {
        let mut score = if section_hit { SECTION_HIT } else { 0 };
        for term in terms {
            if self.title.contains(term.as_str()) {
                score += TITLE_HIT;
            }
            if self.keywords.iter().any(|k| k.contains(term.as_str())) {
                score += KEYWORD_HIT;
            }
            if self.description.contains(term.as_str()) {
                score += DESCRIPTION_HIT;
            }
        }
        score
    }
}

/// Filter and rank dataset entries for a code-seeking query.
///
/// An entry matches when its section identifier contains the captured
/// number, or when any query term appears in one of its text fields.
/// Results are ordered by score, then severity (high first), then
/// section number.
pub fn rank_sections<'a>(dataset: &'a IpcDataset, intent: &QueryIntent) -> Vec<RankedSection<'a>> {
    let mut ranked: Vec<RankedSection<'a>> = dataset
        .iter()
        .filter_map(|entry| {
            let hay = Haystack::new(entry);
            let section_hit = intent
                .section
                .as_deref()
                .is_some_and(|n| hay.section.contains(n));
            let term_hit = intent.terms.iter().any(|t| hay.matches_term(t));
            (section_hit || term_hit).then(|| RankedSection {
                entry,
                score: hay.score(&intent.terms, section_hit),
                section_hit,
            })
        })
        .collect();

    ranked.sort_by_cached_key(|r| {
        (
            std::cmp::Reverse(r.score),
            r.entry.severity,
            normalize_section(&r.entry.section),
        )
    });
    ranked
}
