//! General legal topics shown when a query is not about penal-code sections.

use serde::Serialize;

/// Category filter that shows every topic.
pub const ALL_CATEGORY: &str = "All";
/// Category filter that switches the explorer to penal-code sections.
pub const IPC_CATEGORY: &str = "IPC Sections";

/// Category filters in display order.
pub const CATEGORIES: &[&str] = &[
    ALL_CATEGORY,
    "Core Law",
    "Commercial Law",
    "Property",
    "Personal Law",
    "Labor Law",
    "Consumer Law",
    IPC_CATEGORY,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalTopic {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub tags: &'static [&'static str],
    pub difficulty: &'static str,
    pub read_time: &'static str,
}

pub const LEGAL_TOPICS: &[LegalTopic] = &[
    LegalTopic {
        id: 1,
        title: "Criminal Law",
        description: "Understanding criminal offenses, procedures, and penalties under Indian law",
        category: "Core Law",
        tags: &["IPC", "CrPC", "Evidence Act"],
        difficulty: "Intermediate",
        read_time: "15 min",
    },
    LegalTopic {
        id: 2,
        title: "Contract Law",
        description: "Formation, performance, and breach of contracts in commercial transactions",
        category: "Commercial Law",
        tags: &["Indian Contract Act", "Commercial", "Business"],
        difficulty: "Beginner",
        read_time: "12 min",
    },
    LegalTopic {
        id: 3,
        title: "Property Law",
        description: "Real estate transactions, property rights, and land acquisition laws",
        category: "Property",
        tags: &["Real Estate", "Land Rights", "Registration"],
        difficulty: "Advanced",
        read_time: "20 min",
    },
    LegalTopic {
        id: 4,
        title: "Family Law",
        description: "Marriage, divorce, custody, and inheritance matters under personal laws",
        category: "Personal Law",
        tags: &["Marriage", "Divorce", "Custody", "Inheritance"],
        difficulty: "Intermediate",
        read_time: "18 min",
    },
    LegalTopic {
        id: 5,
        title: "Employment Law",
        description: "Labor rights, workplace disputes, and employment regulations",
        category: "Labor Law",
        tags: &["Labor Rights", "Employment", "Workplace"],
        difficulty: "Intermediate",
        read_time: "14 min",
    },
    LegalTopic {
        id: 6,
        title: "Consumer Protection",
        description: "Consumer rights, product liability, and service deficiency remedies",
        category: "Consumer Law",
        tags: &["Consumer Rights", "Product Liability", "Services"],
        difficulty: "Beginner",
        read_time: "10 min",
    },
];

impl LegalTopic {
    fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Topics in `category` (every topic for `All`) matching the query.
///
/// A topic matches when the whole lowercase query, or any of `terms`,
/// appears in its title, description, or tags. An empty query keeps every
/// topic in the category.
pub fn filter_topics<'a>(query: &str, terms: &[String], category: &str) -> Vec<&'a LegalTopic> {
    let query = query.trim().to_lowercase();
    LEGAL_TOPICS
        .iter()
        .filter(|t| category == ALL_CATEGORY || t.category == category)
        .filter(|t| {
            query.is_empty() || t.mentions(&query) || terms.iter().any(|term| t.mentions(term))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(topics: &[&LegalTopic]) -> Vec<&'static str> {
        topics.iter().map(|t| t.title).collect()
    }

    #[test]
    fn empty_query_lists_category() {
        assert_eq!(filter_topics("", &[], ALL_CATEGORY).len(), LEGAL_TOPICS.len());
        assert_eq!(
            titles(&filter_topics("", &[], "Personal Law")),
            vec!["Family Law"]
        );
    }

    #[test]
    fn matches_tags_case_insensitively() {
        let found = filter_topics("divorce", &["divorce".into()], ALL_CATEGORY);
        assert_eq!(titles(&found), vec!["Family Law"]);
    }

    #[test]
    fn any_term_matches() {
        let terms = vec!["landlord".to_string(), "contract".to_string()];
        let found = filter_topics("landlord contract", &terms, ALL_CATEGORY);
        assert_eq!(titles(&found), vec!["Contract Law"]);
    }

    #[test]
    fn category_narrows_results() {
        let terms = vec!["rights".to_string()];
        let found = filter_topics("rights", &terms, "Consumer Law");
        assert_eq!(titles(&found), vec!["Consumer Protection"]);
    }
}
