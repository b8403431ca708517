//! Query interpretation: does the user want penal-code sections or topics?

use std::sync::LazyLock;

use regex::Regex;

use crate::topics::IPC_CATEGORY;

/// Section reference patterns, tried in order against the lowercase query.
static SECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bsection\s*(\d+[a-z]{0,2})\b",
        r"\bipc\s*(\d+[a-z]{0,2})\b",
        r"\b(\d+[a-z]{0,2})\s*ipc\b",
        r"^\s*(\d+[a-z]{0,2})\s*$",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Terms that mark a query as being about criminal offences.
pub const CRIME_KEYWORDS: &[&str] = &[
    // violence
    "murder", "kill", "homicide", "assault", "attack", "hurt", "injury", "beat", "stab",
    "shoot", "weapon", "acid", "kidnap", "abduct", "suicide",
    // property
    "theft", "steal", "stolen", "robbery", "burglary", "dacoity", "extortion", "trespass",
    "cheating", "fraud", "forgery", "scam", "embezzle", "breach of trust", "mischief",
    // sexual offences
    "rape", "molest", "sexual", "harass", "stalk", "modesty", "eve teasing",
    // domestic
    "dowry", "cruelty", "domestic violence", "bigamy", "in-laws",
    // public order
    "riot", "unlawful assembly", "obscene", "defamation", "intimidation", "threat",
    "blackmail", "conspiracy",
    // cyber
    "cyber", "hacking", "phishing", "identity theft", "online fraud",
    // legal concepts
    "crime", "criminal", "offence", "offense", "punishment", "bailable", "cognizable",
    "fir", "arrest",
];

/// What a query asks for, derived once before searching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryIntent {
    /// Lowercase section number captured from the query, e.g. `"498a"`.
    pub section: Option<String>,
    /// Lowercase search terms longer than two characters, excluding the
    /// captured section number and the words `ipc` and `section`.
    pub terms: Vec<String>,
    /// Whether the explorer should search penal-code sections.
    pub code_seeking: bool,
}

impl QueryIntent {
    pub fn parse(query: &str, category: &str) -> Self {
        let lower = query.trim().to_lowercase();

        let captures = SECTION_PATTERNS.iter().find_map(|re| re.captures(&lower));
        let section = captures
            .as_ref()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        // Terms come from whatever is left once the section reference is cut out.
        let rest = match captures.as_ref().and_then(|c| c.get(0)) {
            Some(m) => format!("{} {}", &lower[..m.start()], &lower[m.end()..]),
            None => lower.clone(),
        };
        let terms = rest
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| t.chars().count() > 2)
            .filter(|t| *t != "ipc" && *t != "section")
            .map(str::to_string)
            .collect();

        let code_seeking = section.is_some()
            || lower.contains("ipc")
            || category == IPC_CATEGORY
            || contains_crime_keyword(&lower);

        Self {
            section,
            terms,
            code_seeking,
        }
    }
}

fn contains_crime_keyword(lower: &str) -> bool {
    CRIME_KEYWORDS.iter().any(|k| {
        if k.len() <= 3 {
            // Short words like "fir" must not fire inside "first".
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|w| w == *k)
        } else {
            lower.contains(k)
        }
    })
}
