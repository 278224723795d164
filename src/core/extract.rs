use once_cell::sync::Lazy;
use regex::Regex;

/// Dublin-area location keywords matched as substrings of lowercased content
const LOCATION_KEYWORDS: &[&str] = &[
    "dublin 1", "dublin 2", "dublin 3", "dublin 4", "dublin 5", "dublin 6",
    "dublin 7", "dublin 8", "dublin 9", "dublin 10", "dublin 11", "dublin 12",
    "d1", "d2", "d3", "d4", "d5", "d6", "d7", "d8", "d9",
    "rathmines", "ranelagh", "phibsborough", "drumcondra", "glasnevin",
    "ballsbridge", "sandymount", "clontarf", "howth", "dun laoghaire",
    "tallaght", "blanchardstown", "city centre", "parnell", "smithfield",
    "stoneybatter", "portobello", "harold's cross", "terenure",
];

static BUDGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"€\s*(\d+)(?:\s*[-–to]+\s*€?\s*(\d+))?").unwrap());

static DURATION_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(\d+)\s*months?").unwrap(),
        Regex::new(r"(summer|winter|spring|semester|term)").unwrap(),
        Regex::new(r"(short[- ]term|long[- ]term|temporary)").unwrap(),
        Regex::new(
            r"(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\w*\s*(?:to|[-–])\s*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\w*",
        )
        .unwrap(),
    ]
});

/// A price range extracted from post content, in whole euro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRange {
    pub low: u32,
    pub high: u32,
}

impl BudgetRange {
    pub fn overlaps(&self, other: &BudgetRange) -> bool {
        self.low <= other.high && self.high >= other.low
    }

    /// "€40" for a point amount, "€40-€60" for a range
    pub fn display(&self) -> String {
        if self.low == self.high {
            format!("€{}", self.low)
        } else {
            format!("€{}-€{}", self.low, self.high)
        }
    }
}

/// Extract known location keywords from post content, in list order.
pub fn extract_locations(content: &str) -> Vec<String> {
    let text = content.to_lowercase();
    LOCATION_KEYWORDS
        .iter()
        .filter(|loc| text.contains(**loc))
        .map(|loc| loc.to_string())
        .collect()
}

/// Extract a euro budget or budget range from post content.
pub fn extract_budget(content: &str) -> Option<BudgetRange> {
    let caps = BUDGET_RE.captures(content)?;
    let low: u32 = caps.get(1)?.as_str().parse().ok()?;
    let high = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => low,
    };
    Some(BudgetRange { low, high })
}

/// Extract a time duration mention ("3 months", "summer", "jan to may").
pub fn extract_duration(content: &str) -> Option<String> {
    let text = content.to_lowercase();
    DURATION_RES
        .iter()
        .find_map(|p| p.find(&text).map(|m| m.as_str().to_string()))
}

/// Category tags derived from keyword hits in the content
const TAG_KEYWORDS: &[(&str, &[&str])] = &[
    ("accommodation", &["room", "apartment", "flat", "rent", "sublet", "accommodation"]),
    ("free-stuff", &["free", "giving away", "giveaway"]),
    ("food", &["food", "meal", "curry", "cook", "eat"]),
    ("events", &["event", "party", "meetup", "gathering"]),
    ("study", &["study", "library", "exam", "assignment", "tutor"]),
    ("transport", &["bus", "luas", "dart", "bike", "transport"]),
    ("jobs", &["job", "internship", "work", "hiring", "part-time"]),
];

/// Generate tags from content: up to two locations plus category keywords,
/// deduplicated preserving order.
pub fn auto_tags(content: &str) -> Vec<String> {
    let text = content.to_lowercase();
    let mut tags: Vec<String> = extract_locations(content).into_iter().take(2).collect();

    for (tag, keywords) in TAG_KEYWORDS {
        if keywords.iter().any(|kw| text.contains(kw)) {
            tags.push(tag.to_string());
        }
    }

    dedupe_preserving_order(tags)
}

/// Merge user tags with generated tags, first occurrence wins.
pub fn merge_tags(user_tags: &[String], generated: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = user_tags.to_vec();
    merged.extend(generated);
    dedupe_preserving_order(merged)
}

fn dedupe_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

/// Title-case a comma-joined location list for display ("d8, rathmines" -> "D8, Rathmines")
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
            if !c.is_alphanumeric() && c != '\'' {
                at_word_start = true;
            }
        }
    }
    out
}
