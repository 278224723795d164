use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Intent;

/// Phrase cues signalling an OFFERING post
static OFFERING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\b(giving away|for free|free\b|selling|subletting|leaving|offering|available)")
            .unwrap(),
        Regex::new(r"\b(take over|handover|starter kit|moving out|graduating)\b").unwrap(),
    ]
});

/// Phrase cues signalling a SEEKING post
static SEEKING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\b(looking for|need|seeking|wanted|anyone know|searching)\b").unwrap(),
        Regex::new(r"\b(where can i|help me find|recommendation)\b").unwrap(),
    ]
});

/// Classify a post's intent from its content.
///
/// Each pattern list contributes one point per matching pattern; the higher
/// side wins and a tie (including no cues at all) stays GENERAL.
pub fn detect_intent(content: &str) -> Intent {
    let text = content.to_lowercase();
    let offer_score = OFFERING_PATTERNS.iter().filter(|p| p.is_match(&text)).count();
    let seek_score = SEEKING_PATTERNS.iter().filter(|p| p.is_match(&text)).count();

    if offer_score > seek_score {
        Intent::Offering
    } else if seek_score > offer_score {
        Intent::Seeking
    } else {
        Intent::General
    }
}

/// Conversation topic for the advice assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Irp,
    Grocery,
    Fx,
    Budget,
    Streak,
    Transport,
    Accommodation,
    Community,
    Perks,
    Squad,
    Market,
    General,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Irp => "irp",
            Topic::Grocery => "grocery",
            Topic::Fx => "fx",
            Topic::Budget => "budget",
            Topic::Streak => "streak",
            Topic::Transport => "transport",
            Topic::Accommodation => "accommodation",
            Topic::Community => "community",
            Topic::Perks => "perks",
            Topic::Squad => "squad",
            Topic::Market => "market",
            Topic::General => "general",
        }
    }

    /// Title-cased label for source attributions
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

/// Ordered keyword table; the first topic with any keyword hit wins.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Irp, &["irp", "residence permit", "visa", "immigration", "stamp 2"]),
    (
        Topic::Grocery,
        &["grocery", "groceries", "food price", "cheapest", "lidl", "tesco", "aldi", "milk", "bread", "rice", "eggs"],
    ),
    (Topic::Fx, &["transfer", "fx", "exchange", "rate", "inr", "rupee", "wise", "remitly"]),
    (Topic::Budget, &["budget", "spend", "runway", "broke", "money left", "balance", "save"]),
    (Topic::Streak, &["streak", "mission", "reward", "coupon"]),
    (Topic::Transport, &["transport", "bus", "luas", "dart", "bike", "airport", "taxi", "leap card"]),
    (Topic::Accommodation, &["accommodation", "room", "apartment", "rent", "housing", "digs"]),
    (Topic::Community, &["community", "post", "connect", "people", "friends"]),
    (Topic::Perks, &["perk", "discount", "offer", "coupon", "student deal", "unidays"]),
    (Topic::Squad, &["squad", "split", "owe", "pay back", "roommate"]),
    (Topic::Market, &["market", "secondhand", "buy", "sell", "starter kit", "barter"]),
];

/// Classify a chat message to a topic, reporting the keywords that hit.
pub fn classify_topic(message: &str) -> (Topic, Vec<String>) {
    let msg = message.to_lowercase();

    for (topic, keywords) in TOPIC_KEYWORDS {
        let matched: Vec<String> = keywords
            .iter()
            .filter(|kw| msg.contains(**kw))
            .map(|kw| kw.to_string())
            .collect();
        if !matched.is_empty() {
            return (*topic, matched);
        }
    }

    (Topic::General, vec![])
}
