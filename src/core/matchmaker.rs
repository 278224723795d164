use std::collections::HashSet;

use crate::core::extract::{extract_budget, extract_duration, extract_locations, title_case};
use crate::models::{Intent, MatchWeights, Post};

/// Words ignored when counting content overlap
const STOPWORDS: &[&str] = &["the", "a", "an", "in", "for", "to", "of", "and", "or", "i", "is", "my"];

/// A candidate post with its match score
#[derive(Debug)]
pub struct ScoredCandidate<'a> {
    pub post: &'a Post,
    pub score: f64,
}

/// OFFERING↔SEEKING matchmaker
///
/// Scores every post of the opposite intent against a new post and keeps the
/// best one when it clears the threshold. Earlier posts win score ties.
#[derive(Debug, Clone)]
pub struct Matchmaker {
    weights: MatchWeights,
    threshold: f64,
}

impl Matchmaker {
    pub fn new(weights: MatchWeights, threshold: f64) -> Self {
        Self { weights, threshold }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: MatchWeights::default(),
            threshold: 1.5,
        }
    }

    /// Score a pair of posts on location, budget, tag and content overlap.
    pub fn score_pair(&self, post: &Post, candidate: &Post) -> f64 {
        let mut score = 0.0;

        // Location overlap
        let post_locs: HashSet<String> = extract_locations(&post.content).into_iter().collect();
        let cand_locs: HashSet<String> = extract_locations(&candidate.content).into_iter().collect();
        if !post_locs.is_disjoint(&cand_locs) {
            score += self.weights.location;
        }

        // Budget compatibility
        if let (Some(post_budget), Some(cand_budget)) =
            (extract_budget(&post.content), extract_budget(&candidate.content))
        {
            if post_budget.overlaps(&cand_budget) {
                score += self.weights.budget;
            }
        }

        // Tag overlap
        let post_tags: HashSet<String> = post.tags.iter().map(|t| t.to_lowercase()).collect();
        let cand_tags: HashSet<String> = candidate.tags.iter().map(|t| t.to_lowercase()).collect();
        score += post_tags.intersection(&cand_tags).count() as f64 * self.weights.tag;

        // Content keyword overlap, capped at 3 words
        let post_text = post.content.to_lowercase();
        let cand_text = candidate.content.to_lowercase();
        let post_words: HashSet<&str> = post_text.split_whitespace().collect();
        let cand_words: HashSet<&str> = cand_text.split_whitespace().collect();
        let common = post_words
            .intersection(&cand_words)
            .filter(|w| !STOPWORDS.contains(w))
            .count();
        score += common.min(3) as f64 * self.weights.word;

        score
    }

    /// Find the best counterpart for a post among existing posts.
    ///
    /// GENERAL posts never match. Returns None when no candidate clears the
    /// threshold.
    pub fn best_match<'a>(&self, post: &Post, posts: &'a [Post]) -> Option<ScoredCandidate<'a>> {
        let target = post.intent.counterpart()?;

        let mut best: Option<ScoredCandidate<'a>> = None;
        for candidate in posts.iter().filter(|p| p.intent == target && p.id != post.id) {
            let score = self.score_pair(post, candidate);
            if score > best.as_ref().map(|b| b.score).unwrap_or(0.0) {
                best = Some(ScoredCandidate { post: candidate, score });
            }
        }

        best.filter(|b| b.score >= self.threshold)
    }
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Announcement text stored on a matched post.
pub fn announcement(post: &Post, matched: &Post) -> String {
    let snippet: String = matched.content.chars().take(100).collect();
    if post.intent == Intent::Seeking {
        format!(
            "🔍 Found a potential match! @{} posted about: \"{}...\" — Check their post for details!",
            matched.author, snippet
        )
    } else {
        format!(
            "🤝 Someone might need this! @{} is looking for: \"{}...\" — They could be a match!",
            matched.author, snippet
        )
    }
}

/// Body of the matchmaker comment: the announcement plus whatever details
/// could be extracted from the post, and a safety reminder.
pub fn comment_body(content: &str, announcement: &str) -> String {
    let locations = extract_locations(content);
    let budget = extract_budget(content);
    let duration = extract_duration(content);

    let mut details = Vec::new();
    if !locations.is_empty() {
        details.push(format!("📍 Location: {}", title_case(&locations.join(", "))));
    }
    if let Some(budget) = budget {
        details.push(format!("💰 Budget: {}", budget.display()));
    }
    if let Some(duration) = duration {
        details.push(format!("📅 Duration: {}", duration));
    }

    let mut body = announcement.to_string();
    if !details.is_empty() {
        body.push_str("\n\n**Extracted Details:**\n");
        body.push_str(&details.join("\n"));
    }
    body.push_str("\n\n⚠️ Safety Reminder: Always verify in person before transferring any money!");
    body
}
