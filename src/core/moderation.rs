use serde::{Deserialize, Serialize};

/// Any category scoring above this is treated as disallowed content.
const FLAG_THRESHOLD: f64 = 0.01;

/// How many of the highest-scoring categories to surface to the user.
const REPORTED_CATEGORIES: usize = 5;

/// One category score as returned by the external moderation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Allowed,
    /// The prompt matched disallowed categories; the listed categories are
    /// the highest-scoring ones, in descending order.
    Flagged { categories: Vec<String> },
}

impl Verdict {
    pub fn is_flagged(&self) -> bool {
        matches!(self, Self::Flagged { .. })
    }
}

/// Decide whether a prompt may be forwarded, given the moderation scores
/// already obtained from the external service. The HTTP call itself is the
/// caller's problem; this is only the decision rule.
pub fn evaluate(scores: &[CategoryScore]) -> Verdict {
    let mut ranked: Vec<&CategoryScore> = scores.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    match ranked.first() {
        Some(top) if top.score > FLAG_THRESHOLD => Verdict::Flagged {
            categories: ranked
                .iter()
                .take(REPORTED_CATEGORIES)
                .map(|s| s.category.clone())
                .collect(),
        },
        _ => Verdict::Allowed,
    }
}
