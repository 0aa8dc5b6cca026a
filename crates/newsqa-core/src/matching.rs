//! Named term-matching policies for category comparison.
//!
//! The default loose policy is heuristic and can produce false positives
//! ("gas" matches "biogas"); it is kept for taxonomy-drift tolerance but
//! isolated here so callers can swap it without changing channel code.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Case-insensitive containment in either direction.
    #[default]
    ContainsEitherWay,
    /// Case-insensitive exact equality.
    Exact,
}

impl MatchPolicy {
    pub fn term_matches(self, a: &str, b: &str) -> bool {
        let a = a.trim().to_lowercase();
        let b = b.trim().to_lowercase();
        if a.is_empty() || b.is_empty() {
            return false;
        }
        match self {
            MatchPolicy::ContainsEitherWay => a.contains(&b) || b.contains(&a),
            MatchPolicy::Exact => a == b,
        }
    }

    /// True if `term` matches any entry of `labels`.
    pub fn matches_any<'a, I>(self, term: &str, labels: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().any(|label| self.term_matches(term, label))
    }
}
