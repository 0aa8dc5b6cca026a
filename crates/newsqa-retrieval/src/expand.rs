//! Query expansion over a static domain-term table.

/// Domain terms and the related/broader terms appended when they occur in a
/// query. Expansion only ever grows the query string.
const EXPANSIONS: &[(&str, &[&str])] = &[
    ("lng", &["liquefied natural gas", "gas-fueled", "clean fuel"]),
    ("natural gas", &["lng", "gas-fueled"]),
    ("emission", &["exhaust", "greenhouse gas", "carbon"]),
    ("carbon", &["co2", "decarbonization"]),
    ("shore power", &["cold ironing", "berth electrification"]),
    ("spill", &["leak", "oil pollution", "contamination"]),
    ("sulfur", &["sox", "desulfurization", "scrubber"]),
    ("nitrogen", &["nox", "denitrification"]),
    ("ballast", &["ballast water", "invasive species"]),
    ("hydrogen", &["fuel cell", "zero carbon"]),
    ("methanol", &["green methanol", "alternative fuel"]),
    ("electric", &["battery powered", "electrification"]),
    ("green shipping", &["sustainable shipping", "low carbon vessel"]),
    ("wind", &["offshore wind", "renewable energy"]),
    ("port", &["harbor", "terminal"]),
    ("pollution", &["contamination", "environmental damage"]),
];

/// Widens recall by appending related terms for every domain term found as a
/// substring of the lower-cased query. Pure function over static data.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryExpander;

impl QueryExpander {
    pub fn new() -> Self {
        Self
    }

    pub fn expand(&self, query: &str) -> String {
        if query.trim().is_empty() {
            return query.to_string();
        }
        let lower = query.to_lowercase();
        let mut expanded = query.to_string();
        for (key, terms) in EXPANSIONS {
            if lower.contains(key) {
                for term in *terms {
                    expanded.push(' ');
                    expanded.push_str(term);
                }
            }
        }
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_appends_related_terms() {
        let expander = QueryExpander::new();
        let expanded = expander.expand("LNG emission reduction");
        assert!(expanded.starts_with("LNG emission reduction"));
        assert!(expanded.contains("liquefied natural gas"));
        assert!(expanded.contains("greenhouse gas"));
    }

    #[test]
    fn expansion_only_grows() {
        let expander = QueryExpander::new();
        let query = "shore power in shanghai";
        let expanded = expander.expand(query);
        assert!(expanded.len() > query.len());
        assert!(expanded.starts_with(query));
    }

    #[test]
    fn unknown_terms_pass_through_unchanged() {
        let expander = QueryExpander::new();
        assert_eq!(expander.expand("xyz123"), "xyz123");
    }

    #[test]
    fn empty_query_is_returned_unchanged() {
        let expander = QueryExpander::new();
        assert_eq!(expander.expand(""), "");
        assert_eq!(expander.expand("   "), "   ");
    }
}
