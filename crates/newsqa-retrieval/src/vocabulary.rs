//! Fixed category vocabulary and synonym routing.

use newsqa_core::types::CategoryAxis;

const THEME_TERMS: &[&str] = &[
    "green shipping",
    "emission reduction",
    "clean energy",
    "lng",
    "shore power",
    "electric vessel",
    "hydrogen fuel",
    "methanol fuel",
    "carbon trading",
    "energy efficiency",
    "wind propulsion",
    "ship recycling",
];

const POLLUTION_TERMS: &[&str] = &[
    "air pollution",
    "carbon dioxide",
    "sulfur oxide",
    "nitrogen oxide",
    "particulate matter",
    "oil spill",
    "sewage discharge",
    "ballast water",
    "greenhouse gas",
    "noise pollution",
];

const LOCATION_TERMS: &[&str] = &[
    "shanghai",
    "ningbo",
    "zhoushan",
    "shenzhen",
    "guangzhou",
    "qingdao",
    "tianjin",
    "hong kong",
    "hainan",
    "yangtze river",
    "pearl river",
    "bohai bay",
];

const TIME_TERMS: &[&str] = &[
    "2020", "2021", "2022", "2023", "2024", "2025", "recent", "latest", "this year", "last year",
];

/// Synonyms routed into a specific axis as a canonical vocabulary term:
/// pollution-related synonyms land on the pollution axis, technology and
/// fuel synonyms on the theme axis.
const SYNONYM_ROUTES: &[(&str, CategoryAxis, &str)] = &[
    ("smog", CategoryAxis::Pollution, "air pollution"),
    ("haze", CategoryAxis::Pollution, "air pollution"),
    ("exhaust", CategoryAxis::Pollution, "air pollution"),
    ("co2", CategoryAxis::Pollution, "carbon dioxide"),
    ("sox", CategoryAxis::Pollution, "sulfur oxide"),
    ("nox", CategoryAxis::Pollution, "nitrogen oxide"),
    ("leak", CategoryAxis::Pollution, "oil spill"),
    ("natural gas", CategoryAxis::Theme, "lng"),
    ("cold ironing", CategoryAxis::Theme, "shore power"),
    ("battery", CategoryAxis::Theme, "electric vessel"),
    ("fuel cell", CategoryAxis::Theme, "hydrogen fuel"),
    ("decarbonization", CategoryAxis::Theme, "emission reduction"),
    ("renewable", CategoryAxis::Theme, "clean energy"),
];

/// The fixed vocabulary the category channel extracts against.
#[derive(Debug, Clone)]
pub struct CategoryVocabulary {
    theme: Vec<String>,
    pollution: Vec<String>,
    location: Vec<String>,
    time: Vec<String>,
    synonyms: Vec<(String, CategoryAxis, String)>,
}

impl CategoryVocabulary {
    pub fn new(
        theme: Vec<String>,
        pollution: Vec<String>,
        location: Vec<String>,
        time: Vec<String>,
        synonyms: Vec<(String, CategoryAxis, String)>,
    ) -> Self {
        Self {
            theme,
            pollution,
            location,
            time,
            synonyms,
        }
    }

    pub fn terms(&self, axis: CategoryAxis) -> &[String] {
        match axis {
            CategoryAxis::Theme => &self.theme,
            CategoryAxis::Pollution => &self.pollution,
            CategoryAxis::Location => &self.location,
            CategoryAxis::Time => &self.time,
        }
    }

    pub fn synonyms(&self) -> impl Iterator<Item = (&str, CategoryAxis, &str)> {
        self.synonyms
            .iter()
            .map(|(term, axis, canonical)| (term.as_str(), *axis, canonical.as_str()))
    }
}

impl Default for CategoryVocabulary {
    fn default() -> Self {
        let owned = |terms: &[&str]| terms.iter().map(|t| (*t).to_string()).collect();
        Self {
            theme: owned(THEME_TERMS),
            pollution: owned(POLLUTION_TERMS),
            location: owned(LOCATION_TERMS),
            time: owned(TIME_TERMS),
            synonyms: SYNONYM_ROUTES
                .iter()
                .map(|(term, axis, canonical)| ((*term).to_string(), *axis, (*canonical).to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_covers_all_axes() {
        let vocab = CategoryVocabulary::default();
        for axis in CategoryAxis::ALL {
            assert!(!vocab.terms(axis).is_empty());
        }
    }

    #[test]
    fn synonyms_route_to_their_axis() {
        let vocab = CategoryVocabulary::default();
        let (_, axis, canonical) = vocab
            .synonyms()
            .find(|(term, _, _)| *term == "co2")
            .expect("co2 route");
        assert_eq!(axis, CategoryAxis::Pollution);
        assert_eq!(canonical, "carbon dioxide");
    }
}
