use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Curated category relations used for partial-credit category matches
const DEFAULT_RELATIONS: &[(&str, &[&str])] = &[
    // Food & drink
    ("Café", &["Restaurant", "Bar"]),
    ("Restaurant", &["Café", "Bar"]),
    ("Bar", &["Café", "Restaurant"]),
    // Accommodation
    ("Hotel", &["Motel", "AirBnb"]),
    ("Motel", &["Hotel", "AirBnb"]),
    ("AirBnb", &["Hotel", "Motel"]),
    // Outdoor recreation
    ("Park", &["Dog Park", "Beach", "Walk", "Trail"]),
    ("Dog Park", &["Park", "Beach", "Walk"]),
    ("Beach", &["Park", "Dog Park", "Lake", "River"]),
    ("Lake", &["Beach", "River", "Park"]),
    ("River", &["Lake", "Beach", "Park"]),
    // Walking and hiking
    ("Walk", &["Hike", "Trail", "Park", "Dog Park"]),
    ("Hike", &["Walk", "Trail", "Park"]),
    ("Trail", &["Walk", "Hike", "Park"]),
    // Services
    ("Store", &["Service"]),
    ("Service", &["Store"]),
    ("Activity", &[]),
];

/// Mapping from a category tag to the tags considered related to it.
///
/// The relation is directional: `is_related(a, b)` only consults the entry
/// for `a`. Tags without an entry have no related tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRelations {
    relations: HashMap<String, HashSet<String>>,
}

impl CategoryRelations {
    pub fn empty() -> Self {
        Self {
            relations: HashMap::new(),
        }
    }

    pub fn from_map(map: HashMap<String, Vec<String>>) -> Self {
        Self {
            relations: map
                .into_iter()
                .map(|(tag, related)| (tag, related.into_iter().collect()))
                .collect(),
        }
    }

    /// Replace the entries named in `overrides` and add new ones, keeping
    /// every other entry
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        for (tag, related) in overrides {
            self.relations.insert(tag, related.into_iter().collect());
        }
        self
    }

    pub fn related(&self, tag: &str) -> Option<&HashSet<String>> {
        self.relations.get(tag)
    }

    #[inline]
    pub fn is_related(&self, tag: &str, other: &str) -> bool {
        self.relations
            .get(tag)
            .map_or(false, |related| related.contains(other))
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl Default for CategoryRelations {
    fn default() -> Self {
        Self {
            relations: DEFAULT_RELATIONS
                .iter()
                .map(|(tag, related)| {
                    (
                        tag.to_string(),
                        related.iter().map(|r| r.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let relations = CategoryRelations::default();

        assert_eq!(relations.len(), 17);
        assert!(relations.is_related("Café", "Bar"));
        assert!(relations.is_related("Bar", "Café"));
        assert!(relations.is_related("Walk", "Dog Park"));
        assert!(!relations.is_related("Dog Park", "Trail"));
        assert!(relations.related("Activity").map_or(false, |r| r.is_empty()));
        assert!(relations.related("Museum").is_none());
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let mut overrides = HashMap::new();
        overrides.insert("Café".to_string(), vec!["Bakery".to_string()]);
        overrides.insert("Bakery".to_string(), vec!["Café".to_string()]);

        let relations = CategoryRelations::default().with_overrides(overrides);

        assert!(relations.is_related("Café", "Bakery"));
        assert!(!relations.is_related("Café", "Bar"));
        assert!(relations.is_related("Bakery", "Café"));
        // Untouched entries survive
        assert!(relations.is_related("Bar", "Restaurant"));
    }

    #[test]
    fn test_deserialize_from_table() {
        let relations: CategoryRelations =
            serde_json::from_str(r#"{"Vet": ["Groomer"], "Groomer": ["Vet"]}"#).unwrap();

        assert_eq!(relations.len(), 2);
        assert!(relations.is_related("Vet", "Groomer"));
        assert!(!relations.is_related("Café", "Bar"));
    }
}
