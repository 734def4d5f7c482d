//! Pattern matching of a command against the catalogue.

use crate::catalog::CategoryCatalogue;

/// One category id that matched, with the number of its patterns that hit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchHit {
    pub category_id: String,
    pub count: usize,
}

/// Every category id whose patterns matched a command.
///
/// Membership does not depend on pattern order. Hits are kept in the order
/// they were first encountered while walking the catalogue, which is what
/// `most_common` uses to break ties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    hits: Vec<MatchHit>,
}

impl MatchSet {
    fn record(&mut self, category_id: &str) {
        match self.hits.iter_mut().find(|h| h.category_id == category_id) {
            Some(hit) => hit.count += 1,
            None => self.hits.push(MatchHit {
                category_id: category_id.to_string(),
                count: 1,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.hits.iter().any(|h| h.category_id == category_id)
    }

    pub fn hits(&self) -> &[MatchHit] {
        &self.hits
    }

    /// Matched ids, sorted.
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.hits.iter().map(|h| h.category_id.clone()).collect();
        ids.sort();
        ids
    }

    /// Matched ids other than `current`, sorted.
    pub fn others(&self, current: &str) -> Vec<String> {
        self.sorted_ids()
            .into_iter()
            .filter(|id| id != current)
            .collect()
    }

    /// The id with the most pattern hits; the earliest encountered wins ties.
    pub fn most_common(&self) -> Option<&str> {
        let mut best: Option<&MatchHit> = None;
        for hit in &self.hits {
            if best.is_none_or(|b| hit.count > b.count) {
                best = Some(hit);
            }
        }
        best.map(|h| h.category_id.as_str())
    }
}

/// Match a command key and description against every catalogue pattern.
///
/// A pattern hits when it is found in either the key or the description. All
/// patterns are evaluated; a command may match several categories.
pub fn match_command(key: &str, description: &str, catalogue: &CategoryCatalogue) -> MatchSet {
    let mut set = MatchSet::default();
    for pattern in catalogue.all_patterns() {
        if pattern.is_match(key) || pattern.is_match(description) {
            set.record(&pattern.category_id);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryCatalogFile;
    use serde_json::json;

    fn catalogue() -> CategoryCatalogue {
        let file: CategoryCatalogFile = serde_json::from_value(json!({
            "categories": {
                "motion": {
                    "name": "Motion",
                    "patterns": ["^h$", "^move"],
                    "subcategories": {
                        "word": {"name": "Word", "patterns": ["word"]}
                    }
                },
                "edit": {"name": "Edit", "patterns": ["delete", "word"]}
            }
        }))
        .unwrap();
        CategoryCatalogue::from_file(file).unwrap()
    }

    #[test]
    fn matches_key_or_description() {
        let cat = catalogue();
        assert_eq!(match_command("h", "move left", &cat).sorted_ids(), vec!["motion"]);
        assert_eq!(match_command("dd", "Delete line", &cat).sorted_ids(), vec!["edit"]);
        assert!(match_command("x", "remove char", &cat).is_empty());
    }

    #[test]
    fn counts_each_pattern_hit() {
        let cat = catalogue();
        let set = match_command("h", "move left", &cat);
        assert_eq!(
            set.hits(),
            &[MatchHit {
                category_id: "motion".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn evaluates_every_pattern() {
        let cat = catalogue();
        let set = match_command("dw", "delete word", &cat);
        assert_eq!(set.sorted_ids(), vec!["edit", "word"]);
        assert_eq!(set.others("edit"), vec!["word"]);
    }

    #[test]
    fn most_common_prefers_higher_count_then_first_seen() {
        let cat = catalogue();
        // word (sub of motion) is seen first with one hit; edit gets two.
        assert_eq!(match_command("dw", "delete word", &cat).most_common(), Some("edit"));
        // One hit each: catalogue order decides.
        assert_eq!(match_command("w", "next word", &cat).most_common(), Some("word"));
        assert_eq!(MatchSet::default().most_common(), None);
    }

    #[test]
    fn empty_inputs_do_not_match() {
        let cat = catalogue();
        assert!(match_command("", "", &cat).is_empty());
    }
}
