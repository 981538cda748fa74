//! Per-origin aggregate of discovered addresses

use std::collections::{BTreeMap, BTreeSet};

/// Mapping from origin identity to every address discovered for it so far
///
/// Sets only ever grow: the single mutation is [`OriginAggregate::merge`], a
/// union. Ordered collections keep snapshot rows and their email lists sorted
/// without a separate sort pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginAggregate {
    origins: BTreeMap<String, BTreeSet<String>>,
}

impl OriginAggregate {
    /// Creates an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `emails` into the set held for `origin_id`
    ///
    /// Merging an empty set is a no-op and does not create a row, so origins
    /// appear only once they have at least one address. Returns the number of
    /// addresses that were new for this origin.
    pub fn merge<I, S>(&mut self, origin_id: &str, emails: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut emails = emails.into_iter().peekable();
        if emails.peek().is_none() {
            return 0;
        }

        let set = self.origins.entry(origin_id.to_string()).or_default();
        let mut added = 0;
        for email in emails {
            if set.insert(email.into()) {
                added += 1;
            }
        }
        added
    }

    /// Returns the addresses recorded for an origin
    pub fn get(&self, origin_id: &str) -> Option<&BTreeSet<String>> {
        self.origins.get(origin_id)
    }

    /// Iterates origins in sorted order with their sorted address sets
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.origins.iter()
    }

    /// Number of origins with at least one address
    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }

    /// Total number of addresses across all origins
    pub fn email_count(&self) -> usize {
        self.origins.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Renders the snapshot rows: `(origin_id, "a@x.com, b@x.com")`
    pub fn rows(&self) -> Vec<(String, String)> {
        self.origins
            .iter()
            .map(|(origin, emails)| (origin.clone(), join_emails(emails)))
            .collect()
    }
}

/// Joins a sorted address set with the snapshot separator
pub fn join_emails(emails: &BTreeSet<String>) -> String {
    emails
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_creates_row() {
        let mut aggregate = OriginAggregate::new();
        let added = aggregate.merge("example.com", ["info@example.com"]);

        assert_eq!(added, 1);
        assert_eq!(aggregate.origin_count(), 1);
        assert!(aggregate
            .get("example.com")
            .unwrap()
            .contains("info@example.com"));
    }

    #[test]
    fn test_merge_empty_is_noop() {
        let mut aggregate = OriginAggregate::new();
        let added = aggregate.merge("example.com", Vec::<String>::new());

        assert_eq!(added, 0);
        assert!(aggregate.is_empty());
        assert!(aggregate.get("example.com").is_none());
    }

    #[test]
    fn test_merge_is_union() {
        let mut aggregate = OriginAggregate::new();
        aggregate.merge("example.com", ["a@example.com", "b@example.com"]);
        let added = aggregate.merge("example.com", ["b@example.com", "c@example.com"]);

        assert_eq!(added, 1);
        assert_eq!(aggregate.email_count(), 3);
    }

    #[test]
    fn test_merge_idempotent() {
        let mut once = OriginAggregate::new();
        once.merge("example.com", ["a@example.com"]);

        let mut twice = once.clone();
        twice.merge("example.com", ["a@example.com"]);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_origins_stay_independent() {
        let mut aggregate = OriginAggregate::new();
        aggregate.merge("a.com", ["x@a.com"]);
        aggregate.merge("b.org", ["y@b.org"]);

        assert_eq!(aggregate.origin_count(), 2);
        assert!(!aggregate.get("a.com").unwrap().contains("y@b.org"));
        assert!(!aggregate.get("b.org").unwrap().contains("x@a.com"));
    }

    #[test]
    fn test_rows_sorted() {
        let mut aggregate = OriginAggregate::new();
        aggregate.merge("zeta.com", ["z@zeta.com"]);
        aggregate.merge("alpha.com", ["sales@alpha.com", "info@alpha.com"]);

        assert_eq!(
            aggregate.rows(),
            vec![
                (
                    "alpha.com".to_string(),
                    "info@alpha.com, sales@alpha.com".to_string()
                ),
                ("zeta.com".to_string(), "z@zeta.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_order_does_not_matter() {
        let mut forward = OriginAggregate::new();
        forward.merge("o.com", ["a@o.com"]);
        forward.merge("o.com", ["b@o.com"]);

        let mut backward = OriginAggregate::new();
        backward.merge("o.com", ["b@o.com"]);
        backward.merge("o.com", ["a@o.com"]);

        assert_eq!(forward, backward);
    }
}
