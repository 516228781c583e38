//! Insertion-ordered set of accepted links

use std::collections::HashSet;

/// Normalized links accepted during a run
///
/// Membership checks go through a hash set; the vector keeps first-discovery
/// order for output.
#[derive(Debug, Default)]
pub struct SeenSet {
    index: HashSet<String>,
    ordered: Vec<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link, returning true if it was not seen before
    pub fn insert(&mut self, link: String) -> bool {
        if self.index.contains(&link) {
            return false;
        }
        self.index.insert(link.clone());
        self.ordered.push(link);
        true
    }

    pub fn contains(&self, link: &str) -> bool {
        self.index.contains(link)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Consumes the set, returning links in first-discovery order
    pub fn into_links(self) -> Vec<String> {
        self.ordered
    }
}
