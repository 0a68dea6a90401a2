//! Friend-group resolution.
//!
//! Per-entity stages only declare adjacency ("this pony lists these
//! friends"); resolution is a deferred cross-entity pass that runs once all
//! entities are processed. Groups are connected components over the union of
//! the declared lists, so membership is transitive even when the source data
//! only links entities pairwise. Component order is first-seen: the sequence
//! is anchored by the earliest-declared member, and every member stores the
//! identical sequence.

use std::collections::{HashSet, VecDeque};

use herdbook_store::EntityRecord;
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct GroupTable {
    adjacency: IndexMap<String, Vec<String>>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`'s declared friends. Declaration order fixes component
    /// anchoring and member ordering; an empty list declares nothing.
    pub fn declare(&mut self, id: &str, friends: &[String]) {
        if friends.is_empty() {
            return;
        }
        let forward = self.adjacency.entry(id.to_string()).or_default();
        for friend in friends {
            if !forward.contains(friend) {
                forward.push(friend.clone());
            }
        }
        for friend in friends {
            let back = self.adjacency.entry(friend.clone()).or_default();
            if !back.iter().any(|member| member == id) {
                back.push(id.to_string());
            }
        }
    }

    /// Connected components, members in first-encounter order.
    pub fn components(&self) -> Vec<Vec<String>> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut components = Vec::new();

        for id in self.adjacency.keys() {
            if !seen.insert(id.as_str()) {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::from([id.clone()]);
            while let Some(current) = queue.pop_front() {
                if let Some(neighbors) = self.adjacency.get(&current) {
                    for neighbor in neighbors {
                        if seen.insert(neighbor.as_str()) {
                            queue.push_back(neighbor.clone());
                        }
                    }
                }
                component.push(current);
            }
            components.push(component);
        }
        components
    }

    /// Write each resolved component to all of its member records. Members
    /// without a record are reported and skipped.
    pub fn apply(&self, items: &mut IndexMap<String, EntityRecord>) {
        for component in self.components() {
            for id in &component {
                match items.get_mut(id) {
                    Some(record) => record.group = component.clone(),
                    None => {
                        tracing::warn!(id = %id, "group member has no record; skipping")
                    }
                }
            }
        }
    }
}
