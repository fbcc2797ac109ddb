//! Order-statistics set of leaderboard entries
//!
//! A treap stored in an index arena. Each node records the size of its
//! subtree, which lets the set answer "how many entries precede this one"
//! and "which entry sits at position i" in logarithmic expected time. Node
//! priorities come from a fixed-seed generator so the tree shape, and
//! therefore performance, is reproducible between runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Standing, User};
use std::cmp::Ordering;

const PRIORITY_SEED: u64 = 0x5eed_1eade4b0a4d;

/// Ordering key: higher amount first, then lower user id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankKey {
    pub amount: i64,
    pub user: User,
}

impl RankKey {
    pub fn new(amount: i64, user: User) -> Self {
        Self { amount, user }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .amount
            .cmp(&self.amount)
            .then_with(|| self.user.cmp(&other.user))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<RankKey> for Standing {
    fn from(key: RankKey) -> Self {
        Standing::new(key.user, key.amount)
    }
}

#[derive(Debug)]
struct Node {
    key: RankKey,
    priority: u64,
    size: usize,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug)]
pub struct RankedSet {
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: Option<usize>,
    rng: StdRng,
}

impl Default for RankedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RankedSet {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            rng: StdRng::seed_from_u64(PRIORITY_SEED),
        }
    }

    pub fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every entry but keeps the arena allocation for reuse
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
    }

    pub fn contains(&self, key: &RankKey) -> bool {
        self.index_of(key).is_some()
    }

    /// Inserts `key`, returning false if it was already present
    pub fn insert(&mut self, key: RankKey) -> bool {
        if self.contains(&key) {
            return false;
        }

        let node = self.allocate(key);
        let (less, greater) = self.split(self.root, &key);
        let merged = self.merge(less, Some(node));
        self.root = self.merge(merged, greater);
        true
    }

    /// Removes `key`, returning false if it was not present
    pub fn remove(&mut self, key: &RankKey) -> bool {
        let (root, removed) = self.remove_from(self.root, key);
        self.root = root;
        match removed {
            Some(idx) => {
                self.free.push(idx);
                true
            }
            None => false,
        }
    }

    /// 0-based position of `key` in rank order
    pub fn index_of(&self, key: &RankKey) -> Option<usize> {
        let mut current = self.root;
        let mut preceding = 0;

        while let Some(idx) = current {
            let node = &self.nodes[idx];
            match key.cmp(&node.key) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some(preceding + self.size_of(node.left)),
                Ordering::Greater => {
                    preceding += self.size_of(node.left) + 1;
                    current = node.right;
                }
            }
        }

        None
    }

    /// Entry at 0-based position `index`
    pub fn select(&self, mut index: usize) -> Option<RankKey> {
        let mut current = self.root;

        while let Some(idx) = current {
            let node = &self.nodes[idx];
            let left_size = self.size_of(node.left);
            match index.cmp(&left_size) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some(node.key),
                Ordering::Greater => {
                    index -= left_size + 1;
                    current = node.right;
                }
            }
        }

        None
    }

    /// Entries at positions `start..end`, clamped to the set's length
    pub fn range(&self, start: usize, end: usize) -> Vec<RankKey> {
        let end = end.min(self.len());
        (start..end).filter_map(|index| self.select(index)).collect()
    }

    /// All entries in rank order
    pub fn iter(&self) -> impl Iterator<Item = RankKey> + '_ {
        let mut stack = Vec::new();
        let mut current = self.root;
        std::iter::from_fn(move || {
            while let Some(idx) = current {
                stack.push(idx);
                current = self.nodes[idx].left;
            }
            let idx = stack.pop()?;
            current = self.nodes[idx].right;
            Some(self.nodes[idx].key)
        })
    }

    fn allocate(&mut self, key: RankKey) -> usize {
        let node = Node {
            key,
            priority: self.rng.gen(),
            size: 1,
            left: None,
            right: None,
        };

        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn size_of(&self, node: Option<usize>) -> usize {
        node.map_or(0, |idx| self.nodes[idx].size)
    }

    fn update(&mut self, idx: usize) {
        let size = 1 + self.size_of(self.nodes[idx].left) + self.size_of(self.nodes[idx].right);
        self.nodes[idx].size = size;
    }

    /// Splits into entries ordered before `key` and the rest
    fn split(&mut self, node: Option<usize>, key: &RankKey) -> (Option<usize>, Option<usize>) {
        let Some(idx) = node else {
            return (None, None);
        };

        if self.nodes[idx].key < *key {
            let (less, greater) = self.split(self.nodes[idx].right, key);
            self.nodes[idx].right = less;
            self.update(idx);
            (Some(idx), greater)
        } else {
            let (less, greater) = self.split(self.nodes[idx].left, key);
            self.nodes[idx].left = greater;
            self.update(idx);
            (less, Some(idx))
        }
    }

    /// Joins two trees where every entry of `left` precedes every entry of `right`
    fn merge(&mut self, left: Option<usize>, right: Option<usize>) -> Option<usize> {
        match (left, right) {
            (None, tree) | (tree, None) => tree,
            (Some(l), Some(r)) => {
                if self.nodes[l].priority > self.nodes[r].priority {
                    let merged = self.merge(self.nodes[l].right, Some(r));
                    self.nodes[l].right = merged;
                    self.update(l);
                    Some(l)
                } else {
                    let merged = self.merge(Some(l), self.nodes[r].left);
                    self.nodes[r].left = merged;
                    self.update(r);
                    Some(r)
                }
            }
        }
    }

    fn remove_from(
        &mut self,
        node: Option<usize>,
        key: &RankKey,
    ) -> (Option<usize>, Option<usize>) {
        let Some(idx) = node else {
            return (None, None);
        };

        match key.cmp(&self.nodes[idx].key) {
            Ordering::Equal => {
                let merged = self.merge(self.nodes[idx].left, self.nodes[idx].right);
                (merged, Some(idx))
            }
            Ordering::Less => {
                let (left, removed) = self.remove_from(self.nodes[idx].left, key);
                self.nodes[idx].left = left;
                self.update(idx);
                (Some(idx), removed)
            }
            Ordering::Greater => {
                let (right, removed) = self.remove_from(self.nodes[idx].right, key);
                self.nodes[idx].right = right;
                self.update(idx);
                (Some(idx), removed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(set: &RankedSet) -> Vec<(i64, User)> {
        set.iter().map(|key| (key.amount, key.user)).collect()
    }

    #[test]
    fn test_key_ordering() {
        assert!(RankKey::new(10, 5) < RankKey::new(3, 1));
        assert!(RankKey::new(3, 1) < RankKey::new(3, 2));
        assert!(RankKey::new(-1, 0) > RankKey::new(0, 100));
    }

    #[test]
    fn test_insert_orders_entries() {
        let mut set = RankedSet::new();
        assert!(set.insert(RankKey::new(0, 3)));
        assert!(set.insert(RankKey::new(50, 7)));
        assert!(set.insert(RankKey::new(0, 1)));
        assert!(set.insert(RankKey::new(-20, 2)));

        assert_eq!(keys(&set), vec![(50, 7), (0, 1), (0, 3), (-20, 2)]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut set = RankedSet::new();
        assert!(set.insert(RankKey::new(5, 1)));
        assert!(!set.insert(RankKey::new(5, 1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = RankedSet::new();
        for user in 0..10 {
            set.insert(RankKey::new(i64::from(user) * 10, user));
        }

        assert!(set.remove(&RankKey::new(50, 5)));
        assert!(!set.remove(&RankKey::new(50, 5)));
        assert!(!set.remove(&RankKey::new(51, 5)));
        assert_eq!(set.len(), 9);
        assert!(!set.contains(&RankKey::new(50, 5)));
    }

    #[test]
    fn test_index_and_select_agree() {
        let mut set = RankedSet::new();
        for user in 0..200 {
            set.insert(RankKey::new(i64::from((user * 37) % 23), user));
        }

        for (index, key) in set.iter().enumerate() {
            assert_eq!(set.index_of(&key), Some(index));
            assert_eq!(set.select(index), Some(key));
        }
        assert_eq!(set.select(200), None);
        assert_eq!(set.index_of(&RankKey::new(1000, 1)), None);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut set = RankedSet::new();
        set.insert(RankKey::new(1, 1));
        set.insert(RankKey::new(2, 2));
        set.remove(&RankKey::new(1, 1));
        set.insert(RankKey::new(3, 3));

        assert_eq!(set.nodes.len(), 2);
        assert_eq!(keys(&set), vec![(3, 3), (2, 2)]);
    }

    #[test]
    fn test_range_is_clamped() {
        let mut set = RankedSet::new();
        for user in 1..=5 {
            set.insert(RankKey::new(0, user));
        }

        let users: Vec<User> = set.range(3, 10).iter().map(|key| key.user).collect();
        assert_eq!(users, vec![4, 5]);
        assert!(set.range(7, 10).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut set = RankedSet::new();
        set.insert(RankKey::new(1, 1));
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
