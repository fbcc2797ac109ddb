//! Per-user totals and the rank index built over them
//!
//! `statistics` is the source of truth for each user's amount within the
//! current week; `ranked` mirrors it as `(amount, user)` keys so rank and
//! neighbour queries do not have to scan every user. The two are only ever
//! changed together: an amount change removes the old key and inserts a new
//! one, because the amount is part of the key.

use crate::ranked_set::{RankKey, RankedSet};
use shared::{Standing, User};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct RankingStore {
    statistics: HashMap<User, i64>,
    ranked: RankedSet,
}

impl RankingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statistics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }

    pub fn contains(&self, user: User) -> bool {
        self.statistics.contains_key(&user)
    }

    pub fn amount_of(&self, user: User) -> Option<i64> {
        self.statistics.get(&user).copied()
    }

    /// Makes `user` known at amount 0 unless it already has a total.
    ///
    /// Returns true if the user was newly added.
    pub fn ensure_user(&mut self, user: User) -> bool {
        if self.statistics.contains_key(&user) {
            return false;
        }
        self.statistics.insert(user, 0);
        self.ranked.insert(RankKey::new(0, user));
        true
    }

    /// Adds `delta` to the user's total and returns the new total.
    ///
    /// Unknown users start from 0.
    pub fn upsert_delta(&mut self, user: User, delta: i64) -> i64 {
        let old_amount = self.statistics.get(&user).copied();
        let new_amount = old_amount.unwrap_or(0).saturating_add(delta);

        if let Some(old_amount) = old_amount {
            self.ranked.remove(&RankKey::new(old_amount, user));
        }
        self.ranked.insert(RankKey::new(new_amount, user));
        self.statistics.insert(user, new_amount);

        new_amount
    }

    /// 1-based rank of `user`
    pub fn rank_of(&self, user: User) -> Option<usize> {
        let amount = self.amount_of(user)?;
        self.ranked
            .index_of(&RankKey::new(amount, user))
            .map(|index| index + 1)
    }

    /// The first `k` entries in rank order
    pub fn top(&self, k: usize) -> Vec<Standing> {
        self.ranked.range(0, k).into_iter().map(Standing::from).collect()
    }

    /// Up to `k` entries directly above `user` followed by up to `k` directly below.
    ///
    /// The user's own entry is not included. Absent users have no neighbours.
    pub fn neighbors(&self, user: User, k: usize) -> Vec<Standing> {
        let Some(position) = self.rank_of(user) else {
            return Vec::new();
        };
        let index = position - 1;

        let mut near: Vec<Standing> = self
            .ranked
            .range(index.saturating_sub(k), index)
            .into_iter()
            .map(Standing::from)
            .collect();
        near.extend(
            self.ranked
                .range(index + 1, index + 1 + k)
                .into_iter()
                .map(Standing::from),
        );
        near
    }

    /// Zeroes every total and rebuilds the rank index, which then orders users by id
    pub fn reset_all(&mut self) {
        self.ranked.clear();
        for (user, amount) in self.statistics.iter_mut() {
            *amount = 0;
            self.ranked.insert(RankKey::new(0, *user));
        }
    }

    /// Complete leaderboard in rank order
    pub fn standings(&self) -> Vec<Standing> {
        self.ranked.iter().map(Standing::from).collect()
    }
}
