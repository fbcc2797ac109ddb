//! Outbound rank snapshots

use crate::event::User;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One leaderboard row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Standing {
    pub user: User,
    pub amount: i64,
}

impl Standing {
    pub fn new(user: User, amount: i64) -> Self {
        Self { user, amount }
    }
}

/// Rank snapshot addressed to a single user
///
/// `top` holds the leaders in rank order and `near` the entries directly
/// above and below `user`, without the user's own row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub user: User,
    /// 1-based rank of `user`
    pub position: usize,
    pub top: Vec<Standing>,
    pub near: Vec<Standing>,
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "id: {} position: {}", self.user, self.position)?;
        writeln!(f, "top:")?;
        for standing in &self.top {
            writeln!(f, "\tid: {} amount: {}", standing.user, standing.amount)?;
        }
        writeln!(f, "near:")?;
        for standing in &self.near {
            writeln!(f, "\tid: {} amount: {}", standing.user, standing.amount)?;
        }
        Ok(())
    }
}
