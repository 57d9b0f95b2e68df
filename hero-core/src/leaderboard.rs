use hero_types::{AccountId, LeaderboardRow};

pub const PODIUM_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub row: LeaderboardRow,
}

/// Ranking as delivered by the authority, split for display. Rows are never
/// re-sorted: arrival order is rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    cohort: Option<String>,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn from_rows(rows: Vec<LeaderboardRow>, cohort: Option<String>) -> Self {
        if rows
            .windows(2)
            .any(|pair| pair[0].level < pair[1].level)
        {
            tracing::warn!(?cohort, "Leaderboard rows arrived out of level order, keeping server order");
        }

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| LeaderboardEntry {
                rank: u32::try_from(index + 1).unwrap_or(u32::MAX),
                row,
            })
            .collect();

        Self { cohort, entries }
    }

    pub fn cohort(&self) -> Option<&str> {
        self.cohort.as_deref()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn podium(&self) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(PODIUM_SIZE)]
    }

    pub fn rest(&self) -> &[LeaderboardEntry] {
        &self.entries[self.entries.len().min(PODIUM_SIZE)..]
    }

    pub fn rank_of(&self, user_id: &AccountId) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| &entry.row.user_id == user_id)
            .map(|entry| entry.rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
