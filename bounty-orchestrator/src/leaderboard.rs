use bounty_abi::PublicKey;

use crate::error::OrchestratorError;
use crate::store::BountyStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based, no gaps; ties keep their scan order
    pub rank: usize,
    pub developer: PublicKey,
    pub wins: u64,
}

impl LeaderboardEntry {
    pub fn address(&self) -> String {
        self.developer.to_address()
    }
}

pub fn rank(mut counts: Vec<(PublicKey, u64)>) -> Vec<LeaderboardEntry> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .enumerate()
        .map(|(i, (developer, wins))| LeaderboardEntry {
            rank: i + 1,
            developer,
            wins,
        })
        .collect()
}

pub fn leaderboard(store: &dyn BountyStore) -> Result<Vec<LeaderboardEntry>, OrchestratorError> {
    Ok(rank(store.win_counts()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_descending_with_stable_ties() {
        let a = PublicKey([1; 32]);
        let b = PublicKey([2; 32]);
        let c = PublicKey([3; 32]);
        let d = PublicKey([4; 32]);

        let ranked = rank(vec![(a, 1), (b, 5), (c, 1), (d, 3)]);
        let order: Vec<_> = ranked.iter().map(|e| (e.rank, e.developer, e.wins)).collect();
        assert_eq!(order, vec![(1, b, 5), (2, d, 3), (3, a, 1), (4, c, 1)]);
    }

    #[test]
    fn empty() {
        assert!(rank(vec![]).is_empty());
    }
}
