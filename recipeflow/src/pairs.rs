//! Candidate mention-pair generation.
//!
//! Every unordered pair of distinct mention starts (`-B` tokens) in a recipe
//! is a potential edge; the relation-type allowlist prunes pairs whose tag
//! combination never relates in either direction. Candidates are emitted in
//! position order (earlier mention first), so an accepted pair's key matches
//! the storage key of any true edge between its endpoints. Pruning is a
//! recall-oriented coarse filter and cannot fail.

use recipeflow_core::Position;

use crate::corpus::Recipe;
use crate::relations::RelationSet;

/// Counters for candidate-pair pruning, accumulated across recipes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairStats {
    /// Pairs whose tag combination is in the allowlist (either direction).
    pub accepted: u64,
    /// Pairs pruned by the allowlist.
    pub rejected: u64,
}

impl PairStats {
    /// Total pairs considered.
    #[must_use]
    pub fn considered(&self) -> u64 {
        self.accepted + self.rejected
    }
}

/// Enumerate candidate mention pairs of one recipe.
///
/// For mention starts `i < j` in scan order, the pair `(i, j)` is produced
/// when the allowlist admits the tag combination in at least one direction.
#[must_use]
pub fn candidate_pairs(
    recipe: &Recipe,
    relations: &RelationSet,
    stats: &mut PairStats,
) -> Vec<(Position, Position)> {
    let starts = recipe.mention_starts();
    let mut pairs = Vec::new();

    for (index, &first) in starts.iter().enumerate() {
        // mention_starts never returns O tokens, so base() holds.
        let Some(first_tag) = recipe.tag(&first).and_then(|t| t.base()) else {
            continue;
        };
        for &second in &starts[index + 1..] {
            let Some(second_tag) = recipe.tag(&second).and_then(|t| t.base()) else {
                continue;
            };
            if relations.allows_either(first_tag, second_tag) {
                stats.accepted += 1;
                pairs.push((first, second));
            } else {
                stats.rejected += 1;
            }
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipeflow_core::EntityTag;

    fn sample_recipe() -> Recipe {
        Recipe::parse(
            "demo",
            "0 0 0 Whisk VB Ac-B\n\
             0 0 1 the DT O\n\
             0 0 2 egg NN F-B\n\
             0 0 3 whites NNS F-I\n\
             0 0 4 gently RB D-B\n\
             0 0 5 . . O\n",
        )
        .unwrap()
    }

    #[test]
    fn test_allowlist_checked_in_both_directions() {
        let recipe = sample_recipe();
        let mut relations = RelationSet::new();
        relations.insert(EntityTag::Food, EntityTag::Action);

        let mut stats = PairStats::default();
        let pairs = candidate_pairs(&recipe, &relations, &mut stats);

        // Only F->Ac is recorded, but the (Ac, F) pair is still accepted.
        assert_eq!(
            pairs,
            vec![(Position::new(0, 0, 0), Position::new(0, 0, 2))]
        );
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 2);
    }

    #[test]
    fn test_pairs_are_position_ordered() {
        let recipe = sample_recipe();
        let mut relations = RelationSet::new();
        for a in EntityTag::ALL {
            for b in EntityTag::ALL {
                relations.insert(a, b);
            }
        }

        let mut stats = PairStats::default();
        let pairs = candidate_pairs(&recipe, &relations, &mut stats);
        // 3 mention starts yield 3 unordered pairs, all accepted.
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|(a, b)| a < b));
        assert_eq!(stats.rejected, 0);
    }

    #[test]
    fn test_inside_and_outside_tokens_excluded() {
        let recipe = sample_recipe();
        let mut relations = RelationSet::new();
        for a in EntityTag::ALL {
            for b in EntityTag::ALL {
                relations.insert(a, b);
            }
        }

        let mut stats = PairStats::default();
        let pairs = candidate_pairs(&recipe, &relations, &mut stats);
        let inside = Position::new(0, 0, 3);
        let outside = Position::new(0, 0, 1);
        assert!(pairs
            .iter()
            .all(|(a, b)| *a != inside && *b != inside && *a != outside && *b != outside));
    }

    #[test]
    fn test_empty_allowlist_prunes_everything() {
        let recipe = sample_recipe();
        let relations = RelationSet::new();
        let mut stats = PairStats::default();
        assert!(candidate_pairs(&recipe, &relations, &mut stats).is_empty());
        assert_eq!(stats.considered(), stats.rejected);
    }
}
