//! Merging BIO token runs into phrase-level mentions.
//!
//! A `X-B` token opens a phrase; immediately following `X-I` tokens of the
//! same base tag extend it. `O` tokens and orphaned `X-I` tokens (no open
//! phrase to attach to) each form a single-token phrase of their own. The
//! returned map is keyed by each phrase's first position and carries the
//! space-joined surface text.

use std::collections::BTreeMap;

use recipeflow_core::Position;

use crate::corpus::Recipe;

/// Merge a recipe's tokens into phrases keyed by their first position.
#[must_use]
pub fn merge_phrases(recipe: &Recipe) -> BTreeMap<Position, String> {
    let mut phrases: BTreeMap<Position, String> = BTreeMap::new();
    let mut open: Option<(Position, recipeflow_core::BioTag)> = None;

    for (&position, record) in recipe.tokens() {
        let continues = match open {
            Some((head, head_tag)) => {
                // A phrase never crosses a sentence boundary.
                head.same_sentence(&position) && record.tag.continues(&head_tag)
            }
            None => false,
        };

        if continues {
            if let Some((head, _)) = open {
                if let Some(text) = phrases.get_mut(&head) {
                    text.push(' ');
                    text.push_str(&record.word);
                }
            }
        } else {
            phrases.insert(position, record.word.clone());
            open = Some((position, record.tag));
        }
    }

    phrases
}
