//! Property-based tests for pipeline invariants.
//!
//! These verify that key properties hold for ALL generated inputs, not just
//! hand-picked examples.

use proptest::prelude::*;

use recipeflow::{candidate_pairs, merge_phrases, PairStats, Recipe, RelationSet};
use recipeflow_core::{BioTag, EdgeLabel, Position};

/// An arbitrary BIO tag label from the corpus vocabulary.
fn bio_label() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "O", "Ac-B", "Ac-I", "Ac2-B", "Af-B", "At-B", "D-B", "D-I", "F-B", "F-I", "Q-B", "Sf-B",
        "St-B", "St-I", "T-B", "T-I",
    ])
}

/// Render a generated tag sequence as `.list` file text (one document, one
/// sentence, sequential token numbers).
fn list_text(tags: &[&str]) -> String {
    tags.iter()
        .enumerate()
        .map(|(i, tag)| format!("0 0 {i} w{i} NN {tag}\n"))
        .collect()
}

proptest! {
    #[test]
    fn position_key_roundtrip(doc in any::<u32>(), sent in any::<u32>(), token in any::<u32>()) {
        let position = Position::new(doc, sent, token);
        let decoded = Position::decode(&position.encode()).unwrap();
        prop_assert_eq!(decoded, position);
    }

    #[test]
    fn position_decode_rejects_wrong_arity(parts in prop::collection::vec(0u32..1000, 0..6)) {
        prop_assume!(parts.len() != 3);
        let key: Vec<String> = parts.iter().map(u32::to_string).collect();
        prop_assert!(Position::decode(&key.join(";")).is_err());
    }

    #[test]
    fn edge_label_key_is_always_ordered(
        raw in prop::sample::select(vec!["a", "d", "f-eq", "s", "t", "t-eq", "v"]),
        a in (0u32..4, 0u32..8, 0u32..30),
        b in (0u32..4, 0u32..8, 0u32..30),
    ) {
        let source = Position::new(a.0, a.1, a.2);
        let dest = Position::new(b.0, b.1, b.2);
        let (key, label) = EdgeLabel::from_raw(raw, source, dest);

        prop_assert!(key.0 <= key.1);
        let suffix = label.direction().unwrap().suffix();
        if source < dest {
            prop_assert_eq!((key, suffix), ((source, dest), ":LR"));
        } else {
            prop_assert_eq!((key, suffix), ((dest, source), ":RL"));
        }
        // Label strings always parse back to themselves.
        prop_assert_eq!(EdgeLabel::parse(&label.as_label()).unwrap(), label);
    }

    #[test]
    fn every_token_lands_in_exactly_one_phrase(tags in prop::collection::vec(bio_label(), 1..40)) {
        let recipe = Recipe::parse("gen", &list_text(&tags)).unwrap();
        let phrases = merge_phrases(&recipe);

        // Word counts are preserved across merging.
        let merged_words: usize = phrases.values().map(|p| p.split(' ').count()).sum();
        prop_assert_eq!(merged_words, tags.len());

        // Every phrase head is a real token, and O tokens never merge.
        for (head, text) in &phrases {
            let tag = recipe.tag(head).unwrap();
            if tag == BioTag::Outside {
                prop_assert_eq!(text.split(' ').count(), 1);
            }
        }
    }

    #[test]
    fn phrase_heads_cover_all_mention_starts(tags in prop::collection::vec(bio_label(), 1..40)) {
        let recipe = Recipe::parse("gen", &list_text(&tags)).unwrap();
        let phrases = merge_phrases(&recipe);
        for start in recipe.mention_starts() {
            prop_assert!(phrases.contains_key(&start), "mention start {} has no phrase", start);
        }
    }

    #[test]
    fn accepted_candidates_satisfy_the_allowlist(
        tags in prop::collection::vec(bio_label(), 1..30),
        allowed in prop::collection::vec((0usize..10, 0usize..10), 0..20),
    ) {
        use recipeflow_core::EntityTag;

        let recipe = Recipe::parse("gen", &list_text(&tags)).unwrap();
        let mut relations = RelationSet::new();
        for (a, b) in allowed {
            relations.insert(EntityTag::ALL[a], EntityTag::ALL[b]);
        }

        let mut stats = PairStats::default();
        let pairs = candidate_pairs(&recipe, &relations, &mut stats);

        let k = recipe.mention_starts().len() as u64;
        prop_assert_eq!(stats.considered(), k * k.saturating_sub(1) / 2);
        prop_assert_eq!(stats.accepted as usize, pairs.len());

        for (first, second) in pairs {
            prop_assert!(first < second);
            let a = recipe.tag(&first).unwrap().base().unwrap();
            let b = recipe.tag(&second).unwrap().base().unwrap();
            prop_assert!(relations.allows_either(a, b));
        }
    }
}
