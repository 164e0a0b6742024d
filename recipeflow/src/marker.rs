//! Entity-marked sentence construction.
//!
//! For a candidate mention pair, each endpoint's sentence is rendered with
//! the endpoint's phrase wrapped in `<e1>`/`<e2>` markers (optionally typed,
//! `<e1 type=F>`). A marker spans the whole phrase: it opens at the target
//! token and closes at the first following token that does not continue the
//! phrase. When both endpoints share a sentence the pair collapses to a
//! single marked segment.
//!
//! Every rendered sentence is sanity-checked before use; an unbalanced or
//! missing marker aborts the run rather than contaminating a dataset.

use recipeflow_core::{BioTag, Position};

use crate::corpus::Recipe;
use crate::error::{Error, Result};

/// How entity markers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerStyle {
    /// Bare markers: `<e1> egg whites </e1>`.
    #[default]
    Untyped,
    /// Markers carrying the entity tag: `<e1 type=F> egg whites </e1>`.
    Typed,
}

/// The marked sentence segments of one candidate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedPair {
    /// Sentence containing the first endpoint.
    pub first: String,
    /// Sentence containing the second endpoint, or `None` when both
    /// endpoints share a sentence.
    pub second: Option<String>,
}

/// Render the marked sentences for a candidate pair.
///
/// # Errors
///
/// Fails with [`Error::Marker`] if a rendered sentence does not pass the
/// sanity check, and with [`Error::Corpus`] if a target has no token.
pub fn mark_pair(
    recipe: &Recipe,
    e1: Position,
    e2: Position,
    style: MarkerStyle,
) -> Result<MarkedPair> {
    for target in [&e1, &e2] {
        if recipe.get(target).is_none() {
            return Err(Error::corpus(format!(
                "{}: marker target {} has no token record",
                recipe.name, target
            )));
        }
    }

    let first = mark_sentence(recipe, e1.sentence_id(), e1, e2, style);
    check_sanity(recipe, &first, expected_markers(e1.sentence_id(), e1, e2))?;

    let second = mark_sentence(recipe, e2.sentence_id(), e1, e2, style);
    check_sanity(recipe, &second, expected_markers(e2.sentence_id(), e1, e2))?;

    if first == second {
        Ok(MarkedPair {
            first,
            second: None,
        })
    } else {
        Ok(MarkedPair {
            first,
            second: Some(second),
        })
    }
}

/// Render one sentence, wrapping whichever of the two targets it contains.
fn mark_sentence(
    recipe: &Recipe,
    sentence: (u32, u32),
    e1: Position,
    e2: Position,
    style: MarkerStyle,
) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut open: Option<(u8, BioTag)> = None;

    for (&position, record) in recipe.sentence(sentence.0, sentence.1) {
        if let Some((index, open_tag)) = open {
            if !record.tag.continues(&open_tag) {
                pieces.push(format!("</e{index}>"));
                open = None;
            }
        }

        let marker = if position == e1 {
            Some(1)
        } else if position == e2 {
            Some(2)
        } else {
            None
        };
        if let Some(index) = marker {
            pieces.push(opening_marker(index, record.tag, style));
            open = Some((index, record.tag));
        }
        pieces.push(record.word.clone());
    }

    if let Some((index, _)) = open {
        pieces.push(format!("</e{index}>"));
    }

    pieces.join(" ")
}

fn opening_marker(index: u8, tag: BioTag, style: MarkerStyle) -> String {
    match (style, tag.base()) {
        (MarkerStyle::Typed, Some(base)) => format!("<e{} type={}>", index, base.as_label()),
        _ => format!("<e{index}>"),
    }
}

/// Marker indices a sentence rendering is required to contain.
fn expected_markers(sentence: (u32, u32), e1: Position, e2: Position) -> Vec<u8> {
    let mut markers = Vec::new();
    if e1.sentence_id() == sentence {
        markers.push(1);
    }
    if e2.sentence_id() == sentence {
        markers.push(2);
    }
    markers
}

/// Verify a rendered sentence: every expected marker must open and close,
/// and at least one marker must be present.
fn check_sanity(recipe: &Recipe, text: &str, expected: Vec<u8>) -> Result<()> {
    if expected.is_empty() {
        return Err(Error::marker(format!(
            "{}: no entity marker expected in {text:?}",
            recipe.name
        )));
    }
    for index in expected {
        let opening = format!("<e{index}");
        let closing = format!("</e{index}>");
        if !text.contains(&opening) || !text.contains(&closing) {
            return Err(Error::marker(format!(
                "{}: marker e{index} unbalanced in {text:?}",
                recipe.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe::parse(
            "demo",
            "0 0 0 Whisk VB Ac-B\n\
             0 0 1 the DT O\n\
             0 0 2 egg NN F-B\n\
             0 0 3 whites NNS F-I\n\
             0 0 4 . . O\n\
             0 1 0 Serve VB Ac-B\n\
             0 1 1 warm JJ Sf-B\n\
             0 1 2 . . O\n",
        )
        .unwrap()
    }

    #[test]
    fn test_single_sentence_pair_collapses() {
        let recipe = sample_recipe();
        let pair = mark_pair(
            &recipe,
            Position::new(0, 0, 0),
            Position::new(0, 0, 2),
            MarkerStyle::Untyped,
        )
        .unwrap();
        assert_eq!(
            pair.first,
            "<e1> Whisk </e1> the <e2> egg whites </e2> ."
        );
        assert_eq!(pair.second, None);
    }

    #[test]
    fn test_two_sentence_pair() {
        let recipe = sample_recipe();
        let pair = mark_pair(
            &recipe,
            Position::new(0, 0, 2),
            Position::new(0, 1, 0),
            MarkerStyle::Untyped,
        )
        .unwrap();
        assert_eq!(pair.first, "Whisk the <e1> egg whites </e1> .");
        assert_eq!(pair.second.as_deref(), Some("<e2> Serve </e2> warm ."));
    }

    #[test]
    fn test_typed_markers() {
        let recipe = sample_recipe();
        let pair = mark_pair(
            &recipe,
            Position::new(0, 0, 0),
            Position::new(0, 0, 2),
            MarkerStyle::Typed,
        )
        .unwrap();
        assert_eq!(
            pair.first,
            "<e1 type=Ac> Whisk </e1> the <e2 type=F> egg whites </e2> ."
        );
    }

    #[test]
    fn test_marker_order_follows_pair_order() {
        // e1 marks the first endpoint even when it appears later in text.
        let recipe = sample_recipe();
        let pair = mark_pair(
            &recipe,
            Position::new(0, 0, 2),
            Position::new(0, 0, 0),
            MarkerStyle::Untyped,
        )
        .unwrap();
        assert_eq!(
            pair.first,
            "<e2> Whisk </e2> the <e1> egg whites </e1> ."
        );
    }

    #[test]
    fn test_mid_sentence_targets_do_not_overlap() {
        let recipe = Recipe::parse(
            "demo",
            "0 0 0 Stir VB Ac-B\n\
             0 0 1 the DT O\n\
             0 0 2 sauce NN F-B\n\
             0 0 3 until IN O\n\
             0 0 4 thick JJ Sf-B\n",
        )
        .unwrap();
        let pair = mark_pair(
            &recipe,
            Position::new(0, 0, 2),
            Position::new(0, 0, 4),
            MarkerStyle::Typed,
        )
        .unwrap();
        assert_eq!(
            pair.first,
            "Stir the <e1 type=F> sauce </e1> until <e2 type=Sf> thick </e2>"
        );
        let close_e1 = pair.first.find("</e1>").unwrap();
        let open_e2 = pair.first.find("<e2").unwrap();
        assert!(close_e1 < open_e2);
    }

    #[test]
    fn test_marker_closes_at_sentence_end() {
        // No trailing token after the mention: the marker is force-closed.
        let recipe = Recipe::parse("demo", "0 0 0 Stir VB Ac-B\n0 1 0 Serve VB Ac-B\n").unwrap();
        let pair = mark_pair(
            &recipe,
            Position::new(0, 0, 0),
            Position::new(0, 1, 0),
            MarkerStyle::Untyped,
        )
        .unwrap();
        assert_eq!(pair.first, "<e1> Stir </e1>");
        assert_eq!(pair.second.as_deref(), Some("<e2> Serve </e2>"));
    }

    #[test]
    fn test_missing_target_is_fatal() {
        let recipe = sample_recipe();
        let err = mark_pair(
            &recipe,
            Position::new(0, 0, 0),
            Position::new(9, 9, 9),
            MarkerStyle::Untyped,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Corpus(_)));
    }
}
