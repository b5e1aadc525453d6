//! Numbering-independent section correspondence.
//!
//! Builds a complete old×new score matrix over comparison text and
//! solves the assignment optimally with the Kuhn-Munkres algorithm
//! (chosen over greedy descending-score assignment for determinism and
//! stability under ties). Assignments below the minimum match score are
//! demoted to an added/removed pair each — the primary defense against
//! false "modified" pairs between unrelated sections.

use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;
use tracing::debug;

use regdelta_core::{CompareConfig, MatchPair, Section};

use crate::score::Scorer;

/// Scores are scaled to integers for the assignment solver; four
/// decimal places of similarity are retained.
const SCORE_SCALE: f32 = 10_000.0;

/// Match every non-empty old section against every non-empty new
/// section. The output covers each section exactly once: matched and
/// added pairs in new-document order, then removed pairs in
/// old-document order.
pub fn match_sections(
    old: &[Section],
    new: &[Section],
    scorer: &mut Scorer,
    config: &CompareConfig,
) -> Vec<MatchPair> {
    let old: Vec<&Section> = old.iter().filter(|s| !s.is_empty()).collect();
    let new: Vec<&Section> = new.iter().filter(|s| !s.is_empty()).collect();

    if old.is_empty() || new.is_empty() {
        let mut pairs: Vec<MatchPair> =
            new.iter().map(|s| MatchPair::added((*s).clone())).collect();
        pairs.extend(old.iter().map(|s| MatchPair::removed((*s).clone())));
        return pairs;
    }

    // Complete score matrix, old rows × new columns.
    let scores: Vec<Vec<f32>> = old
        .iter()
        .map(|o| {
            new.iter()
                .map(|n| scorer.score(o.comparison_text(), n.comparison_text()).blended)
                .collect()
        })
        .collect();

    // old_index → (new_index, score) for accepted assignments.
    let assigned = assign(&scores, config.min_match_score);

    debug!(
        old = old.len(),
        new = new.len(),
        matched = assigned.iter().filter(|a| a.is_some()).count(),
        "section assignment complete"
    );

    let mut matched_new = vec![None::<(usize, f32)>; new.len()];
    for (old_idx, assignment) in assigned.iter().enumerate() {
        if let Some((new_idx, score)) = assignment {
            matched_new[*new_idx] = Some((old_idx, *score));
        }
    }

    let mut pairs = Vec::with_capacity(old.len() + new.len());
    for (new_idx, section) in new.iter().enumerate() {
        match matched_new[new_idx] {
            Some((old_idx, score)) => {
                pairs.push(MatchPair::matched(
                    old[old_idx].clone(),
                    (*section).clone(),
                    score,
                ));
            }
            None => pairs.push(MatchPair::added((*section).clone())),
        }
    }
    for (old_idx, section) in old.iter().enumerate() {
        if assigned[old_idx].is_none() {
            pairs.push(MatchPair::removed((*section).clone()));
        }
    }

    pairs
}

/// Solve the assignment problem on the score matrix. Returns, per old
/// index, the accepted `(new_index, score)` or `None`.
///
/// Kuhn-Munkres needs rows ≤ columns, so the matrix is transposed when
/// there are more old sections than new ones.
fn assign(scores: &[Vec<f32>], min_match_score: f32) -> Vec<Option<(usize, f32)>> {
    let rows = scores.len();
    let cols = scores[0].len();

    let mut assigned = vec![None; rows];

    if rows <= cols {
        let weights = Matrix::from_rows(
            scores
                .iter()
                .map(|row| row.iter().map(|&s| (s * SCORE_SCALE) as i64)),
        )
        .expect("uniform row lengths");
        let (_, assignment) = kuhn_munkres(&weights);
        for (old_idx, new_idx) in assignment.into_iter().enumerate() {
            let score = scores[old_idx][new_idx];
            if score >= min_match_score {
                assigned[old_idx] = Some((new_idx, score));
            }
        }
    } else {
        let weights = Matrix::from_rows(
            (0..cols).map(|j| (0..rows).map(move |i| (scores[i][j] * SCORE_SCALE) as i64)),
        )
        .expect("uniform row lengths");
        let (_, assignment) = kuhn_munkres(&weights);
        for (new_idx, old_idx) in assignment.into_iter().enumerate() {
            let score = scores[old_idx][new_idx];
            if score >= min_match_score {
                assigned[old_idx] = Some((new_idx, score));
            }
        }
    }

    assigned
}
