use std::cmp::Ordering;

use crate::models::{RankedBatch, RankedCandidate, ScoreResult};

/// Total order used for ranking.
///
/// Composite score descending, then fewer missing required skills, then
/// candidate id ascending. The remaining comparisons only matter for
/// duplicate ids and keep the order total.
pub fn compare_results(a: &ScoreResult, b: &ScoreResult) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| a.missing_required.len().cmp(&b.missing_required.len()))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        .then_with(|| b.breakdown.skills.total_cmp(&a.breakdown.skills))
        .then_with(|| b.breakdown.experience.total_cmp(&a.breakdown.experience))
        .then_with(|| b.breakdown.education.total_cmp(&a.breakdown.education))
        .then_with(|| a.missing_required.cmp(&b.missing_required))
        .then_with(|| a.matched_skills.cmp(&b.matched_skills))
        .then_with(|| a.skill_categories.cmp(&b.skill_categories))
}

/// Order a complete set of results.
///
/// Candidates missing a required skill stay in the batch, tagged
/// `disqualified`; nothing is dropped.
pub fn rank(program_id: &str, mut results: Vec<ScoreResult>) -> RankedBatch {
    results.sort_by(compare_results);

    let candidates: Vec<RankedCandidate> = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| RankedCandidate {
            rank: index + 1,
            disqualified: result.is_disqualified(),
            result,
        })
        .collect();

    let disqualified = candidates.iter().filter(|c| c.disqualified).count();
    tracing::debug!(
        "Ranked {} candidates for {} ({} disqualified)",
        candidates.len(),
        program_id,
        disqualified
    );

    RankedBatch {
        program_id: program_id.to_string(),
        candidates,
    }
}
