use std::collections::BTreeMap;

use crate::models::{AnalyticsSummary, RankedBatch, ScoreBreakdown, ScoreBucket};

/// Width of each histogram bucket, in score points
const BUCKET_WIDTH: f64 = 10.0;
const BUCKET_COUNT: usize = 10;

/// Summary statistics over a ranked batch.
///
/// Pure: the same batch always yields the same summary.
pub fn aggregate(batch: &RankedBatch) -> AnalyticsSummary {
    let total = batch.len();
    let disqualified = batch.candidates.iter().filter(|c| c.disqualified).count();
    let experience_unknown = batch
        .candidates
        .iter()
        .filter(|c| !c.result.experience_known)
        .count();

    let mut scores: Vec<f64> = batch
        .candidates
        .iter()
        .map(|c| c.result.composite_score)
        .collect();
    scores.sort_by(f64::total_cmp);

    let mut skill_frequency: BTreeMap<String, usize> = BTreeMap::new();
    let mut category_frequency: BTreeMap<String, usize> = BTreeMap::new();
    let mut missing_required_frequency: BTreeMap<String, usize> = BTreeMap::new();
    for candidate in &batch.candidates {
        for skill in &candidate.result.matched_skills {
            *skill_frequency.entry(skill.clone()).or_insert(0) += 1;
        }
        for (category, _) in candidate.result.skill_categories.iter().filter(|(_, n)| **n > 0) {
            *category_frequency.entry(category.clone()).or_insert(0) += 1;
        }
        for skill in &candidate.result.missing_required {
            *missing_required_frequency.entry(skill.clone()).or_insert(0) += 1;
        }
    }

    AnalyticsSummary {
        program_id: batch.program_id.clone(),
        total,
        qualified: total - disqualified,
        disqualified,
        experience_unknown,
        mean: mean(&scores),
        median: median(&scores),
        min: scores.first().copied(),
        max: scores.last().copied(),
        dimension_means: dimension_means(batch),
        skill_frequency,
        category_frequency,
        missing_required_frequency,
        histogram: histogram(&scores),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of already sorted values
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

fn dimension_means(batch: &RankedBatch) -> Option<ScoreBreakdown> {
    if batch.is_empty() {
        return None;
    }

    let n = batch.len() as f64;
    let sum = batch
        .candidates
        .iter()
        .fold(ScoreBreakdown::default(), |acc, c| ScoreBreakdown {
            skills: acc.skills + c.result.breakdown.skills,
            experience: acc.experience + c.result.breakdown.experience,
            education: acc.education + c.result.breakdown.education,
        });

    Some(ScoreBreakdown {
        skills: sum.skills / n,
        experience: sum.experience / n,
        education: sum.education / n,
    })
}

/// Ten buckets `[0,10) .. [90,100]`; 100 lands in the last one
fn histogram(scores: &[f64]) -> Vec<ScoreBucket> {
    let mut buckets: Vec<ScoreBucket> = (0..BUCKET_COUNT)
        .map(|i| ScoreBucket {
            lower: i as f64 * BUCKET_WIDTH,
            upper: (i + 1) as f64 * BUCKET_WIDTH,
            count: 0,
        })
        .collect();

    for score in scores {
        let index = ((score / BUCKET_WIDTH).floor().max(0.0) as usize).min(BUCKET_COUNT - 1);
        buckets[index].count += 1;
    }

    buckets
}
