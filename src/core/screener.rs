//! Batch orchestration: normalize, extract and score each document, then rank
//! and aggregate the whole set.
//!
//! Per-candidate work is independent, so `screen_concurrent` fans it out over
//! blocking worker tasks. The only synchronization point is the final rank.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{BatchSettings, ExtractionSettings, ScoringSettings};
use crate::core::analytics::aggregate;
use crate::core::extractor::Extractor;
use crate::core::normalizer::normalize;
use crate::core::ranker::rank;
use crate::core::scoring::Scorer;
use crate::core::vocabulary::Vocabulary;
use crate::models::{
    AnalyticsSummary, CriteriaProfile, ExtractedProfile, RankedBatch, ResumeDocument, ScoreResult,
};

/// Extraction and score for a single document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub profile: ExtractedProfile,
    pub result: ScoreResult,
}

/// A ranked batch, its summary, and the candidates that were never scored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub batch: RankedBatch,
    pub summary: AnalyticsSummary,
    /// Not started before the deadline
    pub skipped: Vec<String>,
    /// Lost to a worker task that panicked
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Upper bound on blocking worker tasks
    pub workers: usize,
    /// Wall-clock budget measured from the start of the batch
    pub deadline: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            deadline: None,
        }
    }
}

impl From<&BatchSettings> for BatchOptions {
    fn from(settings: &BatchSettings) -> Self {
        Self {
            workers: settings.workers.max(1),
            deadline: settings.deadline_ms.map(Duration::from_millis),
        }
    }
}

/// Per-candidate outcome coming back from a worker
enum Scored {
    Done(ScoreResult),
    Skipped(String),
}

#[derive(Debug)]
pub struct Screener {
    vocabulary: Arc<Vocabulary>,
    extractor: Extractor,
    scorer: Scorer,
}

impl Screener {
    pub fn new(vocabulary: Arc<Vocabulary>, scoring: ScoringSettings, as_of: NaiveDate) -> Self {
        Self {
            extractor: Extractor::new(vocabulary.clone(), as_of),
            scorer: Scorer::new(&scoring),
            vocabulary,
        }
    }

    pub fn from_settings(
        vocabulary: Arc<Vocabulary>,
        scoring: &ScoringSettings,
        extraction: &ExtractionSettings,
    ) -> Self {
        Self {
            extractor: Extractor::from_settings(vocabulary.clone(), extraction),
            scorer: Scorer::new(scoring),
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn as_of(&self) -> NaiveDate {
        self.extractor.as_of()
    }

    pub fn pinned_as_of(&self) -> Option<NaiveDate> {
        self.extractor.pinned_as_of()
    }

    /// Extract and score one document. Never fails; unreadable text yields an
    /// all-unknown profile.
    pub fn evaluate(&self, document: &ResumeDocument, criteria: &CriteriaProfile) -> Evaluation {
        let normalized = normalize(&document.text, &self.vocabulary);
        let profile = self.extractor.extract(&normalized);

        if profile.experience_years.is_none() && profile.education_level.is_none() {
            warn!(
                "Candidate {}: experience and education could not be determined",
                document.candidate_id
            );
        }

        let result = self.scorer.score(&document.candidate_id, &profile, criteria);
        debug!(
            "Candidate {} scored {:.2} for {}",
            document.candidate_id,
            result.composite_score,
            criteria.program_id()
        );

        Evaluation { profile, result }
    }

    /// Sequential batch run
    pub fn screen(&self, documents: &[ResumeDocument], criteria: &CriteriaProfile) -> BatchOutcome {
        let results = documents
            .iter()
            .map(|doc| self.evaluate(doc, criteria).result)
            .collect();

        finish(criteria.program_id(), results, Vec::new(), Vec::new())
    }

    /// Batch run spread across blocking worker tasks.
    ///
    /// Each worker checks the deadline before starting a candidate; anything
    /// not started in time is reported in `skipped`. With no deadline the
    /// outcome equals `screen` over the same documents.
    pub async fn screen_concurrent(
        self: Arc<Self>,
        documents: Vec<ResumeDocument>,
        criteria: Arc<CriteriaProfile>,
        options: BatchOptions,
    ) -> BatchOutcome {
        let started = Instant::now();
        let deadline = options.deadline.map(|budget| started + budget);
        let total = documents.len();

        let workers = options.workers.clamp(1, total.max(1));
        let chunk_size = total.div_ceil(workers).max(1);

        let mut chunks: Vec<Vec<ResumeDocument>> = Vec::with_capacity(workers);
        let mut remaining = documents.into_iter().peekable();
        while remaining.peek().is_some() {
            chunks.push(remaining.by_ref().take(chunk_size).collect());
        }

        let mut handles = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let ids: Vec<String> = chunk.iter().map(|d| d.candidate_id.clone()).collect();
            let screener = Arc::clone(&self);
            let criteria = Arc::clone(&criteria);

            let handle = tokio::task::spawn_blocking(move || {
                chunk
                    .iter()
                    .map(|doc| match deadline {
                        Some(limit) if Instant::now() >= limit => {
                            Scored::Skipped(doc.candidate_id.clone())
                        }
                        _ => Scored::Done(screener.evaluate(doc, &criteria).result),
                    })
                    .collect::<Vec<_>>()
            });
            handles.push((ids, handle));
        }

        let (results, skipped, failed) = gather(handles).await;

        if !skipped.is_empty() {
            warn!(
                "Deadline reached for {}: {} of {} candidates skipped",
                criteria.program_id(),
                skipped.len(),
                total
            );
        }
        if !failed.is_empty() {
            warn!(
                "Worker failures for {}: {} of {} candidates not scored",
                criteria.program_id(),
                failed.len(),
                total
            );
        }

        let outcome = finish(criteria.program_id(), results, skipped, failed);
        info!(
            "Screened {} candidates for {} in {}ms ({} qualified)",
            outcome.batch.len(),
            criteria.program_id(),
            started.elapsed().as_millis(),
            outcome.summary.qualified
        );
        outcome
    }
}

/// Await every worker, splitting its candidates into scored, skipped at the
/// deadline, and lost to a failed worker
async fn gather(
    handles: Vec<(Vec<String>, JoinHandle<Vec<Scored>>)>,
) -> (Vec<ScoreResult>, Vec<String>, Vec<String>) {
    let mut results = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();

    for (ids, handle) in handles {
        match handle.await {
            Ok(scored) => {
                for item in scored {
                    match item {
                        Scored::Done(result) => results.push(result),
                        Scored::Skipped(id) => skipped.push(id),
                    }
                }
            }
            Err(e) => {
                error!("Screening worker failed, {} candidates not scored: {}", ids.len(), e);
                failed.extend(ids);
            }
        }
    }

    (results, skipped, failed)
}

fn finish(
    program_id: &str,
    results: Vec<ScoreResult>,
    skipped: Vec<String>,
    failed: Vec<String>,
) -> BatchOutcome {
    let batch = rank(program_id, results);
    let summary = aggregate(&batch);
    BatchOutcome {
        batch,
        summary,
        skipped,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DimensionWeights, EducationLevel, SkillRequirement};

    fn screener() -> Screener {
        Screener::new(
            Arc::new(Vocabulary::default()),
            ScoringSettings::default(),
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
        )
    }

    fn criteria() -> CriteriaProfile {
        CriteriaProfile::new(
            "software_development",
            vec![
                SkillRequirement::required("python", 1.0),
                SkillRequirement::preferred("sql", 1.0),
            ],
            3.0,
            EducationLevel::Bachelor,
            DimensionWeights::new(0.5, 0.3, 0.2),
        )
        .unwrap()
    }

    fn documents() -> Vec<ResumeDocument> {
        vec![
            ResumeDocument::new("c1", "Python developer, 2018–2021, Bachelor's in Computer Science"),
            ResumeDocument::new("c2", "SQL analyst\nExperience\nJan 2015 - Dec 2020\nEducation\nMSc Statistics"),
            ResumeDocument::new("c3", ""),
            ResumeDocument::new("c4", "Python, SQL, Docker. 10 years of experience. PhD in Physics"),
            ResumeDocument::new("c5", "Cashier. SSCE 2012"),
        ]
    }

    #[test]
    fn test_evaluate_single_line_resume() {
        let eval = screener().evaluate(&documents()[0], &criteria());

        assert_eq!(eval.profile.experience_years, Some(3));
        assert!((eval.result.composite_score - 75.0).abs() < 1e-9);
        assert!(!eval.result.is_disqualified());
    }

    #[test]
    fn test_screen_keeps_every_candidate() {
        let outcome = screener().screen(&documents(), &criteria());

        assert_eq!(outcome.batch.len(), 5);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.summary.total, 5);
        assert!(outcome.batch.get("c2").unwrap().disqualified);
        assert!(outcome.batch.get("c3").unwrap().disqualified);
        assert_eq!(outcome.batch.candidates[0].rank, 1);
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let screener = Arc::new(screener());
        let criteria = Arc::new(criteria());

        let sequential = screener.screen(&documents(), &criteria);
        let concurrent = Arc::clone(&screener)
            .screen_concurrent(
                documents(),
                criteria,
                BatchOptions {
                    workers: 3,
                    deadline: None,
                },
            )
            .await;

        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn test_past_deadline_skips_everything() {
        let outcome = Arc::new(screener())
            .screen_concurrent(
                documents(),
                Arc::new(criteria()),
                BatchOptions {
                    workers: 2,
                    deadline: Some(Duration::ZERO),
                },
            )
            .await;

        assert!(outcome.batch.is_empty());
        assert_eq!(outcome.summary.total, 0);
        let mut skipped = outcome.skipped.clone();
        skipped.sort();
        assert_eq!(skipped, vec!["c1", "c2", "c3", "c4", "c5"]);
        assert!(outcome.failed.is_empty());
    }

    #[tokio::test]
    async fn test_worker_failure_reported_apart_from_deadline() {
        let screener = Arc::new(screener());
        let criteria = Arc::new(criteria());

        let healthy = {
            let screener = Arc::clone(&screener);
            let criteria = Arc::clone(&criteria);
            tokio::task::spawn_blocking(move || {
                vec![
                    Scored::Done(screener.evaluate(&documents()[0], &criteria).result),
                    Scored::Skipped("c2".to_string()),
                ]
            })
        };
        let crashed = tokio::task::spawn_blocking(|| -> Vec<Scored> { panic!("worker crashed") });

        let (results, skipped, failed) = gather(vec![
            (vec!["c1".to_string(), "c2".to_string()], healthy),
            (vec!["c4".to_string(), "c5".to_string()], crashed),
        ])
        .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].candidate_id, "c1");
        assert_eq!(skipped, vec!["c2"]);
        assert_eq!(failed, vec!["c4", "c5"]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let outcome = Arc::new(screener())
            .screen_concurrent(vec![], Arc::new(criteria()), BatchOptions::default())
            .await;

        assert!(outcome.batch.is_empty());
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.summary.mean, None);
    }
}
