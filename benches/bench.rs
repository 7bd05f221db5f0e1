// Criterion benchmarks for Candidate Screener

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use candidate_screener::config::ScoringSettings;
use candidate_screener::core::{normalize, rank, Extractor, Scorer, Screener, Vocabulary};
use candidate_screener::models::{
    CriteriaProfile, DimensionWeights, EducationLevel, ResumeDocument, SkillRequirement,
};
use std::sync::Arc;

const RESUME: &str = "\
Chidi Okafor
Professional Summary
Backend developer with 6 years of experience building APIs.

Work Experience
Senior Engineer, Flutterwave - Jan 2022 - Present
Software Engineer, Interswitch - March 2018 - Dec 2021
Intern, Andela - 06/2017 to 12/2017

Education
B.Eng Electrical and Electronics Engineering, University of Nigeria, 2012 - 2017

Skills: Python, Django, Flask, PostgreSQL, Docker, Kubernetes, Git, JavaScript, React
";

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

fn create_criteria() -> CriteriaProfile {
    CriteriaProfile::new(
        "software_development",
        vec![
            SkillRequirement::required("python", 1.0),
            SkillRequirement::required("javascript", 1.0),
            SkillRequirement::required("sql", 1.0),
            SkillRequirement::required("git", 1.0),
            SkillRequirement::preferred("react", 0.5),
            SkillRequirement::preferred("node.js", 0.5),
            SkillRequirement::preferred("django", 0.5),
            SkillRequirement::preferred("flask", 0.5),
        ],
        4.0,
        EducationLevel::Secondary,
        DimensionWeights::new(0.5, 0.3, 0.2),
    )
    .unwrap()
}

fn create_document(id: usize) -> ResumeDocument {
    // vary the text a little so candidates do not all tie
    let extra = match id % 3 {
        0 => "\nCertifications\nAWS Certified Developer",
        1 => "\nProjects\nSQL reporting pipeline with Pandas",
        _ => "",
    };
    ResumeDocument::new(format!("cand-{:04}", id), format!("{}{}", RESUME, extra))
}

fn bench_normalize(c: &mut Criterion) {
    let vocabulary = Vocabulary::default();

    c.bench_function("normalize_resume", |b| {
        b.iter(|| normalize(black_box(RESUME), &vocabulary));
    });
}

fn bench_extract(c: &mut Criterion) {
    let vocabulary = Arc::new(Vocabulary::default());
    let extractor = Extractor::new(vocabulary.clone(), as_of());
    let text = normalize(RESUME, &vocabulary);

    c.bench_function("extract_profile", |b| {
        b.iter(|| extractor.extract(black_box(&text)));
    });
}

fn bench_score(c: &mut Criterion) {
    let vocabulary = Arc::new(Vocabulary::default());
    let extractor = Extractor::new(vocabulary.clone(), as_of());
    let profile = extractor.extract(&normalize(RESUME, &vocabulary));
    let criteria = create_criteria();
    let scorer = Scorer::new(&ScoringSettings::default());

    c.bench_function("score_profile", |b| {
        b.iter(|| scorer.score("cand", black_box(&profile), black_box(&criteria)));
    });
}

fn bench_screening(c: &mut Criterion) {
    let screener = Screener::new(Arc::new(Vocabulary::default()), ScoringSettings::default(), as_of());
    let criteria = create_criteria();

    let mut group = c.benchmark_group("screening");

    for candidate_count in [10, 50, 100, 500].iter() {
        let documents: Vec<ResumeDocument> = (0..*candidate_count).map(create_document).collect();

        group.bench_with_input(
            BenchmarkId::new("screen", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| screener.screen(black_box(&documents), black_box(&criteria)));
            },
        );
    }

    group.finish();
}

fn bench_ranking(c: &mut Criterion) {
    let screener = Screener::new(Arc::new(Vocabulary::default()), ScoringSettings::default(), as_of());
    let criteria = create_criteria();
    let results: Vec<_> = (0..500)
        .map(|i| screener.evaluate(&create_document(i), &criteria).result)
        .collect();

    c.bench_function("rank_500_candidates", |b| {
        b.iter(|| rank("software_development", black_box(results.clone())));
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_extract,
    bench_score,
    bench_screening,
    bench_ranking
);

criterion_main!(benches);
