// Unit tests for Candidate Screener

use candidate_screener::config::{parse_programs_toml, ScoringSettings, Settings};
use candidate_screener::core::experience::{find_date_ranges, union_months, years_of_experience};
use candidate_screener::core::{normalize, rank, Extractor, Scorer, SectionKind, Vocabulary};
use candidate_screener::error::ConfigurationError;
use candidate_screener::models::{
    CriteriaProfile, DimensionWeights, EducationLevel, ExperienceEvidence, ExtractedProfile,
    ProgramCatalog, ScoreResult, SkillRequirement,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
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

fn profile(skills: &[&str], years: Option<u32>, level: Option<EducationLevel>) -> ExtractedProfile {
    ExtractedProfile {
        skills: skills.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        experience_years: years,
        experience_evidence: ExperienceEvidence::Undetermined,
        education_level: level,
        field_of_study: None,
        skill_categories: Default::default(),
    }
}

#[test]
fn test_concurrent_jobs_are_not_double_counted() {
    let text = "acme corp jan 2020 - jan 2022\nglobex ltd jan 2020 - jan 2022";
    let spans = find_date_ranges(text, as_of());

    assert_eq!(spans.len(), 2);
    assert_eq!(union_months(&spans), 25);

    let (years, _) = years_of_experience(text, text, as_of());
    assert_eq!(years, Some(2));
}

#[test]
fn test_open_ended_range_runs_to_as_of() {
    let (years, evidence) = years_of_experience("jan 2024 - present", "", as_of());
    assert_eq!(years, Some(2));
    assert!(matches!(evidence, ExperienceEvidence::DateRanges { ranges: 1, .. }));
}

#[test]
fn test_unknown_and_zero_experience_score_differently() {
    let scorer = Scorer::default();
    let criteria = criteria();

    let unknown = scorer.score("u", &profile(&[], None, None), &criteria);
    let zero = scorer.score("z", &profile(&[], Some(0), None), &criteria);

    assert_eq!(unknown.breakdown.experience, 50.0);
    assert_eq!(zero.breakdown.experience, 0.0);
    assert!(!unknown.experience_known);
    assert!(zero.experience_known);
}

#[test]
fn test_composite_always_in_range() {
    let scorer = Scorer::default();
    let criteria = criteria();

    let mut profiles = vec![ExtractedProfile::unknown()];
    for years in [None, Some(0), Some(1), Some(3), Some(40)] {
        for level in [None, Some(EducationLevel::None), Some(EducationLevel::Secondary), Some(EducationLevel::Doctorate)] {
            for skills in [&[][..], &["python"][..], &["python", "sql", "docker"][..]] {
                profiles.push(profile(skills, years, level));
            }
        }
    }

    for p in &profiles {
        let result = scorer.score("c", p, &criteria);
        assert!(
            (0.0..=100.0).contains(&result.composite_score),
            "score {} out of range for {:?}",
            result.composite_score,
            p
        );
    }
}

#[test]
fn test_ranking_is_permutation_invariant() {
    let scorer = Scorer::default();
    let criteria = criteria();

    let results: Vec<ScoreResult> = vec![
        scorer.score("a", &profile(&["python"], Some(3), None), &criteria),
        scorer.score("b", &profile(&["sql"], Some(5), Some(EducationLevel::Master)), &criteria),
        scorer.score("c", &profile(&["python", "sql"], Some(1), Some(EducationLevel::Bachelor)), &criteria),
        scorer.score("d", &profile(&["python"], Some(3), None), &criteria),
        scorer.score("e", &ExtractedProfile::unknown(), &criteria),
    ];

    let forward = rank("software_development", results.clone());
    let mut reversed = results.clone();
    reversed.reverse();
    let backward = rank("software_development", reversed);
    let mut rotated = results;
    rotated.rotate_left(2);
    let shifted = rank("software_development", rotated);

    assert_eq!(forward, backward);
    assert_eq!(forward, shifted);
    // equal scores fall back to candidate id
    let a = forward.get("a").unwrap().rank;
    let d = forward.get("d").unwrap().rank;
    assert_eq!(d, a + 1);
}

#[test]
fn test_weights_must_sum_to_one() {
    let err = CriteriaProfile::new(
        "p",
        vec![SkillRequirement::required("python", 1.0)],
        1.0,
        EducationLevel::None,
        DimensionWeights::new(0.5, 0.5, 0.5),
    )
    .unwrap_err();

    assert!(matches!(err, ConfigurationError::WeightSum { .. }));
}

#[test]
fn test_catalog_rejects_unknown_skill() {
    let vocabulary = Vocabulary::default();
    let profile = CriteriaProfile::new(
        "p",
        vec![SkillRequirement::required("cobol", 1.0)],
        0.0,
        EducationLevel::None,
        DimensionWeights::default(),
    )
    .unwrap();

    let err = ProgramCatalog::new().register(profile, &vocabulary).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownSkill { .. }));
}

#[test]
fn test_normalizer_finds_sections() {
    let vocabulary = Vocabulary::default();
    let text = normalize("EXPERIENCE\n  Acme   Corp  \n\nEducation:\nBSc Physics", &vocabulary);

    assert!(text.has_section(&SectionKind::Experience));
    assert!(text.has_section(&SectionKind::Education));
    assert!(text.full_text().contains("acme corp"));
}

#[test]
fn test_extractor_end_to_end() {
    let vocabulary = Arc::new(Vocabulary::default());
    let extractor = Extractor::new(vocabulary.clone(), as_of());
    let text = normalize("Python developer, 2018–2021, Bachelor's in Computer Science", &vocabulary);
    let profile = extractor.extract(&text);

    let result = Scorer::default().score("cand", &profile, &criteria());
    assert!((result.composite_score - 75.0).abs() < 1e-9);
    assert!(!result.is_disqualified());
}

#[test]
fn test_default_config_file_loads() {
    let settings = Settings::load_from("config/default.toml").unwrap();
    let programs = settings.all_programs().unwrap();

    let catalog = ProgramCatalog::from_configs(&programs, &Vocabulary::default()).unwrap();
    assert_eq!(catalog.ids(), vec!["data_science", "software_development"]);

    let software = catalog.get("software_development").unwrap();
    assert_eq!(software.required_skills().count(), 4);
    assert_eq!(software.skills().len(), 8);
    assert_eq!(software.name(), "Software Development Track");
}

#[test]
fn test_parse_programs_document() {
    let programs = parse_programs_toml(
        r#"
[[programs]]
id = "cloud"
min_education = "bachelor"

[[programs.skills]]
name = "aws"
required = true

[[programs.skills]]
name = "docker"
weight = 2.0
"#,
    )
    .unwrap();

    assert_eq!(programs.len(), 1);
    let profile = CriteriaProfile::from_config(&programs[0]).unwrap();
    assert_eq!(profile.min_education(), EducationLevel::Bachelor);
    assert_eq!(profile.skills()[1].weight, 2.0);
    assert!(profile.skills()[0].required);
}

#[test]
fn test_scoring_settings_validation() {
    let bad = ScoringSettings {
        neutral_experience_score: 150.0,
        ..ScoringSettings::default()
    };
    assert!(bad.validate().is_err());
    assert!(ScoringSettings::default().validate().is_ok());
}
