use crate::config::ScoringSettings;
use crate::models::{
    CriteriaProfile, Dimension, EducationLevel, ExtractedProfile, ScoreBreakdown, ScoreResult,
};

/// One scoring dimension.
///
/// Each strategy maps a profile and the program criteria to a sub-score in
/// 0-100 and must be total: every `ExtractedProfile`, including one with all
/// fields unknown, gets a score.
pub trait DimensionScorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    fn score(&self, profile: &ExtractedProfile, criteria: &CriteriaProfile) -> f64;
}

/// Weighted share of the program's skills the candidate has
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillsDimension;

impl DimensionScorer for SkillsDimension {
    fn dimension(&self) -> Dimension {
        Dimension::Skills
    }

    fn score(&self, profile: &ExtractedProfile, criteria: &CriteriaProfile) -> f64 {
        let total: f64 = criteria.skills().iter().map(|s| s.weight).sum();
        if total <= 0.0 {
            return 100.0;
        }

        let matched: f64 = criteria
            .skills()
            .iter()
            .filter(|s| profile.has_skill(&s.name))
            .map(|s| s.weight)
            .sum();

        matched / total * 100.0
    }
}

/// Saturating linear ramp towards the program's minimum (plus margin)
#[derive(Debug, Clone, Copy)]
pub struct ExperienceDimension {
    pub neutral_score: f64,
    pub margin_years: f64,
}

impl DimensionScorer for ExperienceDimension {
    fn dimension(&self) -> Dimension {
        Dimension::Experience
    }

    fn score(&self, profile: &ExtractedProfile, criteria: &CriteriaProfile) -> f64 {
        let Some(years) = profile.experience_years else {
            return self.neutral_score;
        };

        let threshold = criteria.min_experience_years() + self.margin_years;
        if threshold <= 0.0 {
            return 100.0;
        }

        (years as f64 / threshold).min(1.0) * 100.0
    }
}

/// Full credit at or above the required level, partial credit per level below
#[derive(Debug, Clone, Copy)]
pub struct EducationDimension {
    pub neutral_score: f64,
    pub penalty_per_level: f64,
}

impl DimensionScorer for EducationDimension {
    fn dimension(&self) -> Dimension {
        Dimension::Education
    }

    fn score(&self, profile: &ExtractedProfile, criteria: &CriteriaProfile) -> f64 {
        let required = criteria.min_education();

        let Some(level) = profile.education_level else {
            return if required == EducationLevel::None {
                100.0
            } else {
                self.neutral_score
            };
        };

        if level >= required {
            return 100.0;
        }

        let distance = (required.rank() - level.rank()) as f64;
        (100.0 - distance * self.penalty_per_level).max(0.0)
    }
}

/// Combines the dimension strategies into a composite score
pub struct Scorer {
    dimensions: Vec<Box<dyn DimensionScorer>>,
}

impl Scorer {
    pub fn new(settings: &ScoringSettings) -> Self {
        Self {
            dimensions: vec![
                Box::new(SkillsDimension),
                Box::new(ExperienceDimension {
                    neutral_score: settings.neutral_experience_score,
                    margin_years: settings.experience_margin_years,
                }),
                Box::new(EducationDimension {
                    neutral_score: settings.neutral_education_score,
                    penalty_per_level: settings.education_penalty_per_level,
                }),
            ],
        }
    }

    /// Score one candidate.
    ///
    /// Pure function of `profile` and `criteria`: no other candidate and no
    /// ambient state affects the result.
    pub fn score(
        &self,
        candidate_id: &str,
        profile: &ExtractedProfile,
        criteria: &CriteriaProfile,
    ) -> ScoreResult {
        let weights = criteria.weights();

        let mut breakdown = ScoreBreakdown::default();
        let mut composite = 0.0;
        for dimension in &self.dimensions {
            let value = dimension.score(profile, criteria).clamp(0.0, 100.0);
            breakdown.set(dimension.dimension(), value);
            composite += value * weights.get(dimension.dimension());
        }

        let mut matched_skills = Vec::new();
        let mut matched_required = Vec::new();
        let mut missing_required = Vec::new();

        // criteria skills are sorted by name, so these lists are too
        for requirement in criteria.skills() {
            let present = profile.has_skill(&requirement.name);
            if present {
                matched_skills.push(requirement.name.clone());
            }
            if requirement.required {
                if present {
                    matched_required.push(requirement.name.clone());
                } else {
                    missing_required.push(requirement.name.clone());
                }
            }
        }

        ScoreResult {
            candidate_id: candidate_id.to_string(),
            program_id: criteria.program_id().to_string(),
            composite_score: composite.clamp(0.0, 100.0),
            breakdown,
            matched_skills,
            matched_required,
            missing_required,
            experience_known: profile.experience_years.is_some(),
            skill_categories: profile.category_counts(),
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(&ScoringSettings::default())
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dimensions: Vec<_> = self.dimensions.iter().map(|d| d.dimension()).collect();
        f.debug_struct("Scorer").field("dimensions", &dimensions).finish()
    }
}
