use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Raw resume text as handed over by the ingestion layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub text: String,
    #[serde(default)]
    pub source: Option<SourceMetadata>,
}

impl ResumeDocument {
    pub fn new(candidate_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            text: text.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }
}

/// Where a document came from, if the caller knows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(rename = "uploadedAt", default)]
    pub uploaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Ordinal education level: none < secondary < bachelor < master < doctorate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    None,
    Secondary,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 5] = [
        EducationLevel::None,
        EducationLevel::Secondary,
        EducationLevel::Bachelor,
        EducationLevel::Master,
        EducationLevel::Doctorate,
    ];

    /// Position on the ordinal scale, `None` being 0
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EducationLevel::None => "none",
            EducationLevel::Secondary => "secondary",
            EducationLevel::Bachelor => "bachelor",
            EducationLevel::Master => "master",
            EducationLevel::Doctorate => "doctorate",
        }
    }
}

impl Default for EducationLevel {
    fn default() -> Self {
        EducationLevel::None
    }
}

/// How the experience figure of a profile was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExperienceEvidence {
    /// Summed from merged date ranges
    DateRanges { ranges: usize, months: u32 },
    /// Taken from an explicit "N years of experience" statement
    Statement,
    /// Nothing parsable was found; `experience_years` is null
    Undetermined,
}

/// Structured signals pulled from one resume.
///
/// A `None` field means the fact could not be determined, which is not the
/// same as a confirmed zero or absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    pub skills: BTreeSet<String>,
    #[serde(rename = "experienceYears")]
    pub experience_years: Option<u32>,
    #[serde(rename = "experienceEvidence")]
    pub experience_evidence: ExperienceEvidence,
    #[serde(rename = "educationLevel")]
    pub education_level: Option<EducationLevel>,
    #[serde(rename = "fieldOfStudy")]
    pub field_of_study: Option<String>,
    /// Category of each detected skill that has one
    #[serde(rename = "skillCategories", default)]
    pub skill_categories: BTreeMap<String, String>,
}

impl ExtractedProfile {
    /// Profile with every field unknown
    pub fn unknown() -> Self {
        Self {
            skills: BTreeSet::new(),
            experience_years: None,
            experience_evidence: ExperienceEvidence::Undetermined,
            education_level: None,
            field_of_study: None,
            skill_categories: BTreeMap::new(),
        }
    }

    /// Number of detected skills per category
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for category in self.skill_categories.values() {
            *counts.entry(category.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }
}

impl Default for ExtractedProfile {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Scoring dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Skills,
    Experience,
    Education,
}

impl Dimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Skills => "skills",
            Dimension::Experience => "experience",
            Dimension::Education => "education",
        }
    }
}

/// Per-dimension sub-scores, each in 0-100
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Skills => self.skills,
            Dimension::Experience => self.experience,
            Dimension::Education => self.education,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: f64) {
        match dimension {
            Dimension::Skills => self.skills = value,
            Dimension::Experience => self.experience = value,
            Dimension::Education => self.education = value,
        }
    }
}

/// Score of one candidate against one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "programId")]
    pub program_id: String,
    #[serde(rename = "compositeScore")]
    pub composite_score: f64,
    pub breakdown: ScoreBreakdown,
    /// Every criteria skill the candidate has, required or not
    #[serde(rename = "matchedSkills")]
    pub matched_skills: Vec<String>,
    #[serde(rename = "matchedRequired")]
    pub matched_required: Vec<String>,
    #[serde(rename = "missingRequired")]
    pub missing_required: Vec<String>,
    #[serde(rename = "experienceKnown")]
    pub experience_known: bool,
    /// Detected skills per category, over the whole resume
    #[serde(rename = "skillCategories", default)]
    pub skill_categories: BTreeMap<String, usize>,
}

impl ScoreResult {
    pub fn is_disqualified(&self) -> bool {
        !self.missing_required.is_empty()
    }
}

/// One entry of a ranked batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub disqualified: bool,
    pub result: ScoreResult,
}

/// Totally ordered set of scored candidates for one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBatch {
    #[serde(rename = "programId")]
    pub program_id: String,
    pub candidates: Vec<RankedCandidate>,
}

impl RankedBatch {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates not missing any required skill, still in rank order
    pub fn qualified(&self) -> impl Iterator<Item = &RankedCandidate> {
        self.candidates.iter().filter(|c| !c.disqualified)
    }

    pub fn get(&self, candidate_id: &str) -> Option<&RankedCandidate> {
        self.candidates
            .iter()
            .find(|c| c.result.candidate_id == candidate_id)
    }
}

/// Fixed-width histogram bucket; `upper` is exclusive except for the last one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Aggregate statistics over a ranked batch, consumed by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(rename = "programId")]
    pub program_id: String,
    pub total: usize,
    pub qualified: usize,
    pub disqualified: usize,
    #[serde(rename = "experienceUnknown")]
    pub experience_unknown: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(rename = "dimensionMeans")]
    pub dimension_means: Option<ScoreBreakdown>,
    #[serde(rename = "skillFrequency")]
    pub skill_frequency: BTreeMap<String, usize>,
    /// Candidates with at least one skill in each category
    #[serde(rename = "categoryFrequency")]
    pub category_frequency: BTreeMap<String, usize>,
    #[serde(rename = "missingRequiredFrequency")]
    pub missing_required_frequency: BTreeMap<String, usize>,
    pub histogram: Vec<ScoreBucket>,
}
