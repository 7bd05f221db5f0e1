//! Candidate Screener - rule-based resume scoring for training program intake
//!
//! This library turns plain resume text into a structured profile (skills,
//! years of experience, education), scores it against a program's criteria
//! and ranks whole applicant batches with summary analytics.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{aggregate, normalize, rank, BatchOptions, BatchOutcome, Evaluation, Extractor, Scorer, Screener, Vocabulary};
pub use error::{ConfigurationError, SettingsError};
pub use models::{
    AnalyticsSummary, CriteriaProfile, DimensionWeights, EducationLevel, ExtractedProfile, ProgramCatalog,
    RankedBatch, ResumeDocument, ScoreResult, SkillRequirement,
};
