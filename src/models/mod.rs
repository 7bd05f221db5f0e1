// Model exports
pub mod criteria;
pub mod domain;
pub mod requests;
pub mod responses;

pub use criteria::{CriteriaProfile, DimensionWeights, ProgramCatalog, SkillRequirement};
pub use domain::{
    AnalyticsSummary, Dimension, EducationLevel, ExperienceEvidence, ExtractedProfile, RankedBatch,
    RankedCandidate, ResumeDocument, ScoreBreakdown, ScoreBucket, ScoreResult, SourceMetadata,
};
pub use requests::{AnalyzeCandidateRequest, CandidateInput, RankBatchRequest};
pub use responses::{AnalyzeCandidateResponse, ErrorResponse, HealthResponse, ProgramsResponse, RankBatchResponse};
