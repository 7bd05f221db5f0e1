use serde::{Deserialize, Serialize};

use crate::models::criteria::CriteriaProfile;
use crate::models::domain::{AnalyticsSummary, ExtractedProfile, RankedBatch, ScoreResult};

/// Response for the single-candidate analysis endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCandidateResponse {
    pub candidate_id: String,
    pub program_id: String,
    pub profile: ExtractedProfile,
    pub score: ScoreResult,
    pub disqualified: bool,
    pub processing_time_ms: u64,
}

/// Response for the batch ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankBatchResponse {
    pub batch: RankedBatch,
    pub summary: AnalyticsSummary,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Configured programs
#[derive(Debug, Clone, Serialize)]
pub struct ProgramsResponse {
    pub programs: Vec<CriteriaProfile>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub programs: Vec<String>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
