use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{ResumeDocument, SourceMetadata};

/// Request to extract and score a single resume
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeCandidateRequest {
    #[validate(length(min = 1, max = 128))]
    #[serde(alias = "candidate_id", rename = "candidateId", default)]
    pub candidate_id: Option<String>,
    #[validate(length(min = 1, max = 64))]
    #[serde(alias = "program_id", rename = "programId")]
    pub program_id: String,
    #[validate(length(max = 200000))]
    pub text: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl AnalyzeCandidateRequest {
    /// Build the document, generating an id when the caller sent none
    pub fn to_document(&self) -> ResumeDocument {
        let id = self
            .candidate_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        with_filename(ResumeDocument::new(id, self.text.clone()), &self.filename)
    }
}

/// One resume inside a batch request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CandidateInput {
    #[validate(length(min = 1, max = 128))]
    #[serde(alias = "candidate_id", rename = "candidateId")]
    pub candidate_id: String,
    #[validate(length(max = 200000))]
    pub text: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl CandidateInput {
    pub fn into_document(self) -> ResumeDocument {
        with_filename(ResumeDocument::new(self.candidate_id, self.text), &self.filename)
    }
}

/// Request to score and rank a batch of resumes for one program
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankBatchRequest {
    #[validate(length(min = 1, max = 64))]
    #[serde(alias = "program_id", rename = "programId")]
    pub program_id: String,
    #[validate(length(min = 1, max = 500))]
    #[validate(nested)]
    pub candidates: Vec<CandidateInput>,
}

fn with_filename(document: ResumeDocument, filename: &Option<String>) -> ResumeDocument {
    match filename {
        Some(name) => document.with_source(SourceMetadata {
            filename: Some(name.clone()),
            uploaded_at: Some(chrono::Utc::now()),
        }),
        None => document,
    }
}
