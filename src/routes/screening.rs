use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

use crate::config::BatchSettings;
use crate::core::{BatchOptions, Screener};
use crate::models::{
    AnalyzeCandidateRequest, AnalyzeCandidateResponse, CriteriaProfile, ErrorResponse, HealthResponse,
    ProgramCatalog, ProgramsResponse, RankBatchRequest, RankBatchResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub screener: Arc<Screener>,
    pub catalog: Arc<ProgramCatalog>,
    pub batch: BatchSettings,
}

/// Configure all screening routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/programs", web::get().to(list_programs))
        .route("/candidates/analyze", web::post().to(analyze_candidate))
        .route("/batches/rank", web::post().to(rank_batch));
}

fn error_response(status: u16, error: &str, message: impl Into<String>) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status,
    };

    match status {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn find_program(state: &AppState, program_id: &str) -> Result<Arc<CriteriaProfile>, HttpResponse> {
    state.catalog.get(program_id).ok_or_else(|| {
        tracing::info!("Unknown program requested: {}", program_id);
        error_response(
            404,
            "Program not found",
            format!("No program with id '{}' (known: {})", program_id, state.catalog.ids().join(", ")),
        )
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        programs: state.catalog.ids(),
    })
}

/// GET /api/v1/programs
async fn list_programs(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ProgramsResponse {
        programs: state.catalog.iter().map(|p| p.as_ref().clone()).collect(),
    })
}

/// Analyze a single resume
///
/// POST /api/v1/candidates/analyze
///
/// Request body:
/// ```json
/// {
///   "candidateId": "string (optional)",
///   "programId": "software_development",
///   "text": "plain resume text",
///   "filename": "cv.pdf"
/// }
/// ```
async fn analyze_candidate(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeCandidateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for analyze request: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    let criteria = match find_program(&state, &req.program_id) {
        Ok(criteria) => criteria,
        Err(response) => return response,
    };

    let started = Instant::now();
    let document = req.to_document();
    let screener = Arc::clone(&state.screener);

    let evaluation = match web::block(move || screener.evaluate(&document, &criteria)).await {
        Ok(evaluation) => evaluation,
        Err(e) => {
            tracing::error!("Analysis task failed: {}", e);
            return error_response(500, "Analysis failed", e.to_string());
        }
    };

    let processing_time_ms = started.elapsed().as_millis() as u64;
    tracing::info!(
        "Analyzed candidate {} for {}: score {:.2} in {}ms",
        evaluation.result.candidate_id,
        evaluation.result.program_id,
        evaluation.result.composite_score,
        processing_time_ms
    );

    HttpResponse::Ok().json(AnalyzeCandidateResponse {
        candidate_id: evaluation.result.candidate_id.clone(),
        program_id: evaluation.result.program_id.clone(),
        disqualified: evaluation.result.is_disqualified(),
        profile: evaluation.profile,
        score: evaluation.result,
        processing_time_ms,
    })
}

/// Score and rank a batch of resumes
///
/// POST /api/v1/batches/rank
///
/// Request body:
/// ```json
/// {
///   "programId": "data_science",
///   "candidates": [{"candidateId": "a1", "text": "...", "filename": "a1.pdf"}]
/// }
/// ```
async fn rank_batch(
    state: web::Data<AppState>,
    req: web::Json<RankBatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for batch request: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    if req.candidates.len() > state.batch.max_candidates {
        return error_response(
            400,
            "Validation failed",
            format!(
                "At most {} candidates per batch, got {}",
                state.batch.max_candidates,
                req.candidates.len()
            ),
        );
    }

    let criteria = match find_program(&state, &req.program_id) {
        Ok(criteria) => criteria,
        Err(response) => return response,
    };

    let req = req.into_inner();
    tracing::info!("Ranking {} candidates for {}", req.candidates.len(), req.program_id);

    let documents = req.candidates.into_iter().map(|c| c.into_document()).collect();
    let outcome = Arc::clone(&state.screener)
        .screen_concurrent(documents, criteria, BatchOptions::from(&state.batch))
        .await;

    HttpResponse::Ok().json(RankBatchResponse {
        batch: outcome.batch,
        summary: outcome.summary,
        skipped: outcome.skipped,
        failed: outcome.failed,
    })
}
