use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::resume::error::AnalysisError;
use crate::resume::extract::DocumentFormat;
use crate::resume::models::AnalysisResult;
use crate::resume::pipeline::{run_analysis, AnalysisLimits};
use crate::resume::report::{render_pdf, report_filename};
use crate::state::AppState;
use crate::store::{timestamp, Collection};

/// Multipart form field carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "file";
/// Source name printed on reports rendered from posted analyses.
const REPORT_SOURCE_NAME: &str = "resume.pdf";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis_id: String,
    pub analysis: AnalysisResult,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub user_id: String,
    pub filename: String,
    pub created_at: String,
    pub analysis: AnalysisResult,
}

/// Reads the upload field, counting bytes against `limit` as they arrive so
/// an oversized file is rejected without buffering the rest of the body.
async fn read_upload(multipart: &mut Multipart, limit: usize) -> Result<(String, Bytes), AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        // Format is decided before size.
        DocumentFormat::from_filename(&filename)?;

        let mut buf = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, limit))?
        {
            buf.extend_from_slice(&chunk);
            if buf.len() > limit {
                return Err(AnalysisError::OversizedInput {
                    size: buf.len(),
                    limit,
                }
                .into());
            }
        }
        return Ok((filename, buf.freeze()));
    }
    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AnalysisError::OversizedInput {
            size: limit + 1,
            limit,
        }
        .into()
    } else {
        AppError::Validation(e.body_text())
    }
}

/// POST /api/resume/analyze
///
/// Auth is optional; the analysis is persisted only for identified callers.
pub async fn handle_analyze(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let limits = AnalysisLimits {
        max_upload_bytes: state.config.max_upload_bytes,
    };
    let (filename, bytes) = read_upload(&mut multipart, limits.max_upload_bytes).await?;
    info!(filename = %filename, size = bytes.len(), "Resume upload received");

    let name = filename.clone();
    let analysis = tokio::task::spawn_blocking(move || {
        let mut rng = rand::rng();
        run_analysis(&bytes, &name, &limits, &mut rng, &mut |stage| {
            info!(stage = ?stage, "{}", stage.description());
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    let analysis_id = Uuid::new_v4().to_string();
    if let Some(user) = user {
        let stored = StoredAnalysis {
            user_id: user.uid,
            filename,
            created_at: timestamp(Utc::now()),
            analysis: analysis.clone(),
        };
        let data = serde_json::to_value(&stored).map_err(|e| AppError::Internal(e.into()))?;
        state
            .store
            .put(Collection::ResumeAnalyses, &analysis_id, data)
            .await?;
        info!(analysis_id = %analysis_id, "Resume analysis stored");
    }

    Ok(Json(AnalyzeResponse {
        analysis_id,
        analysis,
        message: "Resume analyzed successfully".to_string(),
    }))
}

/// GET /api/resume/analysis/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doc = state
        .store
        .get(Collection::ResumeAnalyses, &id)
        .await?
        .filter(|doc| doc.is_owned_by(&user.uid))
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))?;
    Ok(Json(doc.data))
}

/// GET /api/resume/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Value>>, AppError> {
    let docs = state
        .store
        .list_by_owner(Collection::ResumeAnalyses, &user.uid)
        .await?;
    Ok(Json(docs.into_iter().map(|d| d.into_json_with_id()).collect()))
}

/// POST /api/resume/analysis/pdf
pub async fn handle_analysis_pdf(Json(analysis): Json<AnalysisResult>) -> Result<Response, AppError> {
    let now = Utc::now();
    let pdf = tokio::task::spawn_blocking(move || render_pdf(&analysis, REPORT_SOURCE_NAME, now))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Render(e.to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", report_filename(now));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}
