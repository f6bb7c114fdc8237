use actix_web::{post, web, HttpResponse};
use docsearch_common::DocSearchError;
use docsearch_embedding::prepare_document;
use docsearch_vector::{AddOutcome, AddStatus};
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::{AddRequest, AddResponse, DocumentRequest};

fn add_response(outcome: AddOutcome) -> AddResponse {
    let status = match outcome.status {
        AddStatus::Ok => "ok",
        AddStatus::Skipped => "skipped",
    };

    AddResponse {
        status: status.to_string(),
        chunks_added: outcome.chunks_added,
    }
}

fn require_filename(filename: &str) -> ApiResult<()> {
    if filename.trim().is_empty() {
        return Err(DocSearchError::invalid_input("filename cannot be empty").into());
    }
    Ok(())
}

/// Index pre-chunked text
#[post("/add")]
pub async fn add_documents(
    req: web::Json<AddRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    require_filename(&req.filename)?;

    let outcome = state
        .engine
        .add_documents(&req.chunks, &req.filename)
        .await?;

    Ok(HttpResponse::Ok().json(add_response(outcome)))
}

/// Clean, chunk and index a whole document
#[post("/documents")]
pub async fn add_document_text(
    req: web::Json<DocumentRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    require_filename(&req.filename)?;

    let chunks = prepare_document(
        &req.text,
        state.config.chunk_size,
        state.config.chunk_overlap,
    );

    if chunks.is_empty() {
        warn!("No chunks generated for document: {}", req.filename);
    } else {
        info!("Document {} split into {} chunks", req.filename, chunks.len());
    }

    let outcome = state.engine.add_documents(&chunks, &req.filename).await?;

    Ok(HttpResponse::Ok().json(add_response(outcome)))
}
