use actix_web::{get, post, web, HttpResponse};
use docsearch_common::DocSearchError;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::{SearchRequest, SearchResultItem, StatsResponse, MAX_TOP_K};

#[post("/search")]
pub async fn search(
    req: web::Json<SearchRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    if req.query.trim().is_empty() {
        return Err(DocSearchError::invalid_input("Query cannot be empty").into());
    }

    let top_k = req.top_k.unwrap_or(state.config.default_top_k);
    if top_k == 0 || top_k > MAX_TOP_K {
        return Err(DocSearchError::invalid_input(format!(
            "top_k must be between 1 and {}",
            MAX_TOP_K
        ))
        .into());
    }

    let results: Vec<SearchResultItem> = state
        .engine
        .search(&req.query, top_k)
        .await?
        .into_iter()
        .map(|hit| SearchResultItem {
            content: hit.content,
            filename: hit.source_label,
            similarity: hit.similarity,
        })
        .collect();

    Ok(HttpResponse::Ok().json(results))
}

#[get("/stats")]
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let stats = state.engine.stats().await;

    HttpResponse::Ok().json(StatsResponse {
        total_chunks: stats.documents,
        embedding_dim: stats.dimension,
        provider: stats.provider,
    })
}
