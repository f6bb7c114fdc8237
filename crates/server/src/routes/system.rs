use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use tracing::info;

use crate::state::AppState;
use crate::types::{HealthResponse, StatusResponse};

/// Drop every indexed chunk
#[post("/clear")]
pub async fn clear_session(state: web::Data<AppState>) -> HttpResponse {
    let removed = state.engine.clear_session().await;
    info!("Clear requested - {} chunks dropped", removed);

    HttpResponse::Ok().json(StatusResponse::ok())
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "online".to_string(),
        timestamp: Utc::now(),
    })
}
