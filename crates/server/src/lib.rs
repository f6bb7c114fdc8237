//! docsearch HTTP server
//!
//! Actix-web REST API over the in-memory search engine

mod error;
mod routes;
mod state;
mod types;

pub use error::{ApiError, ApiResult};
pub use routes::configure;
pub use state::AppState;
pub use types::*;

use actix_cors::Cors;
use actix_web::{error::JsonPayloadError, web, App, HttpRequest, HttpResponse, HttpServer};
use docsearch_common::{AppConfig, Result};
use docsearch_embedding::create_provider;
use serde_json::json;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// Request body limit (extracted document text can be large)
const JSON_LIMIT: usize = 10 * 1024 * 1024;

/// JSON extractor config rendering body errors as `{"error": ...}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            let body = json!({ "error": err.to_string() });
            actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
                .into()
        })
}

/// Build the provider and engine, then serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let provider = create_provider(&config)?;

    // A provider that is down at startup only fails the calls that need it
    match provider.test_connection().await {
        Ok(true) => info!("Embedding provider '{}' reachable", provider.name()),
        Ok(false) => warn!("Embedding provider '{}' responded with an error status", provider.name()),
        Err(e) => warn!("Embedding provider '{}' unreachable: {}", provider.name(), e),
    }

    let bind_addr = config.server_bind_address();
    let state = web::Data::new(AppState::new(config, provider)?);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(json_config())
            .configure(configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
