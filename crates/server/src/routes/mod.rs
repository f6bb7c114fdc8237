mod documents;
mod search;
mod system;

use actix_web::web;

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(documents::add_documents)
        .service(documents::add_document_text)
        .service(search::search)
        .service(search::stats)
        .service(system::clear_session)
        .service(system::health);
}
