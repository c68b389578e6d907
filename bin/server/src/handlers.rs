//! HTTP request handlers

pub mod challenge;
pub mod delete;
pub mod download;
pub mod error;
pub mod health;
pub mod logout;
pub mod panel;
pub mod setup;
pub mod upload;

use actix_web::{web, HttpRequest};

use crate::session;
use crate::state::AppState;

/// Register every route on the app.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(challenge::show)
        .service(challenge::verify)
        .service(setup::enroll)
        .service(setup::current_code)
        .service(panel::file_panel)
        .service(upload::upload)
        .service(download::download)
        .service(delete::delete)
        .service(logout::logout)
        .service(health::health);
}

/// True when the request carries a verified, unexpired session.
pub(crate) fn authorized(req: &HttpRequest, state: &AppState) -> bool {
    session::session_id(req).map_or(false, |id| state.gate.is_authorized(&id))
}
