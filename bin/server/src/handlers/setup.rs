use actix_web::{get, web, HttpResponse, Result as ActixResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use crate::handlers::error::handle_server_error;
use crate::pages;
use crate::state::AppState;

/// Authenticator enrollment page: provisioning QR code plus the secret.
/// Only meaningful for time-based codes; 404 under the static strategy.
#[get("/setup")]
pub async fn enroll(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let (Some(url), Some(secret)) = (state.otp.provisioning_url(), state.otp.secret_b32()) else {
        return Ok(HttpResponse::NotFound().body("Not Found"));
    };

    info!("GET /setup - Rendering enrollment page");
    let png = otp::qr::provisioning_png(&url)
        .map_err(|e| handle_server_error("Failed to render provisioning QR", e))?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::setup(secret, &STANDARD.encode(png))))
}

/// Plaintext display of the current static code. Debug aid for the fixed-code
/// strategy; 404 under TOTP where codes come from the authenticator app.
#[get("/otp")]
pub async fn current_code(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    if state.otp.is_totp() {
        return Ok(HttpResponse::NotFound().body("Not Found"));
    }
    let code = state
        .otp
        .current_code()
        .map_err(|e| handle_server_error("Failed to derive current code", e))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(code))
}
