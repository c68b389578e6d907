use actix_web::{get, post, web, HttpRequest, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::flash;
use crate::handlers::authorized;
use crate::pages;
use crate::session;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OtpForm {
    otp: String,
}

/// Render the OTP challenge page
#[get("/")]
pub async fn show(req: HttpRequest, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    if authorized(&req, &state) {
        return Ok(flash::redirect("/file_panel"));
    }

    let message = flash::take_flash(&req);
    let mut builder = HttpResponse::Ok();
    builder.content_type("text/html; charset=utf-8");
    if message.is_some() {
        builder.cookie(flash::removal_cookie());
    }
    Ok(builder.body(pages::challenge(message.as_deref(), state.otp.is_totp())))
}

/// Check a submitted code and open a verified session
#[post("/")]
pub async fn verify(
    form: web::Form<OtpForm>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    match state.otp.verify(&form.otp) {
        Ok(true) => {
            let id = state.gate.create_verified();
            info!("POST / - OTP accepted, session created");
            let mut resp = flash::redirect("/file_panel");
            resp.add_cookie(&session::session_cookie(&id))?;
            Ok(resp)
        }
        Ok(false) => {
            warn!("POST / - OTP rejected");
            Ok(flash::flash_redirect("/", "Invalid OTP. Please try again."))
        }
        Err(e) => {
            error!("POST / - OTP verification error: {}", e);
            Ok(flash::flash_redirect("/", "Invalid OTP. Please try again."))
        }
    }
}
