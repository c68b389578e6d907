use actix_web::{get, web, HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::flash;
use crate::session;
use crate::state::AppState;

/// Explicit logout. Also fine unauthenticated, where it is just a redirect.
#[get("/logout")]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    if let Some(id) = session::session_id(&req) {
        state.gate.clear(&id);
        info!("GET /logout - Session cleared");
    }
    let mut resp = flash::redirect("/");
    resp.add_cookie(&session::removal_cookie())?;
    Ok(resp)
}
