use actix_web::{get, web, HttpRequest, HttpResponse, Result as ActixResult};

use crate::flash;
use crate::handlers::authorized;
use crate::handlers::error::handle_server_error;
use crate::pages;
use crate::state::AppState;

/// File listing plus the upload form
#[get("/file_panel")]
pub async fn file_panel(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    if !authorized(&req, &state) {
        return Ok(flash::redirect("/"));
    }

    let entries = state
        .store
        .list()
        .await
        .map_err(|e| handle_server_error("Failed to list upload directory", e))?;

    let message = flash::take_flash(&req);
    let mut builder = HttpResponse::Ok();
    builder.content_type("text/html; charset=utf-8");
    if message.is_some() {
        builder.cookie(flash::removal_cookie());
    }
    Ok(builder.body(pages::file_panel(&entries, message.as_deref())))
}
