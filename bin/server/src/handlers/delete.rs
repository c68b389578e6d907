use actix_web::{post, web, HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::flash;
use crate::handlers::authorized;
use crate::handlers::error::store_failure_message;
use crate::state::AppState;

/// Remove a stored file
#[post("/delete/{name}")]
pub async fn delete(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    if !authorized(&req, &state) {
        return Ok(flash::redirect("/"));
    }

    let name = path.into_inner();
    match state.store.delete(&name).await {
        Ok(()) => {
            info!(filename = ?name, "POST /delete - File removed");
            Ok(flash::flash_redirect(
                "/file_panel",
                &format!("{} deleted successfully!", name),
            ))
        }
        Err(e) => {
            warn!(filename = ?name, "POST /delete - Failed: {}", e);
            Ok(flash::flash_redirect(
                "/file_panel",
                &store_failure_message(&name, &e),
            ))
        }
    }
}
