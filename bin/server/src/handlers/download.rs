use actix_web::http::header;
use actix_web::{get, web, HttpRequest, HttpResponse, Result as ActixResult};
use filestore::StoreError;
use tracing::{info, warn};

use crate::flash;
use crate::handlers::authorized;
use crate::handlers::error::handle_server_error;
use crate::state::AppState;

/// Stream a stored file as an attachment
#[get("/download/{name}")]
pub async fn download(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    if !authorized(&req, &state) {
        return Ok(flash::redirect("/"));
    }

    let name = path.into_inner();
    info!(filename = ?name, "GET /download - Request received");

    match state.store.retrieve(&name).await {
        Ok(content) => Ok(HttpResponse::Ok()
            .content_type("application/octet-stream")
            .insert_header(header::ContentDisposition {
                disposition: header::DispositionType::Attachment,
                parameters: vec![header::DispositionParam::Filename(name)],
            })
            .body(content)),
        Err(StoreError::NotFound(_)) => {
            warn!(filename = ?name, "GET /download - File not found");
            Ok(HttpResponse::NotFound().body(format!("File {} not found", name)))
        }
        Err(e @ StoreError::InvalidName(_)) => {
            warn!(filename = ?name, "GET /download - Rejected: {}", e);
            Ok(HttpResponse::BadRequest().body(e.to_string()))
        }
        Err(e) => Err(handle_server_error("Failed to read file", e)),
    }
}
