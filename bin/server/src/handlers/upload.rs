use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::MultipartForm;
use actix_web::{post, web, HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::flash;
use crate::handlers::authorized;
use crate::handlers::error::{handle_server_error, store_failure_message};
use crate::state::AppState;

/// Multipart form for file upload. The file part is optional so a request
/// without one surfaces as a flash message instead of an extractor error.
#[derive(MultipartForm)]
pub struct UploadForm {
    pub file: Option<TempFile>,
}

/// Handle file upload (multipart/form-data)
#[post("/upload")]
pub async fn upload(
    req: HttpRequest,
    form: MultipartForm<UploadForm>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    if !authorized(&req, &state) {
        return Ok(flash::redirect("/"));
    }

    let Some(file) = form.into_inner().file else {
        info!("POST /upload - Request without a file part");
        return Ok(flash::flash_redirect("/file_panel", "No file part"));
    };

    let filename = file.file_name.clone().unwrap_or_default();
    if filename.is_empty() {
        info!("POST /upload - Request without a selected file");
        return Ok(flash::flash_redirect("/file_panel", "No selected file"));
    }

    info!(
        filename = ?filename,
        bytes = file.size,
        "POST /upload - Request received"
    );

    // The multipart layer already spooled the part to a temp file
    let content = std::fs::read(file.file.path())
        .map_err(|e| handle_server_error("Failed to read uploaded file", e))?;

    match state.store.save(&filename, &content).await {
        Ok(()) => {
            if let Some(notifier) = &state.notifier {
                notifier.notify_upload(&filename);
            }
            info!(filename = ?filename, "POST /upload - File stored");
            Ok(flash::flash_redirect(
                "/file_panel",
                &format!("{} uploaded successfully!", filename),
            ))
        }
        Err(e) => {
            warn!(filename = ?filename, "POST /upload - Rejected: {}", e);
            Ok(flash::flash_redirect(
                "/file_panel",
                &store_failure_message(&filename, &e),
            ))
        }
    }
}
