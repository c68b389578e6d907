use filestore::StoreError;
use tracing::error;

/// Helper function for server errors
pub fn handle_server_error<E: std::fmt::Display>(msg: &str, e: E) -> actix_web::Error {
    error!("{}: {}", msg, e);
    actix_web::error::ErrorInternalServerError(format!("{}: {}", msg, e))
}

/// Flash text for a store failure on `name`. I/O details stay in the server
/// log; the user only sees that the operation did not happen.
pub fn store_failure_message(name: &str, e: &StoreError) -> String {
    match e {
        StoreError::NotFound(_) => format!("File {} not found", name),
        StoreError::InvalidName(reason) => reason.to_string(),
        StoreError::DisallowedExtension => "File type not allowed".to_string(),
        StoreError::TooLarge => "File exceeds the maximum upload size".to_string(),
        StoreError::Io(io) => {
            error!("Storage I/O failure for {}: {}", name, io);
            "Storage failure, please retry".to_string()
        }
    }
}
