mod config;
mod constants;
mod flash;
mod handlers;
mod notify;
mod pages;
mod session;
mod state;

use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpServer};
use config::{OtpMode, ServerConfig};
use filestore::FileStore;
use notify::Notifier;
use otp::OtpAuthority;
use session::SessionGate;
use state::AppState;
use tracing::{error, info};
use tracing_subscriber;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing with env filter
    // Filter out actix-server worker shutdown messages
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info")
                    .add_directive("actix_server::worker=warn".parse().unwrap())
                    .add_directive("actix_server::accept=warn".parse().unwrap())
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting file portal server (PID: {})",
        std::process::id()
    );

    let config = ServerConfig::load()?;

    let authority = match config.otp_mode {
        OtpMode::Totp => {
            // A corrupt secret file is fatal: regenerating would invalidate
            // every enrolled authenticator app
            let secret = otp::load_or_create_secret(&config.secret_file).map_err(|e| {
                error!("Failed to initialize OTP secret: {}", e);
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
            })?;
            let authority = OtpAuthority::new_totp(&secret, &config.issuer, &config.account)
                .map_err(|e| {
                    error!("Failed to initialize TOTP authority: {}", e);
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
                })?;
            // Operator bootstrap aid on the trusted host console
            info!("TOTP secret (base32): {}", secret);
            if let Some(url) = authority.provisioning_url() {
                match otp::qr::terminal_qr(&url) {
                    Ok(qr) => println!("Scan to enroll an authenticator app:\n{}", qr),
                    Err(e) => error!("Failed to render terminal QR: {}", e),
                }
            }
            authority
        }
        OtpMode::Static => {
            let authority = OtpAuthority::new_static();
            match authority.current_code() {
                Ok(code) => info!("Static OTP code: {}", code),
                Err(e) => error!("Failed to derive static code: {}", e),
            }
            authority
        }
    };

    let store = FileStore::open(
        &config.upload_dir,
        config.allowed_extensions.clone(),
        config.max_upload_bytes,
    )
    .map_err(|e| {
        error!("Failed to open upload directory: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    info!("Serving files from {:?}", config.upload_dir);

    let notifier = Notifier::from_env().map_err(|e| {
        error!("Invalid mail configuration: {:#}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    if notifier.is_none() {
        info!("Upload notifications disabled (SMTP_HOST not set)");
    }

    let state = web::Data::new(AppState::new(
        authority,
        SessionGate::new(config.session_timeout),
        store,
        notifier,
    ));

    let bind_address = config.bind_address();
    // Room for the multipart framing around the payload itself
    let multipart_limit = config.max_upload_bytes as usize + 64 * 1024;

    info!("Starting server on http://{}", bind_address);

    let server = HttpServer::new(move || {
        let multipart_config = MultipartFormConfig::default()
            .total_limit(multipart_limit)
            .memory_limit(2 * 1024 * 1024)
            .error_handler(|err, _req| {
                InternalError::from_response(
                    err,
                    flash::flash_redirect(
                        "/file_panel",
                        "Upload failed: request too large or malformed",
                    ),
                )
                .into()
            });
        App::new()
            .app_data(state.clone())
            .app_data(multipart_config)
            .configure(handlers::routes)
    })
    .bind(&bind_address)
    .map_err(|e| {
        error!("Failed to bind to {}: {}", bind_address, e);
        e
    })?;

    info!("Server bound successfully to http://{}", bind_address);

    server.workers(1).run().await
}
