use crate::constants::{
    DEFAULT_ACCOUNT, DEFAULT_HOST, DEFAULT_ISSUER, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
    DEFAULT_SECRET_FILE, DEFAULT_SESSION_TIMEOUT_SECS, DEFAULT_UPLOAD_DIR, OTP_MODE_STATIC,
    OTP_MODE_TOTP,
};
use clap::{Arg, Command};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding uploaded files
    pub upload_dir: PathBuf,
    /// OTP verification strategy
    pub otp_mode: OtpMode,
    /// Path of the persisted TOTP secret
    pub secret_file: PathBuf,
    /// Issuer for the provisioning URI
    pub issuer: String,
    /// Account label for the provisioning URI
    pub account: String,
    /// Upload byte ceiling
    pub max_upload_bytes: u64,
    /// Allowed upload extensions; empty allows everything
    pub allowed_extensions: Vec<String>,
    /// Session inactivity timeout
    pub session_timeout: Duration,
}

/// OTP verification strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpMode {
    /// Fixed random code generated at startup
    Static,
    /// Time-based codes from the persisted secret
    Totp,
}

impl ServerConfig {
    pub fn load() -> Result<Self, std::io::Error> {
        let matches = Command::new("server")
            .arg(
                Arg::new("upload-dir")
                    .long("upload-dir")
                    .value_name("DIR")
                    .help("Directory for uploaded files (default: 'uploads', or UPLOAD_DIR env var)"),
            )
            .arg(
                Arg::new("host")
                    .long("host")
                    .value_name("HOST")
                    .help("Server host (default: 0.0.0.0, or SERVER_HOST env var)"),
            )
            .arg(
                Arg::new("port")
                    .long("port")
                    .value_name("PORT")
                    .help("Server port (default: 8080, or SERVER_PORT env var)"),
            )
            .arg(
                Arg::new("otp-mode")
                    .long("otp-mode")
                    .value_name("MODE")
                    .help("OTP strategy: 'totp' for authenticator-app codes or 'static' for a fixed per-process code")
                    .default_value(OTP_MODE_TOTP),
            )
            .arg(
                Arg::new("secret-file")
                    .long("secret-file")
                    .value_name("FILE")
                    .help("Path of the persisted TOTP secret (default: otp_secret.txt, or OTP_SECRET_FILE env var)"),
            )
            .arg(
                Arg::new("issuer")
                    .long("issuer")
                    .value_name("NAME")
                    .help("Issuer shown in authenticator apps")
                    .default_value(DEFAULT_ISSUER),
            )
            .arg(
                Arg::new("account")
                    .long("account")
                    .value_name("NAME")
                    .help("Account label shown in authenticator apps")
                    .default_value(DEFAULT_ACCOUNT),
            )
            .arg(
                Arg::new("max-upload-bytes")
                    .long("max-upload-bytes")
                    .value_name("BYTES")
                    .help("Upload byte ceiling (default: 16 MiB, or MAX_UPLOAD_BYTES env var)"),
            )
            .arg(
                Arg::new("allowed-extensions")
                    .long("allowed-extensions")
                    .value_name("LIST")
                    .help("Comma-separated upload extensions to allow; empty allows everything (or ALLOWED_EXTENSIONS env var)"),
            )
            .arg(
                Arg::new("session-timeout-secs")
                    .long("session-timeout-secs")
                    .value_name("SECS")
                    .help("Session inactivity timeout in seconds (default: 1800, or SESSION_TIMEOUT_SECS env var)"),
            )
            .get_matches();

        let otp_mode_str = matches
            .get_one::<String>("otp-mode")
            .map(|s| s.as_str())
            .unwrap_or(OTP_MODE_TOTP);
        let otp_mode = match otp_mode_str {
            OTP_MODE_TOTP => OtpMode::Totp,
            OTP_MODE_STATIC => OtpMode::Static,
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!(
                        "Invalid OTP mode: {}. Must be '{}' or '{}'",
                        otp_mode_str, OTP_MODE_TOTP, OTP_MODE_STATIC
                    ),
                ));
            }
        };

        let upload_dir = PathBuf::from(arg_or_env(
            &matches,
            "upload-dir",
            "UPLOAD_DIR",
            DEFAULT_UPLOAD_DIR,
        ));
        let secret_file = PathBuf::from(arg_or_env(
            &matches,
            "secret-file",
            "OTP_SECRET_FILE",
            DEFAULT_SECRET_FILE,
        ));
        let host = arg_or_env(&matches, "host", "SERVER_HOST", DEFAULT_HOST);

        let port_str = arg_or_env(&matches, "port", "SERVER_PORT", DEFAULT_PORT);
        let port = port_str.parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid port number: {}", port_str),
            )
        })?;

        let max_str = arg_or_env(
            &matches,
            "max-upload-bytes",
            "MAX_UPLOAD_BYTES",
            DEFAULT_MAX_UPLOAD_BYTES,
        );
        let max_upload_bytes = max_str.parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid upload byte ceiling: {}", max_str),
            )
        })?;

        let extensions_str = arg_or_env(
            &matches,
            "allowed-extensions",
            "ALLOWED_EXTENSIONS",
            "",
        );
        let allowed_extensions = extensions_str
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        let timeout_str = arg_or_env(
            &matches,
            "session-timeout-secs",
            "SESSION_TIMEOUT_SECS",
            DEFAULT_SESSION_TIMEOUT_SECS,
        );
        let session_timeout_secs: u64 = timeout_str.parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid session timeout: {}", timeout_str),
            )
        })?;

        let issuer = matches
            .get_one::<String>("issuer")
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_ISSUER)
            .to_string();
        let account = matches
            .get_one::<String>("account")
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_ACCOUNT)
            .to_string();

        Ok(ServerConfig {
            host,
            port,
            upload_dir,
            otp_mode,
            secret_file,
            issuer,
            account,
            max_upload_bytes,
            allowed_extensions,
            session_timeout: Duration::from_secs(session_timeout_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Priority: command-line args > environment variables > defaults
fn arg_or_env(
    matches: &clap::ArgMatches,
    arg: &str,
    env: &str,
    default: &str,
) -> String {
    matches
        .get_one::<String>(arg)
        .cloned()
        .or_else(|| std::env::var(env).ok())
        .unwrap_or_else(|| default.to_string())
}
