/// Default upload directory
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: &str = "8080";

/// Default path of the persisted TOTP secret
pub const DEFAULT_SECRET_FILE: &str = "otp_secret.txt";

/// Issuer shown in authenticator apps
pub const DEFAULT_ISSUER: &str = "dropgate";

/// Account label shown in authenticator apps
pub const DEFAULT_ACCOUNT: &str = "admin";

/// Default upload byte ceiling (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: &str = "16777216";

/// Default session inactivity timeout in seconds (30 minutes)
pub const DEFAULT_SESSION_TIMEOUT_SECS: &str = "1800";

/// OTP mode identifier for time-based codes (also the default mode)
pub const OTP_MODE_TOTP: &str = "totp";

/// OTP mode identifier for a fixed per-process code
pub const OTP_MODE_STATIC: &str = "static";

/// Session id cookie name
pub const SESSION_COOKIE: &str = "sid";

/// Flash message cookie name
pub const FLASH_COOKIE: &str = "flash";
