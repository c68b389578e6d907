//! One-time-password authority: code generation, verification, secret
//! persistence and authenticator-app provisioning.

pub mod authority;
pub mod qr;
pub mod secret;

pub use authority::{OtpAuthority, OtpError, TOTP_DIGITS, TOTP_SKEW_STEPS, TOTP_STEP_SECONDS};
pub use secret::load_or_create_secret;
