//! OTP generation and verification.
//!
//! Two strategies: a fixed random digit code generated at process start, and
//! RFC 6238 TOTP derived from a persisted base32 secret. TOTP verification
//! tolerates one time step of clock skew and accepts a given step at most
//! once, so a captured code cannot be replayed inside its window.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use thiserror::Error;
use totp_rs::{Algorithm, Secret, TOTP};

/// TOTP time step in seconds.
pub const TOTP_STEP_SECONDS: u64 = 30;

/// Number of digits in generated codes (both strategies).
pub const TOTP_DIGITS: usize = 6;

/// Accepted clock skew, in time steps, on either side of the current one.
pub const TOTP_SKEW_STEPS: u64 = 1;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Secret file {path:?} is unreadable or corrupt: {reason}")]
    CorruptSecret { path: PathBuf, reason: String },

    #[error("Failed to access secret file {path:?}: {source}")]
    SecretIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid base32 OTP secret")]
    InvalidSecret,

    #[error("Invalid TOTP parameters: {0}")]
    InvalidParams(String),

    #[error("System clock error: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}

/// Issues and verifies one-time passwords.
#[derive(Debug)]
pub struct OtpAuthority {
    mode: Mode,
}

#[derive(Debug)]
enum Mode {
    Static {
        code: String,
    },
    Totp {
        totp: TOTP,
        secret_b32: String,
        // Highest time step already accepted, for replay rejection
        last_step: Mutex<Option<u64>>,
    },
}

impl OtpAuthority {
    /// Fixed-code strategy: a random 6-digit code valid for the process
    /// lifetime.
    pub fn new_static() -> Self {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        Self {
            mode: Mode::Static { code },
        }
    }

    /// Time-based strategy from a base32 secret. `issuer` and `account` end
    /// up in the provisioning URI shown to authenticator apps.
    pub fn new_totp(secret_b32: &str, issuer: &str, account: &str) -> Result<Self, OtpError> {
        let secret_bytes = Secret::Encoded(secret_b32.to_string())
            .to_bytes()
            .map_err(|_| OtpError::InvalidSecret)?;
        let totp = TOTP::new(
            Algorithm::SHA1,
            TOTP_DIGITS,
            TOTP_SKEW_STEPS as u8,
            TOTP_STEP_SECONDS,
            secret_bytes,
            Some(issuer.to_string()),
            account.to_string(),
        )
        .map_err(|e| OtpError::InvalidParams(e.to_string()))?;
        Ok(Self {
            mode: Mode::Totp {
                totp,
                secret_b32: secret_b32.to_string(),
                last_step: Mutex::new(None),
            },
        })
    }

    /// The code that would pass verification right now. Printed to the
    /// operator console at startup.
    pub fn current_code(&self) -> Result<String, OtpError> {
        match &self.mode {
            Mode::Static { code } => Ok(code.clone()),
            Mode::Totp { totp, .. } => Ok(totp.generate_current()?),
        }
    }

    /// Check a submitted code. Returns `Ok(false)` for wrong codes, codes
    /// outside the skew window, and replays of an already-accepted step.
    pub fn verify(&self, candidate: &str) -> Result<bool, OtpError> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Ok(false);
        }
        match &self.mode {
            Mode::Static { code } => Ok(candidate == code),
            Mode::Totp {
                totp, last_step, ..
            } => {
                let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
                let current = now / TOTP_STEP_SECONDS;
                let first = current.saturating_sub(TOTP_SKEW_STEPS);
                for step in first..=current + TOTP_SKEW_STEPS {
                    if totp.generate(step * TOTP_STEP_SECONDS) != candidate {
                        continue;
                    }
                    let mut last = last_step.lock().unwrap();
                    if last.map_or(true, |accepted| step > accepted) {
                        *last = Some(step);
                        return Ok(true);
                    }
                    // Correct code, but its step was already spent
                    return Ok(false);
                }
                Ok(false)
            }
        }
    }

    /// The `otpauth://` enrollment URI. `None` for the static strategy.
    pub fn provisioning_url(&self) -> Option<String> {
        match &self.mode {
            Mode::Static { .. } => None,
            Mode::Totp { totp, .. } => Some(totp.get_url()),
        }
    }

    /// The base32 secret, for display on the enrollment page. `None` for the
    /// static strategy.
    pub fn secret_b32(&self) -> Option<&str> {
        match &self.mode {
            Mode::Static { .. } => None,
            Mode::Totp { secret_b32, .. } => Some(secret_b32),
        }
    }

    pub fn is_totp(&self) -> bool {
        matches!(self.mode, Mode::Totp { .. })
    }
}
