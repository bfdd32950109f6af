//! Signer Error Hierarchy
//!
//! Error taxonomy for STARK key derivation and request signing.
//!
//! - FieldError
//!   - MalformedField
//! - DerivationError
//!   - DerivationUnavailable (wallet refused or unreachable)
//!   - DerivationExhausted (grinding did not converge)
//! - SigningError
//!   - SigningFailure
//! - InputError (local adapters and configuration)
//!   - InvalidSignature
//!   - InvalidPrivateKey
//!   - InvalidConfig

use thiserror::Error;

/// Signer error hierarchy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    // === Field codec ===
    /// Text is not a valid decimal or 0x-hex numeral in the STARK field
    #[error("Malformed field element: {input:?} - {message}")]
    MalformedField { input: String, message: String },

    // === Key derivation ===
    /// Wallet refused, was cancelled, or returned unusable challenge material
    #[error("Key derivation unavailable: {message}")]
    DerivationUnavailable { message: String },

    /// Key grinding did not land in the curve order within the attempt bound
    #[error("Key derivation exhausted after {attempts} grinding attempts")]
    DerivationExhausted { attempts: u32 },

    // === Signing ===
    /// Curve signature routine rejected the digest
    #[error("Signing failure: {message}")]
    SigningFailure { message: String },

    // === Local inputs ===
    /// Invalid ECDSA signature bytes
    #[error("Invalid signature: {message}")]
    InvalidSignature { message: String },

    /// Invalid private key
    #[error("Invalid private key: {message}")]
    InvalidPrivateKey { message: String },

    /// Invalid configuration value
    #[error("Invalid config: {key} - {message}")]
    InvalidConfig { key: String, message: String },
}

impl SignerError {
    /// Returns the error code as a string constant
    pub fn code(&self) -> &'static str {
        match self {
            SignerError::MalformedField { .. } => "MALFORMED_FIELD",
            SignerError::DerivationUnavailable { .. } => "DERIVATION_UNAVAILABLE",
            SignerError::DerivationExhausted { .. } => "DERIVATION_EXHAUSTED",
            SignerError::SigningFailure { .. } => "SIGNING_FAILURE",
            SignerError::InvalidSignature { .. } => "INVALID_SIGNATURE",
            SignerError::InvalidPrivateKey { .. } => "INVALID_PRIVATE_KEY",
            SignerError::InvalidConfig { .. } => "INVALID_CONFIG",
        }
    }

    /// Returns true if the caller may retry the operation.
    ///
    /// `DerivationUnavailable` is retryable after user action (re-prompting the
    /// wallet); `SigningFailure` with a fresh digest or nonce.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SignerError::DerivationUnavailable { .. } | SignerError::SigningFailure { .. }
        )
    }

    /// Returns true for integrity faults that must not be retried blindly
    pub fn is_fatal(&self) -> bool {
        matches!(self, SignerError::DerivationExhausted { .. })
    }

    /// Returns true if this is a key derivation error
    pub fn is_derivation_error(&self) -> bool {
        matches!(
            self,
            SignerError::DerivationUnavailable { .. } | SignerError::DerivationExhausted { .. }
        )
    }

    /// Shorthand for [`SignerError::MalformedField`]
    pub fn malformed(input: impl Into<String>, message: impl Into<String>) -> Self {
        SignerError::MalformedField {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`SignerError::DerivationUnavailable`]
    pub fn unavailable(message: impl Into<String>) -> Self {
        SignerError::DerivationUnavailable {
            message: message.into(),
        }
    }
}

/// Result 타입 alias
pub type SignerResult<T> = Result<T, SignerError>;
