//! Common error infrastructure shared across the engine.
//!
//! Domain-specific errors (parse failures, reducer preconditions, dice
//! spec validation) each define their own `thiserror::Error` enum. This
//! module provides the shared vocabulary those enums plug into: a
//! severity classification, optional debugging context, and the stable
//! wire error codes from the command textual surface.

use crate::command::CommandId;
use crate::urn::Urn;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; retrying with a different argument may succeed.
    Recoverable,
    /// Invalid input; retrying without changes will not help.
    Validation,
    /// Unexpected state inconsistency; indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Contextual information attached to an error for debugging.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    pub actor: Option<Urn>,
    pub location: Option<Urn>,
    pub message: Option<&'static str>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_actor(mut self, actor: Urn) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Urn) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait implemented by every error type in the engine.
///
/// Mirrors `thiserror::Error` but adds the classification the runtime
/// needs to decide whether to surface, log, or retry.
pub trait EngineError: std::error::Error {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier for this error variant, suitable for the wire.
    fn error_code(&self) -> &'static str;
}

/// The stable error taxonomy from the command textual surface (spec §6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnrecognizedIntent,
    NoHandlerForCommand,
    InvalidAction,
    InvalidTarget,
    InvalidSession,
    Forbidden,
    PreconditionFailed,
    InsufficientResources,
    InvalidArgument,
}

/// A declared error: an error code correlated to the command (or intent)
/// whose processing produced it via its trace id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclaredError {
    pub code: ErrorCode,
    pub trace: CommandId,
}

impl DeclaredError {
    pub fn new(code: ErrorCode, trace: CommandId) -> Self {
        Self { code, trace }
    }
}
