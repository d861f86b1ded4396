//! Dispatch-level errors: everything that can stop a command short of a
//! handler's own domain error.

use flux_core::{CommandType, ErrorCode, ErrorContext, ErrorSeverity, EngineError};

/// Identifies which stage of the reducer contract produced an error
/// (spec §4.4's `preValidate` / `apply` / `postValidate` phases).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReducerPhase {
    /// Intent-to-command resolution, ahead of any registered reducer.
    Resolve,
    PreValidate,
    Apply,
    PostValidate,
}

impl ReducerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::PreValidate => "pre_validate",
            Self::Apply => "apply",
            Self::PostValidate => "post_validate",
        }
    }
}

/// Errors surfaced by the dispatch pipeline itself, wrapping a declared
/// [`ErrorCode`] with the phase and handler that produced it.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no handler registered for command type {command_type}")]
    NoHandler { command_type: CommandType },

    #[error("{phase}: {code} ({message})", phase = phase.as_str())]
    Declared {
        code: ErrorCode,
        phase: ReducerPhase,
        message: &'static str,
        context: ErrorContext,
    },

    #[error("combinator chain exceeded maximum depth ({depth})")]
    CombinatorDepthExceeded { depth: usize },
}

impl DispatchError {
    pub fn declared(code: ErrorCode, phase: ReducerPhase, message: &'static str) -> Self {
        Self::Declared {
            code,
            phase,
            message,
            context: ErrorContext::new().with_message(message),
        }
    }

    pub fn declared_with(
        code: ErrorCode,
        phase: ReducerPhase,
        message: &'static str,
        context: ErrorContext,
    ) -> Self {
        Self::Declared {
            code,
            phase,
            message,
            context,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Declared { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl EngineError for DispatchError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoHandler { .. } => ErrorSeverity::Internal,
            Self::Declared { code, .. } => match code {
                ErrorCode::InsufficientResources | ErrorCode::PreconditionFailed => {
                    ErrorSeverity::Recoverable
                }
                _ => ErrorSeverity::Validation,
            },
            Self::CombinatorDepthExceeded { .. } => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Declared { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoHandler { .. } => "NO_HANDLER_FOR_COMMAND",
            Self::Declared { code, .. } => match code {
                ErrorCode::UnrecognizedIntent => "UNRECOGNIZED_INTENT",
                ErrorCode::NoHandlerForCommand => "NO_HANDLER_FOR_COMMAND",
                ErrorCode::InvalidAction => "INVALID_ACTION",
                ErrorCode::InvalidTarget => "INVALID_TARGET",
                ErrorCode::InvalidSession => "INVALID_SESSION",
                ErrorCode::Forbidden => "FORBIDDEN",
                ErrorCode::PreconditionFailed => "PRECONDITION_FAILED",
                ErrorCode::InsufficientResources => "INSUFFICIENT_RESOURCES",
                ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            },
            Self::CombinatorDepthExceeded { .. } => "COMBINATOR_DEPTH_EXCEEDED",
        }
    }
}
