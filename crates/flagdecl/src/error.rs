use std::fmt;
use std::process::ExitCode;

use thiserror::Error;

/// A validation failure meant to be shown to the end user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExpectedFailure {
    message: String,
}

impl ExpectedFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error produced by a convertor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Expected(#[from] ExpectedFailure),
    #[error("invalid value \"{value}\": {reason}")]
    Invalid { value: String, reason: String },
}

impl ConversionError {
    /// Printable failure, e.g. `"sleep time must be at least 200 ms"`.
    pub fn expected(message: impl Into<String>) -> Self {
        Self::Expected(ExpectedFailure::new(message))
    }

    pub fn invalid(value: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Invalid {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentsError {
    #[error("argument \"{name}\" conflicts with already declared \"{existing}\"")]
    DeclarationConflict { name: String, existing: String },

    #[error("argument name {name:?} is empty")]
    InvalidName { name: String },

    #[error("argument \"{name}\" is not declared")]
    UndeclaredArgument { name: String },

    #[error("argument \"{name}\" holds `{declared}`, not `{requested}`")]
    TypeMismatch {
        name: String,
        declared: &'static str,
        requested: &'static str,
    },

    /// Whatever the convertor returned, unchanged.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Not a failure: normal execution should stop and print the help text.
    #[error("help requested")]
    HelpRequested(String),
}

impl ArgumentsError {
    /// The clean-stop view of this error, if it is one.
    ///
    /// `None` means a genuine defect (bad declarations, unknown names, a
    /// convertor that could not make sense of its input).
    pub fn printable(&self) -> Option<Printable<'_>> {
        match self {
            Self::HelpRequested(text) => Some(Printable::Help(text)),
            Self::Conversion(ConversionError::Expected(failure)) => {
                Some(Printable::Expected(failure.message()))
            }
            _ => None,
        }
    }

    pub fn is_printable(&self) -> bool {
        self.printable().is_some()
    }
}

/// Messages a top-level handler prints before exiting instead of crashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Printable<'a> {
    Help(&'a str),
    Expected(&'a str),
}

impl Printable<'_> {
    pub fn message(&self) -> &str {
        match self {
            Self::Help(text) | Self::Expected(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Help(_))
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl fmt::Display for Printable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help(text) => f.write_str(text),
            Self::Expected(text) => {
                for (i, line) in text.lines().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, ">> {line}")?;
                }
                Ok(())
            }
        }
    }
}

pub type Result<T, E = ArgumentsError> = std::result::Result<T, E>;
