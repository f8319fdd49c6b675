//! Classified domain errors.
//!
//! Every failure that leaves a service crosses the boundary as an [`Error`]:
//! a fixed [`ErrorKind`], a message meant for operators, and the source
//! location that raised it. Adapters never re-derive the kind; they only
//! project it (log severity here, HTTP status in the inbound adapter).

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

use super::trace_id::TraceId;

/// Message fragments that identify a caller-side cancellation surfaced
/// through generic formatting.
pub const CANCELLATION_MARKERS: [&str; 3] = [
    "context canceled",
    "canceling statement due to user request",
    "deadline has elapsed",
];

/// Machine-readable error category.
///
/// The serialised form is the stable wire identifier returned in the `code`
/// field of error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller aborted the operation.
    Canceled,
    /// Conflict with the current state, such as a duplicate email.
    Conflict,
    /// Unexpected failure inside the system.
    Internal,
    /// Internal state failed validation.
    InternalInvalid,
    /// Request input failed validation.
    Invalid,
    /// Requested resource does not exist.
    NotFound,
    /// Feature is not implemented.
    NotImplemented,
    /// Access denied.
    Unauthorized,
    /// Failure of unknown origin.
    Unknown,
    /// Access forbidden.
    Forbidden,
    /// Resource already exists.
    Exists,
    /// A required collaborator was not wired in.
    NotInjected,
    /// Resource is temporarily unavailable.
    Unavailable,
    /// Caller is not authenticated.
    NotAuthenticated,
    /// Caller must end the current session.
    ShouldLogout,
    /// Email address is already registered.
    EmailAlreadyInUse,
}

/// Every kind, in declaration order.
pub const ALL_ERROR_KINDS: [ErrorKind; 16] = [
    ErrorKind::Canceled,
    ErrorKind::Conflict,
    ErrorKind::Internal,
    ErrorKind::InternalInvalid,
    ErrorKind::Invalid,
    ErrorKind::NotFound,
    ErrorKind::NotImplemented,
    ErrorKind::Unauthorized,
    ErrorKind::Unknown,
    ErrorKind::Forbidden,
    ErrorKind::Exists,
    ErrorKind::NotInjected,
    ErrorKind::Unavailable,
    ErrorKind::NotAuthenticated,
    ErrorKind::ShouldLogout,
    ErrorKind::EmailAlreadyInUse,
];

/// Log level an error is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl ErrorKind {
    /// Stable wire identifier.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
    /// ```
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Canceled => "canceled",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::InternalInvalid => "internal_invalid",
            Self::Invalid => "invalid",
            Self::NotFound => "not_found",
            Self::NotImplemented => "not_implemented",
            Self::Unauthorized => "unauthorized",
            Self::Unknown => "unknown",
            Self::Forbidden => "forbidden",
            Self::Exists => "exists",
            Self::NotInjected => "not_injected",
            Self::Unavailable => "unavailable",
            Self::NotAuthenticated => "not_authenticated",
            Self::ShouldLogout => "should_logout",
            Self::EmailAlreadyInUse => "email_already_in_use",
        }
    }

    /// Severity the error is logged at.
    pub const fn severity(self) -> Severity {
        match self {
            Self::Internal
            | Self::InternalInvalid
            | Self::Unknown
            | Self::Conflict
            | Self::NotInjected => Severity::Error,
            Self::NotImplemented | Self::Canceled | Self::Forbidden => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source location that raised an error. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    file: &'static str,
    line: u32,
    column: u32,
}

impl Origin {
    /// Location of the caller, following `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<&'static Location<'static>> for Origin {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Classified error value.
///
/// ## Invariants
/// - `kind` is `Canceled` whenever `message` carries a cancellation marker.
/// - The value is immutable once built.
///
/// # Examples
/// ```
/// use registry::domain::{Error, ErrorKind};
///
/// let err = Error::not_found("User not found");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
///
/// let err = Error::internal("Error querying users: canceling statement due to user request");
/// assert_eq!(err.kind(), ErrorKind::Canceled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    origin: Origin,
    trace_id: Option<String>,
}

impl Error {
    /// Classify a formatted message under `kind`.
    ///
    /// The origin is the caller's source location. The trace identifier in
    /// scope, if any, is captured for log correlation.
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = if kind != ErrorKind::Canceled && is_cancellation(&message) {
            ErrorKind::Canceled
        } else {
            kind
        };
        Self {
            kind,
            message,
            origin: Origin::caller(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Operator-facing message. Not always safe to show to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Where the error was raised.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Trace identifier of the request that produced the error.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach a trace identifier explicitly.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Normalise a failure from a subsystem that does not speak in kinds.
    #[track_caller]
    pub fn unclassified(error: &dyn std::error::Error) -> Self {
        Self::new(ErrorKind::Internal, error.to_string())
    }

    #[track_caller]
    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Canceled, message)
    }

    #[track_caller]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    #[track_caller]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, message)
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }
}

fn is_cancellation(message: &str) -> bool {
    CANCELLATION_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code={} message={}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}
