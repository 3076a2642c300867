//! AWS error classification
//!
//! Typed errors for AWS SDK operations using the `.code()` method from
//! `ProvideErrorMetadata` instead of string matching on the Debug format.
//! There is no retry path anywhere in the scan, so classification exists
//! for report and log text rather than for control flow.

use aws_sdk_ec2::error::ProvideErrorMetadata;
use thiserror::Error;

/// A failed listing or tag-lookup call.
///
/// The first failure aborts the owning scan and discards anything collected
/// so far; the error's display text becomes the category's report entry.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Rate limit exceeded
    #[error("rate limited by AWS ({code}): {message}")]
    Throttled { code: String, message: String },

    /// The credentials lack a permission the scan needs
    #[error("access denied ({code}): {message}")]
    AccessDenied { code: String, message: String },

    /// Any other service error that carried an error code
    #[error("AWS error ({code}): {message}")]
    Api { code: String, message: String },

    /// Failure without service metadata (connect/dispatch errors)
    #[error("AWS error: {message}")]
    Unknown { message: String },
}

/// A failed notification publish - the one error that fails an invocation.
#[derive(Debug, Error)]
#[error("publishing notification failed: {message}")]
pub struct NotifyError {
    pub code: Option<String>,
    pub message: String,
}

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
];

/// Known AWS error codes for missing permissions
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "AuthFailure",
];

/// Classify an AWS SDK error using the error code.
pub fn classify_scan_error(code: Option<&str>, message: Option<&str>) -> ScanError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if THROTTLING_CODES.contains(&c) => ScanError::Throttled {
            code: c.to_string(),
            message,
        },
        Some(c) if ACCESS_DENIED_CODES.contains(&c) => ScanError::AccessDenied {
            code: c.to_string(),
            message,
        },
        Some(c) => ScanError::Api {
            code: c.to_string(),
            message,
        },
        None => ScanError::Unknown { message },
    }
}

impl ScanError {
    /// Build a `ScanError` from any SDK operation error carrying metadata.
    pub fn from_sdk<E>(err: &E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error,
    {
        let (code, message) = sdk_error_parts(err);
        classify_scan_error(code.as_deref(), Some(&message))
    }
}

impl NotifyError {
    /// Build a `NotifyError` from an SDK publish error.
    pub fn from_sdk<E>(err: &E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error,
    {
        let (code, message) = sdk_error_parts(err);
        Self { code, message }
    }
}

/// Pull the error code and the most useful message text out of an SDK error.
fn sdk_error_parts<E>(err: &E) -> (Option<String>, String)
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = err.code().map(str::to_string);
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => {
            // Dispatch failures carry no service metadata; fold the source
            // chain into the text instead.
            let mut text = err.to_string();
            let mut source = err.source();
            while let Some(cause) = source {
                text.push_str(": ");
                text.push_str(&cause.to_string());
                source = cause.source();
            }
            text
        }
    };
    (code, message)
}
