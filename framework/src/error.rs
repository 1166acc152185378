//! Framework-wide error types
//!
//! Provides a unified error type that can be used throughout the framework
//! and automatically converts to appropriate HTTP responses.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::routing::RouteError;

/// Trait for errors that can be converted to HTTP responses
///
/// Implement this trait on domain errors to customize the HTTP status code
/// and message returned when the error reaches a handler boundary.
///
/// # Example
///
/// ```rust,ignore
/// use kit::HttpError;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("Workflow {0} not found")]
/// struct WorkflowMissing(i64);
///
/// impl HttpError for WorkflowMissing {
///     fn status_code(&self) -> u16 { 404 }
/// }
/// ```
pub trait HttpError: std::error::Error + Send + Sync + 'static {
    /// HTTP status code (default: 500)
    fn status_code(&self) -> u16 {
        500
    }

    /// Error message for HTTP response (default: error's Display)
    fn error_message(&self) -> String {
        self.to_string()
    }
}

/// Simple wrapper for creating one-off domain errors
#[derive(Debug, Clone)]
pub struct AppError {
    message: String,
    status_code: u16,
}

impl AppError {
    /// Create a new AppError with status 500 (Internal Server Error)
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: 500,
        }
    }

    /// Set the HTTP status code
    pub fn status(mut self, code: u16) -> Self {
        self.status_code = code;
        self
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).status(404)
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message).status(400)
    }

    /// Create a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message).status(403)
    }

    /// Create a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(message).status(409)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl HttpError for AppError {
    fn status_code(&self) -> u16 {
        self.status_code
    }
}

impl From<AppError> for FrameworkError {
    fn from(e: AppError) -> Self {
        FrameworkError::Domain {
            message: e.message,
            status_code: e.status_code,
        }
    }
}

/// Per-field validation errors
///
/// Field names map to their messages, ordered by field name.
/// Errors that do not belong to a single field are stored under
/// [`ValidationErrors::NON_FIELD`].
///
/// # Response Format
///
/// ```json
/// {
///     "message": "The given data was invalid.",
///     "errors": {
///         "label": ["This field is required."]
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    /// Map of field names to their validation error messages
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Key used for errors that concern the whole form
    pub const NON_FIELD: &'static str = "__all__";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set holding a single error
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Add an error for a specific field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Merge another set of errors into this one, prefixing its field names
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for (field, messages) in other.errors {
            let key = if prefix.is_empty() {
                field
            } else {
                format!("{}-{}", prefix, field)
            };
            self.errors.entry(key).or_default().extend(messages);
        }
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert from validator crate's ValidationErrors
    pub fn from_validator(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(error.code.as_ref()));
                result.add(field.to_string(), message);
            }
        }
        result
    }

    /// `Ok(())` when empty, the errors otherwise
    pub fn into_result(self) -> Result<(), FrameworkError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(FrameworkError::Validation(self))
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": "The given data was invalid.",
            "errors": self.errors
        })
    }
}

fn default_message(code: &str) -> String {
    match code {
        "required" => "This field is required.".to_string(),
        "length" => "Ensure this value has a valid length.".to_string(),
        "range" => "Ensure this value is within the allowed range.".to_string(),
        other => format!("Validation failed: {}", other),
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {:?}", self.errors)
    }
}

impl std::error::Error for ValidationErrors {}

/// Framework-wide error type
///
/// Converts into an [`HttpResponse`](crate::http::HttpResponse) so handlers
/// can propagate it with `?`.
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// Parameter extraction failed (missing route parameter)
    #[error("Missing required parameter: {param_name}")]
    ParamError { param_name: String },

    /// Parameter parse error (400 Bad Request)
    #[error("Invalid parameter '{param}': expected {expected_type}")]
    ParamParse {
        param: String,
        expected_type: &'static str,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Generic internal server error
    #[error("Internal server error: {message}")]
    Internal { message: String },

    /// Domain/application error with custom status code
    #[error("{message}")]
    Domain { message: String, status_code: u16 },

    /// Form validation errors (422 Unprocessable Entity)
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// The acting user lacks the required permission (403 Forbidden)
    #[error("This action is unauthorized.")]
    Unauthorized,

    /// Model not found (404 Not Found)
    #[error("{model_name} not found")]
    ModelNotFound { model_name: String },

    /// Route table misuse or failed route reversal
    #[error(transparent)]
    Route(#[from] RouteError),
}

impl FrameworkError {
    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    pub fn param_parse(param: impl Into<String>, expected_type: &'static str) -> Self {
        Self::ParamParse {
            param: param.into(),
            expected_type,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>, status_code: u16) -> Self {
        Self::Domain {
            message: message.into(),
            status_code,
        }
    }

    /// Validation error on a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(field, message))
    }

    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model_name: name.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ParamError { .. } => 400,
            Self::ParamParse { .. } => 400,
            Self::Database(_) => 500,
            Self::Internal { .. } => 500,
            Self::Domain { status_code, .. } => *status_code,
            Self::Validation(_) => 422,
            Self::Unauthorized => 403,
            Self::ModelNotFound { .. } => 404,
            Self::Route(RouteError::NotFound { .. }) => 404,
            Self::Route(_) => 500,
        }
    }

    /// Validation errors carried by this error, if any
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<sea_orm::DbErr> for FrameworkError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<ValidationErrors> for FrameworkError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(FrameworkError::Unauthorized.status_code(), 403);
        assert_eq!(FrameworkError::validation("label", "bad").status_code(), 422);
        assert_eq!(FrameworkError::model_not_found("Workflow").status_code(), 404);
        assert_eq!(AppError::conflict("taken").status_code(), 409);
        assert_eq!(
            FrameworkError::from(RouteError::IndexOutOfRange { index: 0, len: 0 }).status_code(),
            500
        );
    }

    #[test]
    fn merge_prefixed_namespaces_fields() {
        let mut errors = ValidationErrors::new();
        errors.merge_prefixed("form-1", ValidationErrors::single("relationship", "required"));
        assert_eq!(
            errors.get("form-1-relationship"),
            Some(&["required".to_string()][..])
        );
    }

    #[test]
    fn empty_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(ValidationErrors::single("x", "y").into_result().is_err());
    }
}
