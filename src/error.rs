/// Application error handling
///
/// Every fallible operation in the crate funnels into [`AppError`]:
/// 1. Domain-specific error types (validation, auth, database, config)
/// 2. `From` conversions so handlers can use `?` throughout
/// 3. HTTP response mapping with a generic public message
/// 4. Structured server-side logging keyed by an error id

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

use crate::auth::{HashingError, TokenError};

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for input data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(&'static str),
    TooShort(&'static str, usize),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
    SuspiciousContent(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
            ValidationError::SuspiciousContent(field) => {
                write!(f, "{} contains suspicious content", field)
            }
        }
    }
}

impl StdError for ValidationError {}

/// Persistence errors reported by the stores
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    /// A row references a parent that does not exist
    ForeignKeyViolation(String),
    NotFound(String),
    QueryExecution(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::ForeignKeyViolation(msg) => {
                write!(f, "Missing referenced record: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::QueryExecution(msg) => write!(f, "Query error: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) =>
            {
                DatabaseError::UniqueConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(PG_FOREIGN_KEY_VIOLATION) =>
            {
                DatabaseError::ForeignKeyViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) => DatabaseError::QueryExecution(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionPool(err.to_string())
            }
            _ => DatabaseError::UnexpectedError(err.to_string()),
        }
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

/// Authentication and authorization errors
///
/// The variants exist for server-side diagnostics only. Clients always see
/// the same generic message so they cannot tell which check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Credential header missing, using the wrong scheme, or empty
    Unauthenticated,
    /// Unknown email or wrong password
    InvalidCredentials,
    /// Session token failed signature, expiry or subject checks
    TokenInvalid,
    /// Refresh token unknown, expired or revoked
    RefreshTokenRejected,
    /// Webhook API key did not match
    InvalidApiKey,
    /// Operation not permitted in the current deployment mode
    Forbidden,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Missing or malformed credentials"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::TokenInvalid => write!(f, "Invalid or expired session token"),
            AuthError::RefreshTokenRejected => write!(f, "Refresh token rejected"),
            AuthError::InvalidApiKey => write!(f, "Invalid API key"),
            AuthError::Forbidden => write!(f, "Forbidden"),
        }
    }
}

impl StdError for AuthError {}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Database(DatabaseError),
    Auth(AuthError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.into())
    }
}

impl From<HashingError> for AppError {
    fn from(err: HashingError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => AppError::Internal(format!("Token signing failed: {}", msg)),
            _ => AppError::Auth(AuthError::TokenInvalid),
        }
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response body returned to clients
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID, also present in the server-side log line
    pub error_id: String,
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

impl ErrorHandler for AppError {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse) {
        let (status, code, message) = match self {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR".to_string(),
                e.to_string(),
            ),

            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_ENTRY".to_string(),
                    "Resource already exists".to_string(),
                ),
                DatabaseError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND".to_string(),
                    e.to_string(),
                ),
                DatabaseError::ConnectionPool(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE".to_string(),
                    "Database service temporarily unavailable".to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR".to_string(),
                    "Database error occurred".to_string(),
                ),
            },

            AppError::Auth(AuthError::Forbidden) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN".to_string(),
                "Forbidden".to_string(),
            ),
            AppError::Auth(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED".to_string(),
                "Unauthorized".to_string(),
            ),

            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
                "Internal server error".to_string(),
            ),
        };

        let error_response = ErrorResponse::new(
            request_id.to_string(),
            message,
            code,
            status.as_u16(),
        );

        (status, error_response)
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Database(DatabaseError::NotFound(_)) => {
                tracing::info!(request_id = request_id, error = %self, "Resource not found");
            }
            AppError::Database(e) => {
                tracing::error!(request_id = request_id, error = %e, "Database error");
            }
            AppError::Auth(AuthError::InvalidCredentials) => {
                tracing::warn!(request_id = request_id, error = %self, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Authentication error");
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = request_id, error = %msg, "Internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &request_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
                DatabaseError::NotFound(_) => StatusCode::NOT_FOUND,
                DatabaseError::ConnectionPool(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ============================================================================
// 4. ERROR CONTEXT ENRICHMENT
// ============================================================================

/// Per-operation context carried through a handler for correlated logging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub user_id: Option<String>,
    pub operation: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            operation: operation.into(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_user_id(mut self, user_id: String) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn log_error(&self, error: &AppError) {
        let context = serde_json::json!({
            "request_id": self.request_id,
            "operation": self.operation,
            "user_id": self.user_id,
            "timestamp": self.timestamp.to_rfc3339(),
        });

        match error {
            AppError::Validation(_) | AppError::Auth(_) => {
                tracing::warn!(error = %error, context = ?context, "Request rejected");
            }
            _ => {
                tracing::error!(error = %error, context = ?context, "Request failed");
            }
        }
    }
}
