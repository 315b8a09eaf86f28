use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, Response};
use rocket_okapi::OpenApiError;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Form expired")]
    FormExpired,
    #[error("Internal server error")]
    PasswordHash { message: String },
    #[error("Account {0} already exists")]
    DuplicateAccount(String),
    #[error("{0}")]
    Validation(String),
    #[error("Validation error: {0}")]
    InvalidInput(#[from] ValidationErrors),
    #[error("Need at least 3 points")]
    InvalidBoundary,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Internal server error")]
    Internal { message: String },
    #[error("Internal server error")]
    Configuration {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }

    pub fn password_hash(message: impl Into<String>, source: password_hash::Error) -> Self {
        Self::PasswordHash {
            message: format!("{}: {}", message.into(), source),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Message suitable for a flash banner or JSON body.
    pub fn user_message(&self) -> String {
        match self {
            AppError::DuplicateAccount(_) => "Account already exists.".to_string(),
            AppError::InvalidCredentials => "Invalid credentials.".to_string(),
            AppError::FormExpired => "Form expired. Please try again.".to_string(),
            AppError::InvalidInput(errors) => first_validation_message(errors),
            other => other.to_string(),
        }
    }
}

fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {}", field.replace('_', " ")),
            })
        })
        .unwrap_or_else(|| "Invalid input".to_string())
}

impl From<password_hash::Error> for AppError {
    fn from(e: password_hash::Error) -> Self {
        AppError::password_hash("Password hashing failed", e)
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Configuration {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::db("Database error", e),
        }
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::Db { .. } => Status::InternalServerError,
            AppError::Unauthenticated => Status::Unauthorized,
            AppError::InvalidCredentials => Status::Forbidden,
            AppError::FormExpired => Status::Forbidden,
            AppError::PasswordHash { .. } => Status::InternalServerError,
            AppError::DuplicateAccount(_) => Status::Conflict,
            AppError::Validation(_) => Status::BadRequest,
            AppError::InvalidInput(_) => Status::BadRequest,
            AppError::InvalidBoundary => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::Upstream(_) => Status::BadGateway,
            AppError::Internal { .. } => Status::InternalServerError,
            AppError::Configuration { .. } => Status::InternalServerError,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct RejectionBody {
    ok: bool,
    error: String,
}

fn log_failure(error: &AppError, req: &Request<'_>) {
    let request_id = req
        .local_cache(|| None::<crate::middleware::RequestId>)
        .as_ref()
        .map(|r| r.0.as_str())
        .unwrap_or("unknown");

    let user_id = req
        .local_cache(|| None::<crate::auth::CurrentUser>)
        .as_ref()
        .map(|u| u.id.to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    error!(
        error = ?error,
        request_id = %request_id,
        user_id = %user_id,
        method = %req.method(),
        uri = %req.uri(),
        "request failed"
    );
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        log_failure(&self, req);

        let status = Status::from(&self);
        let body = ErrorBody { error: self.user_message() };

        Response::build_from(Json(body).respond_to(req)?).status(status).ok()
    }
}

/// Error wrapper for the JSON mutation endpoints, rendered as
/// `{"ok": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiRejection(pub AppError);

impl From<AppError> for ApiRejection {
    fn from(e: AppError) -> Self {
        ApiRejection(e)
    }
}

impl<'r> Responder<'r, 'static> for ApiRejection {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        log_failure(&self.0, req);

        let status = Status::from(&self.0);
        let body = RejectionBody {
            ok: false,
            error: self.0.user_message(),
        };

        Response::build_from(Json(body).respond_to(req)?).status(status).ok()
    }
}

fn documented_responses(codes: &[(&str, &str)]) -> Responses {
    use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
    let mut responses = Responses::default();
    for (code, description) in codes {
        responses.responses.insert(
            code.to_string(),
            RefOr::Object(OpenApiResponse {
                description: description.to_string(),
                ..Default::default()
            }),
        );
    }
    responses
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        Ok(documented_responses(&[
            ("400", "Bad Request"),
            ("401", "Unauthorized"),
            ("404", "Not Found"),
            ("500", "Internal Server Error"),
            ("502", "Bad Gateway"),
        ]))
    }
}

impl OpenApiResponderInner for ApiRejection {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        Ok(documented_responses(&[
            ("400", "Bad Request"),
            ("401", "Unauthorized"),
            ("500", "Internal Server Error"),
        ]))
    }
}
