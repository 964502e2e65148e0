use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use validator::{ValidationErrors, ValidationErrorsKind};

/// One problem found in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Field the issue refers to (`body` when the JSON itself is unusable).
    pub path: String,
    pub code: String,
    pub message: String,
}

/// Application-level error type for HTTP handlers.
///
/// Storage failures never show up here: backends answer with a status and
/// payload of their own. This covers what the HTTP layer rejects before a
/// backend is called.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body is malformed or breaks a field rule.
    #[error("Validation failed: {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    /// The query string could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route matches the request, or the route has no handler for the
    /// method.
    #[error("Route not found")]
    RouteNotFound,

    /// An internal error with a human-readable message. Raised when a
    /// backend answers with a status that is not a valid HTTP status code.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(issues) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": issues }))
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::RouteNotFound => {
                (StatusCode::NOT_FOUND, json!({ "error": "Route not found" }))
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match &rejection {
            JsonRejection::JsonDataError(_) => "invalid_data",
            JsonRejection::JsonSyntaxError(_) => "invalid_json",
            JsonRejection::MissingJsonContentType(_) => "missing_content_type",
            _ => "unreadable_body",
        };
        AppError::Validation(vec![ValidationIssue {
            path: "body".to_string(),
            code: code.to_string(),
            message: rejection.body_text(),
        }])
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut issues = Vec::new();
        collect_issues(&errors, "", &mut issues);
        issues.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.code.cmp(&b.code)));
        AppError::Validation(issues)
    }
}

/// Flatten nested validator errors into `path`-addressed issues.
fn collect_issues(errors: &ValidationErrors, prefix: &str, issues: &mut Vec<ValidationIssue>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                issues.extend(field_errors.iter().map(|e| ValidationIssue {
                    path: path.clone(),
                    code: e.code.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{path} failed the '{}' rule", e.code)),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_issues(inner, &path, issues),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_issues(inner, &format!("{path}[{index}]"), issues);
                }
            }
        }
    }
}
