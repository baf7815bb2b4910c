use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use confvault_core::ConfigurationError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    /// Fallo de una operacion de configuracion
    Configuration(ConfigurationError),

    /// Parametros invalidos
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    message: String,
}

impl From<ConfigurationError> for AppError {
    fn from(err: ConfigurationError) -> Self {
        AppError::Configuration(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Every failure is a client-visible 400; the code is kept for diagnostics
        let (code, message) = match self {
            AppError::Configuration(err) => {
                tracing::error!(
                    code = err.code().name(),
                    error = %err,
                    cause = ?std::error::Error::source(&err).map(ToString::to_string),
                    "Configuration operation failed"
                );
                (Some(err.code().as_str()), err.message().to_string())
            },
            AppError::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Rejected request");
                (None, msg)
            },
        };

        let body = Json(ErrorResponse {
            error: "Bad Request".to_string(),
            code,
            message,
        });

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_configuration_error_body() {
        let err = AppError::from(ConfigurationError::remove("Error removing configuration \"x\"!"));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "4");
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["message"], "Error removing configuration \"x\"!");
    }

    #[tokio::test]
    async fn test_bad_request_has_no_code() {
        let response = AppError::BadRequest("id is required".into()).into_response();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("code").is_none());
        assert_eq!(json["message"], "id is required");
    }
}
