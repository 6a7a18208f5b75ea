use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use carteira_core::errors::CarteiraError;

pub type AppResult<T> = Result<T, AppError>;

/// Error shape returned by every handler: `{ "error": "<message>" }` plus
/// the mapped status code. Nothing escapes unhandled.
#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request<M: Into<String>>(message: M) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
        }
    }

    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::bad_request(format!("Campos obrigatórios ausentes: {}", fields.join(", ")))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<CarteiraError> for AppError {
    fn from(err: CarteiraError) -> Self {
        match err {
            CarteiraError::Unauthorized => AppError::unauthorized(),
            CarteiraError::MissingFields(_)
            | CarteiraError::StoreError(_)
            | CarteiraError::TimelineNotFound(_)
            | CarteiraError::EventNotFound(_) => AppError::bad_request(err.to_string()),
            other => AppError::internal(other.to_string()),
        }
    }
}
