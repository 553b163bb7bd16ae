use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::AppError;

/// JSON body extractor whose rejections are `AppError::Validation`, so bad
/// bodies get the same `{code, message}` shape as every other error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match &rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            JsonRejection::JsonSyntaxError(_) => {
                format!("Malformed JSON body: {}", rejection.body_text())
            }
            _ => rejection.body_text(),
        };
        AppError::Validation(message)
    }
}
