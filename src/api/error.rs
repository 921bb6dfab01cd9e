use axum::{
    Form, Json,
    extract::{
        Query,
        rejection::{FormRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::payloads::ErrorBody;
use crate::db::error::StoreError;

/// Store failures become a 500 carrying the raw failure detail.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "store operation failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(self.to_string())),
        )
            .into_response()
    }
}

/// Unknown users are reported in the body with a 200, never as a 404.
pub fn user_not_found(id: &str) -> Response {
    tracing::debug!(user_id = %id, "user not found");
    (StatusCode::OK, Json(ErrorBody::new("User not found"))).into_response()
}

/// Unwraps a form body. A body that is not form-encoded is skipped, leaving
/// every field unset for the store's required-field checks; anything else
/// that fails to deserialize takes the 500 path.
pub fn form_fields<T: Default>(form: Result<Form<T>, FormRejection>) -> Result<T, StoreError> {
    match form {
        Ok(Form(fields)) => Ok(fields),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(StoreError::malformed(rejection.body_text())),
    }
}

pub fn query_fields<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, StoreError> {
    query
        .map(|Query(fields)| fields)
        .map_err(|rejection| StoreError::malformed(rejection.body_text()))
}
