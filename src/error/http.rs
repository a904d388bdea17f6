use super::{ShelfErr, ShelfError};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

impl ShelfError {
    pub fn status(&self) -> StatusCode {
        use ShelfErr as E;
        use StatusCode as SC;
        match self.error {
            E::DoesNotExist(_) => SC::NOT_FOUND,
            E::InvalidFile(_) | E::MissingField(_) | E::NoData(_) => SC::BAD_REQUEST,
            E::Multipart(ref e) => e.status(),
            E::Query(ref e) => e.status(),
            E::Validation(_) => SC::UNPROCESSABLE_ENTITY,
            E::IO(_) | E::Sqlx(_) => SC::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response wrapper.
#[derive(Debug, Serialize)]
struct ResponseError<T: Serialize> {
    error_type: ErrorType,
    body: T,
}

impl<T> ResponseError<T>
where
    T: Serialize,
{
    pub fn new(error_type: ErrorType, body: T) -> Self {
        Self { error_type, body }
    }
}

#[derive(Debug, Serialize)]
enum ErrorType {
    Internal,
    Api,
}

impl<T> IntoResponse for ResponseError<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        <Json<ResponseError<T>> as IntoResponse>::into_response(Json(self))
    }
}

impl IntoResponse for ShelfError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        self.print();

        use ErrorType as ET;
        use ShelfErr as SE;

        match self.error {
            SE::DoesNotExist(e) | SE::InvalidFile(e) | SE::MissingField(e) | SE::NoData(e) => {
                (status, ResponseError::new(ET::Api, e)).into_response()
            }

            SE::Validation(errors) => (status, ResponseError::new(ET::Api, errors)).into_response(),

            SE::Multipart(e) => {
                (status, ResponseError::new(ET::Api, e.body_text())).into_response()
            }

            SE::Query(e) => (status, ResponseError::new(ET::Api, e.body_text())).into_response(),

            SE::IO(_) => (
                status,
                ResponseError::new(ET::Internal, "Storage failure".to_string()),
            )
                .into_response(),

            SE::Sqlx(_) => (
                status,
                ResponseError::new(ET::Internal, "Persistence failure".to_string()),
            )
                .into_response(),
        }
    }
}
