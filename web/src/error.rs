use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{
    DomainErrorKind, Error as DomainError, ExternalErrorKind, IntegrationErrorKind,
    InternalErrorKind,
};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Integration(integration_error_kind) => match integration_error_kind {
                IntegrationErrorKind::UpstreamAuth(detail) => {
                    (StatusCode::BAD_REQUEST, detail).into_response()
                }
                IntegrationErrorKind::StateMismatch => {
                    (StatusCode::BAD_REQUEST, "State does not match.").into_response()
                }
                IntegrationErrorKind::NoCredential => {
                    (StatusCode::BAD_REQUEST, "No credentials found.").into_response()
                }
                IntegrationErrorKind::InvalidCredential => {
                    (StatusCode::BAD_REQUEST, "Invalid credentials.").into_response()
                }
            },
            DomainErrorKind::Internal(internal_error_kind) => {
                match internal_error_kind {
                    InternalErrorKind::Config => error!("Integration is not configured"),
                    InternalErrorKind::Store => error!("Ephemeral store failure"),
                    InternalErrorKind::Other(message) => error!("Internal error: {}", message),
                }
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network => {
                    (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
                }
                ExternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
