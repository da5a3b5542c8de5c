use rocket::http::Status;
use rocket::response::Responder;
use thiserror::Error;
use tracing::error;
use crate::store::StoreError;

/// Failure of a page route. The registered catchers render the error page.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Page not found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::NotFound => Status::NotFound,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        if let ApiError::Internal(reason) = &self {
            error!("Failed to serve {}: {}", req.uri(), reason);
        }
        Err(self.status())
    }
}
