use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use shopsync_engine::OrderFlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid request. {0}")]
    InvalidRequest(String),
    #[error("{0}")]
    OrderFlow(#[from] OrderFlowError),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::OrderFlow(e) => match e {
                OrderFlowError::InsufficientStock { .. } => StatusCode::CONFLICT,
                OrderFlowError::NotFound(_) | OrderFlowError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                OrderFlowError::UserNotLinked(_) | OrderFlowError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
                OrderFlowError::RemoteUnavailable(_) | OrderFlowError::RemoteDataError(_) => StatusCode::BAD_GATEWAY,
                OrderFlowError::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
