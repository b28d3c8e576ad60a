use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{AggregationError, ValidationError};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Everything a query handler can fail with
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            QueryError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            QueryError::Aggregation(err @ AggregationError::NoDataInRange { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            QueryError::Aggregation(err) => {
                error!("error querying observations: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("Failed to query observations"),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
